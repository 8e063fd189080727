//! Translation of log query parameters into a storage predicate.

use chrono::{DateTime, Utc};

use crate::dates::parse_date_input;
use crate::error::{AppError, AppResult};
use crate::store::LogFilter;
use crate::types::LogQuery;

/// Builds the [`LogFilter`] for `user_id` from the raw query parameters.
///
/// Empty parameters count as absent. In lenient mode an unparseable `limit`
/// is ignored and an unparseable date bound fails the way the storage layer
/// would, with a server error. In strict mode both are validation errors.
pub fn build_filter(user_id: &str, query: &LogQuery, strict: bool) -> AppResult<LogFilter> {
    let mut filter = LogFilter::for_user(user_id);
    filter.from = date_bound(present(&query.from), "from", strict)?;
    filter.to = date_bound(present(&query.to), "to", strict)?;
    filter.limit = match present(&query.limit) {
        None => None,
        Some(raw) if strict => Some(strict_limit(raw)?),
        Some(raw) => parse_int_prefix(raw).filter(|n| *n >= 0),
    };
    Ok(filter)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn date_bound(raw: Option<&str>, field: &str, strict: bool) -> AppResult<Option<DateTime<Utc>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match parse_date_input(raw) {
        Some(dt) => Ok(Some(dt)),
        None if strict => Err(AppError::validation(field, format!("invalid date {:?}", raw))),
        None => Err(AppError::Storage(format!("invalid date value for {}: {:?}", field, raw))),
    }
}

fn strict_limit(raw: &str) -> AppResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        Ok(n) => Err(AppError::validation("limit", format!("must not be negative, got {}", n))),
        Err(_) => Err(AppError::validation("limit", format!("not an integer: {:?}", raw))),
    }
}

/// Reads the leading integer of `raw` the way a lenient form parser does:
/// surrounding whitespace and trailing garbage are ignored, so `" 5abc"` is 5.
/// `None` when no digits lead the string.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
