use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    dates::{format_calendar_date, parse_date_input},
    error::{
        validation::{require_text, validate_positive_number},
        AppError, AppResult, OptionExt,
    },
    extract::{JsonOrForm, QueryParams},
    logs::build_filter,
    state::AppState,
    store::{NewExercise, User},
    types::{CreateExerciseRequest, ExerciseResponse, LogEntry, LogQuery, LogResponse},
};

pub async fn create_exercise(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonOrForm(req): JsonOrForm<CreateExerciseRequest>,
) -> AppResult<Json<ExerciseResponse>> {
    let strict = state.strict();

    // Strict mode rejects bad input before any storage round trip; lenient mode
    // answers "User not found" first, like the lookup-then-insert it mirrors.
    let checked = if strict { Some(resolve_exercise(&user_id, &req, true)?) } else { None };
    let user = find_user_or_404(&state, &user_id).await?;
    let new = match checked {
        Some(new) => new,
        None => resolve_exercise(&user_id, &req, false)?,
    };

    let exercise = state.store.create_exercise(new).await?;
    state.metrics.inc_exercises_logged();
    info!(user_id = %user.id, exercise_id = %exercise.id, "logged exercise");

    Ok(Json(ExerciseResponse {
        id: user.id,
        username: user.username,
        description: exercise.description,
        duration: exercise.duration,
        date: format_calendar_date(&exercise.date),
    }))
}

pub async fn get_log(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    QueryParams(query): QueryParams<LogQuery>,
) -> AppResult<Json<LogResponse>> {
    let strict = state.strict();
    let filter = build_filter(&user_id, &query, strict)?;
    let known = if strict { Some(find_user_or_404(&state, &user_id).await?) } else { None };

    debug!(?filter, "fetching exercise log");
    let exercises = state.store.find_exercises(&filter).await?;
    state.metrics.inc_log_queries();

    // Lenient mode fetches the owner only now and has no clean answer if it is gone
    let user = match known {
        Some(user) => user,
        None => state
            .store
            .find_user(&user_id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("user {} does not exist", user_id)))?,
    };

    let log: Vec<LogEntry> = exercises
        .into_iter()
        .map(|e| LogEntry {
            description: e.description,
            duration: e.duration,
            date: format_calendar_date(&e.date),
        })
        .collect();

    Ok(Json(LogResponse { id: user_id, username: user.username, count: log.len(), log }))
}

async fn find_user_or_404(state: &AppState, user_id: &str) -> AppResult<User> {
    state.store.find_user(user_id).await?.ok_or_not_found("User")
}

/// Turns the request body into storable values.
///
/// Missing fields pass through as `None` in lenient mode so that the storage
/// constraints reject them. Values that cannot be represented at all (a
/// non-integer duration, an unparseable date) fail either way: as a storage
/// error in lenient mode, as a validation error in strict mode.
fn resolve_exercise(user_id: &str, req: &CreateExerciseRequest, strict: bool) -> AppResult<NewExercise> {
    if strict {
        require_text(req.description.as_deref(), "description")?;
    }

    let duration = match &req.duration {
        Some(raw) => match raw.to_i64() {
            Some(v) => Some(v),
            None if strict => {
                return Err(AppError::validation("duration", format!("not an integer: {:?}", raw.to_string())));
            }
            None => {
                return Err(AppError::Storage(format!(
                    "invalid integer value for duration: {:?}",
                    raw.to_string()
                )));
            }
        },
        None if strict => return Err(AppError::validation("duration", "is required")),
        None => None,
    };
    if strict {
        validate_positive_number(duration, "duration")?;
    }

    let date = match req.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => match parse_date_input(raw) {
            Some(dt) => dt,
            None if strict => return Err(AppError::validation("date", format!("invalid date {:?}", raw))),
            None => return Err(AppError::Storage(format!("invalid date value for date: {:?}", raw))),
        },
        None => Utc::now(),
    };

    Ok(NewExercise { user_id: user_id.to_string(), description: req.description.clone(), duration, date })
}
