//! Persistence service for users and their exercises.
//!
//! Handlers only see the [`ExerciseStore`] trait. [`SqliteStore`] is the
//! production implementation; tests may substitute their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

mod sqlite;

pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{}", describe_sqlx(.0))]
    Database(#[from] sqlx::Error),
    /// A stored row could not be mapped back into a record.
    #[error("corrupt {table} row: {message}")]
    Corrupt { table: &'static str, message: String },
}

fn describe_sqlx(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        sqlx::Error::PoolTimedOut => "database connection pool timed out".to_string(),
        other => other.to_string(),
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub duration: i64,
    pub date: DateTime<Utc>,
}

/// Values for a new user.
///
/// Fields are optional so that a lenient caller can hand a missing value to
/// storage and let the `NOT NULL` constraint reject it.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: Option<String>,
}

/// Values for a new exercise. See [`NewUser`] for why fields are optional.
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub user_id: String,
    pub description: Option<String>,
    pub duration: Option<i64>,
    pub date: DateTime<Utc>,
}

/// Predicate for an exercise log query.
///
/// `from` and `to` are inclusive. `limit` caps the number of rows in storage
/// order; there is no explicit sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    pub user_id: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl LogFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), ..Self::default() }
    }
}

#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Persists a user under a freshly generated id.
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    /// All users in storage order.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>>;

    /// Persists an exercise under a freshly generated id. The owning user must
    /// exist; storage enforces the reference.
    async fn create_exercise(&self, new: NewExercise) -> StoreResult<Exercise>;

    async fn find_exercises(&self, filter: &LogFilter) -> StoreResult<Vec<Exercise>>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases connections. Called once on shutdown.
    async fn close(&self);
}
