use async_trait::async_trait;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row, Sqlite,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::{Exercise, ExerciseStore, LogFilter, NewExercise, NewUser, StoreError, StoreResult, User};
use crate::config::{ensure_sqlite_parent_dir, DatabaseConfig};
use crate::dates;

/// [`ExerciseStore`] on a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if necessary) the database at `cfg.url` and prepares the schema.
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let url = cfg.url.as_str();
        let in_memory = url.contains(":memory:");

        if !in_memory {
            ensure_sqlite_parent_dir(url)?;
            if !Sqlite::database_exists(url).await.unwrap_or(false) {
                info!("Creating SQLite database at {}", url);
                Sqlite::create_database(url).await?;
            }
        }

        // Every in-memory connection is its own database, so keep exactly one alive
        let mut options = SqlitePoolOptions::new();
        options = if in_memory {
            options.max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            options.max_connections(cfg.max_connections)
        };

        let pool = options
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys=ON;").execute(&mut *conn).await?;
                    let _ = sqlx::query("PRAGMA busy_timeout=10000;").execute(&mut *conn).await;
                    Ok(())
                })
            })
            .connect(url)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, creating tables and indexes if they are missing.
    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // The user reference on exercises depends on this
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS exercises (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            description TEXT NOT NULL,
            duration INTEGER NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            FOREIGN KEY(user_id) REFERENCES users(id)
        )"#,
    )
    .execute(pool)
    .await?;

    if let Err(e) = sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_exercises_user_date ON exercises(user_id, date)",
    )
    .execute(pool)
    .await
    {
        tracing::warn!("Failed to create index idx_exercises_user_date: {}", e);
    }

    Ok(())
}

fn user_from_row(row: &SqliteRow) -> StoreResult<User> {
    Ok(User { id: row.try_get("id")?, username: row.try_get("username")? })
}

fn exercise_from_row(row: &SqliteRow) -> StoreResult<Exercise> {
    let raw_date: String = row.try_get("date")?;
    let date = dates::from_storage(&raw_date).map_err(|e| StoreError::Corrupt {
        table: "exercises",
        message: format!("date {:?}: {}", raw_date, e),
    })?;
    Ok(Exercise {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        description: row.try_get("description")?,
        duration: row.try_get("duration")?,
        date,
    })
}

#[async_trait]
impl ExerciseStore for SqliteStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let id = Uuid::new_v4().to_string();
        let row = sqlx::query("INSERT INTO users (id, username) VALUES (?1, ?2) RETURNING id, username")
            .bind(&id)
            .bind(new.username)
            .fetch_one(&self.pool)
            .await?;
        user_from_row(&row)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT id, username FROM users").fetch_all(&self.pool).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, username FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn create_exercise(&self, new: NewExercise) -> StoreResult<Exercise> {
        let id = Uuid::new_v4().to_string();
        let row = sqlx::query(
            r#"INSERT INTO exercises (id, user_id, description, duration, date)
               VALUES (?1, ?2, ?3, ?4, ?5)
               RETURNING id, user_id, description, duration, date"#,
        )
        .bind(&id)
        .bind(&new.user_id)
        .bind(new.description)
        .bind(new.duration)
        .bind(dates::to_storage(&new.date))
        .fetch_one(&self.pool)
        .await?;
        exercise_from_row(&row)
    }

    async fn find_exercises(&self, filter: &LogFilter) -> StoreResult<Vec<Exercise>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, user_id, description, duration, date FROM exercises WHERE user_id = ",
        );
        qb.push_bind(filter.user_id.clone());
        if let Some(from) = &filter.from {
            qb.push(" AND date >= ").push_bind(dates::to_storage(from));
        }
        if let Some(to) = &filter.to {
            qb.push(" AND date <= ").push_bind(dates::to_storage(to));
        }
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        debug!(sql = qb.sql(), "exercise log query");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(exercise_from_row).collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
