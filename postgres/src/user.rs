//! `PostgreSQL` user repository.

use crate::database_error;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use todo_list_core::error::{Result, TodoError};
use todo_list_core::model::{User, UserId};
use todo_list_core::repository::UserRepository;

/// `PostgreSQL` user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new `PostgreSQL` user repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User> {
    let read = |e: sqlx::Error| database_error("Failed to read user row", &e);
    Ok(User {
        id: UserId::from_uuid(row.try_get("id").map_err(read)?),
        username: row.try_get("username").map_err(read)?,
        email: row.try_get("email").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
        updated_at: row.try_get("updated_at").map_err(read)?,
    })
}

impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, created_at, updated_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to get user", &e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT id, username, email, created_at, updated_at
            FROM users
            ORDER BY username
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to list users", &e))?;

        rows.iter().map(user_from_row).collect()
    }

    async fn insert_user(&self, user: &User) -> Result<User> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return TodoError::repository(format!(
                        "User {} or email {} already exists",
                        user.username, user.email
                    ));
                }
            }
            database_error("Failed to create user", &e)
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user.clone())
    }
}
