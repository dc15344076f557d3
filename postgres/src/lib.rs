//! `PostgreSQL` repositories for the todo list service.
//!
//! This crate implements the `UserRepository` and `TodoRepository` traits from
//! `todo-list-core` on top of sqlx:
//!
//! - Every todo statement is scoped by `(user_id, id)`
//! - List queries are rendered from a `TodoQuery` with `sqlx::QueryBuilder`
//! - Notes live in a JSONB array and are appended in a single `UPDATE`
//! - Todos are returned joined with their owner
//!
//! # Example
//!
//! ```ignore
//! use todo_list_postgres::{PostgresTodoRepository, PostgresUserRepository, run_migrations};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = sqlx::PgPool::connect("postgres://localhost/todo_list").await?;
//!     run_migrations(&pool).await?;
//!     let users = PostgresUserRepository::new(pool.clone());
//!     let todos = PostgresTodoRepository::new(pool);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod todo;
mod user;

pub use todo::PostgresTodoRepository;
pub use user::PostgresUserRepository;

use sqlx::PgPool;
use todo_list_core::error::{Result, TodoError};

/// Apply the bundled migrations.
///
/// # Errors
///
/// Returns [`TodoError::Repository`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| TodoError::repository(format!("Migration failed: {e}")))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Convert a sqlx failure into a repository error, counting it.
pub(crate) fn database_error(context: &str, err: &sqlx::Error) -> TodoError {
    metrics::counter!("postgres.errors").increment(1);
    TodoError::repository(format!("{context}: {err}"))
}
