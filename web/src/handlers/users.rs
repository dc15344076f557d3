//! User endpoints.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use todo_list_core::model::UserSummary;
use todo_list_core::repository::{TodoRepository, UserRepository};

/// List every user.
///
/// # Endpoint
///
/// ```text
/// GET /api/users
/// ```
///
/// # Errors
///
/// Returns 500 if the repository fails.
pub async fn list_users<U, T>(
    State(state): State<AppState<U, T>>,
) -> Result<Json<Vec<UserSummary>>, AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    Ok(Json(state.service().list_users().await?))
}
