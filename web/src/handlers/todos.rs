//! Todo CRUD and note endpoints.
//!
//! Every handler resolves the current user first, so an unknown user is a
//! 404 regardless of the rest of the request.

use crate::error::AppError;
use crate::extractors::{ApiJson, ApiQuery, CurrentUser};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use todo_list_core::input::{AddNoteRequest, CreateTodoRequest, UpdateTodoRequest};
use todo_list_core::model::Todo;
use todo_list_core::query::{ListParams, TodoListing};
use todo_list_core::repository::{TodoRepository, UserRepository};

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    /// Confirmation message
    pub message: &'static str,
}

/// List the current user's todos.
///
/// # Endpoint
///
/// ```text
/// GET /api/todos?page=1&limit=10&priority=high&completed=false&tags=work,urgent&sortBy=title&sortOrder=asc&search=report
/// ```
///
/// # Errors
///
/// Returns 400 for malformed parameters.
pub async fn list_todos<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<TodoListing>, AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    Ok(Json(state.service().list_todos(&user, &params).await?))
}

/// Fetch one todo.
///
/// # Errors
///
/// Returns 404 if the todo does not exist or belongs to someone else.
pub async fn get_todo<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    Ok(Json(state.service().get_todo(&user, &id).await?))
}

/// Create a todo; responds 201.
///
/// # Errors
///
/// Returns 400 for a missing title or a malformed body.
pub async fn create_todo<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    let todo = state.service().create_todo(&user, request).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Partially update a todo.
///
/// # Errors
///
/// Returns 400 for a blank title or malformed body, 404 for a missing todo.
pub async fn update_todo<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    Ok(Json(state.service().update_todo(&user, &id, request).await?))
}

/// Delete a todo.
///
/// # Errors
///
/// Returns 404 for a missing todo.
pub async fn delete_todo<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    state.service().delete_todo(&user, &id).await?;
    Ok(Json(Deleted {
        message: "Todo deleted successfully",
    }))
}

/// Append a note to a todo.
///
/// # Errors
///
/// Returns 400 for blank content, 404 for a missing todo.
pub async fn add_note<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<AddNoteRequest>,
) -> Result<Json<Todo>, AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    Ok(Json(state.service().add_note(&user, &id, request).await?))
}
