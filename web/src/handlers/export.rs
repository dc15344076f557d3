//! Todo export endpoint.

use crate::error::AppError;
use crate::extractors::{ApiQuery, CurrentUser};
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use todo_list_core::export::{Export, ExportFormat};
use todo_list_core::repository::{TodoRepository, UserRepository};

/// Query parameters of the export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    /// `json` (default) or `csv`
    pub format: Option<String>,
}

/// Download all of the current user's todos, newest first.
///
/// # Endpoint
///
/// ```text
/// GET /api/todos/export?format=csv
/// ```
///
/// # Errors
///
/// Returns 400 for an unknown format, 404 for an unknown user, 500 if the
/// repository fails.
pub async fn export_todos<U, T>(
    State(state): State<AppState<U, T>>,
    CurrentUser(user): CurrentUser,
    ApiQuery(params): ApiQuery<ExportParams>,
) -> Result<Response, AppError>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    let format = ExportFormat::parse(params.format.as_deref())?;
    let export = state.service().export_todos(&user, format).await?;
    let disposition = [(header::CONTENT_DISPOSITION, format.content_disposition())];

    Ok(match export {
        Export::Json(todos) => (disposition, Json(todos)).into_response(),
        Export::Csv(csv) => (
            [
                (header::CONTENT_TYPE, format.content_type()),
                (header::CONTENT_DISPOSITION, format.content_disposition()),
            ],
            csv,
        )
            .into_response(),
    })
}
