//! Router composition.
//!
//! Composes all todo list handlers into a single Axum router.

use crate::handlers::{export, health, todos, users};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use todo_list_core::repository::{TodoRepository, UserRepository};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router.
///
/// # Routes
///
/// - `GET /` - Service banner
/// - `GET /health` - Liveness
/// - `GET /api/users` - List users
/// - `GET /api/todos` - List the current user's todos
/// - `POST /api/todos` - Create a todo
/// - `GET /api/todos/export` - Export todos as JSON or CSV
/// - `GET /api/todos/:id` - Fetch a todo
/// - `PUT /api/todos/:id` - Update a todo
/// - `DELETE /api/todos/:id` - Delete a todo
/// - `POST /api/todos/:id/notes` - Append a note
///
/// Every request passes through the correlation ID layer, `TraceLayer` and
/// a permissive CORS layer.
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState::new(TodoService::new(users, todos, Arc::new(SystemClock)));
/// let app = todo_router(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn todo_router<U, T>(state: AppState<U, T>) -> Router
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        .route("/api/users", get(users::list_users::<U, T>))
        .route(
            "/api/todos",
            get(todos::list_todos::<U, T>).post(todos::create_todo::<U, T>),
        )
        .route("/api/todos/export", get(export::export_todos::<U, T>))
        .route(
            "/api/todos/:id",
            get(todos::get_todo::<U, T>)
                .put(todos::update_todo::<U, T>)
                .delete(todos::delete_todo::<U, T>),
        )
        .route("/api/todos/:id/notes", post(todos::add_note::<U, T>))
        .with_state(state)
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
