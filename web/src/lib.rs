//! HTTP surface of the todo list service.
//!
//! This crate maps the REST API onto [`TodoService`](todo_list_core::TodoService):
//! extractors resolve the caller and parse input, handlers call one service
//! operation each, and [`AppError`] renders failures as JSON.
//!
//! # Request Flow
//!
//! 1. **Correlation ID** is attached and an `http_request` span opened
//! 2. **`CurrentUser`** resolves the `user` query parameter or `x-current-user` header
//! 3. **Extract** the path, query string and JSON body
//! 4. **Call** the service with the resolved user
//! 5. **Map** the result or [`TodoError`](todo_list_core::TodoError) to a response
//!
//! # Example
//!
//! ```ignore
//! use todo_list_web::{AppState, todo_router};
//!
//! let app = todo_router(AppState::new(service));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ApiJson, ApiQuery, CorrelationId, CurrentUser};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use router::todo_router;
pub use state::AppState;
