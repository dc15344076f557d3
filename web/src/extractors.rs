//! Custom Axum extractors.
//!
//! - `CurrentUser`: resolve the caller's identity hint to a stored user
//! - `CorrelationId`: the request's correlation ID
//! - `ApiJson` / `ApiQuery`: axum's `Json` and `Query` with rejections
//!   rendered as [`AppError`]
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState<U, T>>,
//!     CurrentUser(user): CurrentUser,
//!     ApiJson(request): ApiJson<CreateTodoRequest>,
//! ) -> Result<Json<Todo>, AppError> {
//!     Ok(Json(state.service().create_todo(&user, request).await?))
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use todo_list_core::identity::{CURRENT_USER_HEADER, IdentityHint};
use todo_list_core::model::User;
use todo_list_core::repository::{TodoRepository, UserRepository};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Reads the ID the correlation middleware stored in the request
/// extensions, then the `X-Correlation-ID` header, and otherwise generates
/// a new UUID v4.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .extensions
            .get::<Uuid>()
            .copied()
            .or_else(|| {
                parts
                    .headers
                    .get(CORRELATION_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| Uuid::parse_str(s).ok())
            })
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

#[derive(Debug, Deserialize)]
struct IdentityQuery {
    user: Option<String>,
}

/// Read the identity hints from a request without resolving them.
///
/// # Errors
///
/// Returns a 400 [`AppError`] if the query string cannot be parsed.
pub fn identity_hint(parts: &Parts) -> Result<IdentityHint, AppError> {
    let Query(query) = Query::<IdentityQuery>::try_from_uri(&parts.uri)?;
    let header = parts
        .headers
        .get(CURRENT_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Ok(IdentityHint::new(query.user, header))
}

/// The user the request acts as.
///
/// Resolved from the `user` query parameter, then the `x-current-user`
/// header, then the service's default username. An unknown name rejects the
/// request with 404.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<U, T> FromRequestParts<AppState<U, T>> for CurrentUser
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, T>,
    ) -> Result<Self, Self::Rejection> {
        let hint = identity_hint(parts)?;
        let user = state.service().resolve_identity(&hint).await?;
        tracing::Span::current().record("user", user.username.as_str());
        Ok(Self(user))
    }
}

/// JSON body extractor whose rejections are 400 [`AppError`]s.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections are 400 [`AppError`]s.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = header {
            builder = builder.header(CURRENT_USER_HEADER, value);
        }
        builder.body(()).expect("Valid request").into_parts().0
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = Request::builder()
            .header(CORRELATION_ID_HEADER, uuid.to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let uuid = Uuid::new_v4();
        let mut parts = parts("/", None);
        parts.extensions.insert(uuid);

        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_generates_new() {
        let mut parts = parts("/", None);
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_ne!(correlation_id.0, Uuid::nil());
    }

    #[test]
    fn test_identity_hint_reads_query_and_header() {
        let hint = identity_hint(&parts("/api/todos?user=alice&page=2", Some("bob"))).unwrap();
        assert_eq!(hint.query.as_deref(), Some("alice"));
        assert_eq!(hint.header.as_deref(), Some("bob"));
        assert_eq!(hint.username("john_doe"), "alice");
    }

    #[test]
    fn test_identity_hint_without_query() {
        let hint = identity_hint(&parts("/api/todos", Some("bob"))).unwrap();
        assert_eq!(hint.username("john_doe"), "bob");
    }
}
