//! Application state for Axum handlers.

use std::sync::Arc;
use todo_list_core::TodoService;

/// Application state shared across all HTTP handlers.
///
/// Generic over the repositories so the same router serves `PostgreSQL`
/// in production and in-memory repositories in tests.
///
/// # Examples
///
/// ```ignore
/// let service = TodoService::new(users, todos, Arc::new(SystemClock));
/// let app = todo_router(AppState::new(service));
/// ```
pub struct AppState<U, T> {
    service: Arc<TodoService<U, T>>,
}

// Derived Clone would require `U: Clone, T: Clone`.
impl<U, T> Clone for AppState<U, T> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<U, T> AppState<U, T> {
    /// Create a new application state.
    #[must_use]
    pub fn new(service: TodoService<U, T>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// The todo service.
    #[must_use]
    pub fn service(&self) -> &TodoService<U, T> {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_list_testing::fixtures::{InMemoryService, service_with_users};

    #[test]
    fn test_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState<todo_list_testing::InMemoryUserRepository, todo_list_testing::InMemoryTodoRepository>>();
    }

    #[test]
    fn test_clones_share_the_service() {
        let (service, _clock): (InMemoryService, _) = service_with_users(&[]);
        let state = AppState::new(service);
        let clone = state.clone();
        assert!(std::ptr::eq(state.service(), clone.service()));
    }
}
