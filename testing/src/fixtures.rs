//! Ready-made services and requests for tests.

use crate::mocks::{ManualClock, epoch};
use crate::repositories::{InMemoryTodoRepository, InMemoryUserRepository};
use std::sync::Arc;
use todo_list_core::identity::IdentityHint;
use todo_list_core::input::CreateTodoRequest;
use todo_list_core::model::User;
use todo_list_core::service::TodoService;

/// The service type the fixtures build.
pub type InMemoryService = TodoService<InMemoryUserRepository, InMemoryTodoRepository>;

/// A user named `username` with an `@example.com` address.
#[must_use]
pub fn user(username: &str) -> User {
    User::new(username, format!("{username}@example.com"), epoch())
}

/// A service over empty todos and the given users, plus a handle on its clock.
#[must_use]
pub fn service_with_users(usernames: &[&str]) -> (InMemoryService, ManualClock) {
    let clock = ManualClock::new(epoch());
    let users = InMemoryUserRepository::with_users(usernames.iter().copied().map(user));
    let service = TodoService::new(users, InMemoryTodoRepository::new(), Arc::new(clock.clone()));
    (service, clock)
}

/// An identity hint carrying `username` in the query parameter.
#[must_use]
pub fn hint(username: &str) -> IdentityHint {
    IdentityHint::new(Some(username.to_string()), None)
}

/// A create request with only a title.
#[must_use]
pub fn titled(title: &str) -> CreateTodoRequest {
    CreateTodoRequest {
        title: Some(title.to_string()),
        ..CreateTodoRequest::default()
    }
}

/// A create request with a title and tags.
#[must_use]
pub fn tagged(title: &str, tags: &[&str]) -> CreateTodoRequest {
    CreateTodoRequest {
        tags: Some(tags.iter().map(ToString::to_string).collect()),
        ..titled(title)
    }
}
