//! Persistence seams.
//!
//! The service talks to storage only through these traits. Every todo
//! operation takes the owning [`UserId`] and scopes by it, so a todo id
//! belonging to someone else behaves exactly like an id that does not exist.

use crate::error::Result;
use crate::model::{Note, Todo, TodoId, User, UserId};
use crate::input::TodoPatch;
use crate::query::{TodoPage, TodoQuery};
use chrono::{DateTime, Utc};
use std::future::Future;

/// User repository.
pub trait UserRepository: Send + Sync {
    /// Get user by username.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Repository`](crate::error::TodoError::Repository)
    /// if the query fails. An unknown username is `Ok(None)`.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send;

    /// All users, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails or the username or email is taken.
    fn insert_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send;
}

/// Todo repository.
pub trait TodoRepository: Send + Sync {
    /// Insert a fully built todo.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn insert(&self, todo: &Todo) -> impl Future<Output = Result<Todo>> + Send;

    /// Scoped lookup by `(owner, id)`.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn find(
        &self,
        owner: UserId,
        id: TodoId,
    ) -> impl Future<Output = Result<Option<Todo>>> + Send;

    /// One page of the todos matching `query`, plus the total match count.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn list(&self, query: &TodoQuery) -> impl Future<Output = Result<TodoPage>> + Send;

    /// Apply `patch` and set `updatedAt` to `now`. `None` when no todo
    /// matches `(owner, id)`.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn update(
        &self,
        owner: UserId,
        id: TodoId,
        patch: &TodoPatch,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Todo>>> + Send;

    /// Scoped delete. `true` when a todo was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn delete(&self, owner: UserId, id: TodoId) -> impl Future<Output = Result<bool>> + Send;

    /// Append `note` as one atomic write and set `updatedAt` to `now`.
    /// Existing notes are never touched.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn append_note(
        &self,
        owner: UserId,
        id: TodoId,
        note: &Note,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Todo>>> + Send;

    /// Every todo `owner` owns, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    fn export(&self, owner: UserId) -> impl Future<Output = Result<Vec<Todo>>> + Send;
}
