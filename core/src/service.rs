//! Todo CRUD operations.
//!
//! [`TodoService`] is the one place the HTTP layer calls into. Each operation
//! receives the already-resolved [`User`] and validates its input before
//! touching a repository, so a rejected request never writes anything.

use crate::environment::Clock;
use crate::error::{Result, TodoError};
use crate::export::{Export, ExportFormat};
use crate::identity::{DEFAULT_USERNAME, IdentityHint};
use crate::input::{AddNoteRequest, CreateTodoRequest, UpdateTodoRequest};
use crate::model::{Note, Todo, TodoId, User, UserSummary};
use crate::query::{ListParams, TodoListing, TodoQuery};
use crate::repository::{TodoRepository, UserRepository};
use std::sync::Arc;

/// Todo operations over a pair of repositories.
pub struct TodoService<U, T> {
    users: U,
    todos: T,
    clock: Arc<dyn Clock>,
    default_username: String,
}

impl<U, T> TodoService<U, T>
where
    U: UserRepository,
    T: TodoRepository,
{
    /// Create a service that falls back to [`DEFAULT_USERNAME`] when a
    /// request names nobody.
    #[must_use]
    pub fn new(users: U, todos: T, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            todos,
            clock,
            default_username: DEFAULT_USERNAME.to_string(),
        }
    }

    /// Use another fallback username.
    #[must_use]
    pub fn with_default_username(mut self, username: impl Into<String>) -> Self {
        self.default_username = username.into();
        self
    }

    /// The fallback username.
    #[must_use]
    pub fn default_username(&self) -> &str {
        &self.default_username
    }

    /// The todo repository.
    #[must_use]
    pub const fn todos(&self) -> &T {
        &self.todos
    }

    /// Resolve the request's identity hint to a stored user.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::UserNotFound`] if no user has the hinted name.
    pub async fn resolve_identity(&self, hint: &IdentityHint) -> Result<User> {
        let username = hint.username(&self.default_username);
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                tracing::debug!(username, "Unknown user");
                TodoError::UserNotFound(username.to_string())
            })
    }

    /// Every user, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let users = self.users.list_users().await?;
        Ok(users.iter().map(User::summary).collect())
    }

    /// One page of `user`'s todos.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for malformed parameters, or a
    /// repository error.
    pub async fn list_todos(&self, user: &User, params: &ListParams) -> Result<TodoListing> {
        let query = TodoQuery::from_params(user.id, params)?;
        let page = self.todos.list(&query).await?;
        Ok(TodoListing::new(page, &query))
    }

    /// Create a todo owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if the title is missing or blank.
    pub async fn create_todo(&self, user: &User, request: CreateTodoRequest) -> Result<Todo> {
        let new = request.validate()?;
        let now = self.clock.now();
        let todo = Todo {
            id: TodoId::new(),
            title: new.title,
            description: new.description,
            priority: new.priority,
            completed: false,
            user: user.summary(),
            tags: new.tags,
            assigned_users: new.assigned_users,
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let todo = self.todos.insert(&todo).await?;
        metrics::counter!("todos.created").increment(1);
        tracing::info!(todo_id = %todo.id, user = %user.username, "Todo created");
        Ok(todo)
    }

    /// Fetch one of `user`'s todos.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if `id` is malformed, unknown, or
    /// owned by someone else.
    pub async fn get_todo(&self, user: &User, id: &str) -> Result<Todo> {
        let id = parse_id(id)?;
        self.todos
            .find(user.id, id)
            .await?
            .ok_or(TodoError::NotFound)
    }

    /// Apply a partial update to one of `user`'s todos.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a blank title, or
    /// [`TodoError::NotFound`] as for [`get_todo`](Self::get_todo).
    pub async fn update_todo(
        &self,
        user: &User,
        id: &str,
        request: UpdateTodoRequest,
    ) -> Result<Todo> {
        let patch = request.validate()?;
        let id = parse_id(id)?;
        let todo = self
            .todos
            .update(user.id, id, &patch, self.clock.now())
            .await?
            .ok_or(TodoError::NotFound)?;

        tracing::info!(todo_id = %todo.id, user = %user.username, "Todo updated");
        Ok(todo)
    }

    /// Delete one of `user`'s todos.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] as for [`get_todo`](Self::get_todo).
    pub async fn delete_todo(&self, user: &User, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        if !self.todos.delete(user.id, id).await? {
            return Err(TodoError::NotFound);
        }

        metrics::counter!("todos.deleted").increment(1);
        tracing::info!(todo_id = %id, user = %user.username, "Todo deleted");
        Ok(())
    }

    /// Append a note to one of `user`'s todos.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for blank content, or
    /// [`TodoError::NotFound`] as for [`get_todo`](Self::get_todo).
    pub async fn add_note(&self, user: &User, id: &str, request: AddNoteRequest) -> Result<Todo> {
        let content = request.validate()?;
        let id = parse_id(id)?;
        let now = self.clock.now();
        let note = Note {
            content,
            created_at: now,
        };

        let todo = self
            .todos
            .append_note(user.id, id, &note, now)
            .await?
            .ok_or(TodoError::NotFound)?;

        metrics::counter!("todos.notes.appended").increment(1);
        tracing::debug!(todo_id = %todo.id, notes = todo.notes.len(), "Note appended");
        Ok(todo)
    }

    /// All of `user`'s todos, newest first, rendered in `format`.
    ///
    /// # Errors
    ///
    /// Returns error if the repository fails.
    pub async fn export_todos(&self, user: &User, format: ExportFormat) -> Result<Export> {
        let todos = self.todos.export(user.id).await?;
        let format_label = match format {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        };

        metrics::counter!("todos.exported", "format" => format_label).increment(1);
        tracing::info!(user = %user.username, count = todos.len(), format = format_label, "Todos exported");
        Ok(Export::render(format, todos))
    }
}

fn parse_id(raw: &str) -> Result<TodoId> {
    TodoId::parse(raw).ok_or(TodoError::NotFound)
}
