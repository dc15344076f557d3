//! In-memory repositories.
//!
//! Both evaluate queries with the same [`TodoFilter::matches`] and
//! [`Sort::compare`] the core exposes, so they behave like the `PostgreSQL`
//! repositories without a database.
//!
//! [`TodoFilter::matches`]: todo_list_core::query::TodoFilter::matches
//! [`Sort::compare`]: todo_list_core::query::Sort::compare

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use todo_list_core::error::{Result, TodoError};
use todo_list_core::input::TodoPatch;
use todo_list_core::model::{Note, Todo, TodoId, User, UserId};
use todo_list_core::query::{Sort, TodoFilter, TodoPage, TodoQuery};
use todo_list_core::repository::{TodoRepository, UserRepository};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| TodoError::repository("in-memory store lock poisoned"))
}

/// In-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `users`.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter().map(|user| (user.id, user)).collect();
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>>> + Send {
        let users = Arc::clone(&self.users);
        let username = username.to_string();

        async move {
            Ok(lock(&users)?
                .values()
                .find(|user| user.username == username)
                .cloned())
        }
    }

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            let mut all: Vec<User> = lock(&users)?.values().cloned().collect();
            all.sort_by(|a, b| a.username.cmp(&b.username));
            Ok(all)
        }
    }

    fn insert_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);
        let user = user.clone();

        async move {
            let mut users = lock(&users)?;
            if users
                .values()
                .any(|existing| existing.username == user.username || existing.email == user.email)
            {
                return Err(TodoError::repository(format!(
                    "user {} or email {} already exists",
                    user.username, user.email
                )));
            }
            users.insert(user.id, user.clone());
            Ok(user)
        }
    }
}

/// In-memory todo repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<Mutex<HashMap<TodoId, Todo>>>,
}

impl InMemoryTodoRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos across all users.
    ///
    /// # Errors
    ///
    /// Returns error if the store lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.todos)?.len())
    }

    /// Whether nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns error if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn modify(
        &self,
        owner: UserId,
        id: TodoId,
        now: DateTime<Utc>,
        change: impl FnOnce(&mut Todo),
    ) -> Result<Option<Todo>> {
        let mut todos = lock(&self.todos)?;
        Ok(todos
            .get_mut(&id)
            .filter(|todo| todo.is_owned_by(owner))
            .map(|todo| {
                change(todo);
                todo.updated_at = now;
                todo.clone()
            }))
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn insert(&self, todo: &Todo) -> impl Future<Output = Result<Todo>> + Send {
        let todos = Arc::clone(&self.todos);
        let todo = todo.clone();

        async move {
            lock(&todos)?.insert(todo.id, todo.clone());
            Ok(todo)
        }
    }

    fn find(
        &self,
        owner: UserId,
        id: TodoId,
    ) -> impl Future<Output = Result<Option<Todo>>> + Send {
        let todos = Arc::clone(&self.todos);

        async move {
            Ok(lock(&todos)?
                .get(&id)
                .filter(|todo| todo.is_owned_by(owner))
                .cloned())
        }
    }

    fn list(&self, query: &TodoQuery) -> impl Future<Output = Result<TodoPage>> + Send {
        let todos = Arc::clone(&self.todos);
        let query = query.clone();

        async move {
            let mut matching: Vec<Todo> = lock(&todos)?
                .values()
                .filter(|todo| query.filter.matches(todo))
                .cloned()
                .collect();
            matching.sort_by(|a, b| query.sort.compare(a, b));

            let total = matching.len() as u64;
            let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
            let limit = usize::try_from(query.page.limit).unwrap_or(usize::MAX);
            let todos = matching.into_iter().skip(offset).take(limit).collect();
            Ok(TodoPage { todos, total })
        }
    }

    fn update(
        &self,
        owner: UserId,
        id: TodoId,
        patch: &TodoPatch,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Todo>>> + Send {
        let patch = patch.clone();
        let result = self.modify(owner, id, now, move |todo| {
            if let Some(title) = patch.title {
                todo.title = title;
            }
            if let Some(description) = patch.description {
                todo.description = description;
            }
            if let Some(priority) = patch.priority {
                todo.priority = priority;
            }
            if let Some(completed) = patch.completed {
                todo.completed = completed;
            }
            if let Some(tags) = patch.tags {
                todo.tags = tags;
            }
            if let Some(assigned_users) = patch.assigned_users {
                todo.assigned_users = assigned_users;
            }
        });

        async move { result }
    }

    fn delete(&self, owner: UserId, id: TodoId) -> impl Future<Output = Result<bool>> + Send {
        let todos = Arc::clone(&self.todos);

        async move {
            let mut todos = lock(&todos)?;
            let owned = todos.get(&id).is_some_and(|todo| todo.is_owned_by(owner));
            if owned {
                todos.remove(&id);
            }
            Ok(owned)
        }
    }

    fn append_note(
        &self,
        owner: UserId,
        id: TodoId,
        note: &Note,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Todo>>> + Send {
        let note = note.clone();
        let result = self.modify(owner, id, now, move |todo| todo.notes.push(note));

        async move { result }
    }

    fn export(&self, owner: UserId) -> impl Future<Output = Result<Vec<Todo>>> + Send {
        let todos = Arc::clone(&self.todos);

        async move {
            let filter = TodoFilter::owned_by(owner);
            let sort = Sort::newest_first();
            let mut owned: Vec<Todo> = lock(&todos)?
                .values()
                .filter(|todo| filter.matches(todo))
                .cloned()
                .collect();
            owned.sort_by(|a, b| sort.compare(a, b));
            Ok(owned)
        }
    }
}
