//! # Todo List Core
//!
//! Domain model and operations for a multi-user todo list.
//!
//! ## Concepts
//!
//! - **Identity**: callers name themselves with a `user` query parameter or an
//!   `x-current-user` header. The name is resolved to a [`User`] once per
//!   request and passed explicitly to every operation.
//! - **Scoped lookup**: every todo read and write is keyed by `(owner, id)`,
//!   so another user's todo is indistinguishable from a missing one.
//! - **Query builder**: [`TodoQuery`] turns raw list parameters into an
//!   owner-scoped filter, sort and page.
//! - **Repositories**: [`UserRepository`] and [`TodoRepository`] are the only
//!   path to storage. `todo-list-postgres` implements them over `PostgreSQL`,
//!   `todo-list-testing` in memory.
//!
//! ## Example
//!
//! ```ignore
//! use todo_list_core::*;
//!
//! let service = TodoService::new(users, todos, Arc::new(SystemClock));
//! let alice = service.resolve_identity(&IdentityHint::new(Some("alice".into()), None)).await?;
//! let todo = service
//!     .create_todo(&alice, CreateTodoRequest { title: Some("Buy milk".into()), ..Default::default() })
//!     .await?;
//! ```

pub mod environment;
pub mod error;
pub mod export;
pub mod identity;
pub mod input;
pub mod model;
pub mod query;
pub mod repository;
pub mod service;

pub use chrono::{DateTime, Utc};
pub use environment::{Clock, SystemClock};
pub use error::{Result, TodoError};
pub use export::{CSV_HEADER, Export, ExportFormat};
pub use identity::{CURRENT_USER_HEADER, DEFAULT_USERNAME, IdentityHint, USER_QUERY_PARAM};
pub use input::{AddNoteRequest, CreateTodoRequest, NewTodo, TodoPatch, UpdateTodoRequest};
pub use model::{Note, Priority, Todo, TodoId, User, UserId, UserSummary};
pub use query::{ListParams, Page, Pagination, Sort, SortField, SortOrder, TodoFilter, TodoListing, TodoPage, TodoQuery};
pub use repository::{TodoRepository, UserRepository};
pub use service::TodoService;
