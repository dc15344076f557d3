//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by resource.

pub mod export;
pub mod health;
pub mod todos;
pub mod users;

pub use export::export_todos;
pub use health::{banner, health_check};
pub use todos::{add_note, create_todo, delete_todo, get_todo, list_todos, update_todo};
pub use users::list_users;
