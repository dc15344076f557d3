//! Request bodies and their validated forms.
//!
//! Bodies deserialize into the `*Request` structs, which reject unknown
//! fields and wrong JSON types. `validate` then enforces the rules serde
//! cannot express (non-blank title and note content) and produces the value
//! the repositories consume.

use crate::error::{Result, TodoError};
use crate::model::Priority;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/todos`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTodoRequest {
    /// Required; trimmed before storage.
    pub title: Option<String>,
    /// Defaults to the empty string.
    pub description: Option<String>,
    /// Defaults to medium.
    pub priority: Option<Priority>,
    /// Defaults to no tags.
    pub tags: Option<Vec<String>>,
    /// Defaults to nobody.
    pub assigned_users: Option<Vec<String>>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Trimmed, non-empty title
    pub title: String,
    /// Description
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Tags
    pub tags: Vec<String>,
    /// Assigned users
    pub assigned_users: Vec<String>,
}

impl CreateTodoRequest {
    /// Apply defaults and check the title.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if the title is missing or blank.
    pub fn validate(self) -> Result<NewTodo> {
        let title = self
            .title
            .as_deref()
            .and_then(non_blank)
            .ok_or_else(|| TodoError::validation("Title is required"))?;

        Ok(NewTodo {
            title,
            description: self.description.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            assigned_users: self.assigned_users.unwrap_or_default(),
        })
    }
}

/// Body of `PUT /api/todos/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTodoRequest {
    /// New title; trimmed and must stay non-blank.
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
    /// New completion flag
    pub completed: Option<bool>,
    /// Replacement tag list
    pub tags: Option<Vec<String>>,
    /// Replacement assignee list
    pub assigned_users: Option<Vec<String>>,
}

/// A partial update that passed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Trimmed, non-empty title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Priority
    pub priority: Option<Priority>,
    /// Completion flag
    pub completed: Option<bool>,
    /// Tags
    pub tags: Option<Vec<String>>,
    /// Assigned users
    pub assigned_users: Option<Vec<String>>,
}

impl UpdateTodoRequest {
    /// Trim the title, if present, and check it is still non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if a title is present but blank.
    pub fn validate(self) -> Result<TodoPatch> {
        let title = match self.title.as_deref() {
            Some(raw) => Some(
                non_blank(raw).ok_or_else(|| TodoError::validation("Title cannot be empty"))?,
            ),
            None => None,
        };

        Ok(TodoPatch {
            title,
            description: self.description,
            priority: self.priority,
            completed: self.completed,
            tags: self.tags,
            assigned_users: self.assigned_users,
        })
    }
}

/// Body of `POST /api/todos/:id/notes`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddNoteRequest {
    /// Required; trimmed before storage.
    pub content: Option<String>,
}

impl AddNoteRequest {
    /// Return the trimmed content.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if the content is missing or blank.
    pub fn validate(self) -> Result<String> {
        self.content
            .as_deref()
            .and_then(non_blank)
            .ok_or_else(|| TodoError::validation("Note content is required"))
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
