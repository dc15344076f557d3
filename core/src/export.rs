//! Todo export as JSON or CSV.

use crate::error::{Result, TodoError};
use crate::model::Todo;
use chrono::SecondsFormat;

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "Title,Description,Priority,Completed,Tags,Assigned Users,Created At";

/// Export format selected by the `format` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// The todo array as JSON (the default)
    #[default]
    Json,
    /// One quoted row per todo
    Csv,
}

impl ExportFormat {
    /// Parse the `format` parameter. Absent or empty means JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for anything other than `json` or `csv`.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim).unwrap_or_default() {
            "" | "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(TodoError::validation(format!(
                "Invalid format: {other}. Use json or csv"
            ))),
        }
    }

    /// `Content-Type` of the response body.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    /// `Content-Disposition` of the response.
    #[must_use]
    pub const fn content_disposition(&self) -> &'static str {
        match self {
            Self::Json => "attachment; filename=todos.json",
            Self::Csv => "attachment; filename=todos.csv",
        }
    }
}

/// A rendered export, ready to be written to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    /// The todo array, serialized by the HTTP layer
    Json(Vec<Todo>),
    /// The CSV document
    Csv(String),
}

impl Export {
    /// Render `todos` in `format`.
    #[must_use]
    pub fn render(format: ExportFormat, todos: Vec<Todo>) -> Self {
        match format {
            ExportFormat::Json => Self::Json(todos),
            ExportFormat::Csv => Self::Csv(to_csv(&todos)),
        }
    }

    /// The format this export was rendered in.
    #[must_use]
    pub const fn format(&self) -> ExportFormat {
        match self {
            Self::Json(_) => ExportFormat::Json,
            Self::Csv(_) => ExportFormat::Csv,
        }
    }
}

/// Render todos as CSV: the header, then one row per todo, joined by `\n`
/// with no trailing newline.
#[must_use]
pub fn to_csv(todos: &[Todo]) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(todos.iter().map(csv_row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_row(todo: &Todo) -> String {
    let completed = if todo.completed { "true" } else { "false" };
    let tags = todo.tags.join(";");
    let assigned_users = todo.assigned_users.join(";");
    let created_at = todo.created_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    [
        todo.title.as_str(),
        todo.description.as_str(),
        todo.priority.as_str(),
        completed,
        tags.as_str(),
        assigned_users.as_str(),
        created_at.as_str(),
    ]
    .into_iter()
    .map(quote)
    .collect::<Vec<_>>()
    .join(",")
}

// Field contents are written verbatim; embedded quotes and commas are not escaped.
fn quote(field: &str) -> String {
    format!("\"{field}\"")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::model::{Priority, TodoId, User};
    use chrono::{TimeZone, Utc};

    fn todo(title: &str, tags: &[&str], assigned: &[&str]) -> Todo {
        let created = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let owner = User::new("alice", "alice@example.com", created);
        Todo {
            id: TodoId::new(),
            title: title.to_string(),
            description: "desc".to_string(),
            priority: Priority::High,
            completed: true,
            user: owner.summary(),
            tags: tags.iter().map(ToString::to_string).collect(),
            assigned_users: assigned.iter().map(ToString::to_string).collect(),
            notes: vec![],
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn format_defaults_to_json() {
        assert_eq!(ExportFormat::parse(None).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(Some("")).unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(Some("csv")).unwrap(), ExportFormat::Csv);
        assert!(ExportFormat::parse(Some("xml")).is_err());
    }

    #[test]
    fn empty_export_is_just_the_header() {
        assert_eq!(to_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn row_joins_tags_and_assignees() {
        let csv = to_csv(&[todo("Ship it", &["a", "b"], &["@x"])]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some(r#""Ship it","desc","high","true","a;b","@x","2025-03-04T05:06:07.000Z""#)
        );
        assert_eq!(lines.next(), None);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn render_picks_format() {
        let todos = vec![todo("t", &[], &[])];
        assert_eq!(Export::render(ExportFormat::Json, todos.clone()), Export::Json(todos.clone()));
        let csv = Export::render(ExportFormat::Csv, todos);
        assert_eq!(csv.format(), ExportFormat::Csv);
    }

    #[test]
    fn embedded_quotes_and_commas_are_written_verbatim() {
        let csv = to_csv(&[todo(r#"Say "hi", then leave"#, &["a"], &["@x"])]);
        let row = csv.lines().nth(1).unwrap();
        assert!(
            row.starts_with(r#""Say "hi", then leave","desc","high","true""#),
            "{row}"
        );
        assert!(!row.contains(r#""""#), "{row}");
    }
}
