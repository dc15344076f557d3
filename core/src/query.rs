//! Todo query builder.
//!
//! Turns the raw `GET /api/todos` query string into a [`TodoQuery`]: an
//! owner-scoped filter, a single-field sort and a page. Repositories render
//! the query into their own language (SQL for Postgres) and can use
//! [`TodoFilter::matches`] and [`Sort::compare`] when they evaluate in memory.

use crate::error::{Result, TodoError};
use crate::model::{Priority, Todo, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Page used when none is given.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when none is given.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

/// Raw list parameters, exactly as they appear in the query string.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// One priority, or several separated by commas
    pub priority: Option<String>,
    /// `"true"` or `"false"`
    pub completed: Option<String>,
    /// Comma-separated tags; any-of semantics
    pub tags: Option<String>,
    /// Field to sort by
    pub sort_by: Option<String>,
    /// `"asc"` or `"desc"`
    pub sort_order: Option<String>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
}

/// Fields a listing can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Creation time (the default)
    #[default]
    CreatedAt,
    /// Last modification time
    UpdatedAt,
    /// Title
    Title,
    /// Priority, by its string value
    Priority,
    /// Completion flag
    Completed,
}

impl SortField {
    /// The name used in the query string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::Completed => "completed",
        }
    }

    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "priority" => Ok(Self::Priority),
            "completed" => Ok(Self::Completed),
            other => Err(TodoError::validation(format!(
                "Invalid sortBy: {other}. Valid fields are: createdAt, updatedAt, title, priority, completed"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending (the default)
    #[default]
    Desc,
}

impl SortOrder {
    fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(TodoError::validation(format!(
                "Invalid sortOrder: {raw}. Use asc or desc"
            ))),
        }
    }
}

/// A single-field sort. Ties are broken by todo id in the same direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    /// Field to sort by
    pub field: SortField,
    /// Direction
    pub order: SortOrder,
}

impl Sort {
    /// Newest first.
    #[must_use]
    pub const fn newest_first() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }

    /// Order two todos the way the sort describes.
    #[must_use]
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        let by_field = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Priority => a.priority.as_str().cmp(b.priority.as_str()),
            SortField::Completed => a.completed.cmp(&b.completed),
        };
        let ordering = by_field.then_with(|| a.id.cmp(&b.id));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// A 1-based page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Page number, at least 1
    pub number: u32,
    /// Page size, between 1 and [`MAX_LIMIT`]
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Number of matching todos skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.number.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Number of pages needed for `total` matches.
    #[must_use]
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}

/// Predicates a todo must satisfy to be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFilter {
    /// Only todos owned by this user
    pub owner: UserId,
    /// Any of these priorities; empty means no constraint
    pub priorities: Vec<Priority>,
    /// Completion flag
    pub completed: Option<bool>,
    /// At least one of these tags; empty means no constraint
    pub tags: Vec<String>,
    /// Substring of title or description, matched case-insensitively
    pub search: Option<String>,
}

impl TodoFilter {
    /// Everything `owner` owns.
    #[must_use]
    pub const fn owned_by(owner: UserId) -> Self {
        Self {
            owner,
            priorities: Vec::new(),
            completed: None,
            tags: Vec::new(),
            search: None,
        }
    }

    /// Whether `todo` passes every predicate.
    #[must_use]
    pub fn matches(&self, todo: &Todo) -> bool {
        if !todo.is_owned_by(self.owner) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&todo.priority) {
            return false;
        }
        if self.completed.is_some_and(|completed| completed != todo.completed) {
            return false;
        }
        if !self.tags.is_empty() && !todo.has_any_tag(&self.tags) {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            return todo.title.to_lowercase().contains(&needle)
                || todo.description.to_lowercase().contains(&needle);
        }
        true
    }
}

/// A fully built listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoQuery {
    /// What to match
    pub filter: TodoFilter,
    /// How to order matches
    pub sort: Sort,
    /// Which slice to return
    pub page: Page,
}

impl TodoQuery {
    /// Build a query scoped to `owner` from raw parameters.
    ///
    /// Empty parameters are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] when a page number or size is not a
    /// positive integer (or the size exceeds [`MAX_LIMIT`]), a priority,
    /// sort field or sort order is unknown, or `completed` is not a boolean.
    pub fn from_params(owner: UserId, params: &ListParams) -> Result<Self> {
        let number = parse_positive("page", params.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive("limit", params.limit.as_deref(), DEFAULT_LIMIT)?;
        if limit > MAX_LIMIT {
            return Err(TodoError::validation(format!(
                "limit must not exceed {MAX_LIMIT}"
            )));
        }

        let priorities = split_list(params.priority.as_deref())
            .map(|raw| raw.parse::<Priority>())
            .collect::<Result<Vec<_>>>()?;

        let completed = match present(params.completed.as_deref()) {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(TodoError::validation(format!(
                    "Invalid completed: {other}. Use true or false"
                )));
            }
        };

        let tags = split_list(params.tags.as_deref())
            .map(str::to_string)
            .collect();

        let search = present(params.search.as_deref()).map(str::to_string);

        let field = present(params.sort_by.as_deref())
            .map(SortField::parse)
            .transpose()?
            .unwrap_or_default();
        let order = present(params.sort_order.as_deref())
            .map(SortOrder::parse)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            filter: TodoFilter {
                owner,
                priorities,
                completed,
                tags,
                search,
            },
            sort: Sort { field, order },
            page: Page { number, limit },
        })
    }
}

/// Paging summary returned with a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number
    pub current: u32,
    /// Total number of pages
    pub total: u64,
    /// Todos on this page
    pub count: usize,
    /// Todos matching the filter across all pages
    pub total_count: u64,
}

/// One page of matches plus the total match count, as a repository returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPage {
    /// The page slice
    pub todos: Vec<Todo>,
    /// Matches ignoring paging
    pub total: u64,
}

/// Response body of `GET /api/todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListing {
    /// The page slice
    pub todos: Vec<Todo>,
    /// Paging summary
    pub pagination: Pagination,
}

impl TodoListing {
    /// Combine a repository page with the query that produced it.
    #[must_use]
    pub fn new(page: TodoPage, query: &TodoQuery) -> Self {
        let pagination = Pagination {
            current: query.page.number,
            total: query.page.total_pages(page.total),
            count: page.todos.len(),
            total_count: page.total,
        };
        Self {
            todos: page.todos,
            pagination,
        }
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.into_iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn parse_positive(name: &str, raw: Option<&str>, default: u32) -> Result<u32> {
    let Some(raw) = present(raw) else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(TodoError::validation(format!(
            "{name} must be a positive integer, got {raw}"
        ))),
    }
}
