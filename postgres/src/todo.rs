//! `PostgreSQL` todo repository.
//!
//! Writes that return a todo are wrapped in a `WITH changed AS (... RETURNING *)`
//! so the row comes back joined with its owner in the same statement.

use crate::database_error;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use todo_list_core::error::Result;
use todo_list_core::input::TodoPatch;
use todo_list_core::model::{Note, Priority, Todo, TodoId, UserId, UserSummary};
use todo_list_core::query::{SortField, SortOrder, TodoFilter, TodoPage, TodoQuery};
use todo_list_core::repository::TodoRepository;

/// Columns selected for a todo `t` joined with its owner `u`.
const TODO_COLUMNS: &str = "t.id, t.title, t.description, t.priority, t.completed, \
     t.tags, t.assigned_users, t.notes, t.created_at, t.updated_at, \
     u.id AS owner_id, u.username AS owner_username, u.email AS owner_email";

/// `PostgreSQL` todo repository.
#[derive(Clone)]
pub struct PostgresTodoRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// Create a new `PostgreSQL` todo repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn todo_from_row(row: &PgRow) -> Result<Todo> {
    let read = |e: sqlx::Error| database_error("Failed to read todo row", &e);
    let priority: String = row.try_get("priority").map_err(read)?;
    let notes: Json<Vec<Note>> = row.try_get("notes").map_err(read)?;

    Ok(Todo {
        id: TodoId::from_uuid(row.try_get("id").map_err(read)?),
        title: row.try_get("title").map_err(read)?,
        description: row.try_get("description").map_err(read)?,
        priority: priority.parse::<Priority>()?,
        completed: row.try_get("completed").map_err(read)?,
        user: UserSummary {
            id: UserId::from_uuid(row.try_get("owner_id").map_err(read)?),
            username: row.try_get("owner_username").map_err(read)?,
            email: row.try_get("owner_email").map_err(read)?,
        },
        tags: row.try_get("tags").map_err(read)?,
        assigned_users: row.try_get("assigned_users").map_err(read)?,
        notes: notes.0,
        created_at: row.try_get("created_at").map_err(read)?,
        updated_at: row.try_get("updated_at").map_err(read)?,
    })
}

/// Close a `WITH changed AS (` statement and select the joined row.
fn push_returning(builder: &mut QueryBuilder<'_, Postgres>) {
    builder
        .push(" RETURNING *) SELECT ")
        .push(TODO_COLUMNS)
        .push(" FROM changed t JOIN users u ON u.id = t.user_id");
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &TodoFilter) {
    builder
        .push(" WHERE t.user_id = ")
        .push_bind(*filter.owner.as_uuid());

    if !filter.priorities.is_empty() {
        let priorities: Vec<String> = filter
            .priorities
            .iter()
            .map(|priority| priority.as_str().to_string())
            .collect();
        builder
            .push(" AND t.priority = ANY(")
            .push_bind(priorities)
            .push(")");
    }

    if let Some(completed) = filter.completed {
        builder.push(" AND t.completed = ").push_bind(completed);
    }

    if !filter.tags.is_empty() {
        builder.push(" AND t.tags && ").push_bind(filter.tags.clone());
    }

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (t.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// `%search%` with the `LIKE` wildcards in `search` escaped.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

const fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "t.created_at",
        SortField::UpdatedAt => "t.updated_at",
        SortField::Title => "t.title",
        SortField::Priority => "t.priority",
        SortField::Completed => "t.completed",
    }
}

const fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

impl TodoRepository for PostgresTodoRepository {
    async fn insert(&self, todo: &Todo) -> Result<Todo> {
        let mut builder = QueryBuilder::new(
            "WITH changed AS (INSERT INTO todos \
             (id, title, description, priority, completed, user_id, tags, assigned_users, notes, created_at, updated_at) ",
        );
        builder.push_values([todo], |mut row, todo| {
            row.push_bind(*todo.id.as_uuid())
                .push_bind(todo.title.clone())
                .push_bind(todo.description.clone())
                .push_bind(todo.priority.as_str())
                .push_bind(todo.completed)
                .push_bind(*todo.user.id.as_uuid())
                .push_bind(todo.tags.clone())
                .push_bind(todo.assigned_users.clone())
                .push_bind(Json(todo.notes.clone()))
                .push_bind(todo.created_at)
                .push_bind(todo.updated_at);
        });
        push_returning(&mut builder);

        let row = builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("Failed to create todo", &e))?;

        todo_from_row(&row)
    }

    async fn find(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos t JOIN users u ON u.id = t.user_id \
             WHERE t.id = $1 AND t.user_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to get todo", &e))?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn list(&self, query: &TodoQuery) -> Result<TodoPage> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM todos t");
        push_filter(&mut count, &query.filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("Failed to count todos", &e))?;

        let direction = sort_direction(query.sort.order);
        let mut select = QueryBuilder::new(format!(
            "SELECT {TODO_COLUMNS} FROM todos t JOIN users u ON u.id = t.user_id"
        ));
        push_filter(&mut select, &query.filter);
        select
            .push(format!(
                " ORDER BY {} {direction}, t.id {direction}",
                sort_column(query.sort.field)
            ))
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("Failed to list todos", &e))?;

        let todos = rows.iter().map(todo_from_row).collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            owner = %query.filter.owner,
            total,
            returned = todos.len(),
            "Listed todos"
        );

        Ok(TodoPage {
            todos,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update(
        &self,
        owner: UserId,
        id: TodoId,
        patch: &TodoPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>> {
        let mut builder = QueryBuilder::new("WITH changed AS (UPDATE todos SET updated_at = ");
        builder.push_bind(now);
        if let Some(title) = &patch.title {
            builder.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &patch.description {
            builder.push(", description = ").push_bind(description.clone());
        }
        if let Some(priority) = patch.priority {
            builder.push(", priority = ").push_bind(priority.as_str());
        }
        if let Some(completed) = patch.completed {
            builder.push(", completed = ").push_bind(completed);
        }
        if let Some(tags) = &patch.tags {
            builder.push(", tags = ").push_bind(tags.clone());
        }
        if let Some(assigned_users) = &patch.assigned_users {
            builder.push(", assigned_users = ").push_bind(assigned_users.clone());
        }
        builder
            .push(" WHERE id = ")
            .push_bind(*id.as_uuid())
            .push(" AND user_id = ")
            .push_bind(*owner.as_uuid());
        push_returning(&mut builder);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to update todo", &e))?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to delete todo", &e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_note(
        &self,
        owner: UserId,
        id: TodoId,
        note: &Note,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>> {
        let mut builder = QueryBuilder::new(
            "WITH changed AS (UPDATE todos SET notes = notes || jsonb_build_array(",
        );
        builder
            .push_bind(Json(note.clone()))
            .push("::jsonb), updated_at = ")
            .push_bind(now)
            .push(" WHERE id = ")
            .push_bind(*id.as_uuid())
            .push(" AND user_id = ")
            .push_bind(*owner.as_uuid());
        push_returning(&mut builder);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to append note", &e))?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn export(&self, owner: UserId) -> Result<Vec<Todo>> {
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos t JOIN users u ON u.id = t.user_id \
             WHERE t.user_id = $1 ORDER BY t.created_at DESC, t.id DESC"
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to export todos", &e))?;

        rows.iter().map(todo_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("report"), "%report%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn filter_sql_binds_every_predicate() {
        let mut filter = TodoFilter::owned_by(UserId::new());
        filter.priorities = vec![Priority::High];
        filter.completed = Some(false);
        filter.tags = vec!["work".to_string()];
        filter.search = Some("x".to_string());

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM todos t");
        push_filter(&mut builder, &filter);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM todos t WHERE t.user_id = $1 AND t.priority = ANY($2) \
             AND t.completed = $3 AND t.tags && $4 AND (t.title ILIKE $5 OR t.description ILIKE $6)"
        );
    }
}
