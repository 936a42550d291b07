use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "id, title, description, status, priority, due_date, created_at, updated_at";

/// A stored todo record. Struct fields carry the snake_case column names;
/// serde renames give the external camelCase shape, so this type is the
/// single point of field-name translation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    sqlx::Type,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Pending,
    Completed,
}

/// Status predicate for list queries. `All` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusFilter {
    Pending,
    Completed,
    #[default]
    All,
}

impl StatusFilter {
    pub fn as_status(self) -> Option<TodoStatus> {
        match self {
            StatusFilter::Pending => Some(TodoStatus::Pending),
            StatusFilter::Completed => Some(TodoStatus::Completed),
            StatusFilter::All => None,
        }
    }
}

/// Sortable fields, named externally in camelCase. Each variant maps to a
/// fixed column name; client input never reaches the ORDER BY clause
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn sql_keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized list options. Produced by the query validator; defaults match
/// the documented API defaults.
#[derive(Debug, Clone)]
pub struct ListTodosQuery {
    pub page: i64,
    pub limit: i64,
    pub status: StatusFilter,
    pub search: String,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for ListTodosQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            status: StatusFilter::All,
            search: String::new(),
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListTodosQuery {
    fn offset(&self) -> i64 {
        // Page is only bounded below at validation time; saturate so an
        // absurd page yields an empty page instead of wrapping negative.
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Create payload with defaults already applied by the validator. Status is
/// not part of the payload: new records always start pending.
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: i64,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTodo {
    pub fn from_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: 0,
            due_date: None,
        }
    }
}

/// Partial update. Outer `None` means "leave unchanged"; for the nullable
/// fields the inner `Option` distinguishes an explicit null assignment from
/// absence.
#[derive(Debug, Clone, Default)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TodoStatus>,
    pub priority: Option<i64>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTodo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoListPage {
    pub todos: Vec<Todo>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Appends the shared filter predicate. Every client value is bound, never
/// interpolated; `instr` keeps substring matching case-sensitive.
fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, query: &'a ListTodosQuery) {
    builder.push(" WHERE 1=1");

    if let Some(status) = query.status.as_status() {
        builder.push(" AND status = ").push_bind(status);
    }

    if !query.search.is_empty() {
        builder
            .push(" AND (instr(title, ")
            .push_bind(&query.search)
            .push(") > 0 OR instr(description, ")
            .push_bind(&query.search)
            .push(") > 0)");
    }
}

impl Todo {
    /// Count plus bounded select sharing one filter predicate. The two
    /// queries run outside a transaction, so `meta.total` can drift from
    /// the page contents if a write lands between them.
    pub async fn find_all(
        pool: &SqlitePool,
        query: &ListTodosQuery,
    ) -> Result<TodoListPage, sqlx::Error> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM todos");
        push_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(pool)
            .await?;

        let mut select_builder =
            QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM todos"));
        push_filters(&mut select_builder, query);
        select_builder
            .push(" ORDER BY ")
            .push(query.sort_by.column())
            .push(" ")
            .push(query.order.sql_keyword())
            .push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset());
        let todos = select_builder
            .build_query_as::<Todo>()
            .fetch_all(pool)
            .await?;

        Ok(TodoListPage {
            todos,
            meta: PaginationMeta {
                page: query.page,
                limit: query.limit,
                total,
                total_pages: (total + query.limit - 1) / query.limit,
            },
        })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {SELECT_COLUMNS} FROM todos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Inserts a fresh record and re-reads it so the caller gets the
    /// canonical stored shape. One `now` serves both timestamps.
    pub async fn create(pool: &SqlitePool, data: &CreateTodo) -> Result<Todo, sqlx::Error> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO todos (id, title, description, status, priority, due_date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(TodoStatus::Pending)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Applies the supplied fields in one statement. Returns `None` when no
    /// record exists, and the unchanged record (no write) when zero fields
    /// are staged.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateTodo,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        if data.is_empty() {
            return Ok(Some(existing));
        }

        let now = Utc::now();
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE todos SET ");
        {
            let mut assignments = builder.separated(", ");
            if let Some(title) = &data.title {
                assignments.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = &data.description {
                assignments
                    .push("description = ")
                    .push_bind_unseparated(description.as_deref());
            }
            if let Some(status) = data.status {
                assignments.push("status = ").push_bind_unseparated(status);
            }
            if let Some(priority) = data.priority {
                assignments
                    .push("priority = ")
                    .push_bind_unseparated(priority);
            }
            if let Some(due_date) = data.due_date {
                assignments
                    .push("due_date = ")
                    .push_bind_unseparated(due_date);
            }
            assignments
                .push("updated_at = ")
                .push_bind_unseparated(now);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.build().execute(pool).await?;

        let updated = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(Some(updated))
    }

    /// Hard delete. `false` means no row carried the id.
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
