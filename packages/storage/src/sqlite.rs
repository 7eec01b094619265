// ABOUTME: SQLite implementation of the todo record store
// ABOUTME: Range reads, counts, and single-row CRUD against the todo table

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::time::Instant;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::store::TodoStore;
use crate::types::{Todo, TodoCreateInput, TodoUpdateInput};

const SELECT_COLUMNS: &str = "SELECT id, title, description, completed, favorite, created_at, updated_at FROM todo";

#[derive(Clone)]
pub struct SqliteTodoStore {
    pool: SqlitePool,
}

impl SqliteTodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Convert a database row to a Todo
    fn row_to_todo(row: &SqliteRow) -> StorageResult<Todo> {
        let decode = |e: sqlx::Error| StorageError::Decode(e.to_string());
        Ok(Todo {
            id: row.try_get("id").map_err(decode)?,
            title: row.try_get("title").map_err(decode)?,
            description: row.try_get("description").map_err(decode)?,
            completed: row.try_get("completed").map_err(decode)?,
            favorite: row.try_get("favorite").map_err(decode)?,
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
        })
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn range_read(&self, limit: i64, offset: i64) -> StorageResult<Vec<Todo>> {
        let start = Instant::now();

        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT ? OFFSET ?"))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let todos = rows
            .iter()
            .map(Self::row_to_todo)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            limit,
            offset,
            rows = todos.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Range read complete"
        );

        Ok(todos)
    }

    async fn count_all(&self) -> StorageResult<i64> {
        let start = Instant::now();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM todo")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        debug!(count, elapsed_ms = start.elapsed().as_millis() as u64, "Count complete");

        Ok(count)
    }

    async fn search_by_title(&self, title: &str) -> StorageResult<Vec<Todo>> {
        let start = Instant::now();

        let rows = sqlx::query(&format!("{SELECT_COLUMNS} WHERE title LIKE ? ORDER BY id DESC"))
            .bind(format!("%{title}%"))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let todos = rows
            .iter()
            .map(Self::row_to_todo)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            title,
            rows = todos.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Title search complete"
        );

        Ok(todos)
    }

    async fn get_by_id(&self, id: i64) -> StorageResult<Todo> {
        debug!("Fetching todo: {}", id);

        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(r) => Self::row_to_todo(&r),
            None => Err(StorageError::NotFound),
        }
    }

    async fn create(&self, input: TodoCreateInput) -> StorageResult<Todo> {
        let now = Utc::now();

        debug!("Creating todo (title: {})", input.title);

        let result = sqlx::query(
            r#"
            INSERT INTO todo (title, description, completed, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn create_bulk(&self, input: TodoCreateInput, count: usize) -> StorageResult<usize> {
        if count == 0 {
            return Err(StorageError::InvalidInput(
                "Bulk count must be at least 1".to_string(),
            ));
        }

        let start = Instant::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        for _ in 0..count {
            let now = Utc::now();
            sqlx::query(
                r#"
                INSERT INTO todo (title, description, completed, created_at, updated_at)
                VALUES (?, ?, 0, ?, ?)
                "#,
            )
            .bind(&input.title)
            .bind(&input.description)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!(count, elapsed_ms = start.elapsed().as_millis() as u64, "Bulk insert complete");

        Ok(count)
    }

    async fn update(&self, id: i64, input: TodoUpdateInput) -> StorageResult<Todo> {
        debug!("Updating todo: {}", id);

        let existing = self.get_by_id(id).await?;

        let title = input
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or(existing.title);
        let description = input
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or(existing.description);
        let completed = input.completed.unwrap_or(existing.completed);
        let favorite = input.favorite.unwrap_or(existing.favorite);

        sqlx::query(
            r#"
            UPDATE todo SET title = ?, description = ?, completed = ?, favorite = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(completed)
        .bind(favorite)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> StorageResult<()> {
        debug!("Deleting todo: {}", id);

        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
