use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{Todo, TodoCreateInput, TodoUpdateInput};

/// Record store consumed by the fetch engine and the CRUD handlers.
///
/// Implementations must be safe to call from many tasks at once; the fetch
/// engine issues one `range_read` per partition concurrently.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Read up to `limit` rows starting at `offset`, in a stable store-defined order.
    async fn range_read(&self, limit: i64, offset: i64) -> StorageResult<Vec<Todo>>;

    /// Total number of rows in the table.
    async fn count_all(&self) -> StorageResult<i64>;

    /// Rows whose title contains `title`, newest first. An empty needle matches every row.
    async fn search_by_title(&self, title: &str) -> StorageResult<Vec<Todo>>;

    async fn get_by_id(&self, id: i64) -> StorageResult<Todo>;

    async fn create(&self, input: TodoCreateInput) -> StorageResult<Todo>;

    /// Insert `count` copies of `input`, returning how many rows were written.
    async fn create_bulk(&self, input: TodoCreateInput, count: usize) -> StorageResult<usize>;

    async fn update(&self, id: i64, input: TodoUpdateInput) -> StorageResult<Todo>;

    async fn delete(&self, id: i64) -> StorageResult<()>;
}
