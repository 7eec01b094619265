// ABOUTME: Todo record type and the record store used by the fetch engine and API
// ABOUTME: Provides the TodoStore trait, its SQLite implementation, and pool setup

pub mod db;
pub mod error;
pub mod sqlite;
pub mod store;
pub mod types;

pub use db::{init_pool, PoolConfig};
pub use error::{StorageError, StorageResult};
pub use sqlite::SqliteTodoStore;
pub use store::TodoStore;
pub use types::{Todo, TodoCreateInput, TodoUpdateInput};
