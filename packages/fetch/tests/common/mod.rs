// ABOUTME: Shared helpers for fetch engine tests
// ABOUTME: An in-memory TodoStore with failure injection plus a SQLite fixture

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use todos_storage::{
    init_pool, PoolConfig, SqliteTodoStore, StorageError, StorageResult, Todo, TodoCreateInput,
    TodoStore, TodoUpdateInput,
};

/// What a fake range read should do when it hits a given offset
#[derive(Debug, Clone)]
pub enum Fault {
    Fail,
    Undecodable,
    Delay(Duration),
}

/// In-memory store returning ids `total..=1` in descending order
#[derive(Default)]
pub struct FakeStore {
    todos: Vec<Todo>,
    faults: HashMap<i64, Fault>,
    fail_count: bool,
    pub range_reads: AtomicUsize,
    pub completed_reads: AtomicUsize,
}

impl FakeStore {
    pub fn with_rows(total: i64) -> Self {
        let now = Utc::now();
        let todos = (1..=total)
            .rev()
            .map(|id| Todo {
                id,
                title: format!("Todo {}", id),
                description: String::new(),
                completed: false,
                favorite: false,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            todos,
            ..Default::default()
        }
    }

    pub fn fault_at(mut self, offset: i64, fault: Fault) -> Self {
        self.faults.insert(offset, fault);
        self
    }

    pub fn failing_count(mut self) -> Self {
        self.fail_count = true;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

fn unsupported<T>() -> StorageResult<T> {
    Err(StorageError::Database("not supported by FakeStore".to_string()))
}

#[async_trait]
impl TodoStore for FakeStore {
    async fn range_read(&self, limit: i64, offset: i64) -> StorageResult<Vec<Todo>> {
        self.range_reads.fetch_add(1, Ordering::SeqCst);

        match self.faults.get(&offset) {
            Some(Fault::Fail) => {
                return Err(StorageError::Database("injected read failure".to_string()))
            }
            Some(Fault::Undecodable) => {
                return Err(StorageError::Decode("injected decode failure".to_string()))
            }
            Some(Fault::Delay(delay)) => tokio::time::sleep(*delay).await,
            None => {}
        }

        let rows = self
            .todos
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        self.completed_reads.fetch_add(1, Ordering::SeqCst);
        Ok(rows)
    }

    async fn count_all(&self) -> StorageResult<i64> {
        if self.fail_count {
            return Err(StorageError::Database("injected count failure".to_string()));
        }
        Ok(self.todos.len() as i64)
    }

    async fn search_by_title(&self, title: &str) -> StorageResult<Vec<Todo>> {
        Ok(self
            .todos
            .iter()
            .filter(|t| t.title.contains(title))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, _id: i64) -> StorageResult<Todo> {
        unsupported()
    }

    async fn create(&self, _input: TodoCreateInput) -> StorageResult<Todo> {
        unsupported()
    }

    async fn create_bulk(&self, _input: TodoCreateInput, _count: usize) -> StorageResult<usize> {
        unsupported()
    }

    async fn update(&self, _id: i64, _input: TodoUpdateInput) -> StorageResult<Todo> {
        unsupported()
    }

    async fn delete(&self, _id: i64) -> StorageResult<()> {
        unsupported()
    }
}

/// SQLite store seeded with `rows` todos, kept alive by the returned TempDir
pub async fn seeded_sqlite_store(rows: usize) -> (Arc<SqliteTodoStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let pool = init_pool(&PoolConfig::for_path(&dir.path().join("todos.db")))
        .await
        .unwrap();
    let store = SqliteTodoStore::new(pool);

    if rows > 0 {
        store
            .create_bulk(
                TodoCreateInput {
                    title: "Seeded".to_string(),
                    description: "seed row".to_string(),
                },
                rows,
            )
            .await
            .unwrap();
    }

    (Arc::new(store), dir)
}

pub fn sorted_ids(todos: &[Todo]) -> Vec<i64> {
    let mut ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids
}
