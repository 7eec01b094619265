// ABOUTME: Fetch orchestrator composing count, partitioning, workers, and aggregation
// ABOUTME: Produces a page of todos with the total count and page metadata

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use todos_storage::{Todo, TodoStore};

use crate::aggregate;
use crate::config::{FetchConfig, FetchRequest};
use crate::error::FetchError;
use crate::pagination::PageMeta;
use crate::partition;
use crate::worker;

/// One fetched page
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Records in arrival order unless `FetchConfig::sort_by_id` is set
    pub records: Vec<Todo>,
    /// Rows in the whole table, independent of the page
    pub total_count: i64,
    pub page: PageMeta,
}

/// Answers paginated list queries by fanning a page out over concurrent workers.
///
/// Any failure is fatal to the whole fetch: a failed count stops before any
/// partition is read, and the first failed partition aborts its siblings.
/// Dropping the future returned by [`TodoFetcher::fetch`] aborts every
/// outstanding worker.
#[derive(Clone)]
pub struct TodoFetcher {
    store: Arc<dyn TodoStore>,
    config: FetchConfig,
}

impl TodoFetcher {
    pub fn new(store: Arc<dyn TodoStore>, config: FetchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchResult, FetchError> {
        let start = Instant::now();
        let request = self.config.normalize(&request)?;

        let total_count = self.store.count_all().await.map_err(|e| {
            warn!(error = %e, "Count query failed");
            FetchError::Count(e)
        })?;

        let partitions = partition::plan(&request);
        debug!(
            page = request.page(),
            limit = request.limit(),
            partitions = partitions.len(),
            "Dispatching partitioned fetch"
        );

        let pool = worker::spawn(self.store.clone(), partitions, self.config.partition_timeout);
        let mut records = aggregate::drain(pool).await?;

        if self.config.sort_by_id {
            records.sort_by(|a, b| b.id.cmp(&a.id));
        }

        let page = PageMeta::new(request.page(), request.limit(), total_count);

        info!(
            page = page.page,
            limit = page.limit,
            partitions = request.partitions(),
            records = records.len(),
            total_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched todo page"
        );

        Ok(FetchResult {
            records,
            total_count,
            page,
        })
    }
}
