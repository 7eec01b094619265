// ABOUTME: Worker pool for partitioned fetches
// ABOUTME: One task per partition, each publishing its rows onto a shared conduit

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use todos_storage::{Todo, TodoStore};

use crate::error::FetchError;
use crate::partition::Partition;

/// Running workers plus the receiving end of their shared conduit.
///
/// Each worker owns one sender clone and drops it when it finishes, so the
/// conduit closes exactly when the last worker is done.
pub struct WorkerPool {
    pub conduit: UnboundedReceiver<Todo>,
    pub workers: JoinSet<Result<usize, FetchError>>,
}

/// Launch one worker per partition
pub fn spawn(store: Arc<dyn TodoStore>, partitions: Vec<Partition>, timeout: Duration) -> WorkerPool {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut workers = JoinSet::new();

    for partition in partitions {
        let store = store.clone();
        let tx = tx.clone();
        workers.spawn(run_partition(store, partition, tx, timeout));
    }

    // Only the workers hold senders from here on
    drop(tx);

    WorkerPool {
        conduit: rx,
        workers,
    }
}

/// Read one partition and publish its rows, returning how many were sent
async fn run_partition(
    store: Arc<dyn TodoStore>,
    partition: Partition,
    conduit: UnboundedSender<Todo>,
    timeout: Duration,
) -> Result<usize, FetchError> {
    let start = Instant::now();
    debug!(
        partition = partition.index,
        limit = partition.limit,
        offset = partition.offset,
        end = partition.end(),
        "Starting partition read"
    );

    let rows = match tokio::time::timeout(timeout, store.range_read(partition.limit, partition.offset)).await {
        Ok(Ok(rows)) => rows,
        Ok(Err(e)) => {
            warn!(partition = partition.index, error = %e, "Partition read failed");
            return Err(FetchError::from_partition(partition.index, e));
        }
        Err(_) => {
            warn!(partition = partition.index, ?timeout, "Partition read timed out");
            return Err(FetchError::Timeout {
                index: partition.index,
                timeout,
            });
        }
    };

    let mut sent = 0;
    for todo in rows {
        // Receiver gone means the fetch was abandoned
        if conduit.send(todo).is_err() {
            break;
        }
        sent += 1;
    }

    debug!(
        partition = partition.index,
        rows = sent,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Finished partition read"
    );

    Ok(sent)
}
