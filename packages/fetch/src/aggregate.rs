// ABOUTME: Drains the worker conduit into a single result list
// ABOUTME: Stops on the first worker failure and aborts the remaining workers

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use todos_storage::Todo;

use crate::error::FetchError;
use crate::worker::WorkerPool;

/// Collect every record the workers publish, in arrival order.
///
/// Reads the conduit and joins workers side by side. Returns once the
/// conduit has closed and every worker has been joined, or as soon as any
/// worker fails, in which case the rest are aborted and their rows dropped.
pub async fn drain(pool: WorkerPool) -> Result<Vec<Todo>, FetchError> {
    let WorkerPool {
        mut conduit,
        mut workers,
    } = pool;

    let mut records = Vec::new();
    let mut conduit_open = true;

    loop {
        tokio::select! {
            item = conduit.recv(), if conduit_open => match item {
                Some(todo) => records.push(todo),
                None => conduit_open = false,
            },
            joined = workers.join_next(), if !workers.is_empty() => {
                if let Some(result) = joined {
                    if let Err(e) = worker_outcome(result) {
                        abort_remaining(&mut workers, &mut conduit).await;
                        return Err(e);
                    }
                }
            },
            else => break,
        }
    }

    debug!(records = records.len(), "Conduit drained");
    Ok(records)
}

fn worker_outcome(
    result: Result<Result<usize, FetchError>, tokio::task::JoinError>,
) -> Result<usize, FetchError> {
    match result {
        Ok(outcome) => outcome,
        Err(join_error) => Err(FetchError::WorkerAborted(join_error.to_string())),
    }
}

async fn abort_remaining(
    workers: &mut JoinSet<Result<usize, FetchError>>,
    conduit: &mut UnboundedReceiver<Todo>,
) {
    let outstanding = workers.len();
    if outstanding > 0 {
        warn!(outstanding, "Aborting remaining fetch workers");
    }
    workers.abort_all();
    conduit.close();
    while workers.join_next().await.is_some() {}
}
