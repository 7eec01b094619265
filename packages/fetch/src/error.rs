use std::time::Duration;
use thiserror::Error;
use todos_storage::StorageError;

/// Errors produced by a partitioned fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid fetch request: {0}")]
    InvalidRequest(String),

    #[error("Count query failed: {0}")]
    Count(#[source] StorageError),

    #[error("Range read for partition {index} failed: {source}")]
    StoreRead {
        index: usize,
        #[source]
        source: StorageError,
    },

    #[error("Row in partition {index} could not be decoded: {message}")]
    Decode { index: usize, message: String },

    #[error("Partition {index} timed out after {timeout:?}")]
    Timeout { index: usize, timeout: Duration },

    #[error("Fetch worker terminated abnormally: {0}")]
    WorkerAborted(String),
}

impl FetchError {
    /// Classify a store failure raised while reading a partition
    pub(crate) fn from_partition(index: usize, err: StorageError) -> Self {
        match err {
            StorageError::Decode(message) => FetchError::Decode { index, message },
            source => FetchError::StoreRead { index, source },
        }
    }

    /// Whether the failure was caused by the request rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(self, FetchError::InvalidRequest(_))
    }
}
