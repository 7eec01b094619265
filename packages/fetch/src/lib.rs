// ABOUTME: Partitioned concurrent list-fetch engine for paginated todo queries
// ABOUTME: Splits a page into sub-ranges, fetches them in parallel, and builds page metadata

pub mod aggregate;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pagination;
pub mod partition;
pub mod worker;

pub use config::{FetchConfig, FetchRequest, NormalizedRequest};
pub use error::FetchError;
pub use orchestrator::{FetchResult, TodoFetcher};
pub use pagination::PageMeta;
pub use partition::Partition;
