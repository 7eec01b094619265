// ABOUTME: Fetch request defaults and normalization
// ABOUTME: The single place where page, limit, and partition count get their defaults

use serde::Deserialize;
use std::time::Duration;

use crate::error::FetchError;

/// Page used when the caller leaves it unset or zero
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller leaves it unset or zero
pub const DEFAULT_LIMIT: i64 = 100;

/// Upper bound on page size
pub const MAX_LIMIT: i64 = 1000;

/// Partition count used when the caller leaves it unset or zero
pub const DEFAULT_PARTITIONS: i64 = 1;

/// Upper bound on concurrent workers per fetch
pub const MAX_PARTITIONS: usize = 32;

/// Per-partition read timeout
pub const DEFAULT_PARTITION_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine-wide settings for the fetch orchestrator
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Page size applied when a request omits `limit`
    pub default_limit: i64,

    /// Requests asking for more rows than this are clamped
    pub max_limit: i64,

    /// Requests asking for more workers than this are clamped
    pub max_partitions: usize,

    /// A partition read exceeding this counts as that partition failing
    pub partition_timeout: Duration,

    /// Re-sort merged records by id (descending) instead of arrival order
    pub sort_by_id: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            max_partitions: MAX_PARTITIONS,
            partition_timeout: DEFAULT_PARTITION_TIMEOUT,
            sort_by_id: false,
        }
    }
}

/// Raw fetch parameters as received from a caller.
///
/// `None` and `Some(0)` both mean "use the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FetchRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub partitions: Option<i64>,
}

impl FetchRequest {
    pub fn new(page: i64, limit: i64, partitions: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            partitions: Some(partitions),
        }
    }
}

/// A request after defaults and bounds have been applied.
///
/// Only constructed by [`FetchConfig::normalize`], so `page >= 1`,
/// `limit >= 1`, `partitions >= 1`, and the page window offset fits in an i64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedRequest {
    page: i64,
    limit: i64,
    partitions: usize,
    offset: i64,
}

impl NormalizedRequest {
    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Offset of the first row on the requested page
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl FetchConfig {
    /// Apply defaults and bounds to a raw request
    pub fn normalize(&self, request: &FetchRequest) -> Result<NormalizedRequest, FetchError> {
        let page = defaulted("page", request.page, DEFAULT_PAGE)?;
        let limit = defaulted("limit", request.limit, self.default_limit.max(1))?
            .min(self.max_limit.max(1));
        let partitions = defaulted("partitions", request.partitions, DEFAULT_PARTITIONS)?;

        let partitions = usize::try_from(partitions)
            .unwrap_or(usize::MAX)
            .min(self.max_partitions.max(1));

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| FetchError::InvalidRequest(format!("page {} is out of range", page)))?;

        Ok(NormalizedRequest {
            page,
            limit,
            partitions,
            offset,
        })
    }
}

fn defaulted(name: &str, value: Option<i64>, default: i64) -> Result<i64, FetchError> {
    match value {
        None | Some(0) => Ok(default),
        Some(v) if v < 0 => Err(FetchError::InvalidRequest(format!(
            "{} must not be negative (got {})",
            name, v
        ))),
        Some(v) => Ok(v),
    }
}
