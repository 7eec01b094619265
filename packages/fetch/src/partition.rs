// ABOUTME: Splits one requested page into contiguous, non-overlapping sub-ranges
// ABOUTME: Each sub-range is read by its own worker

use crate::config::NormalizedRequest;

/// A contiguous slice of the requested page assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// 0-based position of this slice within the page
    pub index: usize,
    pub limit: i64,
    pub offset: i64,
}

impl Partition {
    /// Exclusive end of the offset range covered by this partition
    pub fn end(&self) -> i64 {
        self.offset + self.limit
    }
}

/// Split the requested page window into partitions.
///
/// Every partition gets `limit / n` rows and the last one also takes the
/// `limit % n` remainder, so the partitions tile `[offset, offset + limit)`
/// exactly. `n` is capped at `limit` so no partition is empty.
pub fn plan(request: &NormalizedRequest) -> Vec<Partition> {
    let limit = request.limit();
    let count = (request.partitions() as i64).min(limit);
    let base = limit / count;
    let remainder = limit % count;

    (0..count)
        .map(|i| {
            let sub_limit = if i == count - 1 { base + remainder } else { base };
            Partition {
                index: i as usize,
                limit: sub_limit,
                offset: request.offset() + i * base,
            }
        })
        .collect()
}
