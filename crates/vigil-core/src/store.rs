//! Narrow interface to the relational store.

use crate::Result;

/// The subset of store operations the store probe needs.
///
/// Implementations hand out a pooled connection per call and never keep
/// state between runs.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Runs a trivial liveness query.
    async fn ping(&self) -> Result<()>;

    /// Counts rows in the given table.
    async fn count_rows(&self, table: &str) -> Result<u64>;
}
