//! Per-node index cache cell.
//!
//! # Thread Safety
//!
//! [`IndexCell`] is designed for concurrent access:
//! - the stored index sits behind an `RwLock<Option<Arc<NodeIndex>>>`, so
//!   readers only clone an `Arc`
//! - rebuilds are serialized by a per-cell `Mutex<()>` with double-checked
//!   staleness
//! - the replacement is built before the swap, so a failed render leaves the
//!   previous index in place

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::error::SearchError;
use crate::index::NodeIndex;
use crate::node::NodeId;

/// Cached index of one node plus its rebuild lock.
#[derive(Debug, Default)]
pub struct IndexCell {
    /// Last successfully built index.
    current: RwLock<Option<Arc<NodeIndex>>>,
    /// Serializes rebuilds of this node.
    rebuild_lock: Mutex<()>,
    /// Completed rebuild count.
    rebuilds: AtomicU64,
}

impl IndexCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored index if it was built from `stamp`.
    #[must_use]
    pub fn fresh(&self, stamp: i64) -> Option<Arc<NodeIndex>> {
        self.current
            .read()
            .as_ref()
            .filter(|index| index.stamp() == stamp)
            .map(Arc::clone)
    }

    /// Stored index regardless of stamp.
    #[must_use]
    pub fn current(&self) -> Option<Arc<NodeIndex>> {
        self.current.read().clone()
    }

    /// Number of completed rebuilds.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Acquire)
    }

    /// Return the index for `stamp`, rebuilding it with `build` when stale.
    ///
    /// Uses double-checked locking:
    /// 1. Fast path: return the stored index if its stamp matches
    /// 2. Slow path: acquire the rebuild lock (waiting at most `timeout`),
    ///    recheck, then build and swap
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::RebuildTimeout`] if the lock is not acquired in
    /// time, or the error from `build`.
    pub fn get_or_rebuild<F>(
        &self,
        node: &NodeId,
        stamp: i64,
        timeout: Duration,
        build: F,
    ) -> Result<Arc<NodeIndex>, SearchError>
    where
        F: FnOnce() -> Result<NodeIndex, SearchError>,
    {
        // Fast path: index is fresh
        if let Some(index) = self.fresh(stamp) {
            return Ok(index);
        }

        // Slow path: wait for any rebuild in progress
        let Some(_guard) = self.rebuild_lock.try_lock_for(timeout) else {
            return Err(SearchError::RebuildTimeout {
                node: node.clone(),
                waited: timeout,
            });
        };

        // Double-check after acquiring lock
        if let Some(index) = self.fresh(stamp) {
            return Ok(index);
        }

        let start = Instant::now();
        let index = Arc::new(build()?);
        *self.current.write() = Some(Arc::clone(&index));
        self.rebuilds.fetch_add(1, Ordering::AcqRel);

        tracing::debug!(
            node = %node,
            stamp,
            tokens = index.weights().len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Index rebuilt"
        );

        Ok(index)
    }
}
