//! Per-list session state owned by the host.
//!
//! One session exists per list instance. It holds the content cache, the
//! placeholder identity counter and lifecycle statistics, and is passed by
//! reference into every [`ContentController`](crate::ContentController)
//! operation.

use web_time::Duration;

use crate::collaborators::{Acquisition, AcquireRequest, ItemCache};
use crate::window::{InstanceId, InstanceIdGenerator, Placeholder};

/// Statistics about window lifecycle.
///
/// Used for testing and debugging virtualization behavior.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CradleStats {
    /// Full window builds.
    pub rebuilds: usize,

    /// Incremental head/tail updates applied.
    pub incremental_updates: usize,

    /// Placeholders materialized.
    pub acquired: usize,

    /// Placeholders released.
    pub released: usize,

    /// Late acquisition results discarded because their placeholder was gone.
    pub stale_discarded: usize,

    /// Crossing batches aborted because they referenced indices outside the window.
    pub noise_aborts: usize,

    /// Wall time of the most recent incremental update.
    pub last_update_duration: Duration,
}

pub struct CradleSession<C: ItemCache> {
    cache: C,
    instances: InstanceIdGenerator,
    stats: CradleStats,
}

impl<C: ItemCache> CradleSession<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            instances: InstanceIdGenerator::default(),
            stats: CradleStats::default(),
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    pub fn stats(&self) -> &CradleStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CradleStats {
        &mut self.stats
    }

    pub(crate) fn next_instance(&mut self) -> InstanceId {
        self.instances.next_id()
    }

    /// Creates a placeholder for `index` and asks the cache for its content.
    pub(crate) fn acquire(&mut self, index: usize) -> Placeholder {
        let instance = self.next_instance();
        let handle = match self.cache.acquire(AcquireRequest { index, instance }) {
            Acquisition::Ready(handle) => Some(handle),
            Acquisition::Pending => None,
        };
        self.stats.acquired += 1;
        Placeholder {
            index,
            instance,
            handle,
        }
    }

    /// Returns a placeholder's content to the cache. Pending placeholders have
    /// nothing to return yet; their late result is rejected on arrival.
    pub(crate) fn release(&mut self, placeholder: Placeholder) {
        if let Some(handle) = placeholder.handle {
            self.cache.release(placeholder.index, handle);
        }
        self.stats.released += 1;
    }
}
