//! Interfaces to the host's content cache.
//!
//! The engine never owns item content. For every index it materializes it
//! asks the cache for an opaque [`IdentityHandle`], and hands the handle back
//! when the index leaves the window. A cache that detaches instead of
//! destroying content lets a scrolled-away item come back without being
//! reconstructed.

use crate::window::InstanceId;

/// Opaque identity of materialized content, issued by an [`ItemCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityHandle(u64);

impl IdentityHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A request to materialize content for one placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AcquireRequest {
    pub index: usize,
    /// Placeholder the result belongs to; used to reject stale results.
    pub instance: InstanceId,
}

/// Outcome of [`ItemCache::acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquisition {
    /// Content is available immediately.
    Ready(IdentityHandle),
    /// Content resolves later through
    /// [`ContentController::complete_acquisition`](crate::ContentController::complete_acquisition).
    Pending,
}

/// Host-side content cache.
pub trait ItemCache {
    /// Requests content for a newly materialized placeholder.
    fn acquire(&mut self, request: AcquireRequest) -> Acquisition;

    /// Returns content for an index that left the window.
    fn release(&mut self, index: usize, handle: IdentityHandle);
}

/// Cache that issues a fresh handle for every request and keeps nothing.
#[derive(Debug, Default)]
pub struct EphemeralCache {
    next_handle: u64,
    live: usize,
}

impl EphemeralCache {
    /// Handles issued and not yet released.
    pub fn live_count(&self) -> usize {
        self.live
    }
}

impl ItemCache for EphemeralCache {
    fn acquire(&mut self, _request: AcquireRequest) -> Acquisition {
        self.next_handle += 1;
        self.live += 1;
        Acquisition::Ready(IdentityHandle::new(self.next_handle))
    }

    fn release(&mut self, _index: usize, _handle: IdentityHandle) {
        self.live = self.live.saturating_sub(1);
    }
}
