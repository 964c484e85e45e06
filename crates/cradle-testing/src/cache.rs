//! A content cache that records every call and can defer acquisitions.
//!
//! Released content is detached rather than dropped, so an index that comes
//! back into the window is reattached with its previous handle.

use cradle_core::collections::map::HashMap;
use cradle_core::{AcquireRequest, Acquisition, IdentityHandle, ItemCache};

/// How [`RecordingCache`] answers acquisitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcquireMode {
    /// Content is ready immediately.
    #[default]
    Immediate,
    /// Content resolves when the test calls [`RecordingCache::resolve`].
    Deferred,
}

#[derive(Debug, Default)]
pub struct RecordingCache {
    mode: AcquireMode,
    next_handle: u64,
    /// Attached handles and the index they were issued for.
    live: HashMap<IdentityHandle, usize>,
    /// Released content kept for reattachment, by index.
    detached: HashMap<usize, IdentityHandle>,
    pending: Vec<AcquireRequest>,
    acquired: Vec<usize>,
    released: Vec<usize>,
    reattached: usize,
    unknown_releases: usize,
}

impl RecordingCache {
    pub fn new(mode: AcquireMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn immediate() -> Self {
        Self::new(AcquireMode::Immediate)
    }

    pub fn deferred() -> Self {
        Self::new(AcquireMode::Deferred)
    }

    pub fn mode(&self) -> AcquireMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AcquireMode) {
        self.mode = mode;
    }

    /// Requests still waiting for [`resolve`](Self::resolve).
    pub fn pending(&self) -> &[AcquireRequest] {
        &self.pending
    }

    pub fn take_pending(&mut self) -> Vec<AcquireRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Produces content for a deferred request.
    pub fn resolve(&mut self, request: AcquireRequest) -> IdentityHandle {
        self.attach(request.index)
    }

    /// Indices passed to `acquire`, in call order.
    pub fn acquired(&self) -> &[usize] {
        &self.acquired
    }

    /// Indices passed to `release`, in call order.
    pub fn released(&self) -> &[usize] {
        &self.released
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn detached_count(&self) -> usize {
        self.detached.len()
    }

    /// Acquisitions served from detached content.
    pub fn reattached_count(&self) -> usize {
        self.reattached
    }

    /// Releases of handles this cache never issued or already took back.
    pub fn unknown_releases(&self) -> usize {
        self.unknown_releases
    }

    pub fn is_live(&self, handle: IdentityHandle) -> bool {
        self.live.contains_key(&handle)
    }

    fn attach(&mut self, index: usize) -> IdentityHandle {
        let handle = match self.detached.remove(&index) {
            Some(handle) => {
                self.reattached += 1;
                handle
            }
            None => {
                self.next_handle += 1;
                IdentityHandle::new(self.next_handle)
            }
        };
        self.live.insert(handle, index);
        handle
    }
}

impl ItemCache for RecordingCache {
    fn acquire(&mut self, request: AcquireRequest) -> Acquisition {
        self.acquired.push(request.index);
        match self.mode {
            AcquireMode::Immediate => Acquisition::Ready(self.attach(request.index)),
            AcquireMode::Deferred => {
                self.pending.push(request);
                Acquisition::Pending
            }
        }
    }

    fn release(&mut self, index: usize, handle: IdentityHandle) {
        self.released.push(index);
        if self.live.remove(&handle).is_none() {
            log::warn!("release of unknown handle {:?} for index {index}", handle);
            self.unknown_releases += 1;
            return;
        }
        self.detached.insert(index, handle);
    }
}
