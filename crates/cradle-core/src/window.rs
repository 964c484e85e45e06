//! The materialized window and the materializer that mutates it.
//!
//! A [`Window`] is a gap-free, strictly ascending run of [`Placeholder`]s.
//! The [`WindowMaterializer`] grows and shrinks it at either edge, acquiring
//! content for new indices and releasing content for clipped ones, while
//! placeholders retained across a change keep their instance identity.

use std::fmt;
use std::ops::Range;

use crate::allocator::HeadTailChanges;
use crate::collaborators::{AcquireRequest, IdentityHandle, ItemCache};
use crate::error::CradleError;
use crate::session::CradleSession;

/// Monotonically increasing identity of a placeholder slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues [`InstanceId`]s for one list session.
#[derive(Debug, Default)]
pub struct InstanceIdGenerator {
    next: u64,
}

impl InstanceIdGenerator {
    pub fn next_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }
}

/// One materialized slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    pub index: usize,
    pub instance: InstanceId,
    /// Content handle; `None` while the acquisition is pending.
    pub handle: Option<IdentityHandle>,
}

impl Placeholder {
    pub fn is_resolved(&self) -> bool {
        self.handle.is_some()
    }
}

/// Contiguous run of placeholders covering `start..start + len`.
#[derive(Clone, Debug, Default)]
pub struct Window {
    start: usize,
    items: Vec<Placeholder>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    /// First index covered (the cradle reference index).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end index.
    pub fn end(&self) -> usize {
        self.start + self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn items(&self) -> &[Placeholder] {
        &self.items
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    pub fn get(&self, index: usize) -> Option<&Placeholder> {
        self.position(index).map(|pos| &self.items[pos])
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|item| item.index)
    }

    /// True when every placeholder's index matches its slot.
    pub fn is_contiguous(&self) -> bool {
        self.items
            .iter()
            .enumerate()
            .all(|(offset, item)| item.index == self.start + offset)
    }

    fn position(&self, index: usize) -> Option<usize> {
        if self.contains(index) {
            Some(index - self.start)
        } else {
            None
        }
    }

    /// Attaches a late acquisition result to its placeholder.
    ///
    /// Fails if the index left the window, or the slot was recycled for a new
    /// placeholder, since the request was issued.
    pub(crate) fn resolve(
        &mut self,
        request: AcquireRequest,
        handle: IdentityHandle,
    ) -> Result<(), CradleError> {
        let stale = CradleError::StaleAcquisition {
            index: request.index,
            instance: request.instance,
        };
        let Some(pos) = self.position(request.index) else {
            return Err(stale);
        };
        let placeholder = &mut self.items[pos];
        if placeholder.instance != request.instance || placeholder.handle.is_some() {
            return Err(stale);
        }
        placeholder.handle = Some(handle);
        Ok(())
    }
}

/// Indices added to and released from the window by one materialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub added: Vec<usize>,
    pub released: Vec<usize>,
}

impl MaterializeReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.released.is_empty()
    }

    pub(crate) fn merge(&mut self, other: MaterializeReport) {
        self.added.extend(other.added);
        self.released.extend(other.released);
    }
}

/// Applies head/tail changes to a [`Window`].
///
/// Additions are bounded by `band`, the index range the window is allowed to
/// cover after the change.
pub struct WindowMaterializer<'a, C: ItemCache> {
    session: &'a mut CradleSession<C>,
    band: Range<usize>,
}

impl<'a, C: ItemCache> WindowMaterializer<'a, C> {
    pub fn new(session: &'a mut CradleSession<C>, band: Range<usize>) -> Self {
        Self { session, band }
    }

    /// Clips first, then adds, at each edge.
    pub fn apply(&mut self, window: &mut Window, changes: HeadTailChanges) -> MaterializeReport {
        let mut report = MaterializeReport::default();

        if changes.head_change_count < 0 {
            let count = (changes.head_change_count.unsigned_abs() as usize).min(window.len());
            for placeholder in window.items.drain(..count) {
                report.released.push(placeholder.index);
                self.session.release(placeholder);
            }
            window.start += count;
        }

        if changes.tail_change_count < 0 {
            let count = (changes.tail_change_count.unsigned_abs() as usize).min(window.len());
            let keep = window.len() - count;
            for placeholder in window.items.drain(keep..) {
                report.released.push(placeholder.index);
                self.session.release(placeholder);
            }
        }

        if changes.head_change_count > 0 {
            let requested = window.start.saturating_sub(changes.head_change_count as usize);
            let start = requested.max(self.band.start).min(window.start);
            if start != requested {
                log::warn!(
                    "materializer: head additions below {} skipped (band {:?})",
                    start,
                    self.band
                );
            }
            let fresh: Vec<Placeholder> = (start..window.start)
                .map(|index| self.session.acquire(index))
                .collect();
            report.added.extend(start..window.start);
            window.items.splice(0..0, fresh);
            window.start = start;
        }

        if changes.tail_change_count > 0 {
            let end = window.end();
            let requested = end + changes.tail_change_count as usize;
            let new_end = requested.min(self.band.end).max(end);
            if new_end != requested {
                log::warn!(
                    "materializer: tail additions from {} skipped (band {:?})",
                    new_end,
                    self.band
                );
            }
            for index in end..new_end {
                let placeholder = self.session.acquire(index);
                window.items.push(placeholder);
                report.added.push(index);
            }
        }

        report
    }

    /// Moves the window to cover exactly `range`, keeping the placeholders
    /// of any overlap.
    pub fn rebuild(&mut self, window: &mut Window, range: Range<usize>) -> MaterializeReport {
        self.band = range.clone();
        let overlaps = !window.is_empty() && range.start < window.end() && window.start < range.end;

        if !overlaps {
            let mut report = self.teardown(window);
            window.start = range.start;
            let changes = HeadTailChanges {
                head_change_count: 0,
                tail_change_count: range.len() as i64,
            };
            report.merge(self.apply(window, changes));
            return report;
        }

        let changes = HeadTailChanges {
            head_change_count: window.start as i64 - range.start as i64,
            tail_change_count: range.end as i64 - window.end() as i64,
        };
        self.apply(window, changes)
    }

    /// Releases every placeholder.
    pub fn teardown(&mut self, window: &mut Window) -> MaterializeReport {
        let mut report = MaterializeReport::default();
        for placeholder in window.items.drain(..) {
            report.released.push(placeholder.index);
            self.session.release(placeholder);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{Acquisition, EphemeralCache};

    fn session() -> CradleSession<EphemeralCache> {
        CradleSession::new(EphemeralCache::default())
    }

    fn built(session: &mut CradleSession<EphemeralCache>, range: Range<usize>) -> Window {
        let mut window = Window::new();
        WindowMaterializer::new(session, range.clone()).rebuild(&mut window, range);
        window
    }

    #[test]
    fn test_rebuild_fills_range() {
        let mut session = session();
        let window = built(&mut session, 8..36);

        assert_eq!(window.range(), 8..36);
        assert!(window.is_contiguous());
        assert!(window.items().iter().all(Placeholder::is_resolved));
        assert_eq!(session.cache().live_count(), 28);
    }

    #[test]
    fn test_forward_shift_preserves_identity() {
        let mut session = session();
        let mut window = built(&mut session, 0..28);
        let retained = window.get(10).cloned().unwrap();

        let report = WindowMaterializer::new(&mut session, 4..32).apply(
            &mut window,
            HeadTailChanges {
                head_change_count: -4,
                tail_change_count: 4,
            },
        );

        assert_eq!(window.range(), 4..32);
        assert!(window.is_contiguous());
        assert_eq!(report.released, vec![0, 1, 2, 3]);
        assert_eq!(report.added, vec![28, 29, 30, 31]);
        assert_eq!(window.get(10), Some(&retained));
        assert!(window.get(28).unwrap().instance > retained.instance);
        assert_eq!(session.cache().live_count(), 28);
    }

    #[test]
    fn test_backward_shift_prepends_in_order() {
        let mut session = session();
        let mut window = built(&mut session, 8..36);

        let report = WindowMaterializer::new(&mut session, 4..32).apply(
            &mut window,
            HeadTailChanges {
                head_change_count: 4,
                tail_change_count: -4,
            },
        );

        assert_eq!(window.range(), 4..32);
        assert!(window.is_contiguous());
        assert_eq!(report.added, vec![4, 5, 6, 7]);
        assert_eq!(report.released, vec![32, 33, 34, 35]);
    }

    #[test]
    fn test_additions_outside_band_are_skipped() {
        let mut session = session();
        let mut window = built(&mut session, 0..28);

        let report = WindowMaterializer::new(&mut session, 0..30).apply(
            &mut window,
            HeadTailChanges {
                head_change_count: 0,
                tail_change_count: 4,
            },
        );

        assert_eq!(window.range(), 0..30);
        assert_eq!(report.added, vec![28, 29]);
    }

    #[test]
    fn test_rebuild_without_overlap_replaces_everything() {
        let mut session = session();
        let mut window = built(&mut session, 0..28);

        let report = WindowMaterializer::new(&mut session, 0..0).rebuild(&mut window, 60..88);

        assert_eq!(window.range(), 60..88);
        assert_eq!(report.released.len(), 28);
        assert_eq!(report.added.len(), 28);
        assert_eq!(session.stats().rebuilds, 0);
    }

    #[test]
    fn test_rebuild_with_overlap_keeps_shared_slots() {
        let mut session = session();
        let mut window = built(&mut session, 0..28);
        let shared = window.get(20).cloned().unwrap();

        let report = WindowMaterializer::new(&mut session, 0..0).rebuild(&mut window, 12..40);

        assert_eq!(window.range(), 12..40);
        assert_eq!(window.get(20), Some(&shared));
        assert_eq!(report.released, (0..12).collect::<Vec<_>>());
        assert_eq!(report.added, (28..40).collect::<Vec<_>>());
    }

    #[derive(Default)]
    struct DeferredCache;

    impl ItemCache for DeferredCache {
        fn acquire(&mut self, _request: AcquireRequest) -> Acquisition {
            Acquisition::Pending
        }

        fn release(&mut self, _index: usize, _handle: IdentityHandle) {}
    }

    #[test]
    fn test_resolve_rejects_stale_requests() {
        let mut session = CradleSession::new(DeferredCache);
        let mut window = Window::new();
        WindowMaterializer::new(&mut session, 0..8).rebuild(&mut window, 0..8);

        let live = window.get(3).unwrap().instance;
        let request = AcquireRequest {
            index: 3,
            instance: live,
        };
        assert_eq!(window.resolve(request, IdentityHandle::new(1)), Ok(()));
        assert!(window.get(3).unwrap().is_resolved());

        // Resolving twice is stale.
        assert!(window.resolve(request, IdentityHandle::new(2)).is_err());

        let gone = AcquireRequest {
            index: 12,
            instance: live,
        };
        assert_eq!(
            window.resolve(gone, IdentityHandle::new(3)),
            Err(CradleError::StaleAcquisition {
                index: 12,
                instance: live
            })
        );
    }
}
