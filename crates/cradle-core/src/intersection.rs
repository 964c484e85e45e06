//! Crossing-notification filtering.
//!
//! The visibility collaborator reports, for each observed placeholder,
//! whether the item has passed the viewport's leading edge (`intersecting`).
//! Batches are noisy: the same index may appear several times, freshly added
//! placeholders report their initial state, and items far from the axis may
//! flicker as the window moves. Only a contiguous run of crossings starting
//! at the axis, on the side the scroll is moving away from, is trusted.

use smallvec::SmallVec;

use crate::allocator::ContentLists;
use crate::collections::map::HashMap;
use crate::error::CradleError;
use crate::scroll::ScrollDirection;

/// One crossing notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossingEvent {
    pub index: usize,
    /// True once the item has passed the viewport's leading edge.
    pub intersecting: bool,
    /// Intersection ratio reported by the collaborator.
    pub ratio: f32,
    /// Notification time in milliseconds; later wins among duplicates.
    pub time: f64,
}

impl CrossingEvent {
    pub fn new(index: usize, intersecting: bool, ratio: f32, time: f64) -> Self {
        Self {
            index,
            intersecting,
            ratio,
            time,
        }
    }
}

/// The trusted run of crossings from one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredCrossings {
    pub direction: ScrollDirection,
    /// Events in walk order, starting at the axis.
    pub events: SmallVec<[CrossingEvent; 8]>,
}

impl FilteredCrossings {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Tail items that moved past the leading edge.
    pub fn forward_count(&self) -> usize {
        match self.direction {
            ScrollDirection::Forward => self.events.len(),
            _ => 0,
        }
    }

    /// Head items that moved back over the leading edge.
    pub fn backward_count(&self) -> usize {
        match self.direction {
            ScrollDirection::Backward => self.events.len(),
            _ => 0,
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().map(|event| event.index)
    }
}

/// Isolates the contiguous run of crossings adjacent to the axis.
#[derive(Clone, Copy, Debug)]
pub struct IntersectionFilter {
    cross_count: usize,
}

impl IntersectionFilter {
    pub fn new(cross_count: usize) -> Self {
        Self {
            cross_count: cross_count.max(1),
        }
    }

    /// Filters a batch against the current head and tail lists.
    ///
    /// Fails with [`CradleError::ObserverNoise`] if any event names an index
    /// outside the window.
    pub fn isolate(
        &self,
        events: &[CrossingEvent],
        lists: &ContentLists<'_>,
        direction: ScrollDirection,
    ) -> Result<FilteredCrossings, CradleError> {
        if let Some(stray) = events.iter().find(|event| !lists.contains(event.index)) {
            return Err(CradleError::ObserverNoise { index: stray.index });
        }

        let mut filtered = FilteredCrossings {
            direction,
            events: SmallVec::new(),
        };
        if !direction.is_determined() || events.is_empty() {
            return Ok(filtered);
        }

        let survivors = deduplicate(events);
        let head_range = lists.head_range();
        let tail_range = lists.tail_range();

        match direction {
            ScrollDirection::Forward => {
                // Tail items entering the head zone, walking away from the axis.
                let mut run: Vec<CrossingEvent> = survivors
                    .into_iter()
                    .filter(|event| tail_range.contains(&event.index))
                    .collect();
                run.sort_by_key(|event| event.index);
                let boundary_row_end = tail_range.start + self.cross_count;
                filtered.events = walk(&run, true, |prev, next| next == prev + 1, |first| {
                    first < boundary_row_end
                });
            }
            ScrollDirection::Backward => {
                // Head items leaving the head zone, walking away from the axis.
                let mut run: Vec<CrossingEvent> = survivors
                    .into_iter()
                    .filter(|event| head_range.contains(&event.index))
                    .collect();
                run.sort_by_key(|event| std::cmp::Reverse(event.index));
                let boundary_row_start = head_range.end.saturating_sub(self.cross_count);
                filtered.events = walk(&run, false, |prev, next| next + 1 == prev, |first| {
                    first >= boundary_row_start
                });
            }
            ScrollDirection::None => {}
        }

        log::trace!(
            "isolate: {} events -> {:?} run of {}",
            events.len(),
            direction,
            filtered.events.len()
        );
        Ok(filtered)
    }
}

/// Collapses duplicate events per index: an even count cancels out, an odd
/// count keeps the most recent event (batch order breaks time ties).
fn deduplicate(events: &[CrossingEvent]) -> Vec<CrossingEvent> {
    let mut groups: HashMap<usize, (usize, usize)> = HashMap::default();
    for (position, event) in events.iter().enumerate() {
        let entry = groups.entry(event.index).or_insert((0, position));
        entry.0 += 1;
        if event.time >= events[entry.1].time {
            entry.1 = position;
        }
    }

    groups
        .into_values()
        .filter(|(count, _)| count % 2 == 1)
        .map(|(_, latest)| events[latest])
        .collect()
}

/// Takes the maximal run from the start of `sorted` whose first index is at
/// the boundary, whose indices are adjacent, and whose state is `expected`.
fn walk(
    sorted: &[CrossingEvent],
    expected: bool,
    adjacent: impl Fn(usize, usize) -> bool,
    at_boundary: impl Fn(usize) -> bool,
) -> SmallVec<[CrossingEvent; 8]> {
    let mut run = SmallVec::new();
    let Some(first) = sorted.first() else {
        return run;
    };
    if !at_boundary(first.index) || first.intersecting != expected {
        return run;
    }

    run.push(*first);
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if !adjacent(prev.index, next.index) || next.intersecting != expected {
            break;
        }
        run.push(next);
    }
    run
}
