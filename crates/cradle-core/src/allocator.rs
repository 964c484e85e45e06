//! Head/tail allocation.
//!
//! Converts a cradle shift into add/clip counts for each edge of the window,
//! and splits the window into the head (before the axis) and tail (at and
//! after the axis) sublists.

use std::ops::Range;

use crate::model::ListParams;
use crate::scroll::ScrollDirection;
use crate::window::{Placeholder, Window};

/// Edge changes for one update; negative clips, positive adds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeadTailChanges {
    pub head_change_count: i64,
    pub tail_change_count: i64,
}

impl HeadTailChanges {
    pub fn is_empty(&self) -> bool {
        self.head_change_count == 0 && self.tail_change_count == 0
    }
}

/// Inputs to [`compute_changes`].
#[derive(Clone, Copy, Debug)]
pub struct ChangeInput {
    /// Requested cradle movement in items, from the shift calculator.
    pub cradle_shift_count: i64,
    pub direction: ScrollDirection,
    /// Current first index of the window.
    pub cradle_reference_index: usize,
    /// Current number of items in the window.
    pub content_count: usize,
    /// Axis index after the shift.
    pub axis_reference_index: usize,
}

/// Computes head and tail changes for a cradle shift.
///
/// Scrolling forward, the head is clipped by however many rows it would
/// exceed the runway with the new axis, and the tail grows to keep the window
/// size. Scrolling backward, the head is topped up to the runway and the tail
/// clipped. Movement is bounded by the requested shift and by the list ends,
/// in whole rows.
pub fn compute_changes(input: &ChangeInput, params: &ListParams) -> HeadTailChanges {
    let cross = params.cross_count as i64;
    let runway = params.runway_row_count as i64;
    let cradle_rows = params.cradle_row_count as i64;
    let list_rows = params.list_row_count as i64;
    let cradle_row = params.row_of(input.cradle_reference_index) as i64;
    let axis_row = params.row_of(input.axis_reference_index) as i64;
    let head_rows = axis_row - cradle_row;
    let shift_rows = input.cradle_shift_count / cross;

    let move_rows = match input.direction {
        ScrollDirection::Forward => {
            let excess = (head_rows - runway).max(0);
            let rows = excess.min(shift_rows.max(0));
            let overflow = (cradle_row + rows + cradle_rows - list_rows).max(0);
            (rows - overflow).max(0)
        }
        ScrollDirection::Backward => {
            let shortfall = (runway - head_rows).max(0);
            let rows = shortfall.min((-shift_rows).max(0)).min(cradle_row);
            -rows
        }
        ScrollDirection::None => 0,
    };

    if move_rows == 0 {
        return HeadTailChanges::default();
    }

    let new_cradle_row = (cradle_row + move_rows) as usize;
    let old_start = input.cradle_reference_index as i64;
    let old_end = old_start + input.content_count as i64;
    let new_start = params.row_start_index(new_cradle_row) as i64;
    let new_end = params.window_end_index(new_cradle_row) as i64;

    let changes = HeadTailChanges {
        head_change_count: old_start - new_start,
        tail_change_count: new_end - old_end,
    };
    log::trace!(
        "compute_changes: {:?} by {move_rows} rows -> {:?}",
        input.direction,
        changes
    );
    changes
}

/// The window split at the axis.
#[derive(Clone, Copy, Debug)]
pub struct ContentLists<'a> {
    start: usize,
    pub head: &'a [Placeholder],
    pub tail: &'a [Placeholder],
}

impl<'a> ContentLists<'a> {
    pub fn head_range(&self) -> Range<usize> {
        self.start..self.start + self.head.len()
    }

    pub fn tail_range(&self) -> Range<usize> {
        let axis = self.start + self.head.len();
        axis..axis + self.tail.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.head_range().contains(&index) || self.tail_range().contains(&index)
    }

    /// Head followed by tail, which is always the whole window.
    pub fn iter(&self) -> impl Iterator<Item = &'a Placeholder> {
        self.head.iter().chain(self.tail.iter())
    }
}

/// Splits `window` into items before `axis_reference_index` and the rest.
pub fn allocate_content_list(window: &Window, axis_reference_index: usize) -> ContentLists<'_> {
    let split = axis_reference_index
        .saturating_sub(window.start())
        .min(window.len());
    let (head, tail) = window.items().split_at(split);
    ContentLists {
        start: window.start(),
        head,
        tail,
    }
}
