//! Shift calculation.
//!
//! Turns the filtered crossing counts of one batch, plus any overshoot, into
//! a row-quantized axis movement and the cradle movement that restores the
//! runway around the new axis.

use crate::axis::AxisReference;
use crate::model::ListParams;
use crate::scroll::ScrollDirection;

/// Inputs to [`compute_shift`].
#[derive(Clone, Copy, Debug)]
pub struct ShiftInput {
    pub direction: ScrollDirection,
    /// Tail items that moved past the leading edge.
    pub forward_crossings: usize,
    /// Head items that moved back over the leading edge.
    pub backward_crossings: usize,
    /// Extra rows to catch up when scrolling outran notifications.
    pub overshoot_rows: i64,
    /// Current first index of the window.
    pub cradle_reference_index: usize,
    /// Current (committed) axis index.
    pub axis_reference_index: usize,
    /// Live distance from the viewport's leading edge to the current axis.
    pub axis_viewport_offset: f32,
}

/// Result of one shift cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Shift {
    pub new_cradle_reference_index: usize,
    /// Signed cradle movement in items.
    pub cradle_shift_count: i64,
    pub new_axis_reference_index: usize,
    /// Signed axis movement in items.
    pub axis_shift_count: i64,
    /// Canonical distance from the viewport's leading edge to the new axis.
    pub axis_pixel_offset: f32,
    /// Item count of the window after the shift.
    pub content_count: usize,
    /// The window starts at index 0.
    pub beginning_of_data: bool,
    /// The window ends at the last index.
    pub end_of_data: bool,
}

impl Shift {
    pub fn is_noop(&self) -> bool {
        self.cradle_shift_count == 0 && self.axis_shift_count == 0
    }

    pub fn axis_reference(&self) -> AxisReference {
        AxisReference::new(self.new_axis_reference_index, self.axis_pixel_offset)
    }
}

/// Net crossing movement in rows. Partial rows count as whole rows.
pub fn quantize_crossings(params: &ListParams, forward: usize, backward: usize) -> i64 {
    let net = forward as i64 - backward as i64;
    let cross = params.cross_count as i64;
    net.signum() * ((net.abs() + cross - 1) / cross)
}

/// Rows between the crossing-corrected axis and the scroll-implied axis, if
/// the axis has drifted more than one row from the viewport edge.
pub fn overshoot_rows(params: &ListParams, corrected_axis_row: i64, implied: AxisReference) -> i64 {
    let implied_row = params.row_of(implied.index) as i64;
    let drift = implied_row - corrected_axis_row;
    if drift.abs() > 1 {
        log::debug!("overshoot: axis trails the viewport by {drift} rows");
        drift
    } else {
        0
    }
}

/// Computes the axis and cradle movement for one update cycle.
///
/// The axis moves by the quantized crossings plus overshoot, clamped to the
/// list. Any whole rows left in the resulting pixel offset are folded back
/// into the axis index so the offset stays within one row. At the first row
/// the offset keeps the leading padding, and at the last row it may stay
/// negative; in both cases only the axis moves, never the cradle.
pub fn compute_shift(input: &ShiftInput, params: &ListParams) -> Shift {
    let unchanged = Shift {
        new_cradle_reference_index: input.cradle_reference_index,
        cradle_shift_count: 0,
        new_axis_reference_index: input.axis_reference_index,
        axis_shift_count: 0,
        axis_pixel_offset: input.axis_viewport_offset,
        content_count: params.window_len(params.row_of(input.cradle_reference_index)),
        beginning_of_data: input.cradle_reference_index == 0,
        end_of_data: params.row_of(input.cradle_reference_index) >= params.max_cradle_row(),
    };
    if !input.direction.is_determined() || params.list_row_count == 0 {
        return unchanged;
    }

    let cross = params.cross_count as i64;
    let last_row = params.list_row_count as i64 - 1;
    let axis_row = params.row_of(input.axis_reference_index) as i64;
    let cradle_row = params.row_of(input.cradle_reference_index) as i64;

    let raw_rows =
        quantize_crossings(params, input.forward_crossings, input.backward_crossings);
    let mut new_axis_row = (axis_row + raw_rows + input.overshoot_rows).clamp(0, last_row);
    let mut offset = input.axis_viewport_offset + (new_axis_row - axis_row) as f32 * params.row_length;

    if new_axis_row > 0 {
        let carry = (offset / params.row_length).floor() as i64;
        if carry != 0 {
            let adjusted = (new_axis_row - carry).clamp(0, last_row);
            offset += (adjusted - new_axis_row) as f32 * params.row_length;
            log::trace!("compute_shift: folded {carry} row carry into axis {new_axis_row} -> {adjusted}");
            new_axis_row = adjusted;
        }
    }

    let target_cradle_row = new_axis_row - params.runway_row_count as i64;
    let max_cradle_row = params.max_cradle_row() as i64;
    let new_cradle_row = target_cradle_row.clamp(0, max_cradle_row);
    let beginning_of_data = new_cradle_row == 0;
    let end_of_data = new_cradle_row == max_cradle_row;
    if beginning_of_data && end_of_data && new_cradle_row != cradle_row {
        log::warn!("compute_shift: window covers the whole list but sits at row {cradle_row}");
    }

    let shift = Shift {
        new_cradle_reference_index: (new_cradle_row * cross) as usize,
        cradle_shift_count: (new_cradle_row - cradle_row) * cross,
        new_axis_reference_index: (new_axis_row * cross) as usize,
        axis_shift_count: (new_axis_row - axis_row) * cross,
        axis_pixel_offset: offset,
        content_count: params.window_len(new_cradle_row as usize),
        beginning_of_data,
        end_of_data,
    };
    log::trace!("compute_shift: {:?}", shift);
    shift
}
