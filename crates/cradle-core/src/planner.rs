//! Full window planning.
//!
//! Used only when the window is built from scratch: on setup, reposition,
//! resize, pivot, reload and list-size change. Between rebuilds the window is
//! slid incrementally by the shift pipeline.

use std::ops::Range;

use crate::axis::AxisReference;
use crate::model::ListParams;

/// Placement of a freshly built window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowSpec {
    /// First index of the window; row-aligned.
    pub cradle_reference_index: usize,
    /// First tail index; row-aligned.
    pub axis_reference_index: usize,
    /// Number of items in the window.
    pub content_count: usize,
    /// Scroll-track position of the axis, excluding `axis_adjustment`.
    pub track_pixel_offset: f32,
    /// Distance from the viewport's leading edge to the axis, excluding `axis_adjustment`.
    pub axis_pixel_offset: f32,
    /// Leading padding carried separately while the axis sits on row 0.
    pub axis_adjustment: f32,
}

impl WindowSpec {
    /// Index range covered by the window.
    pub fn index_range(&self) -> Range<usize> {
        self.cradle_reference_index..self.cradle_reference_index + self.content_count
    }

    /// Scroll offset the host must apply so the axis lands where planned.
    pub fn scroll_position(&self) -> f32 {
        self.track_pixel_offset - self.axis_pixel_offset
    }

    /// The committed reference this window was built from.
    pub fn axis_reference(&self) -> AxisReference {
        AxisReference::new(
            self.axis_reference_index,
            self.axis_pixel_offset + self.axis_adjustment,
        )
    }
}

/// Computes the window for `target` in a list described by `params`.
///
/// The target index is clamped to the list and row-aligned. The scroll offset
/// the target implies is clamped to the scroll track, which pulls the axis
/// back near the end of the list so the viewport is never under-filled.
pub fn compute_window(target: AxisReference, params: &ListParams) -> WindowSpec {
    if params.list_size == 0 {
        return WindowSpec::default();
    }

    let index = params.clamp_index(target.index).unwrap_or_else(|err| {
        log::debug!("compute_window: {err}");
        params.list_size - 1
    });
    let target_row = params.row_of(index);

    let desired_scroll = params.row_position(target_row) - target.offset;
    let max_scroll = params.max_scroll_offset();
    if desired_scroll > max_scroll {
        log::trace!(
            "compute_window: row {target_row} would under-fill the viewport; pulling axis back"
        );
    }
    let axis = params.reference_from_scroll(desired_scroll.clamp(0.0, max_scroll));
    let axis_row = params.row_of(axis.index);

    let cradle_row = params.cradle_row_for_axis(axis_row);
    let cradle_reference_index = params.row_start_index(cradle_row);
    let content_count = params.window_len(cradle_row);

    let plan = if axis_row == 0 {
        WindowSpec {
            cradle_reference_index,
            axis_reference_index: 0,
            content_count,
            track_pixel_offset: 0.0,
            axis_pixel_offset: 0.0,
            axis_adjustment: params.padding,
        }
    } else {
        WindowSpec {
            cradle_reference_index,
            axis_reference_index: axis.index,
            content_count,
            track_pixel_offset: params.row_position(axis_row),
            axis_pixel_offset: axis.offset,
            axis_adjustment: 0.0,
        }
    };

    log::debug!(
        "compute_window: target {} -> window {:?}, axis {} at {}",
        target.index,
        plan.index_range(),
        plan.axis_reference_index,
        plan.axis_pixel_offset
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CradleConfig, Viewport};

    fn grid(list_size: usize, padding: f32) -> ListParams {
        let config = CradleConfig {
            list_size,
            runway_rows: 2,
            padding,
            ..Default::default()
        };
        ListParams::derive(&config, Viewport::new(400.0 + 2.0 * padding, 300.0))
    }

    #[test]
    fn test_initial_window_at_start() {
        let params = grid(100, 0.0);
        let plan = compute_window(AxisReference::new(0, 0.0), &params);

        assert_eq!(plan.index_range(), 0..28);
        assert_eq!(plan.axis_reference_index, 0);
        assert_eq!(plan.axis_pixel_offset, 0.0);
        assert_eq!(plan.track_pixel_offset, 0.0);
        assert_eq!(plan.scroll_position(), 0.0);
    }

    #[test]
    fn test_mid_list_window_has_runway_both_sides() {
        let params = grid(100, 0.0);
        let plan = compute_window(AxisReference::new(41, 30.0), &params);

        // 41 row-aligns down to 40 (row 10); runway rows 8 and 9 precede it.
        assert_eq!(plan.axis_reference_index, 40);
        assert_eq!(plan.cradle_reference_index, 32);
        assert_eq!(plan.content_count, 28);
        assert_eq!(plan.axis_pixel_offset, 30.0);
        assert_eq!(plan.scroll_position(), 970.0);
    }

    #[test]
    fn test_runway_capped_by_rows_before_target() {
        let params = grid(100, 0.0);
        let plan = compute_window(AxisReference::new(4, 0.0), &params);

        assert_eq!(plan.cradle_reference_index, 0);
        assert_eq!(plan.axis_reference_index, 4);
        assert_eq!(plan.content_count, 28);
    }

    #[test]
    fn test_last_index_with_partial_row() {
        let params = grid(97, 0.0);
        let plan = compute_window(AxisReference::new(96, 0.0), &params);

        // Row 24 cannot fill the viewport; the axis is pulled back to row 22.
        assert_eq!(plan.axis_reference_index, 88);
        assert_eq!(plan.cradle_reference_index, 72);
        assert_eq!(plan.index_range(), 72..97);
        assert_eq!(plan.scroll_position(), params.max_scroll_offset());
    }

    #[test]
    fn test_target_beyond_list_is_clamped() {
        let params = grid(97, 0.0);
        let clamped = compute_window(AxisReference::new(5000, 0.0), &params);
        let last = compute_window(AxisReference::new(96, 0.0), &params);
        assert_eq!(clamped, last);
    }

    #[test]
    fn test_row_zero_carries_padding_as_adjustment() {
        let params = grid(100, 20.0);
        let plan = compute_window(AxisReference::new(2, 20.0), &params);

        assert_eq!(plan.axis_reference_index, 0);
        assert_eq!(plan.track_pixel_offset, 0.0);
        assert_eq!(plan.axis_pixel_offset, 0.0);
        assert_eq!(plan.axis_adjustment, 20.0);
        assert_eq!(plan.scroll_position(), 0.0);
        assert_eq!(plan.axis_reference(), AxisReference::new(0, 20.0));
    }

    #[test]
    fn test_short_list_fits_viewport() {
        let params = grid(10, 0.0);
        let plan = compute_window(AxisReference::new(8, 0.0), &params);

        assert_eq!(plan.index_range(), 0..10);
        assert_eq!(plan.axis_reference_index, 0);
        assert_eq!(plan.scroll_position(), 0.0);
    }

    #[test]
    fn test_empty_list() {
        let params = grid(0, 0.0);
        let plan = compute_window(AxisReference::new(3, 0.0), &params);
        assert_eq!(plan, WindowSpec::default());
    }

    #[test]
    fn test_every_target_is_row_aligned_and_in_bounds() {
        for list_size in [1, 5, 97, 100] {
            let params = grid(list_size, 0.0);
            for index in 0..list_size {
                let plan = compute_window(AxisReference::new(index, 0.0), &params);
                assert_eq!(plan.cradle_reference_index % params.cross_count, 0);
                assert_eq!(plan.axis_reference_index % params.cross_count, 0);
                assert!(plan.index_range().end <= list_size);
                assert!(
                    plan.index_range().contains(&plan.axis_reference_index),
                    "axis {} outside {:?} for target {index}",
                    plan.axis_reference_index,
                    plan.index_range()
                );
            }
        }
    }
}
