//! Static list geometry.
//!
//! [`ListParams`] is a pure function of the host configuration and the
//! viewport. It is re-derived on resize, pivot and list-size change and never
//! mutated in between.

use std::ops::Range;

use crate::axis::AxisReference;
use crate::config::{CradleConfig, Orientation, Viewport};
use crate::error::CradleError;

/// Smallest cell length accepted along either axis.
const MIN_CELL_LENGTH: f32 = 1.0;

/// The row partially scrolled past the leading edge sits behind the axis, so
/// at least one runway row is needed to keep it materialized.
const MIN_RUNWAY_ROWS: usize = 1;

/// Geometry of a virtual list arranged in rows of `cross_count` items.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListParams {
    pub orientation: Orientation,
    /// Total number of items.
    pub list_size: usize,
    /// Items per row, never less than 1.
    pub cross_count: usize,
    /// Cell length along the main axis.
    pub cell_length: f32,
    /// Cell length across the main axis.
    pub cell_cross_length: f32,
    pub gap: f32,
    pub padding: f32,
    /// Row pitch: cell length plus gap.
    pub row_length: f32,
    /// `ceil(list_size / cross_count)`.
    pub list_row_count: usize,
    /// Main-axis viewport length.
    pub viewport_length: f32,
    /// Rows needed to cover the viewport.
    pub viewport_row_count: usize,
    /// Buffer rows desired on each side of the viewport.
    pub runway_row_count: usize,
    /// Rows in a full window: viewport rows plus both runways, capped to the list.
    pub cradle_row_count: usize,
}

impl ListParams {
    /// Derives list geometry from configuration and viewport size.
    pub fn derive(config: &CradleConfig, viewport: Viewport) -> Self {
        let orientation = config.orientation;
        let gap = config.gap.max(0.0);
        let padding = config.padding.max(0.0);
        let cell_length = config.cell_main_length().max(MIN_CELL_LENGTH);
        let cell_cross_length = config.cell_cross_length().max(MIN_CELL_LENGTH);
        let viewport_length = viewport.main_length(orientation).max(0.0);
        let viewport_cross_length = viewport.cross_length(orientation).max(0.0);

        let cross_count =
            resolve_cross_count(viewport_cross_length, cell_cross_length, gap, padding)
                .unwrap_or_else(|err| {
                    log::warn!("{err}; using a single item per row");
                    1
                });

        let row_length = cell_length + gap;
        let list_row_count = config.list_size.div_ceil(cross_count);
        let viewport_row_count = (viewport_length / row_length).ceil() as usize;
        let runway_row_count = if config.runway_rows < MIN_RUNWAY_ROWS {
            log::warn!(
                "runway of {} rows leaves the partially visible row unmaterialized; using {}",
                config.runway_rows,
                MIN_RUNWAY_ROWS
            );
            MIN_RUNWAY_ROWS
        } else {
            config.runway_rows
        };
        let cradle_row_count =
            (viewport_row_count + 2 * runway_row_count).min(list_row_count);

        Self {
            orientation,
            list_size: config.list_size,
            cross_count,
            cell_length,
            cell_cross_length,
            gap,
            padding,
            row_length,
            list_row_count,
            viewport_length,
            viewport_row_count,
            runway_row_count,
            cradle_row_count,
        }
    }

    /// Row containing `index`.
    #[inline]
    pub fn row_of(&self, index: usize) -> usize {
        index / self.cross_count
    }

    /// First index of `row`.
    #[inline]
    pub fn row_start_index(&self, row: usize) -> usize {
        row * self.cross_count
    }

    /// Scroll-track position of the leading edge of `row`.
    #[inline]
    pub fn row_position(&self, row: usize) -> f32 {
        self.padding + row as f32 * self.row_length
    }

    /// Full length of the scroll track.
    pub fn track_length(&self) -> f32 {
        if self.list_row_count == 0 {
            return 2.0 * self.padding;
        }
        2.0 * self.padding + self.list_row_count as f32 * self.row_length - self.gap
    }

    /// Largest scroll offset that still leaves the viewport filled.
    pub fn max_scroll_offset(&self) -> f32 {
        (self.track_length() - self.viewport_length).max(0.0)
    }

    /// Highest row the window may start at while keeping its full row count.
    pub fn max_cradle_row(&self) -> usize {
        self.list_row_count.saturating_sub(self.cradle_row_count)
    }

    /// Window start row for an axis row: the runway behind the axis, clamped
    /// so the window neither starts before row 0 nor runs past the last row.
    pub fn cradle_row_for_axis(&self, axis_row: usize) -> usize {
        axis_row
            .saturating_sub(self.runway_row_count)
            .min(self.max_cradle_row())
    }

    /// Exclusive end index of a window starting at `cradle_row`.
    pub fn window_end_index(&self, cradle_row: usize) -> usize {
        self.row_start_index(cradle_row + self.cradle_row_count)
            .min(self.list_size)
    }

    /// Item count of a window starting at `cradle_row`, short by the gap of a
    /// partial final row.
    pub fn window_len(&self, cradle_row: usize) -> usize {
        self.window_end_index(cradle_row)
            .saturating_sub(self.row_start_index(cradle_row))
    }

    /// Clamps `index` into `[0, list_size)`.
    pub fn clamp_index(&self, index: usize) -> Result<usize, CradleError> {
        let last = self.list_size.saturating_sub(1);
        if index > last {
            return Err(CradleError::BoundaryOvershoot {
                requested: index,
                clamped: last,
            });
        }
        Ok(index)
    }

    /// Axis reference implied by a raw scroll offset.
    ///
    /// The axis sits on the first row whose leading edge is at or after the
    /// viewport's leading edge, so the offset lies in `[0, row_length)`,
    /// except on row 0 (where it includes the leading padding) and on the
    /// final row (where it may go negative for viewports shorter than a cell).
    pub fn reference_from_scroll(&self, scroll_offset: f32) -> AxisReference {
        if self.list_row_count == 0 {
            return AxisReference::new(0, self.padding);
        }
        let scroll = scroll_offset.clamp(0.0, self.max_scroll_offset());
        let raw_row = ((scroll - self.padding) / self.row_length).ceil();
        let row = if raw_row <= 0.0 {
            0
        } else {
            (raw_row as usize).min(self.list_row_count - 1)
        };
        AxisReference::new(self.row_start_index(row), self.row_position(row) - scroll)
    }

    /// Rows intersecting the viewport at `scroll_offset`.
    pub fn visible_rows(&self, scroll_offset: f32) -> Range<usize> {
        let first = ((scroll_offset - self.padding - self.cell_length) / self.row_length).floor()
            + 1.0;
        let end = ((scroll_offset + self.viewport_length - self.padding) / self.row_length).ceil();
        let first = (first.max(0.0) as usize).min(self.list_row_count);
        let end = (end.max(0.0) as usize).min(self.list_row_count);
        first..end.max(first)
    }

    /// Item indices intersecting the viewport at `scroll_offset`.
    pub fn visible_index_range(&self, scroll_offset: f32) -> Range<usize> {
        let rows = self.visible_rows(scroll_offset);
        let start = self.row_start_index(rows.start).min(self.list_size);
        let end = self.row_start_index(rows.end).min(self.list_size);
        start..end
    }
}

/// Items that fit across the viewport, or an error if not even one does.
fn resolve_cross_count(
    viewport_cross_length: f32,
    cell_cross_length: f32,
    gap: f32,
    padding: f32,
) -> Result<usize, CradleError> {
    let available = viewport_cross_length - 2.0 * padding + gap;
    let cross_count = (available / (cell_cross_length + gap)).floor().max(0.0) as usize;
    if cross_count < 1 {
        return Err(CradleError::Configuration { cross_count });
    }
    Ok(cross_count)
}
