//! Host configuration for a virtualized list.

/// Direction in which rows are stacked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Rows stack top to bottom; the main axis is height.
    #[default]
    Vertical,
    /// Rows stack left to right; the main axis is width.
    Horizontal,
}

impl Orientation {
    /// Returns the other orientation.
    pub fn pivoted(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }
}

/// Size of the visible viewport in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Length along the scrolling axis.
    pub fn main_length(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }

    /// Length across the scrolling axis.
    pub fn cross_length(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }
}

/// Configuration for a virtualized list or grid.
#[derive(Clone, Debug, PartialEq)]
pub struct CradleConfig {
    /// Scrolling orientation.
    pub orientation: Orientation,

    /// Cell height in pixels.
    pub cell_height: f32,

    /// Cell width in pixels.
    pub cell_width: f32,

    /// Space between cells, both along and across the main axis.
    pub gap: f32,

    /// Space between the scroll track edges and the first/last row.
    pub padding: f32,

    /// Rows kept materialized beyond the viewport on each side.
    /// Default is 3; values below 1 are raised to 1.
    pub runway_rows: usize,

    /// Total number of items in the virtual list.
    pub list_size: usize,

    /// Item brought to the viewport's leading edge on setup.
    pub starting_index: usize,

    /// Intersection ratio at which the visibility collaborator reports a crossing.
    pub intersection_threshold: f32,
}

impl Default for CradleConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            cell_height: 100.0,
            cell_width: 100.0,
            gap: 0.0,
            padding: 0.0,
            runway_rows: 3,
            list_size: 0,
            starting_index: 0,
            intersection_threshold: 0.0,
        }
    }
}

impl CradleConfig {
    /// Cell length along the scrolling axis.
    pub fn cell_main_length(&self) -> f32 {
        match self.orientation {
            Orientation::Vertical => self.cell_height,
            Orientation::Horizontal => self.cell_width,
        }
    }

    /// Cell length across the scrolling axis.
    pub fn cell_cross_length(&self) -> f32 {
        match self.orientation {
            Orientation::Vertical => self.cell_width,
            Orientation::Horizontal => self.cell_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_follow_orientation() {
        let viewport = Viewport::new(400.0, 300.0);
        assert_eq!(viewport.main_length(Orientation::Vertical), 300.0);
        assert_eq!(viewport.cross_length(Orientation::Vertical), 400.0);
        assert_eq!(viewport.main_length(Orientation::Horizontal), 400.0);

        let config = CradleConfig {
            cell_height: 50.0,
            cell_width: 80.0,
            orientation: Orientation::Horizontal,
            ..Default::default()
        };
        assert_eq!(config.cell_main_length(), 80.0);
        assert_eq!(config.cell_cross_length(), 50.0);
        assert_eq!(config.orientation.pivoted(), Orientation::Vertical);
    }
}
