//! Scroll sampling.
//!
//! Records raw scroll offsets reported by the host and derives the direction
//! of travel between consecutive samples.

/// Deltas smaller than this are treated as no movement.
const DIRECTION_EPSILON: f32 = 0.001;

/// Direction of travel along the main axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Scroll offset increasing; content moves toward the leading edge.
    Forward,
    /// Scroll offset decreasing.
    Backward,
    /// No net movement since the previous sample.
    #[default]
    None,
}

impl ScrollDirection {
    pub fn from_delta(delta: f32) -> Self {
        if delta > DIRECTION_EPSILON {
            ScrollDirection::Forward
        } else if delta < -DIRECTION_EPSILON {
            ScrollDirection::Backward
        } else {
            ScrollDirection::None
        }
    }

    pub fn is_determined(self) -> bool {
        self != ScrollDirection::None
    }
}

/// Tracks the host's scroll offset across samples.
#[derive(Clone, Debug, Default)]
pub struct ScrollTracker {
    offset: f32,
    direction: ScrollDirection,
    is_scrolling: bool,
}

impl ScrollTracker {
    pub fn new(offset: f32) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    /// Records a scroll sample and returns the direction since the previous one.
    pub fn sample(&mut self, offset: f32) -> ScrollDirection {
        self.direction = ScrollDirection::from_delta(offset - self.offset);
        self.offset = offset;
        self.is_scrolling = true;
        self.direction
    }

    /// Marks the end of a scroll gesture.
    pub fn settle(&mut self) {
        self.is_scrolling = false;
    }

    /// Moves to `offset` without registering movement, as after a
    /// programmatic scroll write.
    pub fn reset(&mut self, offset: f32) {
        self.offset = offset;
        self.direction = ScrollDirection::None;
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }
}
