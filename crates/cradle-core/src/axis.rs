//! Axis reference tracking.
//!
//! The axis is the zero-size line inside the window that separates the head
//! (items before it) from the tail (items at and after it). Its position is
//! described by an [`AxisReference`]: the row-aligned index of the first tail
//! item and the pixel distance from the viewport's leading edge to the axis.

/// Item index plus pixel offset locating the axis relative to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisReference {
    /// First item at or after the axis; a multiple of the cross count.
    pub index: usize,
    /// Distance from the viewport's leading edge to the axis.
    pub offset: f32,
}

impl AxisReference {
    pub fn new(index: usize, offset: f32) -> Self {
        Self { index, offset }
    }
}

/// Holds the three generations of the axis reference for one list.
///
/// - *scroll-implied*: derived live from the raw scroll offset
/// - *next*: a target staged by the current cycle but not yet applied
/// - *ready*: the reference the current window was built from
#[derive(Clone, Debug, Default)]
pub struct ReferenceTracker {
    scroll_implied: AxisReference,
    next: Option<AxisReference>,
    ready: AxisReference,
}

impl ReferenceTracker {
    pub fn new(initial: AxisReference) -> Self {
        Self {
            scroll_implied: initial,
            next: None,
            ready: initial,
        }
    }

    pub fn scroll_implied(&self) -> AxisReference {
        self.scroll_implied
    }

    pub fn set_scroll_implied(&mut self, reference: AxisReference) {
        self.scroll_implied = reference;
    }

    /// Stages a reference to be committed at the end of the cycle.
    pub fn stage(&mut self, reference: AxisReference) {
        self.next = Some(reference);
    }

    /// Promotes the staged reference to ready. Returns the new ready value,
    /// or `None` if nothing was staged.
    pub fn commit(&mut self) -> Option<AxisReference> {
        let next = self.next.take()?;
        self.ready = next;
        Some(next)
    }

    /// Drops a staged reference without applying it.
    pub fn discard(&mut self) {
        self.next = None;
    }

    pub fn ready(&self) -> AxisReference {
        self.ready
    }
}
