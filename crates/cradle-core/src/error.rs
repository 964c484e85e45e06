//! Error taxonomy for the window engine.
//!
//! None of these are surfaced to the host as failures. Each one is resolved
//! where it is detected: geometry is clamped, stale results are discarded and
//! observer noise falls back to a full window rebuild.

use crate::window::InstanceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CradleError {
    /// The viewport cannot fit a single cell across the cross axis.
    Configuration { cross_count: usize },
    /// A target index lies outside `[0, list_size)`.
    BoundaryOvershoot { requested: usize, clamped: usize },
    /// An acquisition resolved for a placeholder that is no longer in the window.
    StaleAcquisition { index: usize, instance: InstanceId },
    /// A crossing event references an index outside the head and tail lists.
    ObserverNoise { index: usize },
}

impl CradleError {
    /// Value to continue with after a [`CradleError::BoundaryOvershoot`].
    pub fn clamped_index(&self) -> Option<usize> {
        match self {
            CradleError::BoundaryOvershoot { clamped, .. } => Some(*clamped),
            _ => None,
        }
    }
}

impl std::fmt::Display for CradleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CradleError::Configuration { cross_count } => {
                write!(f, "degenerate geometry: cross count resolved to {cross_count}")
            }
            CradleError::BoundaryOvershoot { requested, clamped } => {
                write!(f, "index {requested} out of bounds; clamped to {clamped}")
            }
            CradleError::StaleAcquisition { index, instance } => {
                write!(f, "stale acquisition for index {index} (placeholder {instance})")
            }
            CradleError::ObserverNoise { index } => {
                write!(f, "crossing event for index {index} outside the window")
            }
        }
    }
}

impl std::error::Error for CradleError {}
