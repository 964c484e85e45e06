//! Sliding-window engine for virtualized lists and uniform grids.
//!
//! Only a bounded, contiguous window (the *cradle*) of an arbitrarily long
//! list is materialized at a time. The cradle is rebuilt from scratch when
//! the list is set up or repositioned, and otherwise slid incrementally as
//! items cross the viewport's leading edge.
//!
//! # Architecture
//!
//! - [`ListParams`] - static geometry derived from [`CradleConfig`] and the [`Viewport`]
//! - [`ReferenceTracker`] - scroll-implied, pending and committed [`AxisReference`]s
//! - [`compute_window`] - full window plan for a target reference
//! - [`IntersectionFilter`] - isolates trustworthy crossings from a noisy batch
//! - [`compute_shift`] - converts crossings and overshoot into an axis/cradle shift
//! - [`compute_changes`] - converts a cradle shift into head/tail add and clip counts
//! - [`WindowMaterializer`] - applies changes to the [`Window`] of placeholders
//! - [`ContentController`] - the state machine tying everything together
//!
//! Item content is never owned here. Placeholders carry an opaque
//! [`IdentityHandle`] obtained from the host's [`ItemCache`].
//!
//! # Example
//!
//! ```rust
//! use cradle_core::{ContentController, CradleConfig, CradleSession, EphemeralCache, Viewport};
//!
//! let config = CradleConfig {
//!     list_size: 100,
//!     cell_width: 100.0,
//!     cell_height: 100.0,
//!     runway_rows: 2,
//!     ..Default::default()
//! };
//! let mut session = CradleSession::new(EphemeralCache::default());
//! let mut controller = ContentController::new(config, Viewport::new(400.0, 300.0));
//! controller.setup(&mut session);
//!
//! assert_eq!(controller.window_range(), 0..28);
//! ```

pub mod allocator;
pub mod axis;
pub mod collaborators;
pub mod collections;
pub mod config;
pub mod controller;
pub mod error;
pub mod intersection;
pub mod model;
pub mod planner;
pub mod scroll;
pub mod session;
pub mod shift;
pub mod window;

pub use allocator::{allocate_content_list, compute_changes, ChangeInput, ContentLists, HeadTailChanges};
pub use axis::{AxisReference, ReferenceTracker};
pub use collaborators::{AcquireRequest, Acquisition, EphemeralCache, IdentityHandle, ItemCache};
pub use config::{CradleConfig, Orientation, Viewport};
pub use controller::{AxisPlacement, ContentController, CradleState, CradleUpdate, SetWindowMode};
pub use error::CradleError;
pub use intersection::{CrossingEvent, FilteredCrossings, IntersectionFilter};
pub use model::ListParams;
pub use planner::{compute_window, WindowSpec};
pub use scroll::{ScrollDirection, ScrollTracker};
pub use session::{CradleSession, CradleStats};
pub use shift::{compute_shift, overshoot_rows, quantize_crossings, Shift, ShiftInput};
pub use window::{InstanceId, InstanceIdGenerator, MaterializeReport, Placeholder, Window, WindowMaterializer};

pub mod prelude {
    pub use crate::axis::AxisReference;
    pub use crate::config::{CradleConfig, Orientation, Viewport};
    pub use crate::controller::{ContentController, CradleState, CradleUpdate, SetWindowMode};
    pub use crate::collaborators::{AcquireRequest, Acquisition, IdentityHandle, ItemCache};
    pub use crate::intersection::CrossingEvent;
    pub use crate::scroll::ScrollDirection;
    pub use crate::session::CradleSession;
}
