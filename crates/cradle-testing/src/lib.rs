//! Testing utilities and scroll harness for cradle

pub mod assertions;
pub mod cache;
pub mod robot;

pub use assertions::*;
pub use cache::{AcquireMode, RecordingCache};
pub use robot::{ResolveReport, ScrollRobot};

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::cache::{AcquireMode, RecordingCache};
    pub use crate::robot::{ResolveReport, ScrollRobot};
    pub use cradle_core::prelude::*;
}
