//! Slick Bottom Sheet
//!
//! The core of a draggable bottom sheet: a panel that slides up from the
//! bottom of a viewport and rests at one of several snap points.
//!
//! # Features
//!
//! - **Snap resolution**: fractional, absolute, `close` and content-fitting `auto` snaps
//! - **Settle state machine**: open, close, drag and programmatic snaps as explicit effects
//! - **Drag/scroll arbitration**: hand a gesture between the sheet and its scrollable content
//! - **Host driver**: [`BottomSheet`] applies effects to an animated offset and host callbacks
//!
//! Offsets are measured from the closed baseline and are `<= 0`; a more
//! negative offset is a more open sheet.
//!
//! # Example
//!
//! ```rust
//! use slick_sheet::prelude::*;
//!
//! let config = SnapConfig::with_snaps([0.25, 0.5]).auto_snap_as_max(false);
//! let mut controller = Controller::new(SheetConfig::new(config));
//! controller.set_geometry(SheetGeometry::new(800.0, 2000.0));
//!
//! let effects = controller.open();
//! assert_eq!(effects[0], Effect::OpenStart);
//! assert_eq!(controller.state(), SheetState::Settling(SnapKey::Auto));
//! ```

pub mod arbitration;
pub mod backdrop;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod sheet;
pub mod snap;

pub use arbitration::{Arbiter, ArbitrationMode};
pub use backdrop::backdrop_opacity;
pub use config::{CloseSnap, DefaultSnap, MotionConfig, SheetConfig, SnapConfig};
pub use controller::{
    Controller, DragConstraints, Effect, Effects, Motion, SheetEvent, SheetState, SnapOptions,
    SnapTarget,
};
pub use error::{ParseSnapKeyError, Result, SheetError, SnapError};
pub use geometry::SheetGeometry;
pub use sheet::{BottomSheet, OffsetAnimator, SheetCallbacks};
pub use snap::{SnapKey, SnapPoint, SnapTable};

pub mod prelude {
    pub use crate::config::{CloseSnap, DefaultSnap, SheetConfig, SnapConfig};
    pub use crate::controller::{Controller, Effect, SheetState, SnapOptions, SnapTarget};
    pub use crate::error::{Result, SheetError};
    pub use crate::geometry::SheetGeometry;
    pub use crate::sheet::{BottomSheet, SheetCallbacks};
    pub use crate::snap::{SnapKey, SnapPoint, SnapTable};
}
