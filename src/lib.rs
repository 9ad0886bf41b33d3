//! Circular rotation and pinch gesture recognition for a round touch pad.
//!
//! Pointer samples go in through [`CirclePad`]; every input call returns a
//! [`ReportBuffer`] holding the reports it produced, in emission order.

pub mod calibration;
pub mod config;
pub mod delivery;
pub mod pad;
pub mod pinch;
pub mod rotation;
pub mod types;

pub use calibration::Calibration;
pub use config::{ConfigError, GestureConfig, ReversalPolicy, SpeedProfile};
pub use delivery::{GestureListener, ReportChannel, ReportPublisher, REPORT_CHANNEL_DEPTH};
pub use pad::CirclePad;
pub use pinch::PinchTracker;
pub use rotation::RotationTracker;
pub use types::{
    GestureReport, PointerPoint, ReleaseVerdict, ReportBuffer, RotationDirection,
    RotationSample, TrackerSnapshot, TrackerStateId,
};
