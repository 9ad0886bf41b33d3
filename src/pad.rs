use crate::{
    calibration::Calibration,
    config::{ConfigError, GestureConfig},
    pinch::PinchTracker,
    rotation::RotationTracker,
    types::{PointerPoint, ReleaseVerdict, ReportBuffer, TrackerSnapshot, TrackerStateId},
};

/// Rotation and pinch input surface of one circular pad.
pub struct CirclePad {
    rotation: RotationTracker,
    pinch: PinchTracker,
}

impl CirclePad {
    pub fn new(config: GestureConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            rotation: RotationTracker::new(config)?,
            pinch: PinchTracker::new(),
        })
    }

    pub fn configure(&mut self, config: GestureConfig) -> Result<(), ConfigError> {
        self.rotation.configure(config)
    }

    pub fn set_geometry(&mut self, width: f32, height: f32) {
        self.rotation.set_geometry(width, height);
    }

    pub fn on_pointer_begin(&mut self, x: f32, y: f32) -> ReportBuffer {
        self.rotation.begin(PointerPoint::new(x, y))
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> ReportBuffer {
        self.rotation.update(PointerPoint::new(x, y))
    }

    pub fn on_pointer_end(&mut self) -> ReportBuffer {
        self.rotation.end()
    }

    pub fn on_pointer_cancel(&mut self) -> ReportBuffer {
        self.rotation.cancel()
    }

    pub fn on_pinch_update(&mut self, scale: f32) -> ReportBuffer {
        let mut output = ReportBuffer::new();
        if let Some(report) = self.pinch.update_scale(scale) {
            output.push(report);
        }
        output
    }

    pub fn on_pinch_begin(&mut self, a: PointerPoint, b: PointerPoint) {
        self.pinch.begin_span(a, b);
    }

    pub fn on_pinch_move(&mut self, a: PointerPoint, b: PointerPoint) -> ReportBuffer {
        let mut output = ReportBuffer::new();
        if let Some(report) = self.pinch.update_span(a, b) {
            output.push(report);
        }
        output
    }

    pub fn on_pinch_end(&mut self) {
        self.pinch.end_span();
    }

    pub fn config(&self) -> &GestureConfig {
        self.rotation.config()
    }

    pub fn calibration(&self) -> Calibration {
        self.rotation.calibration()
    }

    pub fn state_id(&self) -> TrackerStateId {
        self.rotation.state_id()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.rotation.snapshot()
    }

    pub fn last_verdict(&self) -> Option<ReleaseVerdict> {
        self.rotation.last_verdict()
    }
}
