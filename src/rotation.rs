use statig::blocking::IntoStateMachineExt as _;

mod hsm;
mod utils;

use hsm::RotationHsm;

use crate::{
    calibration::Calibration,
    config::{ConfigError, GestureConfig},
    types::{
        GestureReport, PointerPoint, ReleaseVerdict, ReportBuffer, TrackerSnapshot,
        TrackerStateId,
    },
};

#[derive(Clone, Copy, Debug)]
enum RotationHsmEvent {
    Begin(PointerPoint),
    Move(PointerPoint),
    End,
    Cancel,
    Recalibrate(Calibration),
    Configure {
        config: GestureConfig,
        calibration: Calibration,
    },
}

#[derive(Default)]
struct DispatchContext {
    reports: ReportBuffer,
}

impl DispatchContext {
    fn emit(&mut self, report: GestureReport) {
        self.reports.push(report);
    }
}

/// Single-pointer rotation recognizer.
///
/// Pointer samples must arrive in order from one source; every call runs to
/// completion before returning its reports.
pub struct RotationTracker {
    machine: statig::blocking::StateMachine<RotationHsm>,
    config: GestureConfig,
    geometry: Option<(f32, f32)>,
}

impl RotationTracker {
    pub fn new(config: GestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            machine: RotationHsm::new(config, Calibration::for_pad(config.size)).state_machine(),
            config,
            geometry: None,
        })
    }

    /// Replaces the configuration. A gesture in flight finishes under the old
    /// configuration; the new one applies from the next reset.
    pub fn configure(&mut self, config: GestureConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        let calibration = self.current_calibration();
        self.dispatch(RotationHsmEvent::Configure {
            config,
            calibration,
        });
        Ok(())
    }

    pub fn set_geometry(&mut self, width: f32, height: f32) {
        let Some(calibration) = Calibration::from_geometry(self.config.size, width, height) else {
            return;
        };
        self.geometry = Some((width, height));
        self.dispatch(RotationHsmEvent::Recalibrate(calibration));
    }

    pub fn begin(&mut self, point: PointerPoint) -> ReportBuffer {
        self.dispatch(RotationHsmEvent::Begin(point))
    }

    pub fn update(&mut self, point: PointerPoint) -> ReportBuffer {
        self.dispatch(RotationHsmEvent::Move(point))
    }

    pub fn end(&mut self) -> ReportBuffer {
        self.dispatch(RotationHsmEvent::End)
    }

    pub fn cancel(&mut self) -> ReportBuffer {
        self.dispatch(RotationHsmEvent::Cancel)
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.machine.inner().snapshot()
    }

    pub fn state_id(&self) -> TrackerStateId {
        self.machine.inner().state_id()
    }

    pub fn last_verdict(&self) -> Option<ReleaseVerdict> {
        self.machine.inner().last_verdict()
    }

    /// Configuration most recently accepted by [`Self::configure`].
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Geometry the current gesture is measured against.
    pub fn calibration(&self) -> Calibration {
        self.machine.inner().calibration()
    }

    fn current_calibration(&self) -> Calibration {
        self.geometry
            .and_then(|(width, height)| Calibration::from_geometry(self.config.size, width, height))
            .unwrap_or_else(|| Calibration::for_pad(self.config.size))
    }

    fn dispatch(&mut self, event: RotationHsmEvent) -> ReportBuffer {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.reports
    }
}
