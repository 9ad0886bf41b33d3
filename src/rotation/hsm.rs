use statig::prelude::*;

use super::{DispatchContext, RotationHsmEvent};
use crate::{
    calibration::Calibration,
    config::GestureConfig,
    types::{GestureReport, ReleaseVerdict, RotationDirection, TrackerStateId},
};

mod pipeline;

use super::utils::{RadiusStats, SmoothedVelocity};

pub(super) struct RotationHsm {
    config: GestureConfig,
    calibration: Calibration,
    pending_config: Option<GestureConfig>,
    pending_calibration: Option<Calibration>,
    state_id: TrackerStateId,
    previous_angle: f32,
    last_radius: f32,
    total_angle: f32,
    radius_stats: RadiusStats,
    in_band: bool,
    velocity: SmoothedVelocity,
    direction: Option<RotationDirection>,
    last_full_turn: u32,
    last_verdict: Option<ReleaseVerdict>,
}

#[state_machine(initial = "State::idle()")]
impl RotationHsm {
    #[state(superstate = "pad")]
    fn idle(&mut self, context: &mut DispatchContext, event: &RotationHsmEvent) -> Outcome<State> {
        match event {
            RotationHsmEvent::Begin(point) => {
                self.begin_gesture(*point);
                context.emit(GestureReport::GestureStart);
                Transition(State::tracking())
            }
            RotationHsmEvent::Move(_) | RotationHsmEvent::End => {
                log::debug!("circle: pointer input while idle ignored");
                Handled
            }
            RotationHsmEvent::Cancel => {
                self.cancel_gesture(context);
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "pad")]
    fn tracking(
        &mut self,
        context: &mut DispatchContext,
        event: &RotationHsmEvent,
    ) -> Outcome<State> {
        match event {
            RotationHsmEvent::Begin(point) => {
                // A new pointer-down without a release: close the old gesture first.
                self.cancel_gesture(context);
                self.begin_gesture(*point);
                context.emit(GestureReport::GestureStart);
                Handled
            }
            RotationHsmEvent::Move(point) => {
                self.observe(context, *point);
                Handled
            }
            RotationHsmEvent::End => {
                self.finish_gesture(context);
                Transition(State::idle())
            }
            RotationHsmEvent::Cancel => {
                self.cancel_gesture(context);
                Transition(State::idle())
            }
            RotationHsmEvent::Recalibrate(calibration) => {
                self.pending_calibration = Some(*calibration);
                Handled
            }
            RotationHsmEvent::Configure {
                config,
                calibration,
            } => {
                self.pending_config = Some(*config);
                self.pending_calibration = Some(*calibration);
                Handled
            }
        }
    }

    #[superstate]
    fn pad(&mut self, context: &mut DispatchContext, event: &RotationHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            RotationHsmEvent::Recalibrate(calibration) => {
                self.calibration = *calibration;
                Handled
            }
            RotationHsmEvent::Configure {
                config,
                calibration,
            } => {
                self.config = *config;
                self.calibration = *calibration;
                Handled
            }
            _ => Handled,
        }
    }
}
