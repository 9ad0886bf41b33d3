use core::f32::consts::TAU;

use super::super::utils::normalize_angle;
use super::*;
use crate::{
    config::ReversalPolicy,
    types::{PointerPoint, RotationSample, TrackerSnapshot},
};

impl RotationHsm {
    pub(in crate::rotation) fn new(config: GestureConfig, calibration: Calibration) -> Self {
        Self {
            config,
            calibration,
            pending_config: None,
            pending_calibration: None,
            state_id: TrackerStateId::Idle,
            previous_angle: 0.0,
            last_radius: 0.0,
            total_angle: 0.0,
            radius_stats: RadiusStats::default(),
            in_band: false,
            velocity: SmoothedVelocity::default(),
            direction: None,
            last_full_turn: 0,
            last_verdict: None,
        }
    }

    pub(in crate::rotation) fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            state_id: self.state_id,
            previous_angle: self.previous_angle,
            last_radius: self.last_radius,
            total_angle: self.total_angle,
            sample_count: self.radius_stats.count,
            radius_mean: self.radius_stats.mean,
            radius_sum_sq_dev: self.radius_stats.sum_sq_dev,
            in_band: self.in_band,
            velocity: self.velocity.value(),
            direction: self.direction,
            last_full_turn: self.last_full_turn,
        }
    }

    pub(in crate::rotation) fn state_id(&self) -> TrackerStateId {
        self.state_id
    }

    pub(in crate::rotation) fn last_verdict(&self) -> Option<ReleaseVerdict> {
        self.last_verdict
    }

    pub(in crate::rotation) fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub(super) fn begin_gesture(&mut self, point: PointerPoint) {
        self.clear_gesture();
        self.state_id = TrackerStateId::Tracking;
        if point.is_finite() {
            self.previous_angle = point.angle_around(self.calibration.center);
            self.last_radius = point.distance_to(self.calibration.center);
        } else {
            log::warn!("circle: non-finite begin point x={} y={}", point.x, point.y);
        }
    }

    pub(super) fn observe(&mut self, context: &mut DispatchContext, point: PointerPoint) {
        if !point.is_finite() {
            log::debug!("circle: non-finite sample dropped");
            return;
        }

        let center = self.calibration.center;
        let radius = point.distance_to(center);
        let angle = point.angle_around(center);

        // Angle is meaningless this close to the center; keep it only as the
        // baseline for the next delta.
        if radius < self.calibration.dead_zone(self.config.dead_zone_ratio) {
            self.advance_baseline(angle, radius);
            return;
        }

        let delta = normalize_angle(angle - self.previous_angle);
        if delta.abs() < self.config.noise_threshold {
            return;
        }
        if delta.abs() < self.config.min_step_radians {
            self.advance_baseline(angle, radius);
            return;
        }

        self.radius_stats.push(radius);
        let (band_min, band_max) = self
            .calibration
            .band(self.config.min_radius_ratio, self.config.max_radius_ratio);
        if (band_min..=band_max).contains(&radius) {
            self.in_band = true;
        }

        let velocity = self.velocity.update(self.config.ema_alpha, delta);
        let direction = RotationDirection::from_signed(velocity);
        if self.config.reversal == ReversalPolicy::ResetAngle
            && self.direction.is_some_and(|previous| previous != direction)
        {
            log::debug!(
                "circle: reversal dir={} dropped_turns={}",
                direction.label(),
                self.total_angle / TAU
            );
            self.total_angle = 0.0;
        }
        self.direction = Some(direction);

        // Accumulate the smoothed step, not the raw one.
        self.total_angle += velocity;
        let turns = self.total_angle / TAU;
        context.emit(GestureReport::RotationChanged(RotationSample {
            turns,
            direction,
            speed_multiplier: self.config.speed.multiplier(velocity),
        }));

        let full_turns = turns.abs().floor() as u32;
        if full_turns > self.last_full_turn && full_turns as f32 >= self.config.turn_threshold {
            self.last_full_turn = full_turns;
            context.emit(GestureReport::FullCircle { turns, direction });
        }

        self.advance_baseline(angle, radius);
    }

    pub(super) fn finish_gesture(&mut self, context: &mut DispatchContext) {
        let verdict = self.release_verdict();
        let turns = self.total_angle / TAU;
        log::debug!(
            "circle: release verdict={:?} turns={} samples={} var={}",
            verdict,
            turns,
            self.radius_stats.count,
            self.radius_stats.variance()
        );
        if verdict == ReleaseVerdict::Accepted {
            context.emit(GestureReport::FullCircle {
                turns,
                direction: RotationDirection::from_signed(self.total_angle),
            });
        }
        context.emit(GestureReport::GestureEnd);
        self.last_verdict = Some(verdict);
        self.reset_gesture();
    }

    pub(super) fn cancel_gesture(&mut self, context: &mut DispatchContext) {
        context.emit(GestureReport::GestureEnd);
        self.last_verdict = Some(ReleaseVerdict::Cancelled);
        self.reset_gesture();
    }

    fn release_verdict(&self) -> ReleaseVerdict {
        let turns = self.total_angle / TAU;
        let max_deviation = self.calibration.radius * self.config.variance_coefficient;
        if !self.in_band {
            ReleaseVerdict::OutsideBand
        } else if turns.abs() < self.config.turn_threshold {
            ReleaseVerdict::TooFewTurns
        } else if self.radius_stats.variance() > max_deviation * max_deviation {
            ReleaseVerdict::Erratic
        } else {
            ReleaseVerdict::Accepted
        }
    }

    fn advance_baseline(&mut self, angle: f32, radius: f32) {
        self.previous_angle = angle;
        self.last_radius = radius;
    }

    fn reset_gesture(&mut self) {
        self.clear_gesture();
        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }
        if let Some(calibration) = self.pending_calibration.take() {
            self.calibration = calibration;
        }
    }

    fn clear_gesture(&mut self) {
        self.state_id = TrackerStateId::Idle;
        self.previous_angle = 0.0;
        self.last_radius = 0.0;
        self.total_angle = 0.0;
        self.radius_stats.clear();
        self.in_band = false;
        self.velocity.clear();
        self.direction = None;
        self.last_full_turn = 0;
    }
}
