use core::f32::consts::{PI, TAU};

/// Wraps any angle into `(-π, π]`.
pub(crate) fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Welford accumulator over sample radii.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RadiusStats {
    pub(crate) count: u32,
    pub(crate) mean: f32,
    pub(crate) sum_sq_dev: f32,
}

impl RadiusStats {
    pub(crate) fn push(&mut self, radius: f32) {
        self.count = self.count.saturating_add(1);
        let delta = radius - self.mean;
        self.mean += delta / self.count as f32;
        self.sum_sq_dev += delta * (radius - self.mean);
    }

    /// Sample variance; zero until two samples exist.
    pub(crate) fn variance(&self) -> f32 {
        if self.count > 1 {
            self.sum_sq_dev / (self.count - 1) as f32
        } else {
            0.0
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct SmoothedVelocity {
    value: f32,
}

impl SmoothedVelocity {
    pub(crate) fn update(&mut self, alpha: f32, delta: f32) -> f32 {
        self.value = alpha * delta + (1.0 - alpha) * self.value;
        self.value
    }

    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    pub(crate) fn clear(&mut self) {
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn wrap_crossing_pi_yields_short_positive_step() {
        let from = 179f32.to_radians();
        let to = (-179f32).to_radians();
        let delta = normalize_angle(to - from);
        assert!(close(delta, 2f32.to_radians(), 1e-4), "delta={delta}");
    }

    #[test]
    fn wrap_crossing_pi_backwards_yields_short_negative_step() {
        let from = (-179f32).to_radians();
        let to = 179f32.to_radians();
        let delta = normalize_angle(to - from);
        assert!(close(delta, -2f32.to_radians(), 1e-4), "delta={delta}");
    }

    #[test]
    fn normalized_range_is_half_open() {
        assert!(close(normalize_angle(-PI), PI, 1e-6));
        assert!(close(normalize_angle(PI), PI, 1e-6));
        assert!(close(normalize_angle(3.0 * TAU + 0.5), 0.5, 1e-4));
        assert!(close(normalize_angle(-0.25), -0.25, 1e-6));
    }

    #[test]
    fn welford_matches_two_pass_variance() {
        let radii = [10.0f32, 12.0, 9.5, 11.0, 14.0, 8.0];
        let mut stats = RadiusStats::default();
        for r in radii {
            stats.push(r);
        }

        let mean = radii.iter().sum::<f32>() / radii.len() as f32;
        let var = radii.iter().map(|r| (r - mean) * (r - mean)).sum::<f32>()
            / (radii.len() - 1) as f32;
        assert_eq!(stats.count, 6);
        assert!(close(stats.mean, mean, 1e-5));
        assert!(close(stats.variance(), var, 1e-4));
    }

    #[test]
    fn single_sample_has_zero_variance() {
        let mut stats = RadiusStats::default();
        stats.push(42.0);
        assert_eq!(stats.variance(), 0.0);
    }

    #[test]
    fn ema_converges_toward_constant_input() {
        let mut velocity = SmoothedVelocity::default();
        assert!(close(velocity.update(0.4, 1.0), 0.4, 1e-6));
        assert!(close(velocity.update(0.4, 1.0), 0.64, 1e-6));
        for _ in 0..40 {
            velocity.update(0.4, 1.0);
        }
        assert!(close(velocity.value(), 1.0, 1e-4));
    }
}
