use crate::types::{GestureReport, PointerPoint};

const MIN_INITIAL_SPAN: f32 = 1e-3;

/// Pinch scale pass-through, independent of rotation tracking.
#[derive(Clone, Copy, Debug, Default)]
pub struct PinchTracker {
    initial_span: Option<f32>,
}

impl PinchTracker {
    pub const fn new() -> Self {
        Self { initial_span: None }
    }

    /// Forwards a host-computed scale. No smoothing or clamping.
    pub fn update_scale(&mut self, scale: f32) -> Option<GestureReport> {
        if !scale.is_finite() || scale <= 0.0 {
            log::debug!("circle: pinch scale dropped scale={}", scale);
            return None;
        }
        Some(GestureReport::PinchChanged { scale })
    }

    pub fn begin_span(&mut self, a: PointerPoint, b: PointerPoint) {
        let span = a.distance_to(b);
        self.initial_span = (span.is_finite() && span >= MIN_INITIAL_SPAN).then_some(span);
        if self.initial_span.is_none() {
            log::debug!("circle: pinch span too small span={}", span);
        }
    }

    /// Scale relative to the span at [`Self::begin_span`].
    pub fn update_span(&mut self, a: PointerPoint, b: PointerPoint) -> Option<GestureReport> {
        let initial = self.initial_span?;
        self.update_scale(a.distance_to(b) / initial)
    }

    pub fn end_span(&mut self) {
        self.initial_span = None;
    }

    pub fn is_spanning(&self) -> bool {
        self.initial_span.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale_of(report: Option<GestureReport>) -> Option<f32> {
        match report {
            Some(GestureReport::PinchChanged { scale }) => Some(scale),
            _ => None,
        }
    }

    #[test]
    fn scale_passes_through_unchanged() {
        let mut pinch = PinchTracker::new();
        assert_eq!(scale_of(pinch.update_scale(1.25)), Some(1.25));
        assert_eq!(scale_of(pinch.update_scale(0.5)), Some(0.5));
    }

    #[test]
    fn invalid_scale_is_silent() {
        let mut pinch = PinchTracker::new();
        assert!(pinch.update_scale(f32::NAN).is_none());
        assert!(pinch.update_scale(0.0).is_none());
        assert!(pinch.update_scale(-2.0).is_none());
    }

    #[test]
    fn span_ratio_tracks_spread_and_pinch() {
        let mut pinch = PinchTracker::new();
        pinch.begin_span(PointerPoint::new(0.0, 0.0), PointerPoint::new(100.0, 0.0));

        let spread = pinch.update_span(PointerPoint::new(0.0, 0.0), PointerPoint::new(150.0, 0.0));
        assert_eq!(scale_of(spread), Some(1.5));

        let pinched = pinch.update_span(PointerPoint::new(0.0, 0.0), PointerPoint::new(0.0, 50.0));
        assert_eq!(scale_of(pinched), Some(0.5));

        pinch.end_span();
        assert!(pinch
            .update_span(PointerPoint::new(0.0, 0.0), PointerPoint::new(10.0, 0.0))
            .is_none());
    }

    #[test]
    fn degenerate_initial_span_reports_nothing() {
        let mut pinch = PinchTracker::new();
        let p = PointerPoint::new(5.0, 5.0);
        pinch.begin_span(p, p);
        assert!(!pinch.is_spanning());
        assert!(pinch.update_span(p, PointerPoint::new(50.0, 5.0)).is_none());
    }
}
