use crate::types::PointerPoint;

/// Pad geometry in pointer coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub center: PointerPoint,
    pub radius: f32,
}

impl Calibration {
    /// A pad filling a `size` x `size` container.
    pub fn for_pad(size: f32) -> Self {
        let half = size / 2.0;
        Self {
            center: PointerPoint::new(half, half),
            radius: half,
        }
    }

    /// Centers the pad in a `width` x `height` container. The radius always
    /// comes from the nominal pad `size`; the container may be larger than the
    /// interactive circle.
    pub fn from_geometry(size: f32, width: f32, height: f32) -> Option<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            log::warn!("circle: ignoring geometry width={} height={}", width, height);
            return None;
        }
        Some(Self {
            center: PointerPoint::new(width / 2.0, height / 2.0),
            radius: size / 2.0,
        })
    }

    pub fn dead_zone(&self, ratio: f32) -> f32 {
        self.radius * ratio
    }

    pub fn band(&self, min_ratio: f32, max_ratio: f32) -> (f32, f32) {
        (self.radius * min_ratio, self.radius * max_ratio)
    }
}
