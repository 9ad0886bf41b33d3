use core::ops::Sub;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPoint {
    pub x: f32,
    pub y: f32,
}

impl PointerPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: PointerPoint) -> f32 {
        let delta = self - other;
        delta.x.hypot(delta.y)
    }

    /// Angle of `self` around `center`, in `(-π, π]`.
    pub fn angle_around(self, center: PointerPoint) -> f32 {
        let delta = self - center;
        delta.y.atan2(delta.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Sub for PointerPoint {
    type Output = PointerPoint;

    fn sub(self, rhs: PointerPoint) -> PointerPoint {
        PointerPoint {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Spin direction in screen space, where Y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn from_signed(value: f32) -> Self {
        if value < 0.0 {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counterclockwise",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationSample {
    pub turns: f32,
    pub direction: RotationDirection,
    pub speed_multiplier: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureReport {
    GestureStart,
    RotationChanged(RotationSample),
    FullCircle {
        turns: f32,
        direction: RotationDirection,
    },
    PinchChanged {
        scale: f32,
    },
    GestureEnd,
}

impl GestureReport {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::GestureStart => "start",
            Self::RotationChanged(_) => "rotation",
            Self::FullCircle { .. } => "full_circle",
            Self::PinchChanged { .. } => "pinch",
            Self::GestureEnd => "end",
        }
    }

    /// Reports a consumer cannot reconstruct from later ones.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::RotationChanged(_))
    }
}

const REPORT_BUFFER_CAPACITY: usize = 4;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportBuffer {
    reports: heapless::Vec<GestureReport, REPORT_BUFFER_CAPACITY>,
}

impl ReportBuffer {
    pub const MAX: usize = REPORT_BUFFER_CAPACITY;

    pub const fn new() -> Self {
        Self {
            reports: heapless::Vec::new(),
        }
    }

    pub fn push(&mut self, report: GestureReport) {
        if self.reports.push(report).is_err() {
            log::warn!("circle: report buffer full, dropped={}", report.label());
        }
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureReport> {
        self.reports.iter()
    }

    pub fn as_slice(&self) -> &[GestureReport] {
        &self.reports
    }

    pub fn extend(&mut self, other: &ReportBuffer) {
        for report in other.iter() {
            self.push(*report);
        }
    }

    pub fn rotation(&self) -> Option<RotationSample> {
        self.iter().find_map(|report| match report {
            GestureReport::RotationChanged(sample) => Some(*sample),
            _ => None,
        })
    }

    pub fn contains_full_circle(&self) -> bool {
        self.iter()
            .any(|report| matches!(report, GestureReport::FullCircle { .. }))
    }

    pub fn contains_gesture_end(&self) -> bool {
        self.iter()
            .any(|report| matches!(report, GestureReport::GestureEnd))
    }
}

impl<'a> IntoIterator for &'a ReportBuffer {
    type Item = &'a GestureReport;
    type IntoIter = core::slice::Iter<'a, GestureReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum TrackerStateId {
    #[default]
    Idle = 0,
    Tracking = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReleaseVerdict {
    Accepted,
    OutsideBand,
    TooFewTurns,
    Erratic,
    Cancelled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackerSnapshot {
    pub state_id: TrackerStateId,
    pub previous_angle: f32,
    pub last_radius: f32,
    pub total_angle: f32,
    pub sample_count: u32,
    pub radius_mean: f32,
    pub radius_sum_sq_dev: f32,
    pub in_band: bool,
    pub velocity: f32,
    pub direction: Option<RotationDirection>,
    pub last_full_turn: u32,
}

impl TrackerSnapshot {
    pub fn turns(&self) -> f32 {
        self.total_angle / core::f32::consts::TAU
    }
}
