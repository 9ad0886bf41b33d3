use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, TrySendError},
};
use heapless::Deque;

use crate::types::{GestureReport, ReportBuffer, RotationDirection};

pub const REPORT_CHANNEL_DEPTH: usize = 16;
const REPORT_BACKLOG_DEPTH: usize = 64;

/// Ordered hand-off from the tracking thread to the consumer thread.
pub type ReportChannel = Channel<CriticalSectionRawMutex, GestureReport, REPORT_CHANNEL_DEPTH>;

/// Consumer-side callbacks. Every method defaults to doing nothing.
pub trait GestureListener {
    fn on_gesture_start(&mut self) {}

    fn on_rotation_changed(
        &mut self,
        _turns: f32,
        _direction: RotationDirection,
        _speed_multiplier: f32,
    ) {
    }

    fn on_full_circle(&mut self, _turns: f32, _direction: RotationDirection) {}

    fn on_pinch_changed(&mut self, _scale: f32) {}

    fn on_gesture_end(&mut self) {}
}

impl GestureReport {
    pub fn deliver<L: GestureListener + ?Sized>(&self, listener: &mut L) {
        match *self {
            GestureReport::GestureStart => listener.on_gesture_start(),
            GestureReport::RotationChanged(sample) => listener.on_rotation_changed(
                sample.turns,
                sample.direction,
                sample.speed_multiplier,
            ),
            GestureReport::FullCircle { turns, direction } => {
                listener.on_full_circle(turns, direction)
            }
            GestureReport::PinchChanged { scale } => listener.on_pinch_changed(scale),
            GestureReport::GestureEnd => listener.on_gesture_end(),
        }
    }
}

impl ReportBuffer {
    pub fn dispatch<L: GestureListener + ?Sized>(&self, listener: &mut L) {
        for report in self.iter() {
            report.deliver(listener);
        }
    }
}

/// Producer half of a [`ReportChannel`]. Never blocks: reports that do not
/// fit are held in order and retried on the next publish or flush.
pub struct ReportPublisher<'a> {
    channel: &'a ReportChannel,
    backlog: Deque<GestureReport, REPORT_BACKLOG_DEPTH>,
    coalesced: u32,
}

impl<'a> ReportPublisher<'a> {
    pub fn new(channel: &'a ReportChannel) -> Self {
        Self {
            channel,
            backlog: Deque::new(),
            coalesced: 0,
        }
    }

    pub fn publish(&mut self, reports: &ReportBuffer) {
        self.flush();
        for report in reports {
            if self.backlog.is_empty() {
                match self.channel.try_send(*report) {
                    Ok(()) => continue,
                    Err(TrySendError::Full(report)) => self.enqueue(report),
                }
            } else {
                self.enqueue(*report);
            }
        }
    }

    /// Moves held reports into the channel. Returns how many are still held.
    pub fn flush(&mut self) -> usize {
        while let Some(report) = self.backlog.front().copied() {
            if self.channel.try_send(report).is_err() {
                break;
            }
            let _ = self.backlog.pop_front();
        }
        self.backlog.len()
    }

    pub fn pending(&self) -> usize {
        self.backlog.len()
    }

    /// Rotation reports dropped to make room for newer ones.
    pub fn coalesced(&self) -> u32 {
        self.coalesced
    }

    fn enqueue(&mut self, report: GestureReport) {
        if self.backlog.is_full() && !self.coalesce_oldest_rotation() {
            if !report.is_terminal() {
                self.coalesced = self.coalesced.saturating_add(1);
                return;
            }
            if let Some(dropped) = self.backlog.pop_front() {
                log::error!(
                    "circle: report backlog full, dropped={}",
                    dropped.label()
                );
            }
        }
        if self.backlog.push_back(report).is_err() {
            log::error!("circle: report backlog full, dropped={}", report.label());
        }
    }

    fn coalesce_oldest_rotation(&mut self) -> bool {
        let Some(index) = self
            .backlog
            .iter()
            .position(|report| !report.is_terminal())
        else {
            return false;
        };

        let mut kept = Deque::new();
        for (position, report) in self.backlog.iter().enumerate() {
            if position != index {
                let _ = kept.push_back(*report);
            }
        }
        self.backlog = kept;
        self.coalesced = self.coalesced.saturating_add(1);
        log::debug!("circle: coalesced rotation report backlog={}", self.backlog.len());
        true
    }
}
