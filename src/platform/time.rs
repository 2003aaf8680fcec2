//! Frame pacing

use std::time::{Duration, Instant};

/// Schedules frame deadlines at a fixed period
///
/// There is no catch-up: a frame that runs late pushes the schedule back
/// instead of producing extra simulation steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    pub fn starting_at(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now + period,
        }
    }

    /// When the current frame should end
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Move to the next frame
    pub fn advance(&mut self) {
        self.advance_from(Instant::now());
    }

    pub fn advance_from(&mut self, now: Instant) {
        self.next += self.period;
        if self.next < now {
            log::debug!("Frame overran by {:?}, resyncing", now - self.next);
            self.next = now + self.period;
        }
    }
}
