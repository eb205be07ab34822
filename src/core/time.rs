//! Frame timing

use std::time::{Duration, Instant};

/// Wall-clock time tracker, updated once per frame
#[derive(Debug, Clone)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl Time {
    /// Start tracking time from now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance to the current instant
    pub fn update(&mut self) {
        self.advance_to(Instant::now());
    }

    /// Advance by a fixed amount instead of reading the clock
    #[cfg(test)]
    pub(crate) fn advance(&mut self, delta: Duration) {
        self.advance_to(self.last_frame + delta);
    }

    fn advance_to(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time since the previous frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time since the previous frame in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time since the tracker was created
    pub fn elapsed(&self) -> Duration {
        self.last_frame.saturating_duration_since(self.start)
    }

    /// Number of frames recorded so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
