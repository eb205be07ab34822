//! Debug and statistics module

use std::collections::VecDeque;
use std::time::Duration;

/// Frame statistics tracker
#[derive(Debug)]
pub struct FrameStats {
    /// Frame time history for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    /// Current FPS
    fps: f32,
    /// Average frame time in milliseconds
    avg_frame_time_ms: f32,
    /// Minimum frame time in milliseconds
    min_frame_time_ms: f32,
    /// Maximum frame time in milliseconds
    max_frame_time_ms: f32,
    /// Total frames rendered
    total_frames: u64,
}

impl FrameStats {
    /// Create a new frame stats tracker
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            fps: 0.0,
            avg_frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
        }
    }

    /// Record a frame with the given delta time
    pub fn record_frame(&mut self, delta: Duration) {
        self.total_frames += 1;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);

        self.update_stats();
    }

    fn update_stats(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;

        for &dt in &self.frame_times {
            total += dt;
            min = min.min(dt);
            max = max.max(dt);
        }

        let count = self.frame_times.len() as f32;
        let total_secs = total.as_secs_f32();

        // Guard against division by zero
        if total_secs > 0.0 {
            self.avg_frame_time_ms = (total_secs / count) * 1000.0;
            self.fps = count / total_secs;
        } else {
            self.avg_frame_time_ms = 0.0;
            self.fps = 0.0;
        }

        self.min_frame_time_ms = min.as_secs_f32() * 1000.0;
        self.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    /// Get total frames rendered
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Get a formatted stats string
    pub fn format_stats(&self) -> String {
        format!(
            "FPS: {:.1} | Frame: {:.2}ms (min: {:.2}, max: {:.2})",
            self.fps, self.avg_frame_time_ms, self.min_frame_time_ms, self.max_frame_time_ms
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Debug state shared with the game: frame statistics and overlay toggle
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Whether the physics wireframe is drawn
    pub show_colliders: bool,
    /// Frame statistics
    pub frame_stats: FrameStats,
    /// Time accumulated since the last log summary
    since_report: Duration,
}

impl DebugInfo {
    /// Interval between frame statistics log lines
    const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    /// Create new debug info
    pub fn new() -> Self {
        Self {
            show_colliders: false,
            frame_stats: FrameStats::new(),
            since_report: Duration::ZERO,
        }
    }

    /// Toggle the physics wireframe
    pub fn toggle_colliders(&mut self) {
        self.show_colliders = !self.show_colliders;
    }

    /// Record a frame, returning a summary line once per report interval
    pub fn record_frame(&mut self, delta: Duration) -> Option<String> {
        self.frame_stats.record_frame(delta);
        self.since_report += delta;

        if self.since_report >= Self::REPORT_INTERVAL {
            self.since_report = Duration::ZERO;
            Some(self.frame_stats.format_stats())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_steady_frames() {
        let mut stats = FrameStats::new();
        for _ in 0..10 {
            stats.record_frame(Duration::from_millis(20));
        }
        assert!((stats.fps() - 50.0).abs() < 0.01);
        assert!((stats.avg_frame_time_ms() - 20.0).abs() < 0.01);
        assert_eq!(stats.total_frames(), 10);
    }

    #[test]
    fn test_zero_frame_time_has_zero_fps() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::ZERO);
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut stats = FrameStats::new();
        for _ in 0..500 {
            stats.record_frame(Duration::from_millis(1));
        }
        assert_eq!(stats.frame_times.len(), 120);
        assert_eq!(stats.total_frames(), 500);
    }

    #[test]
    fn test_report_once_per_second() {
        let mut debug = DebugInfo::new();
        let mut reports = 0;
        for _ in 0..100 {
            if debug.record_frame(Duration::from_millis(25)).is_some() {
                reports += 1;
            }
        }
        assert_eq!(reports, 2);
    }

    #[test]
    fn test_toggle_colliders() {
        let mut debug = DebugInfo::new();
        assert!(!debug.show_colliders);
        debug.toggle_colliders();
        assert!(debug.show_colliders);
    }
}
