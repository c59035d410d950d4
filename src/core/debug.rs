//! Frame statistics for the debug overlay

use std::collections::VecDeque;
use std::time::Duration;

/// Rolling frame-time statistics
#[derive(Debug)]
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    fps: f32,
    avg_frame_time_ms: f32,
    min_frame_time_ms: f32,
    max_frame_time_ms: f32,
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

        let total: Duration = self.frame_times.iter().sum();
        let count = self.frame_times.len() as f32;
        let total_secs = total.as_secs_f32();
        if total_secs > 0.0 {
            self.avg_frame_time_ms = (total_secs / count) * 1000.0;
            self.fps = count / total_secs;
        }

        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        for &time in &self.frame_times {
            min = min.min(time);
            max = max.max(time);
        }
        self.min_frame_time_ms = min.as_secs_f32() * 1000.0;
        self.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    /// Current FPS over the sample window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    /// Shortest frame in the window, milliseconds
    pub fn min_frame_time_ms(&self) -> f32 {
        self.min_frame_time_ms
    }

    /// Longest frame in the window, milliseconds
    pub fn max_frame_time_ms(&self) -> f32 {
        self.max_frame_time_ms
    }

    /// Total frames recorded
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// State backing the debug overlay panel
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Whether the overlay is drawn
    pub enabled: bool,
    /// Frame statistics
    pub frame_stats: FrameStats,
    /// Extra lines the application wants shown
    custom_lines: Vec<String>,
}

impl DebugInfo {
    /// Create new debug info with the overlay enabled
    pub fn new() -> Self {
        Self {
            enabled: true,
            frame_stats: FrameStats::new(),
            custom_lines: Vec::new(),
        }
    }

    /// Toggle the overlay
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Add a custom overlay line for this frame
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.custom_lines.push(line.into());
    }

    /// Lines added since the last clear
    pub fn custom_lines(&self) -> &[String] {
        &self.custom_lines
    }

    /// Clear the per-frame custom lines
    pub fn clear_lines(&mut self) {
        self.custom_lines.clear();
    }

    /// Record a frame
    pub fn record_frame(&mut self, delta: Duration) {
        self.frame_stats.record_frame(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_reflect_recorded_frames() {
        let mut stats = FrameStats::new();
        for _ in 0..10 {
            stats.record_frame(Duration::from_millis(10));
        }

        assert_eq!(stats.total_frames(), 10);
        assert!((stats.avg_frame_time_ms() - 10.0).abs() < 0.5);
        assert!((stats.fps() - 100.0).abs() < 5.0);
    }

    #[test]
    fn test_min_max_track_extremes() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(10));
        stats.record_frame(Duration::from_millis(30));
        stats.record_frame(Duration::from_millis(20));

        assert!((stats.min_frame_time_ms() - 10.0).abs() < 0.01);
        assert!((stats.max_frame_time_ms() - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut stats = FrameStats::new();
        for _ in 0..500 {
            stats.record_frame(Duration::from_millis(16));
        }
        assert_eq!(stats.total_frames(), 500);
        assert!(stats.frame_times.len() <= stats.max_samples);
    }
}
