//! Frame timing

use std::time::{Duration, Instant};

/// Per-frame time tracking
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last: Instant,
    delta: Duration,
}

impl Time {
    /// Create a new time tracker
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            delta: Duration::ZERO,
        }
    }

    /// Advance to the current instant; call once at the top of each frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last;
        self.last = now;
    }

    /// Time elapsed between the last two updates
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds since the tracker was created
    pub fn elapsed_seconds(&self) -> f32 {
        self.last.duration_since(self.start).as_secs_f32()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-timestep accumulator for simulation updates decoupled from the
/// render rate
#[derive(Debug)]
pub struct FixedStep {
    step: f64,
    accumulator: f64,
    /// Cap on steps returned per frame to avoid a catch-up spiral
    max_steps: u32,
}

impl FixedStep {
    /// Create an accumulator stepping at the given frequency
    pub fn new(steps_per_second: f64) -> Self {
        Self {
            step: 1.0 / steps_per_second,
            accumulator: 0.0,
            max_steps: 8,
        }
    }

    /// Feed a frame's delta and return how many fixed steps to run
    pub fn tick(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta.as_secs_f64();
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        // Drop backlog beyond the cap rather than spiraling.
        if self.accumulator >= self.step {
            self.accumulator = self.accumulator % self.step;
        }
        steps
    }

    /// Length of one fixed step in seconds
    pub fn step_seconds(&self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_accumulates() {
        // Deltas chosen to stay clear of the 1/60 s boundary, since
        // Duration truncates sub-nanosecond fractions.
        let mut step = FixedStep::new(60.0);
        assert_eq!(step.tick(Duration::from_secs_f64(0.01)), 0);
        assert_eq!(step.tick(Duration::from_secs_f64(0.01)), 1);
    }

    #[test]
    fn test_fixed_step_caps_backlog() {
        let mut step = FixedStep::new(60.0);
        assert_eq!(step.tick(Duration::from_secs(5)), 8);
        // Backlog was dropped, a normal frame yields a normal step count.
        assert!(step.tick(Duration::from_secs_f64(1.0 / 60.0)) <= 1);
    }

    #[test]
    fn test_time_delta_advances() {
        let mut time = Time::new();
        std::thread::sleep(Duration::from_millis(5));
        time.update();
        assert!(time.delta_seconds() > 0.0);
        assert!(time.elapsed_seconds() >= time.delta_seconds());
    }
}
