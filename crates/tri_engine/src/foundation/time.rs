//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer for the main loop
///
/// Counts presented frames and accumulates wall-clock time between them so the
/// engine can report statistics on shutdown.
pub struct Timer {
    started: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Mark the end of a frame (should be called once per presented frame)
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Duration of the last completed frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time elapsed since the timer was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since the timer was created
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        let seconds = self.elapsed().as_secs_f32();
        if seconds > 0.0 {
            self.frame_count as f32 / seconds
        } else {
            0.0
        }
    }
}
