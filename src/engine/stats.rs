use std::time::{Duration, Instant};

/// Frames are counted into a rolling wall-clock window; once the window
/// has run for at least a second the rate is published and the window
/// restarts.
const WINDOW: Duration = Duration::from_millis(1000);

/// Measured frames-per-second over the last closed 1-second window
#[derive(Debug)]
pub struct StatsCollector {
    frames: u32,
    window_start: Instant,
    fps: u32,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            frames: 0,
            window_start: Instant::now(),
            // Optimistic until the first window closes
            fps: 60,
        }
    }

    /// Record one rendered frame
    pub fn sample_frame(&mut self) {
        self.sample_frame_at(Instant::now());
    }

    fn sample_frame_at(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= WINDOW {
            self.fps = ((self.frames as f64 * 1000.0) / elapsed.as_millis() as f64).round() as u32;
            log::debug!("fps window closed: {} fps", self.fps);
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
