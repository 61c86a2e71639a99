use std::time::{Duration, Instant};

const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Frames-per-second readout for the status bar, smoothed once per second.
pub struct FrameCounter {
    frames: u32,
    window_start: Instant,
    fps: f32,
}

impl FrameCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            fps: 0.0,
        }
    }

    /// Count one frame. Returns `true` when the readout changed.
    pub fn frame(&mut self, now: Instant) -> bool {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < SAMPLE_INTERVAL {
            return false;
        }
        let sample = self.frames as f32 / elapsed.as_secs_f32();
        self.fps = (self.fps + 3.0 * sample) / 4.0;
        self.frames = 0;
        self.window_start = now;
        true
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooths_once_per_second() {
        let start = Instant::now();
        let mut counter = FrameCounter::new(start);
        for i in 1..60 {
            assert!(!counter.frame(start + Duration::from_millis(i * 16)));
        }
        assert!(counter.frame(start + Duration::from_secs(1)));
        assert!((counter.fps() - 45.0).abs() < 1e-3);

        for i in 1..=30 {
            counter.frame(start + Duration::from_secs(1) + Duration::from_millis(i * 33));
        }
        counter.frame(start + Duration::from_secs(2));
        // (45 + 3 * 31) / 4
        assert!((counter.fps() - 34.5).abs() < 1e-3);
    }
}
