use crate::constants::{FPS_KEEP, FPS_SAMPLE_WEIGHT, FPS_WINDOW_MS};

/// Frames-per-second estimate sampled over a fixed window and smoothed
/// exponentially between windows.
#[derive(Clone, Debug)]
pub struct FpsMeter {
    window_start_ms: Option<f64>,
    frames: u32,
    fps: f32,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsMeter {
    pub fn new() -> Self {
        Self {
            window_start_ms: None,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count one frame at `now_ms`. Returns the updated estimate when a
    /// sampling window closes.
    pub fn frame(&mut self, now_ms: f64) -> Option<f32> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames = self.frames.saturating_add(1);
        let elapsed = now_ms - start;
        if elapsed < FPS_WINDOW_MS {
            return None;
        }
        let sample = (self.frames as f64 * 1000.0 / elapsed) as f32;
        self.fps = if self.fps > 0.0 {
            self.fps * FPS_KEEP + sample * FPS_SAMPLE_WEIGHT
        } else {
            sample
        };
        self.frames = 0;
        self.window_start_ms = Some(now_ms);
        Some(self.fps)
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
