//! Host frame clock
//!
//! Turns the host's per-frame timestamps into a clamped delta and the
//! accumulated simulation time that timeline cues and replay checks read.

use crate::consts::MAX_FRAME_DELTA;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Host timestamp of the previous frame (ms)
    last_ms: Option<f64>,
    /// Simulation time, frozen while the run is over
    elapsed_ms: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame at `now_ms` and return the delta in seconds
    ///
    /// The first frame only establishes the time base. Stalls (tab switches,
    /// debugger pauses) are clamped so the world never jumps.
    pub fn advance(&mut self, now_ms: f64, running: bool) -> f32 {
        let delta = match self.last_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DELTA),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);

        if running {
            self.elapsed_ms += delta * 1000.0;
        }
        delta
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Restart simulation time, keeping the host time base
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }
}
