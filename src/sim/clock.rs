//! Fixed timestep accumulator
//!
//! Turns variable host frame times into a whole number of simulation ticks.

use crate::consts::MAX_SUBSTEPS;

#[derive(Debug, Clone)]
pub struct FrameClock {
    dt: f64,
    accumulator: f64,
    /// Longest frame time accepted before clamping (seconds)
    max_frame: f64,
}

impl FrameClock {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_frame: 0.1,
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Add elapsed host time and return how many ticks to run now
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed.min(self.max_frame);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS && self.accumulator >= self.dt {
            log::warn!(
                "Frame clock fell behind by {:.3}s, dropping backlog",
                self.accumulator
            );
            self.accumulator = 0.0;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
