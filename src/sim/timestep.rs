//! Fixed timestep accumulator
//!
//! Turns variable display-refresh deltas into a whole number of fixed
//! simulation steps, capping catch-up so a long stall cannot spiral.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, SIM_DT_MS};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step_ms: f32,
    max_substeps: u32,
    max_frame_ms: f32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT_MS, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(step_ms: f32, max_substeps: u32) -> Self {
        assert!(step_ms > 0.0, "timestep must be positive");
        assert!(max_substeps > 0, "need at least one substep");
        Self {
            step_ms,
            max_substeps,
            max_frame_ms: MAX_FRAME_MS.max(step_ms),
            accumulator: 0.0,
        }
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Feed one frame's elapsed time; returns how many fixed steps to run
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        self.accumulator += elapsed_ms.clamp(0.0, self.max_frame_ms);

        let mut steps = 0;
        while self.accumulator >= self.step_ms && steps < self.max_substeps {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        if steps == self.max_substeps {
            // Drop the backlog rather than carry it into the next frame
            self.accumulator = self.accumulator.min(self.step_ms);
        }
        steps
    }

    /// Fraction of a step left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step_ms
    }
}
