//! Frame scheduling
//!
//! The browser (or a headless driver) calls in once per animation frame with
//! the elapsed wall time. [`FrameClock`] turns that into a whole number of
//! fixed ticks; [`LoopHandle`] lets anyone stop the loop from outside.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{MAX_FRAME_GAP, MAX_SUBSTEPS, TICK_RATE_HZ};

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICK_RATE_HZ, MAX_SUBSTEPS)
    }
}

impl FrameClock {
    pub fn new(tick_rate_hz: f32, max_substeps: u32) -> Self {
        Self {
            step: 1.0 / tick_rate_hz,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add `elapsed` seconds and return how many ticks are due
    ///
    /// Long stalls (tab in background) are clamped so the table does not
    /// fast-forward; time beyond `max_substeps` ticks is dropped.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_GAP)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Shared stop flag for a self-rescheduling frame loop
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl Default for LoopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopHandle {
    pub fn new() -> Self {
        Self {
            running: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Ask the loop not to schedule another frame
    pub fn stop(&self) {
        if self.running.replace(false) {
            log::info!("Frame loop stopping");
        }
    }
}
