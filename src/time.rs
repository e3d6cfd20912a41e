/// Fixed-timestep driver.
///
/// Wall-clock deltas pile up in an accumulator; each whole step in it runs the
/// simulation once. The accumulator is capped at `max_steps` steps so a stall
/// (breakpoint, suspended tab) can't trigger an unbounded catch-up.
#[derive(Debug, Clone)]
pub struct FixedTime {
    step: f64,
    max_steps: u32,
    accumulator: f64,
    tick_count: u64,
}

/// Default cap on steps per frame.
pub const MAX_STEPS_PER_FRAME: u32 = 5;

impl FixedTime {
    pub fn new(step: f64) -> Self {
        Self::with_max_steps(step, MAX_STEPS_PER_FRAME)
    }

    pub fn with_max_steps(step: f64, max_steps: u32) -> Self {
        Self {
            step,
            max_steps,
            accumulator: 0.0,
            tick_count: 0,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Total steps run since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Add `delta` seconds and run `update(step)` once per whole step.
    /// Returns how many steps ran.
    pub fn advance(&mut self, delta: f64, mut update: impl FnMut(f32)) -> u32 {
        self.accumulator += delta.max(0.0);

        let max_frame = self.step * self.max_steps as f64;
        if self.accumulator > max_frame {
            self.accumulator = max_frame;
        }

        let mut ran = 0;
        while self.accumulator >= self.step {
            update(self.step as f32);
            self.accumulator -= self.step;
            self.tick_count += 1;
            ran += 1;
        }
        ran
    }

    /// Interpolation alpha for rendering between steps.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step) as f32
    }

    /// Zero the accumulator, e.g. when resuming from pause.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
