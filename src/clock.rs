use std::time::Instant;

/// Monotonic source of elapsed seconds since the clock was created.
pub trait Clock {
    fn elapsed_since_start(&mut self) -> f32;
}

/// Wall clock started at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_since_start(&mut self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Deterministic clock that advances by a fixed step on every query.
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    step: f32,
    queries: u32,
}

impl SteppedClock {
    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(0.0),
            queries: 0,
        }
    }

    pub fn per_frame(frames_per_second: f32) -> Self {
        Self::new(1.0 / frames_per_second)
    }
}

impl Clock for SteppedClock {
    fn elapsed_since_start(&mut self) -> f32 {
        self.queries = self.queries.saturating_add(1);
        self.queries as f32 * self.step
    }
}
