use instant::Instant;

/// Monotonic clock for the render loop.
pub struct FrameClock {
    start: Instant,
    previous_elapsed: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            previous_elapsed: 0.0,
        }
    }

    /// Seconds since start and since the previous tick.
    pub fn tick(&mut self) -> (f32, f32) {
        let elapsed = self.start.elapsed().as_secs_f32();
        let delta = (elapsed - self.previous_elapsed).max(0.0);
        self.previous_elapsed = elapsed;
        (elapsed, delta)
    }
}
