#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self { tick, dt_seconds }
    }

    /// Frame delta clamped to be non-negative.
    pub fn delta(&self) -> f32 {
        self.dt_seconds.max(0.0)
    }
}
