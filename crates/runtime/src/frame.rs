/// Hz of the globe's render loop.
pub const TICK_RATE_HZ: f64 = 60.0;

/// One tick of the globe's render loop.
///
/// Mutations recompute derived state synchronously, so a tick only carries
/// a counter and the fixed step that drives dash animation on links.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub step_s: f64,
}

impl Frame {
    pub fn new(index: u64, step_s: f64) -> Self {
        Self { index, step_s }
    }

    /// Seconds since the first tick.
    pub fn elapsed_s(&self) -> f64 {
        self.index as f64 * self.step_s
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.step_s)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0, 1.0 / TICK_RATE_HZ)
    }
}
