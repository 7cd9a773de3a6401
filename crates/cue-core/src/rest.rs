//! Per-tick motion scan that gates aiming.

/// Reports whether anything on the table is still moving.
///
/// With `settle_ticks == 1` a single quiet tick flips the table to at-rest.
/// Larger values require that many consecutive quiet ticks, which smooths
/// out flicker around the threshold.
#[derive(Debug, Clone)]
pub struct RestDetector {
    threshold: f32,
    settle_ticks: u32,
    quiet_ticks: u32,
    moving: bool,
}

impl RestDetector {
    pub fn new(threshold: f32, settle_ticks: u32) -> Self {
        Self {
            threshold,
            settle_ticks: settle_ticks.max(1),
            quiet_ticks: 0,
            moving: false,
        }
    }

    /// Feed one tick of ball speeds. Returns the new "in motion" flag.
    pub fn update(&mut self, speeds: impl IntoIterator<Item = f32>) -> bool {
        let any_fast = speeds.into_iter().any(|s| s > self.threshold);
        if any_fast {
            self.quiet_ticks = 0;
            self.moving = true;
        } else {
            self.quiet_ticks = self.quiet_ticks.saturating_add(1);
            if self.quiet_ticks >= self.settle_ticks {
                self.moving = false;
            }
        }
        self.moving
    }

    /// Force the moving flag, e.g. right after a shot before physics has stepped.
    pub fn mark_moving(&mut self) {
        self.quiet_ticks = 0;
        self.moving = true;
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn settle_ticks(&self) -> u32 {
        self.settle_ticks
    }
}
