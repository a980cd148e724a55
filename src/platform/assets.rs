//! Asset group loading progress
//!
//! A failed group still counts as finished; its sprites fall back to
//! placeholders at draw time.

/// Counts asset groups as they settle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTracker {
    loaded: u32,
    failed: u32,
    total: u32,
}

impl AssetTracker {
    pub fn new(total: u32) -> Self {
        Self {
            loaded: 0,
            failed: 0,
            total,
        }
    }

    /// Record a group that arrived. Returns true on the call that completes
    /// the set.
    pub fn mark_loaded(&mut self, name: &str) -> bool {
        let was_complete = self.is_complete();
        self.loaded += 1;
        log::info!("Asset loaded: {} ({}/{})", name, self.settled(), self.total);
        !was_complete && self.is_complete()
    }

    /// Record a group that could not be loaded
    pub fn mark_failed(&mut self, name: &str) -> bool {
        let was_complete = self.is_complete();
        self.failed += 1;
        log::warn!("Asset failed: {} ({}/{})", name, self.settled(), self.total);
        !was_complete && self.is_complete()
    }

    fn settled(&self) -> u32 {
        self.loaded + self.failed
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    /// Fraction settled in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.settled() as f32 / self.total as f32).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.settled() >= self.total
    }
}
