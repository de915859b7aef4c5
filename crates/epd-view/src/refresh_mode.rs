//! E-paper refresh modes and the ghosting ceiling
//!
//! A full refresh cycles every pixel through an inversion pass and clears
//! residual ink. A partial refresh only touches its window and leaves a
//! little ghosting behind, so after a bounded number of partial refreshes a
//! full one is forced.

use platform::config::MAX_PARTIAL_UPDATES;

/// How the panel was refreshed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Whole panel with inversion pass
    /// - Clears all ghosting
    /// - Use for: first draw, layout change, periodic cleanup
    #[default]
    Full,

    /// One window, no inversion pass
    /// - Accumulates ghosting
    /// - Use for: clock ticks, changed readings
    Partial,
}

impl RefreshMode {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            RefreshMode::Full => "full",
            RefreshMode::Partial => "partial",
        }
    }
}

/// Counts consecutive partial refreshes against a ceiling
#[derive(Debug, Clone)]
pub struct RefreshStrategy {
    /// Partial refreshes since the last full refresh
    partial_count: u8,

    /// Ceiling that forces the next refresh to be full
    full_refresh_threshold: u8,
}

impl RefreshStrategy {
    /// Strategy with the default ceiling
    pub fn new() -> Self {
        Self::with_threshold(MAX_PARTIAL_UPDATES)
    }

    /// Strategy with a custom ceiling (at least 1)
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            partial_count: 0,
            full_refresh_threshold: threshold.max(1),
        }
    }

    /// Partial refreshes since the last full refresh
    pub fn partial_count(&self) -> u8 {
        self.partial_count
    }

    /// Ceiling in use
    pub fn threshold(&self) -> u8 {
        self.full_refresh_threshold
    }

    /// The ceiling has been reached; the next refresh must be full.
    pub fn needs_full_refresh(&self) -> bool {
        self.partial_count >= self.full_refresh_threshold
    }

    /// Record a refresh.
    ///
    /// Returns true if the next refresh should be full.
    pub fn record_refresh(&mut self, mode: RefreshMode) -> bool {
        match mode {
            RefreshMode::Full => {
                self.reset();
                false
            }
            RefreshMode::Partial => {
                self.partial_count = self.partial_count.saturating_add(1);
                self.needs_full_refresh()
            }
        }
    }

    /// Forget all partial refreshes
    pub fn reset(&mut self) {
        self.partial_count = 0;
    }
}

impl Default for RefreshStrategy {
    fn default() -> Self {
        Self::new()
    }
}
