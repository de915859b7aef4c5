//! View options

use platform::config::MAX_PARTIAL_UPDATES;

/// Display options of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Consecutive partial refreshes allowed before a full one is forced
    pub max_partial_updates: u8,
    /// Draw the `HH:MM` clock bottom-left; when off the clock zone is never dirty
    pub show_clock: bool,
    /// Add a `v:` line with the node firmware version under each column
    pub show_node_versions: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_partial_updates: MAX_PARTIAL_UPDATES,
            show_clock: true,
            show_node_versions: false,
        }
    }
}
