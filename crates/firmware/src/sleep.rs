//! End-of-cycle sleep decision

use platform::SleepMode;
use tracing::info;

use crate::config::NodeConfig;

/// Pick light or deep sleep for the end of a wake cycle.
///
/// Deep sleep is chosen when the render asked for it, when the config forces
/// it or disables light sleep, or when free heap is below the configured
/// threshold. An unknown heap size does not force deep sleep.
pub fn choose_sleep_mode(deep_sleep_needed: bool, config: &NodeConfig, free_heap: Option<usize>) -> SleepMode {
    let low_memory = free_heap.is_some_and(|free| free < config.low_memory_threshold_bytes);
    if low_memory {
        info!(free_heap = free_heap.unwrap_or_default(), "low memory, deep sleep forced");
    }

    if deep_sleep_needed || config.force_deep_sleep || !config.light_sleep_enabled || low_memory {
        SleepMode::Deep
    } else {
        SleepMode::Light
    }
}
