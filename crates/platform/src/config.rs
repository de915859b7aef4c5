//! Node configuration constants
//!
//! Central defaults shared by the model builder, the refresh controller, the
//! partial-update orchestrator and the wake-cycle application. Runtime
//! configuration (`firmware::config::NodeConfig`) starts from these values.

/// A node report older than this (relative to the trusted reference clock)
/// gets a staleness annotation.
pub const MAX_STALE_SECONDS: i64 = 60 * 30;

/// Consecutive partial refreshes allowed before a full refresh is forced.
pub const MAX_PARTIAL_UPDATES: u8 = 10;

/// Two measurements are "the same on screen" when their one-decimal
/// renderings differ by at most this much.
pub const MEASUREMENT_TOLERANCE: f64 = 0.11;

/// Storage key of the last physically displayed model.
pub const PERSISTED_MODEL_KEY: &str = "/last-displayed.json";

/// Default wake interval for a display node on battery.
pub const SLEEP_SECONDS: u32 = 120;

/// Below this much free heap the node always deep-sleeps (RAM is lost, so is
/// the in-session partial-update baseline).
pub const LOW_MEMORY_THRESHOLD_BYTES: usize = 100_000;
