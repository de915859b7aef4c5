//! Display Model types
//!
//! Everything the panel can show, in semantic (not pixel) form. Empty strings
//! mean "unknown"; no field is ever null.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::battery::BatteryLevel;

/// Device name → metric name → value
pub type Measurements = IndexMap<String, IndexMap<String, f64>>;

/// Device name → metric name → rolling extrema
pub type MinMaxTable = IndexMap<String, IndexMap<String, MinMax>>;

/// Snapshot of the whole display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayModel {
    /// Calendar date, e.g. `Tuesday 21st October 2025`
    pub date_text: String,
    /// Clock, `HH:MM`
    pub time_text: String,
    /// Sun events
    pub sun: SunTimes,
    /// Moon events and phase
    pub moon: MoonInfo,
    /// Per-node records, in discovery order
    pub nodes: IndexMap<String, NodeRecord>,
}

impl DisplayModel {
    /// Number of node columns; determines the grid layout.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Sun rise/transit/set texts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunTimes {
    #[allow(missing_docs)]
    pub rise: String,
    #[allow(missing_docs)]
    pub transit: String,
    #[allow(missing_docs)]
    pub set: String,
}

/// Moon rise/transit/set texts plus phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonInfo {
    #[allow(missing_docs)]
    pub rise: String,
    #[allow(missing_docs)]
    pub transit: String,
    #[allow(missing_docs)]
    pub set: String,
    /// e.g. `Waxing Gibbous`
    pub phase_name: String,
    /// Moon-phase font glyph: `'0'` or `'A'..='Z'`
    pub phase_letter: Option<char>,
}

/// One telemetry-reporting node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    /// Header text; the node id when the node sends no name
    pub display_name: String,
    /// Battery glyph level, absent for mains-powered nodes
    pub battery_level: Option<BatteryLevel>,
    /// Non-"ok" subsystem statuses, subsystem → error text
    pub status: IndexMap<String, String>,
    /// Staleness annotation; empty when fresh
    pub stale_state: String,
    /// Values rounded to one decimal place
    pub measurements: Measurements,
    /// Rounded extrema; empty when the node reports none
    pub measurements_min_max: MinMaxTable,
    /// Firmware version the node reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Rolling extrema of a metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    #[allow(missing_docs)]
    pub min: f64,
    #[allow(missing_docs)]
    pub max: f64,
}
