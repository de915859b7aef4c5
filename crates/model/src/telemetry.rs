//! Raw telemetry snapshot
//!
//! The backend returns one JSON record per fetch:
//!
//! ```json
//! {
//!   "timestamp_utc": "2025-11-03T19:00:00",
//!   "timestamp_local": "2025-11-03T20:00:00+01:00",
//!   "config": {"location": {"latitude": 52.1, "longitude": 5.1, "utc_offset_seconds": 3600}},
//!   "nodes": {"garden": {"display_name": "Garden", "measurements_v2": {...}}}
//! }
//! ```
//!
//! Only the top-level shape is checked here; per-node fields are read
//! leniently by the model builder.

use indexmap::IndexMap;

use crate::ephemeris::Location;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// One fetched telemetry record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    /// Trusted reference time for staleness, raw
    pub timestamp_utc: Option<String>,
    /// Local wall time for clock, date and ephemeris, raw
    pub timestamp_local: Option<String>,
    /// Observer location
    pub location: Option<Location>,
    /// Node id → raw node record. `None` marks invalid telemetry.
    pub nodes: Option<IndexMap<String, Value>>,
}

impl Telemetry {
    /// Pick the known fields out of a parsed record. Never fails; missing or
    /// mistyped fields become `None`.
    pub fn from_value(root: &Value) -> Self {
        let text = |key: &str| root.get(key).and_then(Value::as_str).map(str::to_owned);
        let location = root
            .get_path(&["config", "location"])
            .and_then(Location::from_value);
        let nodes = root.get("nodes").and_then(Value::as_map).cloned();
        if nodes.is_none() {
            let kind = root.get("nodes").map_or("missing", |v| v.kind());
            tracing::warn!(kind, "telemetry has no nodes mapping");
        }

        Self {
            timestamp_utc: text("timestamp_utc"),
            timestamp_local: text("timestamp_local"),
            location,
            nodes,
        }
    }

    /// Parse a JSON body. Malformed JSON yields invalid (empty) telemetry.
    pub fn from_json(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(root) => Self::from_value(&root),
            Err(err) => {
                tracing::warn!(%err, "telemetry is not valid JSON");
                Self::default()
            }
        }
    }

    /// Whether a well-formed `nodes` mapping is present
    pub fn is_valid(&self) -> bool {
        self.nodes.is_some()
    }

    /// Parsed `timestamp_utc`
    pub fn reference_time(&self) -> Option<Timestamp> {
        self.timestamp_utc
            .as_deref()
            .and_then(|raw| Timestamp::parse(raw).ok())
    }

    /// Parsed `timestamp_local`
    pub fn local_time(&self) -> Option<Timestamp> {
        self.timestamp_local
            .as_deref()
            .and_then(|raw| Timestamp::parse(raw).ok())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn reads_known_fields() {
        let t = Telemetry::from_json(
            r#"{"timestamp_utc": "2025-11-03T19:00:00",
                "timestamp_local": "2025-11-03T20:00:00+01:00",
                "config": {"location": {"latitude": 52.1, "longitude": "5.1", "utc_offset_seconds": 3600}},
                "nodes": {"b": {}, "a": {}}}"#,
        );
        assert!(t.is_valid());
        assert_eq!(t.location.unwrap().utc_offset_seconds, 3600);
        assert_eq!(t.local_time().unwrap().clock_text(), "20:00");
        let ids: Vec<&String> = t.nodes.as_ref().unwrap().keys().collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn nodes_must_be_a_mapping() {
        assert!(!Telemetry::from_json(r#"{"nodes": []}"#).is_valid());
        assert!(!Telemetry::from_json(r#"{"timestamp_utc": "2025-11-03T19:00:00"}"#).is_valid());
        assert!(!Telemetry::from_json("<html>502</html>").is_valid());
    }

    #[test]
    fn bad_timestamps_are_absent() {
        let t = Telemetry::from_json(r#"{"timestamp_utc": "never", "nodes": {}}"#);
        assert!(t.is_valid());
        assert!(t.reference_time().is_none());
        assert!(t.local_time().is_none());
    }
}
