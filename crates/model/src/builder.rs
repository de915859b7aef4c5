//! Display Model construction
//!
//! Pure function of the telemetry record: no I/O, no rendering geometry.

use indexmap::IndexMap;
use platform::config::MAX_STALE_SECONDS;

use crate::battery::BatteryLevel;
use crate::compare::round1;
use crate::ephemeris::Ephemeris;
use crate::model::{DisplayModel, Measurements, MinMax, MinMaxTable, MoonInfo, NodeRecord, SunTimes};
use crate::staleness::stale_annotation;
use crate::telemetry::Telemetry;
use crate::timestamp::Timestamp;
use crate::value::Value;

/// Builder tuning
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Oldest node report that is still considered fresh
    pub stale_after_seconds: i64,
    /// `measurements_v2` devices that never reach the model
    pub excluded_channels: Vec<String>,
    /// Carry the wall-clock text. Off leaves `time_text` empty so minute
    /// ticks never differ between wakes.
    pub show_clock: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            stale_after_seconds: MAX_STALE_SECONDS,
            // Link quality jitters every fetch; battery has its own glyph.
            excluded_channels: vec!["wifi".to_owned(), "battery".to_owned()],
            show_clock: true,
        }
    }
}

/// Builds a [`DisplayModel`] per wake cycle
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    options: BuildOptions,
}

impl ModelBuilder {
    /// Create a builder
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build from a telemetry record, computing the ephemeris when both a
    /// local time and a location are known.
    pub fn build(&self, telemetry: &Telemetry) -> DisplayModel {
        let local = telemetry.local_time();
        let reference = telemetry.reference_time();
        let ephemeris = local
            .zip(telemetry.location)
            .and_then(|(local, location)| Ephemeris::compute(&local, &location));

        let empty = IndexMap::new();
        let nodes = telemetry.nodes.as_ref().unwrap_or(&empty);
        self.build_from_parts(nodes, reference.as_ref(), local.as_ref(), ephemeris.as_ref())
    }

    /// Build from already-separated inputs
    pub fn build_from_parts(
        &self,
        nodes: &IndexMap<String, Value>,
        reference: Option<&Timestamp>,
        local: Option<&Timestamp>,
        ephemeris: Option<&Ephemeris>,
    ) -> DisplayModel {
        let (sun, moon) = ephemeris.map(sun_and_moon).unwrap_or_default();
        let model = DisplayModel {
            date_text: local.map(Timestamp::nice_date).unwrap_or_default(),
            time_text: local
                .filter(|_| self.options.show_clock)
                .map(Timestamp::clock_text)
                .unwrap_or_default(),
            sun,
            moon,
            nodes: nodes
                .iter()
                .map(|(id, raw)| (id.clone(), self.node_record(id, raw, reference)))
                .collect(),
        };
        tracing::debug!(nodes = model.node_count(), time = %model.time_text, "model built");
        model
    }

    /// Normalise one raw node
    pub fn node_record(&self, id: &str, raw: &Value, reference: Option<&Timestamp>) -> NodeRecord {
        let measurements_v2 = raw.get("measurements_v2");

        NodeRecord {
            display_name: raw
                .get("display_name")
                .and_then(Value::as_str)
                .unwrap_or(id)
                .to_owned(),
            battery_level: measurements_v2
                .and_then(|m| m.get_path(&["battery", "battery_percentage"]))
                .and_then(Value::as_f64)
                .map(BatteryLevel::from_percentage),
            status: raw.get("status").map(failed_statuses).unwrap_or_default(),
            stale_state: stale_annotation(
                raw.get("timestamp_utc").and_then(Value::as_str),
                reference,
                self.options.stale_after_seconds,
            ),
            measurements: measurements_v2
                .map(|m| self.measurements(m))
                .unwrap_or_default(),
            measurements_min_max: raw
                .get("measurements_min_max")
                .map(min_max_table)
                .unwrap_or_default(),
            version: raw.get("version").and_then(Value::as_str).map(str::to_owned),
        }
    }

    fn measurements(&self, raw: &Value) -> Measurements {
        let Some(devices) = raw.as_map() else {
            return Measurements::new();
        };
        devices
            .iter()
            .filter(|(device, _)| !self.options.excluded_channels.iter().any(|c| c == *device))
            .filter_map(|(device, metrics)| {
                let metrics: IndexMap<String, f64> = metrics
                    .as_map()?
                    .iter()
                    .filter_map(|(name, v)| Some((name.clone(), rounded(v)?)))
                    .collect();
                Some((device.clone(), metrics))
            })
            .collect()
    }
}

fn sun_and_moon(eph: &Ephemeris) -> (SunTimes, MoonInfo) {
    let [rise, transit, set] = eph.sun.texts();
    let sun = SunTimes { rise, transit, set };
    let [rise, transit, set] = eph.moon.texts();
    let moon = MoonInfo {
        rise,
        transit,
        set,
        phase_name: eph.phase_name().to_owned(),
        phase_letter: Some(eph.phase_letter()),
    };
    (sun, moon)
}

/// Subsystem statuses other than `"ok"`
fn failed_statuses(raw: &Value) -> IndexMap<String, String> {
    let Some(entries) = raw.as_map() else {
        return IndexMap::new();
    };
    entries
        .iter()
        .filter_map(|(name, v)| {
            let text = match v {
                Value::String(s) => s.clone(),
                Value::Null => return None,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => serde_json::to_string(other).ok()?,
            };
            (text != "ok").then(|| (name.clone(), text))
        })
        .collect()
}

/// One-decimal reading; values whose rounding overflows to infinity are dropped.
fn rounded(raw: &Value) -> Option<f64> {
    raw.as_f64().map(round1).filter(|v| v.is_finite())
}

fn min_max_table(raw: &Value) -> MinMaxTable {
    let Some(devices) = raw.as_map() else {
        return MinMaxTable::new();
    };
    devices
        .iter()
        .filter_map(|(device, metrics)| {
            let metrics: IndexMap<String, MinMax> = metrics
                .as_map()?
                .iter()
                .filter_map(|(name, v)| {
                    let min = v.get("min").and_then(rounded)?;
                    let max = v.get("max").and_then(rounded)?;
                    Some((name.clone(), MinMax { min, max }))
                })
                .collect();
            Some((device.clone(), metrics))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(raw: serde_json::Value) -> NodeRecord {
        let reference = Timestamp::parse("2025-11-03T20:00:00").unwrap();
        ModelBuilder::default().node_record("garden-01", &Value::from(raw), Some(&reference))
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(node(json!({})).display_name, "garden-01");
        assert_eq!(node(json!({"display_name": "Garden"})).display_name, "Garden");
    }

    #[test]
    fn excludes_wifi_and_battery_channels() {
        let rec = node(json!({"measurements_v2": {
            "wifi": {"rssi": -70},
            "battery": {"battery_percentage": "87"},
            "bme680": {"temperature": "22.53", "humidity": 40.04}
        }}));
        assert_eq!(rec.measurements.keys().collect::<Vec<_>>(), ["bme680"]);
        assert_eq!(rec.measurements["bme680"]["temperature"], 22.5);
        assert_eq!(rec.measurements["bme680"]["humidity"], 40.0);
        assert_eq!(rec.battery_level.unwrap().get(), 7);
    }

    #[test]
    fn non_numeric_metrics_are_dropped() {
        let rec = node(json!({"measurements_v2": {"sht31d": {"temperature": "n/a", "humidity": 55}}}));
        assert_eq!(rec.measurements["sht31d"].len(), 1);
    }

    #[test]
    fn readings_that_round_to_infinity_are_dropped() {
        let rec = node(json!({
            "measurements_v2": {"bme680": {"temperature": 1.7e308, "pressure": "1012.84"}},
            "measurements_min_max": {"bme680": {"temperature": {"min": 1.0, "max": 1.7e308}}}
        }));
        assert_eq!(rec.measurements["bme680"].keys().collect::<Vec<_>>(), ["pressure"]);
        assert!(rec.measurements_min_max["bme680"].is_empty());

        let model = DisplayModel {
            nodes: [("garden-01".to_owned(), rec)].into_iter().collect(),
            ..DisplayModel::default()
        };
        let restored = DisplayModel::from_text(&model.to_text().unwrap()).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn copies_only_failed_statuses() {
        let rec = node(json!({"status": {"bme680": "ok", "sht31d": "i2c timeout", "retries": 3}}));
        assert_eq!(rec.status.len(), 2);
        assert_eq!(rec.status["sht31d"], "i2c timeout");
        assert_eq!(rec.status["retries"], "3");
    }

    #[test]
    fn min_max_is_rounded() {
        let rec = node(json!({"measurements_min_max": {"bme680": {"temperature": {"min": 12.34, "max": "25.66"}}}}));
        let mm = rec.measurements_min_max["bme680"]["temperature"];
        assert_eq!(mm.min, 12.3);
        assert_eq!(mm.max, 25.7);
    }

    #[test]
    fn stale_and_version() {
        let rec = node(json!({"timestamp_utc": "2025-11-03T19:00:00", "version": "a1b2c3d4e5"}));
        assert_eq!(rec.stale_state, "60ʼ old");
        assert_eq!(rec.version.as_deref(), Some("a1b2c3d4e5"));
    }

    #[test]
    fn hidden_clock_leaves_time_text_empty() {
        let options = BuildOptions {
            show_clock: false,
            ..BuildOptions::default()
        };
        let at = |local: &str| {
            let t = Telemetry::from_json(&format!(r#"{{"timestamp_local": "{local}", "nodes": {{}}}}"#));
            ModelBuilder::new(options.clone()).build(&t)
        };
        let first = at("2025-10-21T15:30:00");
        let later = at("2025-10-21T15:31:00");
        assert!(first.time_text.is_empty());
        assert_eq!(first.date_text, "Tuesday 21st October 2025");
        assert_eq!(first, later);
    }

    #[test]
    fn no_location_means_empty_ephemeris() {
        let t = Telemetry::from_json(r#"{"timestamp_local": "2025-10-21T15:30:00", "nodes": {}}"#);
        let m = ModelBuilder::default().build(&t);
        assert_eq!(m.time_text, "15:30");
        assert_eq!(m.date_text, "Tuesday 21st October 2025");
        assert!(m.sun.rise.is_empty());
        assert!(m.moon.phase_letter.is_none());
    }
}
