//! On-board sensor abstraction
//!
//! The display node carries its own environmental sensor. Its readings are
//! only shown when fetched telemetry is unusable.

/// One reading from a local sensor
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Metric name, e.g. `temperature`
    pub name: String,
    /// Raw value
    pub value: f64,
    /// Unit suffix, e.g. `°C`
    pub unit: String,
}

impl Reading {
    /// Create a reading
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }
}

/// Local environmental sensor
pub trait LocalSensor {
    /// Name shown when the sensor is missing or failed, e.g. `BME680`
    fn label(&self) -> &str;

    /// Whether setup succeeded and readings can be trusted
    fn is_ok(&self) -> bool;

    /// Take a set of readings
    fn read(&mut self) -> Vec<Reading>;
}
