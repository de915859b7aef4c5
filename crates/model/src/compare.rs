//! Tolerant structural comparison
//!
//! Measurements are shown with one decimal place, so two floats are equal
//! when their one-decimal roundings differ by at most
//! [`MEASUREMENT_TOLERANCE`]. Every other scalar compares exactly.
//!
//! Mappings are equal when their key sets are identical and each pair of
//! members is equal; insertion order is ignored. Sequences need equal length
//! and pairwise equal members.
//!
//! ```
//! use model::{tolerant_eq, TolerantEq};
//! assert!(tolerant_eq(22.53, 22.6));
//! assert!(!tolerant_eq(22.5, 22.7));
//! assert!(Some(1.04).tolerant_eq(&Some(1.0)));
//! ```

use indexmap::IndexMap;
use platform::config::MEASUREMENT_TOLERANCE;

use crate::battery::BatteryLevel;
use crate::model::{DisplayModel, MinMax, MoonInfo, NodeRecord, SunTimes};
use crate::value::Value;

/// Round to one decimal place (half away from zero)
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Equality at displayed precision
pub fn tolerant_eq(a: f64, b: f64) -> bool {
    if a == b || (a.is_nan() && b.is_nan()) {
        return true;
    }
    (round1(a) - round1(b)).abs() <= MEASUREMENT_TOLERANCE
}

/// Structural equality with float tolerance
///
/// Implementations must be reflexive and symmetric. The relation is not
/// transitive.
pub trait TolerantEq {
    /// Whether `self` and `other` would look the same on the panel
    fn tolerant_eq(&self, other: &Self) -> bool;
}

impl TolerantEq for f64 {
    fn tolerant_eq(&self, other: &Self) -> bool {
        tolerant_eq(*self, *other)
    }
}

macro_rules! exact_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TolerantEq for $ty {
                fn tolerant_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

exact_eq!(bool, char, u8, i64, str, String, BatteryLevel);

impl<T: TolerantEq> TolerantEq for Option<T> {
    fn tolerant_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.tolerant_eq(b),
            _ => false,
        }
    }
}

impl<T: TolerantEq> TolerantEq for [T] {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.tolerant_eq(b))
    }
}

impl<T: TolerantEq> TolerantEq for Vec<T> {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.as_slice().tolerant_eq(other.as_slice())
    }
}

impl<V: TolerantEq> TolerantEq for IndexMap<String, V> {
    fn tolerant_eq(&self, other: &Self) -> bool {
        // Equal length plus every key of `self` present in `other` means
        // identical key sets.
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, a)| other.get(key).is_some_and(|b| a.tolerant_eq(b)))
    }
}

impl TolerantEq for Value {
    fn tolerant_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => tolerant_eq(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a.tolerant_eq(b),
            (Value::Map(a), Value::Map(b)) => a.tolerant_eq(b),
            _ => false,
        }
    }
}

impl TolerantEq for MinMax {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.min.tolerant_eq(&other.min) && self.max.tolerant_eq(&other.max)
    }
}

impl TolerantEq for SunTimes {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl TolerantEq for MoonInfo {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl TolerantEq for NodeRecord {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.display_name == other.display_name
            && self.battery_level == other.battery_level
            && self.status.tolerant_eq(&other.status)
            && self.stale_state == other.stale_state
            && self.measurements.tolerant_eq(&other.measurements)
            && self.measurements_min_max.tolerant_eq(&other.measurements_min_max)
            && self.version == other.version
    }
}

impl TolerantEq for DisplayModel {
    fn tolerant_eq(&self, other: &Self) -> bool {
        self.date_text == other.date_text
            && self.time_text == other.time_text
            && self.sun.tolerant_eq(&other.sun)
            && self.moon.tolerant_eq(&other.moon)
            && self.nodes.tolerant_eq(&other.nodes)
    }
}
