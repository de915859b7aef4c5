//! Property-based tests for the tolerant comparator and battery bucketing.
// Integration test file: unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use indexmap::IndexMap;
use model::{round1, tolerant_eq, BatteryLevel, DisplayModel, NodeRecord, TolerantEq};
use proptest::prelude::*;

fn node_strategy() -> impl Strategy<Value = NodeRecord> {
    (
        "[A-Za-z ]{0,12}",
        proptest::option::of(0.0f64..=100.0),
        proptest::collection::vec(("[a-z]{1,8}", -50.0f64..1100.0), 0..4),
        "[a-z ]{0,6}",
    )
        .prop_map(|(name, battery, metrics, stale)| {
            let mut node = NodeRecord {
                display_name: name,
                battery_level: battery.map(BatteryLevel::from_percentage),
                stale_state: stale,
                ..NodeRecord::default()
            };
            let device: IndexMap<String, f64> =
                metrics.into_iter().map(|(k, v)| (k, round1(v))).collect();
            node.measurements.insert("bme680".to_owned(), device);
            node
        })
}

fn model_strategy() -> impl Strategy<Value = DisplayModel> {
    (
        "[0-2][0-9]:[0-5][0-9]",
        "[A-Za-z ]{0,20}",
        proptest::collection::vec(("[a-z0-9-]{1,10}", node_strategy()), 0..4),
    )
        .prop_map(|(time_text, date_text, nodes)| DisplayModel {
            time_text,
            date_text,
            nodes: nodes.into_iter().collect(),
            ..DisplayModel::default()
        })
}

proptest! {
    /// Every model equals itself.
    #[test]
    fn comparison_is_reflexive(m in model_strategy()) {
        prop_assert!(m.tolerant_eq(&m));
    }

    /// Argument order never matters.
    #[test]
    fn comparison_is_symmetric(a in model_strategy(), b in model_strategy()) {
        prop_assert_eq!(a.tolerant_eq(&b), b.tolerant_eq(&a));
    }

    /// Floats: reflexive and symmetric for any input, NaN included.
    #[test]
    fn float_comparison_is_reflexive_and_symmetric(a in any::<f64>(), b in any::<f64>()) {
        prop_assert!(tolerant_eq(a, a));
        prop_assert_eq!(tolerant_eq(a, b), tolerant_eq(b, a));
    }

    /// One display step apart compares equal, two steps apart does not.
    #[test]
    fn tolerance_boundary(tenths in -5000i32..20000) {
        let a = f64::from(tenths) / 10.0;
        let one_step = f64::from(tenths + 1) / 10.0;
        let two_steps = f64::from(tenths + 2) / 10.0;
        prop_assert!(tolerant_eq(a, one_step));
        prop_assert!(!tolerant_eq(a, two_steps));
    }

    /// Sub-display jitter on a measurement never makes models unequal.
    #[test]
    fn jitter_below_display_precision_is_invisible(
        m in model_strategy(),
        jitter in -0.04f64..0.04,
    ) {
        let mut jittered = m.clone();
        for node in jittered.nodes.values_mut() {
            for metrics in node.measurements.values_mut() {
                for v in metrics.values_mut() {
                    *v += jitter;
                }
            }
        }
        prop_assert!(m.tolerant_eq(&jittered));
    }

    /// Battery levels always land in 0..=8 and never decrease with charge.
    #[test]
    fn battery_level_is_bounded_and_monotone(a in -50.0f64..150.0, b in -50.0f64..150.0) {
        let (la, lb) = (BatteryLevel::from_percentage(a), BatteryLevel::from_percentage(b));
        prop_assert!(la.get() <= 8 && lb.get() <= 8);
        if a <= b {
            prop_assert!(la <= lb);
        }
    }

    /// Text form restores an equal model.
    #[test]
    fn text_form_restores_model(m in model_strategy()) {
        let text = m.to_text().unwrap();
        let back = DisplayModel::from_text(&text).unwrap();
        prop_assert!(back.tolerant_eq(&m));
    }
}
