//! Node data staleness annotations
//!
//! A node's report is compared against the trusted reference timestamp of
//! the telemetry snapshot. Fresh data gets an empty annotation.
//!
//! | Situation                               | Annotation            |
//! |-----------------------------------------|-----------------------|
//! | no trusted reference time               | `(No reference time)` |
//! | node has no timestamp                   | empty                 |
//! | node timestamp unparsable               | `(TS:<raw>)`          |
//! | node timestamp in the future            | `Time travel <s>"!`   |
//! | node older than the threshold           | `<min>ʼ old`          |

use crate::timestamp::Timestamp;

/// Annotation for a node report taken at `node_timestamp`
///
/// `threshold_seconds` is the maximum age that still counts as fresh; a node
/// exactly at the threshold is fresh.
pub fn stale_annotation(
    node_timestamp: Option<&str>,
    reference: Option<&Timestamp>,
    threshold_seconds: i64,
) -> String {
    let Some(reference) = reference else {
        return "(No reference time)".to_owned();
    };
    let Some(raw) = node_timestamp else {
        return String::new();
    };

    let node = match Timestamp::parse(raw) {
        Ok(ts) => ts,
        Err(err) => {
            tracing::warn!(%err, "bad node timestamp");
            return format!("(TS:{raw})");
        }
    };

    let age = reference.seconds_since(&node);
    if age < 0 {
        format!("Time travel {}\"!", -age)
    } else if age > threshold_seconds {
        #[allow(clippy::cast_precision_loss)]
        let minutes = age as f64 / 60.0;
        format!("{minutes:.0}ʼ old")
    } else {
        String::new()
    }
}
