//! Display Model for the sensor display node
//!
//! A [`DisplayModel`] is a normalised, semantic snapshot of everything that
//! can appear on the e-paper panel: clock, calendar date, sun/moon ephemeris
//! and one [`NodeRecord`] per telemetry-reporting node. It is rebuilt from
//! scratch on every wake cycle.
//!
//! # Pipeline
//!
//! ```text
//! telemetry JSON ──► Value ──► Telemetry ──► ModelBuilder ──► DisplayModel
//!                                   │              ▲
//!                                   └─► Ephemeris ─┘
//! ```
//!
//! Two models are compared with [`TolerantEq`], which treats measurements as
//! equal at the displayed precision (one decimal place) so sensor jitter
//! never causes a redraw.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)] // exact equality short-circuits the tolerant path

pub mod battery;
pub mod builder;
pub mod codec;
pub mod compare;
pub mod ephemeris;
pub mod model;
pub mod staleness;
pub mod telemetry;
pub mod timestamp;
pub mod value;

pub use battery::BatteryLevel;
pub use builder::{BuildOptions, ModelBuilder};
pub use codec::CodecError;
pub use compare::{round1, tolerant_eq, TolerantEq};
pub use ephemeris::{Ephemeris, Location};
pub use model::{DisplayModel, MinMax, MoonInfo, NodeRecord, SunTimes};
pub use staleness::stale_annotation;
pub use telemetry::Telemetry;
pub use timestamp::{Timestamp, TimestampError};
pub use value::Value;
