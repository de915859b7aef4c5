//! Wake-cycle application for the sensor display node
//!
//! [`NodeApp`] runs one cycle per wake: build the display model from fetched
//! telemetry, ask the refresh controller whether the panel is out of date,
//! let the orchestrator redraw what changed, then choose a sleep mode.
//!
//! The `node-sim` binary drives the same application on the desktop against
//! a recording surface and a directory-backed store.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod config;
pub mod sleep;

pub use app::{CycleReport, NodeApp};
pub use config::{ConfigError, NodeConfig};
pub use sleep::choose_sleep_mode;
