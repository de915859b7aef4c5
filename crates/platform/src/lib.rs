//! Hardware and service contracts for the sensor display node
//!
//! This crate provides trait-based abstractions for every collaborator the
//! display-refresh core talks to, enabling development and testing without
//! a panel, a flash filesystem or a sensor attached.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: wake cycle, sleep decision)
//!         ↓
//! Feature Layers (model, controller, epd-view)
//!         ↓
//! Platform contracts (this crate - trait abstractions)
//!         ↓
//! Panel driver / flash filesystem / sensor drivers
//! ```
//!
//! # Contracts
//!
//! - [`Storage`] - Byte-addressable persisted state (`exists` / `read` / `write`)
//! - [`EpdSurface`] - E-paper surface with full/partial window selection and page loop
//! - [`TextMetrics`] - Pixel width of text, used for zone sizing only
//! - [`LocalSensor`] - On-board sensor used when telemetry is unavailable
//! - [`power`] - Sleep modes chosen at the end of a wake cycle
//!
//! # Features
//!
//! - `std`: Export the [`mocks`] module for use by other crates' tests
//!
//! # Example
//!
//! ```no_run
//! use platform::{EpdSurface, Storage};
//!
//! fn persist<S: Storage>(store: &mut S, bytes: &[u8]) -> Result<(), S::Error> {
//!     store.write(platform::config::PERSISTED_MODEL_KEY, bytes)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)] // accessors, callers decide

pub mod config;
pub mod display;
pub mod power;
pub mod sensor;
pub mod storage;
pub mod storage_local;
pub mod text;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main high-level traits
pub use display::{DisplayError, EpdSurface};
pub use power::SleepMode;
pub use sensor::{LocalSensor, Reading};
pub use storage::{Storage, StorageError};
pub use text::{Font, TextMetrics};
