//! Partial-update orchestrator for the sensor display node
//!
//! Within one powered-on session the orchestrator keeps the last drawn
//! [`model::DisplayModel`] in memory and redraws only the zones whose content
//! changed, through partial windows. A full refresh is forced on the first
//! render, on invalid telemetry, when the node count changes the column
//! layout, when nothing is dirty, and after a bounded number of partial
//! refreshes to clear ghosting.
//!
//! # Example
//!
//! ```
//! use epd_view::{EpdView, RefreshMode, ViewConfig};
//! use model::DisplayModel;
//! use platform::mocks::{FixedWidthText, RecordingSurface};
//!
//! let mut view = EpdView::new(RecordingSurface::new(800, 480), FixedWidthText, ViewConfig::default());
//! let model = DisplayModel { time_text: "20:00".into(), ..DisplayModel::default() };
//! assert_eq!(view.render(&model, true).refresh, Some(RefreshMode::Full));
//!
//! let next = DisplayModel { time_text: "20:01".into(), ..model };
//! assert_eq!(view.render(&next, true).refresh, Some(RefreshMode::Partial));
//! ```

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

pub mod config;
pub mod layout;
pub mod refresh_mode;
pub mod view;
pub mod window;
pub mod zone;

pub use config::ViewConfig;
pub use refresh_mode::{RefreshMode, RefreshStrategy};
pub use view::{EpdView, FullReason, RenderOutcome, ViewState};
pub use zone::{Geometry, ZoneId, ZONES};
