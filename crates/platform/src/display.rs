//! E-paper surface abstraction
//!
//! Mirrors the paged drawing model of monochrome e-paper panels: the caller
//! selects a window (full surface or a partial rectangle), then draws the
//! same content once per memory-bounded page until the driver reports that
//! the last page has been flushed to the panel.
//!
//! ```text
//! set_partial_window(r) → begin_page_loop() → [clear / draw_text…] → advance_page()? ─┐
//!                                  ↑                                                  │
//!                                  └──────────────── true (more pages) ───────────────┘
//! ```

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::text::Font;

/// E-paper surface driven by the partial-update orchestrator.
///
/// The orchestrator is the only caller of the window selection methods; no
/// other component may draw between `begin_page_loop` and the final
/// `advance_page` returning `false`.
pub trait EpdSurface {
    /// Error type for panel operations
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Visible width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Whole drawable surface as a rectangle
    fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(self.width(), self.height()))
    }

    /// Select the whole panel; the next page loop ends in a full refresh
    /// (inversion pass, clears ghosting).
    fn set_full_window(&mut self);

    /// Select a sub-rectangle; the next page loop ends in a partial refresh
    /// of that rectangle only.
    fn set_partial_window(&mut self, window: Rectangle);

    /// Start drawing the first page of the selected window.
    fn begin_page_loop(&mut self);

    /// Flush the current page. Returns `true` while more pages remain.
    fn advance_page(&mut self) -> Result<bool, Self::Error>;

    /// Blank the current page of the selected window to paper white.
    fn clear(&mut self);

    /// Draw `text` with its baseline starting at `origin` (surface coordinates).
    fn draw_text(&mut self, font: Font, origin: Point, text: &str);

    /// Put the panel controller into its lowest power state.
    fn hibernate(&mut self) -> Result<(), Self::Error>;
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    /// Communication error
    #[error("Display communication error")]
    Communication,
    /// Panel was hibernated and not re-initialised
    #[error("Display is hibernating")]
    Hibernating,
}
