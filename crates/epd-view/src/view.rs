//! Partial-update orchestrator
//!
//! `EpdView` exclusively owns the e-paper surface for a powered-on session.
//! Each `render` call compares the new model against the in-memory baseline
//! and either redraws the whole panel or opens one partial window per dirty
//! zone.
//!
//! ```text
//!                  first render / invalid telemetry
//! Uninitialized ─────────────────────────────────────→ FullRendered
//!
//!                  node count changed │ ceiling reached │ nothing dirty
//! FullRendered / PartialActive ──────────────────────────────→ FullRendered
//!
//!                  ≥ 1 dirty zone
//! FullRendered / PartialActive ──────────────────────────────→ PartialActive
//!
//! any ── reset() ──→ Uninitialized      (RAM lost in deep sleep)
//! any ── teardown() ──→ TornDown (terminal)
//! ```
//!
//! Panel errors never leave this module. A failed page flush is logged and
//! reported in [`RenderOutcome::panel_fault`]; the next full render (forced
//! by the ghosting ceiling or a layout change) is the recovery path.

use model::DisplayModel;
use platform::{EpdSurface, LocalSensor, TextMetrics};
use tracing::{debug, info, warn};

use crate::config::ViewConfig;
use crate::layout::{self, Layout};
use crate::refresh_mode::{RefreshMode, RefreshStrategy};
use crate::window::panel_window;
use crate::zone::{Geometry, ZoneId, ZONES};

/// Upper bound on pages per loop; a driver that never reports the last page
/// is treated as faulty.
pub const MAX_PAGES: usize = 64;

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing drawn this session
    Uninitialized,
    /// Last refresh was full
    FullRendered,
    /// At least one partial refresh since the last full one
    PartialActive,
    /// Panel hibernated; further renders are ignored
    TornDown,
}

/// Why a full refresh was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullReason {
    /// No baseline yet this session
    FirstRender,
    /// Telemetry unusable, local-sensor screen drawn
    InvalidTelemetry,
    /// Node count changed, column widths moved
    LayoutChanged,
    /// Partial refresh ceiling reached
    GhostingCeiling,
    /// Asked to render but no zone changed
    NothingDirty,
}

/// What one `render` call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Refresh issued, `None` after teardown
    pub refresh: Option<RefreshMode>,
    /// Set for full refreshes
    pub full_reason: Option<FullReason>,
    /// Some displayed content changed
    pub updated: bool,
    /// Zones redrawn through partial windows, in priority order
    pub zones: Vec<ZoneId>,
    /// The caller should deep-sleep instead of light-sleeping
    pub deep_sleep_needed: bool,
    /// A page flush failed; the panel may not show the model
    pub panel_fault: bool,
}

/// Page loop failure
#[derive(Debug, thiserror::Error)]
enum RenderError<E: core::fmt::Debug + core::fmt::Display> {
    #[error("flushing page {page} failed: {cause}")]
    Flush { page: usize, cause: E },
    #[error("driver still reported pages after {0}")]
    Runaway(usize),
}

/// E-paper partial-update orchestrator
pub struct EpdView<D: EpdSurface, T: TextMetrics> {
    surface: D,
    metrics: T,
    config: ViewConfig,
    sensor: Option<Box<dyn LocalSensor>>,
    previous: Option<DisplayModel>,
    strategy: RefreshStrategy,
    state: ViewState,
}

impl<D: EpdSurface, T: TextMetrics> EpdView<D, T> {
    /// Take ownership of `surface` for the session.
    pub fn new(surface: D, metrics: T, config: ViewConfig) -> Self {
        let strategy = RefreshStrategy::with_threshold(config.max_partial_updates);
        Self {
            surface,
            metrics,
            config,
            sensor: None,
            previous: None,
            strategy,
            state: ViewState::Uninitialized,
        }
    }

    /// Use `sensor` for the invalid-telemetry screen.
    #[must_use]
    pub fn with_local_sensor(mut self, sensor: impl LocalSensor + 'static) -> Self {
        self.sensor = Some(Box::new(sensor));
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Partial refreshes since the last full refresh
    pub fn partial_update_count(&self) -> u8 {
        self.strategy.partial_count()
    }

    /// Model currently on the panel, as far as this session knows
    pub fn previous(&self) -> Option<&DisplayModel> {
        self.previous.as_ref()
    }

    /// Borrow the surface
    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// Mutably borrow the surface (between renders only)
    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// Give the surface back
    pub fn into_surface(self) -> D {
        self.surface
    }

    fn geometry(&self) -> Geometry {
        Geometry::new(self.surface.width(), self.surface.height())
    }

    /// Bring the panel up to date with `model`.
    ///
    /// `telemetry_valid == false` draws the local-sensor screen instead of
    /// the model and asks the caller to deep-sleep.
    pub fn render(&mut self, model: &DisplayModel, telemetry_valid: bool) -> RenderOutcome {
        if self.state == ViewState::TornDown {
            warn!("render after teardown ignored");
            return RenderOutcome::default();
        }

        if let Some(reason) = self.full_reason(model, telemetry_valid) {
            return self.full_render(model, telemetry_valid, reason);
        }

        self.partial_render(model)
    }

    /// Forget the session baseline, as after a deep sleep.
    ///
    /// The next render is a full one. Has no effect after teardown.
    pub fn reset(&mut self) {
        if self.state == ViewState::TornDown {
            return;
        }
        self.previous = None;
        self.strategy.reset();
        self.state = ViewState::Uninitialized;
        debug!("session baseline dropped");
    }

    /// Hibernate the panel. Only the first call reaches the hardware.
    ///
    /// Returns true if the panel was hibernated by this call.
    pub fn teardown(&mut self) -> bool {
        if self.state == ViewState::TornDown {
            return false;
        }
        self.state = ViewState::TornDown;
        match self.surface.hibernate() {
            Ok(()) => {
                info!("panel hibernated");
                true
            }
            Err(e) => {
                warn!(error = %e, "hibernate failed");
                false
            }
        }
    }

    fn full_reason(&self, model: &DisplayModel, telemetry_valid: bool) -> Option<FullReason> {
        if !telemetry_valid {
            return Some(FullReason::InvalidTelemetry);
        }
        let Some(previous) = &self.previous else {
            return Some(FullReason::FirstRender);
        };
        if previous.node_count() != model.node_count() {
            return Some(FullReason::LayoutChanged);
        }
        if self.strategy.needs_full_refresh() {
            return Some(FullReason::GhostingCeiling);
        }
        None
    }

    fn full_render(&mut self, model: &DisplayModel, telemetry_valid: bool, reason: FullReason) -> RenderOutcome {
        info!(
            reason = ?reason,
            partials = self.strategy.partial_count(),
            nodes = model.node_count(),
            "full refresh"
        );

        let geom = self.geometry();
        let lines = if telemetry_valid {
            Vec::new()
        } else {
            layout::fallback_lines(self.sensor.as_deref_mut())
        };

        let Self {
            surface,
            metrics,
            config,
            ..
        } = &mut *self;
        let layout = Layout {
            geom,
            metrics: &*metrics,
            config: &*config,
        };

        surface.set_full_window();
        let result = run_pages(surface, |s| {
            if telemetry_valid {
                layout::draw_full(s, &layout, model);
            } else {
                layout::draw_fallback(s, &lines);
            }
        });
        let panel_fault = log_fault(result, "full");

        self.strategy.record_refresh(RefreshMode::Full);
        self.previous = Some(model.clone());
        self.state = ViewState::FullRendered;

        RenderOutcome {
            refresh: Some(RefreshMode::Full),
            full_reason: Some(reason),
            updated: reason != FullReason::NothingDirty,
            zones: Vec::new(),
            deep_sleep_needed: !telemetry_valid,
            panel_fault,
        }
    }

    fn partial_render(&mut self, model: &DisplayModel) -> RenderOutcome {
        let Some(previous) = self.previous.take() else {
            return self.full_render(model, true, FullReason::FirstRender);
        };

        let geom = self.geometry();
        let bounds = geom.bounds();
        let mut zones = Vec::new();
        let mut panel_fault = false;

        {
            let Self {
                surface,
                metrics,
                config,
                ..
            } = &mut *self;
            let layout = Layout {
                geom,
                metrics: &*metrics,
                config: &*config,
            };

            for zone in &ZONES {
                if zone.id == ZoneId::Clock && !layout.config.show_clock {
                    continue;
                }
                if !(zone.changed)(&previous, model) {
                    continue;
                }
                let rect = (zone.rect)(&geom, model, layout.metrics);
                let Some(window) = panel_window(&rect, &bounds) else {
                    debug!(zone = zone.id.name(), "dirty zone is off the surface");
                    continue;
                };
                debug!(
                    zone = zone.id.name(),
                    x = window.top_left.x,
                    y = window.top_left.y,
                    w = window.size.width,
                    h = window.size.height,
                    "partial window"
                );

                surface.set_partial_window(window);
                let result = run_pages(surface, |s| layout::draw_zone(s, &layout, zone.id, model));
                panel_fault |= log_fault(result, zone.id.name());
                zones.push(zone.id);
            }
        }

        if zones.is_empty() {
            self.previous = Some(previous);
            return self.full_render(model, true, FullReason::NothingDirty);
        }

        self.strategy.record_refresh(RefreshMode::Partial);
        self.previous = Some(model.clone());
        self.state = ViewState::PartialActive;
        info!(
            zones = ?zones.iter().map(|z| z.name()).collect::<Vec<_>>(),
            partials = self.strategy.partial_count(),
            "partial refresh"
        );

        RenderOutcome {
            refresh: Some(RefreshMode::Partial),
            full_reason: None,
            updated: true,
            zones,
            deep_sleep_needed: false,
            panel_fault,
        }
    }
}

/// Draw the selected window once per page until the driver is done.
fn run_pages<D, F>(surface: &mut D, mut draw: F) -> Result<usize, RenderError<D::Error>>
where
    D: EpdSurface + ?Sized,
    F: FnMut(&mut D),
{
    surface.begin_page_loop();
    for page in 1..=MAX_PAGES {
        draw(surface);
        match surface.advance_page() {
            Ok(true) => {}
            Ok(false) => return Ok(page),
            Err(cause) => return Err(RenderError::Flush { page, cause }),
        }
    }
    Err(RenderError::Runaway(MAX_PAGES))
}

/// Log a page loop result; true if it failed.
fn log_fault<E: core::fmt::Debug + core::fmt::Display>(result: Result<usize, RenderError<E>>, what: &str) -> bool {
    match result {
        Ok(pages) => {
            debug!(window = what, pages, "page loop done");
            false
        }
        Err(e) => {
            warn!(window = what, error = %e, "page loop failed, not retrying");
            true
        }
    }
}
