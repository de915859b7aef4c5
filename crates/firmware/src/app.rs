//! One wake cycle of the display node
//!
//! ```text
//! telemetry body ─► ModelBuilder ─► RefreshController ──(needs refresh?)──► EpdView::render
//!                                                                               │
//!                                      choose_sleep_mode ◄── deep_sleep_needed ─┘
//! ```
//!
//! The controller gates across power cycles, the view decides full versus
//! partial within a session. Unusable telemetry always reaches the view so
//! the local-sensor screen is drawn, and it is persisted too so the next
//! valid model is never mistaken for what is on the panel.

use controller::{RefreshController, RefreshDecision};
use epd_view::{EpdView, RenderOutcome};
use model::{ModelBuilder, Telemetry};
use platform::power::PowerManager;
use platform::{EpdSurface, LocalSensor, SleepMode, Storage, TextMetrics};
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::sleep::choose_sleep_mode;

/// What one wake cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Telemetry carried a node map
    pub telemetry_valid: bool,
    /// Cross-session gate result
    pub decision: RefreshDecision,
    /// Orchestrator result, `None` when the panel was already current
    pub render: Option<RenderOutcome>,
    /// Sleep requested at the end of the cycle
    pub sleep: SleepMode,
}

/// The display node application
pub struct NodeApp<S, D, T, P>
where
    S: Storage,
    D: EpdSurface,
    T: TextMetrics,
    P: PowerManager,
{
    config: NodeConfig,
    builder: ModelBuilder,
    controller: RefreshController<S>,
    view: EpdView<D, T>,
    power: P,
}

impl<S, D, T, P> NodeApp<S, D, T, P>
where
    S: Storage,
    D: EpdSurface,
    T: TextMetrics,
    P: PowerManager,
{
    /// Wire the collaborators together.
    pub fn new(config: NodeConfig, storage: S, surface: D, metrics: T, power: P) -> Self {
        let view = EpdView::new(surface, metrics, config.view_config());
        Self {
            builder: ModelBuilder::new(config.build_options()),
            controller: RefreshController::new(storage),
            view,
            power,
            config,
        }
    }

    /// Show `sensor` readings when telemetry is unusable.
    #[must_use]
    pub fn with_local_sensor(mut self, sensor: impl LocalSensor + 'static) -> Self {
        self.view = self.view.with_local_sensor(sensor);
        self
    }

    /// Run one wake cycle. `body` is the fetched telemetry, `None` when the
    /// fetch failed.
    pub fn run_cycle(&mut self, body: Option<&str>) -> CycleReport {
        let telemetry = body.map(Telemetry::from_json).unwrap_or_default();
        let telemetry_valid = telemetry.is_valid();
        if !telemetry_valid {
            warn!(fetched = body.is_some(), "telemetry unusable, local sensor only");
        }

        let model = self.builder.build(&telemetry);
        let decision = self.controller.evaluate(&model);

        let render = if decision.needs_refresh || !telemetry_valid {
            Some(self.view.render(&model, telemetry_valid))
        } else {
            info!("panel already shows this model");
            None
        };

        let deep_sleep_needed = render.as_ref().is_some_and(|r| r.deep_sleep_needed);
        let sleep = choose_sleep_mode(deep_sleep_needed, &self.config, self.power.free_heap());
        info!(mode = sleep.name(), seconds = self.config.sleep_seconds, "sleeping");
        if let Err(e) = self.power.sleep(sleep, self.config.sleep_seconds) {
            warn!(error = ?e, "sleep request failed");
        }
        if !sleep.retains_ram() {
            self.view.reset();
        }

        CycleReport {
            telemetry_valid,
            decision,
            render,
            sleep,
        }
    }

    /// Hibernate the panel before power-off.
    pub fn shutdown(&mut self) -> bool {
        self.view.teardown()
    }

    /// Configuration in use
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Orchestrator
    pub fn view(&self) -> &EpdView<D, T> {
        &self.view
    }

    /// Persisted-state store
    pub fn storage(&self) -> &S {
        self.controller.storage()
    }

    /// Power collaborator
    pub fn power(&self) -> &P {
        &self.power
    }
}
