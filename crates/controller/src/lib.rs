//! Refresh decision engine
//!
//! Runs once per wake cycle, before anything is drawn. It loads the model
//! that was last sent to the panel, compares it with the freshly built one
//! and answers a single question: does the panel need to change at all?
//!
//! ```text
//!   storage ──read──► prior? ──┐
//!                              ├─► tolerant_eq ─► needs_refresh ─► write current ─► draw
//!   telemetry ─► current ──────┘                       │
//!                                                      └─ no ─► leave storage alone
//! ```
//!
//! The write happens before the draw, so the persisted model is never behind
//! what the panel was asked to show. Every storage problem is absorbed into
//! "refresh needed": an extra refresh costs some battery, a stale panel costs
//! correctness.

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
#![allow(clippy::must_use_candidate)]

use model::{DisplayModel, TolerantEq};
use platform::config::PERSISTED_MODEL_KEY;
use platform::Storage;

/// Outcome of [`RefreshController::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDecision {
    /// The panel must be redrawn this cycle.
    pub needs_refresh: bool,
    /// A readable prior model was found.
    pub prior_valid: bool,
    /// The current model was written to storage.
    pub persisted: bool,
}

/// Cross-session refresh gate over a [`Storage`] collaborator
///
/// Holds no state of its own between calls.
pub struct RefreshController<S> {
    storage: S,
    key: String,
}

impl<S: Storage> RefreshController<S> {
    /// Use the default persisted-model key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, PERSISTED_MODEL_KEY)
    }

    /// Use a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Decide whether `current` needs to be drawn, persisting it if so.
    pub fn evaluate(&mut self, current: &DisplayModel) -> RefreshDecision {
        let prior = self.load_prior();
        let prior_valid = prior.is_some();
        let needs_refresh = prior.map_or(true, |prior| !prior.tolerant_eq(current));

        let persisted = needs_refresh && self.persist(current);
        tracing::info!(needs_refresh, prior_valid, persisted, "refresh decision");

        RefreshDecision {
            needs_refresh,
            prior_valid,
            persisted,
        }
    }

    /// Last persisted model. Absent, unreadable and corrupt all give `None`.
    pub fn load_prior(&mut self) -> Option<DisplayModel> {
        match self.storage.exists(&self.key) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(key = %self.key, "no persisted model");
                return None;
            }
            Err(err) => {
                tracing::warn!(%err, "storage unavailable, assuming no prior model");
                return None;
            }
        }

        let bytes = match self.storage.read(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(%err, key = %self.key, "persisted model unreadable");
                return None;
            }
        };

        DisplayModel::from_bytes(&bytes)
            .map_err(|err| tracing::warn!(%err, "persisted model corrupt, ignoring"))
            .ok()
    }

    fn persist(&mut self, current: &DisplayModel) -> bool {
        let text = match current.to_text() {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "model could not be serialized");
                return false;
            }
        };
        match self.storage.write(&self.key, text.as_bytes()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, key = %self.key, "persisting model failed");
                false
            }
        }
    }

    /// Storage collaborator
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the storage back.
    pub fn into_inner(self) -> S {
        self.storage
    }
}
