//! Runtime configuration
//!
//! Every field has a default taken from `platform::config`, so a config file
//! only needs the keys it changes:
//!
//! ```json
//! { "max_partial_updates": 5, "show_node_versions": true, "state_dir": "/tmp/node" }
//! ```

use std::path::{Path, PathBuf};

use epd_view::ViewConfig;
use model::BuildOptions;
use platform::config::{
    LOW_MEMORY_THRESHOLD_BYTES, MAX_PARTIAL_UPDATES, MAX_STALE_SECONDS, SLEEP_SECONDS,
};
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("reading {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Not valid JSON or wrong field types
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Parsed but out of range
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Node runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Partial refreshes before a full one is forced
    pub max_partial_updates: u8,
    /// Node reports older than this get a staleness annotation
    pub stale_after_seconds: i64,
    /// Allow light sleep between cycles
    pub light_sleep_enabled: bool,
    /// Always deep-sleep
    pub force_deep_sleep: bool,
    /// Wake interval
    pub sleep_seconds: u32,
    /// Deep-sleep when free heap drops below this
    pub low_memory_threshold_bytes: usize,
    /// Draw the clock
    pub show_clock: bool,
    /// Draw node firmware versions
    pub show_node_versions: bool,
    /// Directory backing persisted state (simulator only)
    pub state_dir: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_partial_updates: MAX_PARTIAL_UPDATES,
            stale_after_seconds: MAX_STALE_SECONDS,
            light_sleep_enabled: true,
            force_deep_sleep: false,
            sleep_seconds: SLEEP_SECONDS,
            low_memory_threshold_bytes: LOW_MEMORY_THRESHOLD_BYTES,
            show_clock: true,
            show_node_versions: false,
            state_dir: None,
        }
    }
}

impl NodeConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&body)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_partial_updates == 0 {
            return Err(ConfigError::Invalid {
                field: "max_partial_updates",
                reason: "must be at least 1",
            });
        }
        if self.sleep_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "sleep_seconds",
                reason: "must be at least 1",
            });
        }
        if self.stale_after_seconds < 0 {
            return Err(ConfigError::Invalid {
                field: "stale_after_seconds",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// Options for the orchestrator
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            max_partial_updates: self.max_partial_updates,
            show_clock: self.show_clock,
            show_node_versions: self.show_node_versions,
        }
    }

    /// Options for the model builder
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            stale_after_seconds: self.stale_after_seconds,
            show_clock: self.show_clock,
            ..BuildOptions::default()
        }
    }
}
