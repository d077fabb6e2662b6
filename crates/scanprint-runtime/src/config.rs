//! # Screen Configuration
//!
//! Configuration management for the screen controller.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SCANPRINT_PRINT_TIMEOUT=30                                         │
//! │     SCANPRINT_PRINTER_URL=ipp://office/label                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/scanprint/screen.toml (Linux)                            │
//! │     ~/Library/Application Support/org.scanprint.scanprint/screen.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # screen.toml
//! [timeouts]
//! permission_secs = 30
//! printer_selection_secs = 120
//! print_secs = 60          # 0 disables the timeout
//!
//! [printer]
//! url = "ipp://office/label"
//! name = "Office label printer"
//!
//! [runtime]
//! channel_capacity = 32
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use scanprint_core::PrinterHandle;

use crate::error::{RuntimeError, RuntimeResult};

// =============================================================================
// Timeout Settings
// =============================================================================

/// Upper bounds on each collaborator call, in seconds.
///
/// A value of 0 means "wait forever".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutSettings {
    /// Camera permission prompt.
    #[serde(default = "default_permission_timeout")]
    pub permission_secs: u64,

    /// Printer picker (the user may take a while).
    #[serde(default = "default_selection_timeout")]
    pub printer_selection_secs: u64,

    /// Rendering one label.
    #[serde(default = "default_print_timeout")]
    pub print_secs: u64,
}

fn default_permission_timeout() -> u64 {
    30
}

fn default_selection_timeout() -> u64 {
    120
}

fn default_print_timeout() -> u64 {
    60
}

fn as_limit(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl TimeoutSettings {
    pub fn permission(&self) -> Option<Duration> {
        as_limit(self.permission_secs)
    }

    pub fn printer_selection(&self) -> Option<Duration> {
        as_limit(self.printer_selection_secs)
    }

    pub fn print(&self) -> Option<Duration> {
        as_limit(self.print_secs)
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        TimeoutSettings {
            permission_secs: default_permission_timeout(),
            printer_selection_secs: default_selection_timeout(),
            print_secs: default_print_timeout(),
        }
    }
}

// =============================================================================
// Printer Settings
// =============================================================================

/// Optional preselected printer. When set, printing skips the picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterSettings {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

impl PrinterSettings {
    /// Returns the configured printer as a handle.
    pub fn handle(&self) -> Option<PrinterHandle> {
        let url = self.url.as_deref()?;
        let handle = PrinterHandle::new(url);
        Some(match &self.name {
            Some(name) => handle.with_name(name.clone()),
            None => handle,
        })
    }
}

// =============================================================================
// Runtime Settings
// =============================================================================

/// Controller internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Capacity of the command and event channels. Decodes arriving while
    /// the event channel is full are dropped.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    32
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        RuntimeSettings {
            channel_capacity: default_channel_capacity(),
        }
    }
}

// =============================================================================
// Main Screen Configuration
// =============================================================================

/// Complete screen configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default)]
    pub timeouts: TimeoutSettings,

    #[serde(default)]
    pub printer: PrinterSettings,

    #[serde(default)]
    pub runtime: RuntimeSettings,
}

impl ScreenConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (screen.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RuntimeResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading screen config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load screen config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> RuntimeResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RuntimeError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RuntimeError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| RuntimeError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Screen config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RuntimeResult<()> {
        if self.runtime.channel_capacity == 0 {
            return Err(RuntimeError::InvalidConfig(
                "channel_capacity must be greater than 0".into(),
            ));
        }

        if let Some(url) = &self.printer.url {
            if url.trim().is_empty() {
                return Err(RuntimeError::InvalidConfig(
                    "printer url must not be empty when set".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies `SCANPRINT_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let secs = |key: &str| {
            let value = lookup(key)?;
            match value.parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!(key, value = %value, "Ignoring non-numeric timeout override");
                    None
                }
            }
        };

        if let Some(s) = secs("SCANPRINT_PERMISSION_TIMEOUT") {
            self.timeouts.permission_secs = s;
        }
        if let Some(s) = secs("SCANPRINT_SELECTION_TIMEOUT") {
            self.timeouts.printer_selection_secs = s;
        }
        if let Some(s) = secs("SCANPRINT_PRINT_TIMEOUT") {
            debug!(secs = s, "Overriding print timeout from environment");
            self.timeouts.print_secs = s;
        }

        if let Some(url) = lookup("SCANPRINT_PRINTER_URL") {
            debug!(url = %url, "Overriding printer URL from environment");
            self.printer.url = Some(url);
        }
        if let Some(name) = lookup("SCANPRINT_PRINTER_NAME") {
            self.printer.name = Some(name);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "scanprint", "scanprint")
            .map(|dirs| dirs.config_dir().join("screen.toml"))
    }
}
