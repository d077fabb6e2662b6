//! # Runtime Error Types
//!
//! Error types for the screen controller and its collaborators.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Runtime Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Controller    │  │     Printer             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  ShuttingDown   │  │  Offline                │ │
//! │  │  ConfigLoad...  │  │  Missing...     │  │  Timeout                │ │
//! │  │  ConfigSave...  │  │  Screen(..)     │  │  Io / Other             │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use scanprint_core::ScreenError;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Result type alias for printer implementations.
pub type PrinterResult<T> = Result<T, PrinterError>;

/// Errors surfaced by the runtime to its host.
#[derive(Debug, Error)]
pub enum RuntimeError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid screen configuration.
    #[error("Invalid screen configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Controller Errors
    // =========================================================================
    /// The builder was not given one of the collaborators.
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The screen task has stopped.
    #[error("Screen is shutting down")]
    ShuttingDown,

    /// The screen rejected the action.
    #[error(transparent)]
    Screen(#[from] ScreenError),
}

/// Errors reported by [`PrinterService`](crate::services::PrinterService)
/// implementations.
#[derive(Debug, Error)]
pub enum PrinterError {
    /// Printer is offline or unreachable.
    #[error("printer offline: {0}")]
    Offline(String),

    /// The printer did not answer in time.
    #[error("printer timeout: {0}")]
    Timeout(String),

    /// IO error while sending the job.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else the printer reports.
    #[error("{0}")]
    Other(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RuntimeError {
    fn from(err: toml::de::Error) -> Self {
        RuntimeError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RuntimeError {
    fn from(err: toml::ser::Error) -> Self {
        RuntimeError::ConfigSaveFailed(err.to_string())
    }
}

impl RuntimeError {
    /// Returns the screen rejection, if that is what this error is.
    pub fn as_screen_error(&self) -> Option<&ScreenError> {
        match self {
            RuntimeError::Screen(err) => Some(err),
            _ => None,
        }
    }
}
