//! # Error Types
//!
//! Screen error types for scanprint-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  scanprint-core errors (this file)                                     │
//! │  ├── ScreenError      - Failures and rejected actions                  │
//! │  └── ValidationError  - Why a scanned payload was refused              │
//! │                                                                         │
//! │  scanprint-runtime errors (separate crate)                             │
//! │  ├── PrinterError     - What printer implementations report            │
//! │  └── RuntimeError     - Config, channels, wraps ScreenError            │
//! │                                                                         │
//! │  Flow: ValidationError → ScreenError → Notice → Host                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Families of ScreenError
//! 1. **Collaborator failures** (`PermissionDenied`, `ScanDecodeInvalid`,
//!    `PrinterSelectionCancelled`, `PrintFailed`): the machine moves to a
//!    stable state and emits a notice carrying the error message.
//! 2. **Rejected actions** (`NothingToPrint`, `Busy`, `InvalidTransition`):
//!    returned as `Err` from `Screen::handle`, the machine is untouched.

use thiserror::Error;

use crate::types::ScreenState;

// =============================================================================
// Screen Error
// =============================================================================

/// Errors produced by the screen.
///
/// `Clone` because rejections travel back to the caller over a channel
/// while the same message is also shown as a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    /// Camera access was refused (or the request never answered).
    #[error("Camera permission denied")]
    PermissionDenied,

    /// The scanner produced an empty or garbled payload.
    #[error("Scanned code is invalid: {0}")]
    ScanDecodeInvalid(#[from] ValidationError),

    /// The user dismissed the printer picker, or it failed.
    #[error("Printer selection cancelled{}", reason_suffix(.reason))]
    PrinterSelectionCancelled { reason: Option<String> },

    /// The printer reported a failure.
    #[error("Print failed: {0}")]
    PrintFailed(String),

    /// Print was requested without a scanned value.
    #[error("Nothing to print, scan a code first")]
    NothingToPrint,

    /// Another permission/selection/print call is still outstanding.
    #[error("Please wait for the current operation to finish")]
    Busy,

    /// The action is not valid in the current state.
    ///
    /// ## When This Occurs
    /// - Closing the modal when it is not open
    /// - Requesting a scan while printing
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: ScreenState,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

// =============================================================================
// Validation Error
// =============================================================================

/// Reasons a decoded payload is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Payload is missing or only whitespace.
    #[error("{field} is empty")]
    Required { field: String },

    /// Payload is longer than allowed.
    #[error("{field} must be at most {max} bytes")]
    TooLong { field: String, max: usize },

    /// Payload contains characters that cannot be printed.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ScreenError.
pub type ScreenResult<T> = Result<T, ScreenError>;

// =============================================================================
// Unit Tests
// =============================================================================
