//! # Domain Types
//!
//! Core types used throughout scanprint.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ScreenState    │   │   ScanResult    │   │ PrinterHandle   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Idle           │   │  payload        │   │  url (opaque)   │       │
//! │  │  AwaitingPerm.  │   │  format         │   │  name           │       │
//! │  │  Scanning       │   │  scanned_at     │   └─────────────────┘       │
//! │  │  Scanned        │   └─────────────────┘                              │
//! │  │  Printing       │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │   PrintJob      │   │    Notice       │       │
//! │  ┌─────────────────┐   │  ─────────────  │   │  ─────────────  │       │
//! │  │ PermissionState │   │  id (UUID)      │   │  level          │       │
//! │  │  Unknown        │   │  content (HTML) │   │  message        │       │
//! │  │  Granted/Denied │   │  printer        │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ScreenError;

// =============================================================================
// Screen State
// =============================================================================

/// The states of the scan-and-print screen.
///
/// ## Lifecycle
/// ```text
///            ScanRequested (permission unknown/denied)
///   Idle ─────────────────────────────► AwaitingPermission
///    ▲  │                                   │ granted      │ denied
///    │  │ ScanRequested (granted)           ▼              ▼
///    │  └──────────────────────────────► Scanning         Idle
///    │         ModalClosed (no result)      │
///    └──────────────────────────────────────┤ CodeDecoded
///                                           ▼
///                   PrintCompleted ┌──► Scanned ◄──┐ PrinterSelectionCancelled
///                   PrintFailed    │       │       │
///                                  │       ▼ PrintRequested
///                                  └── Printing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScreenState {
    /// Nothing scanned (or the last scan session was abandoned).
    #[default]
    Idle,
    /// Waiting for the permission provider to answer.
    AwaitingPermission,
    /// Scanner modal open, waiting for a decode.
    Scanning,
    /// A payload is held and can be printed.
    Scanned,
    /// A print call is in flight.
    Printing,
}

impl ScreenState {
    /// Returns true for the states a failure may settle into.
    pub fn is_stable(&self) -> bool {
        matches!(self, ScreenState::Idle | ScreenState::Scanned)
    }
}

impl std::fmt::Display for ScreenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenState::Idle => write!(f, "idle"),
            ScreenState::AwaitingPermission => write!(f, "awaiting permission"),
            ScreenState::Scanning => write!(f, "scanning"),
            ScreenState::Scanned => write!(f, "scanned"),
            ScreenState::Printing => write!(f, "printing"),
        }
    }
}

// =============================================================================
// Permission State
// =============================================================================

/// Cached answer of the permission provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// Never asked.
    #[default]
    Unknown,
    Granted,
    /// Asked and refused. The next scan asks again.
    Denied,
}

impl PermissionState {
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

// =============================================================================
// Scan Session
// =============================================================================

/// Identifier of one scan session (modal open → decode or close).
///
/// Sessions are numbered from 1 in the order the modal opens. `SessionId(0)`
/// never names a real session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Returns the id that follows this one.
    #[inline]
    pub const fn next(self) -> Self {
        SessionId(self.0 + 1)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Scan Result
// =============================================================================

/// The payload accepted for a scan session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Decoded value, trimmed.
    pub payload: String,

    /// Barcode symbology reported by the scanner (e.g. "qr", "ean13").
    pub format: String,

    /// Session that produced this result.
    pub session: SessionId,

    /// When the decode was accepted.
    #[ts(as = "String")]
    pub scanned_at: DateTime<Utc>,
}

// =============================================================================
// Printer Handle
// =============================================================================

/// Opaque reference to a previously selected printer.
///
/// The URL is whatever the printer service understands (an IPP URL, a
/// spool directory, a device path); the screen never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrinterHandle {
    pub url: String,

    /// Human-readable name, when the picker provides one.
    pub name: Option<String>,
}

impl PrinterHandle {
    /// Creates a handle with just a URL.
    pub fn new(url: impl Into<String>) -> Self {
        PrinterHandle {
            url: url.into(),
            name: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the name if known, otherwise the URL.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

// =============================================================================
// Print Job
// =============================================================================

/// One render request handed to the printer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    /// Unique identifier (UUID v4), used to correlate log lines.
    pub id: Uuid,

    /// Rendered label document (HTML).
    pub content: String,

    /// Printer the job targets.
    pub printer: PrinterHandle,
}

impl PrintJob {
    /// Creates a job with a fresh id.
    pub fn new(content: String, printer: PrinterHandle) -> Self {
        PrintJob {
            id: Uuid::new_v4(),
            content,
            printer,
        }
    }
}

// =============================================================================
// Notice
// =============================================================================

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the host must show to the user (alert, toast, status line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Creates an informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&ScreenError> for Notice {
    fn from(err: &ScreenError) -> Self {
        Notice::error(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
