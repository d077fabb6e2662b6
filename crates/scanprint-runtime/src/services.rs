//! # Collaborators
//!
//! The three platform services the screen drives. Hosts implement these;
//! the controller owns the timeouts and cancellation around every call.
//!
//! ```text
//! ┌─────────────────────┐    request(Camera)     ┌──────────────────────┐
//! │                     │ ─────────────────────► │ PermissionProvider   │
//! │                     │                        └──────────────────────┘
//! │                     │    activate(sink)      ┌──────────────────────┐
//! │  Screen controller  │ ─────────────────────► │ ScannerService       │
//! │                     │ ◄──── sink.decoded ─── │ (camera thread, etc) │
//! │                     │                        └──────────────────────┘
//! │                     │    select / print      ┌──────────────────────┐
//! │                     │ ─────────────────────► │ PrinterService       │
//! └─────────────────────┘                        └──────────────────────┘
//! ```

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use scanprint_core::{Event, PrintJob, PrinterHandle, SessionId};

use crate::error::PrinterResult;

// =============================================================================
// Permission
// =============================================================================

/// Device capabilities the screen may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Camera,
}

/// Answer from a [`PermissionProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Prompts the user (or the OS) for a capability.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn request(&self, capability: Capability) -> PermissionStatus;
}

// =============================================================================
// Scanner
// =============================================================================

/// Camera-backed code reader.
///
/// `activate` is called when the modal opens, `deactivate` when it closes or
/// the screen shuts down. Both must return promptly; decoding happens on the
/// implementation's own thread or task and is reported through the sink.
pub trait ScannerService: Send + Sync {
    fn activate(&self, sink: DecodeSink);
    fn deactivate(&self);
}

/// Where a scanner reports decoded codes for one session.
///
/// Cheap to clone and safe to call from any thread. Decodes from a session
/// that is no longer current are discarded by the screen.
#[derive(Debug, Clone)]
pub struct DecodeSink {
    session: SessionId,
    tx: mpsc::Sender<Event>,
}

impl DecodeSink {
    pub(crate) fn new(session: SessionId, tx: mpsc::Sender<Event>) -> Self {
        DecodeSink { session, tx }
    }

    /// Session this sink belongs to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Reports a decoded code. Never blocks.
    ///
    /// Returns false if the decode was dropped because the screen is
    /// saturated or has stopped.
    pub fn decoded(&self, format: &str, payload: &str) -> bool {
        match self.tx.try_send(Event::decoded(self.session, format, payload)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(session = %self.session, "Screen busy, dropping decode");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(session = %self.session, "Screen stopped, dropping decode");
                false
            }
        }
    }
}

// =============================================================================
// Printer
// =============================================================================

/// Printer picker and renderer.
#[async_trait]
pub trait PrinterService: Send + Sync {
    /// Lets the user pick a printer. `Ok(None)` means the picker was dismissed.
    async fn select_printer(&self) -> PrinterResult<Option<PrinterHandle>>;

    /// Renders `job` on `job.printer`.
    async fn print(&self, job: &PrintJob) -> PrinterResult<()>;
}
