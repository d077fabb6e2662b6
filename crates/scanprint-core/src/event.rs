//! # Events and Effects
//!
//! The machine's whole interface with the outside world.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   user actions ─────────┐                    ┌────► RequestPermission   │
//! │   ScanRequested         │                    │      OpenScanner         │
//! │   ModalClosed           │   ┌────────────┐   │      CloseScanner        │
//! │   PrintRequested        ├──►│   Screen   │───┤      SelectPrinter       │
//! │                         │   │  handle()  │   │      Print(job)          │
//! │   collaborator results ─┘   └────────────┘   └────► Notify(notice)      │
//! │   PermissionResolved                                                    │
//! │   CodeDecoded                                                           │
//! │   PrinterSelected / PrinterSelectionCancelled                           │
//! │   PrintCompleted / PrintFailed                                          │
//! │   Aborted                                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::{Notice, PrintJob, PrinterHandle, SessionId};

/// Input to [`Screen::handle`](crate::Screen::handle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // =========================================================================
    // User Actions
    // =========================================================================
    /// User pressed "Start Scan" / "Scan Again".
    ScanRequested,

    /// User dismissed the scanner modal.
    ModalClosed,

    /// User pressed "Print".
    PrintRequested,

    // =========================================================================
    // Collaborator Results
    // =========================================================================
    /// Permission provider answered. Timeouts arrive as `granted: false`.
    PermissionResolved { granted: bool },

    /// Scanner decoded a code during `session`.
    CodeDecoded {
        session: SessionId,
        format: String,
        payload: String,
    },

    /// Printer picker returned a printer.
    PrinterSelected(PrinterHandle),

    /// Printer picker was dismissed, failed or timed out.
    PrinterSelectionCancelled { reason: Option<String> },

    /// Printer accepted the job.
    PrintCompleted,

    /// Printer refused the job, or the call timed out.
    PrintFailed { reason: String },

    /// The outstanding collaborator call was abandoned (screen torn down).
    Aborted,
}

impl Event {
    /// Shorthand for a decode event.
    pub fn decoded(session: SessionId, format: impl Into<String>, payload: impl Into<String>) -> Self {
        Event::CodeDecoded {
            session,
            format: format.into(),
            payload: payload.into(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ScanRequested => "scan_requested",
            Event::ModalClosed => "modal_closed",
            Event::PrintRequested => "print_requested",
            Event::PermissionResolved { .. } => "permission_resolved",
            Event::CodeDecoded { .. } => "code_decoded",
            Event::PrinterSelected(_) => "printer_selected",
            Event::PrinterSelectionCancelled { .. } => "printer_selection_cancelled",
            Event::PrintCompleted => "print_completed",
            Event::PrintFailed { .. } => "print_failed",
            Event::Aborted => "aborted",
        }
    }
}

/// Output of [`Screen::handle`](crate::Screen::handle): work the host runtime
/// must carry out, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the permission provider for camera access.
    RequestPermission,

    /// Show the modal and enable the scanner for `session`.
    OpenScanner { session: SessionId },

    /// Hide the modal and disable the scanner.
    CloseScanner,

    /// Run the printer picker.
    SelectPrinter,

    /// Render the job on its printer.
    Print(PrintJob),

    /// Show a message to the user.
    Notify(Notice),
}
