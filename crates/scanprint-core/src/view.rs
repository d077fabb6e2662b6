//! # View Snapshot
//!
//! Everything a host needs to draw the screen, derived from [`Screen`].
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  [ Start Scan | Scan Again ]            │ ◄── scanButtonLabel
//! │                                         │
//! │  A1B2C3                                 │ ◄── payload
//! │  [ Print ]                              │ ◄── shown when canPrint
//! │                                         │
//! │ ─────────────────────────────────────── │
//! │  Printer is standing by                 │ ◄── printerStatus
//! └─────────────────────────────────────────┘
//!   Scanner modal overlays everything      ◄── modalVisible
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::machine::Screen;
use crate::types::{PrinterHandle, ScreenState};

/// Serializable snapshot of the screen for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub state: ScreenState,
    pub modal_visible: bool,
    /// False once the session has a result; hosts should stop feeding decodes.
    pub scanner_enabled: bool,
    pub payload: Option<String>,
    pub is_printing: bool,
    pub can_print: bool,
    pub printer: Option<PrinterHandle>,
    pub scan_button_label: String,
    pub printer_status: String,
}

impl From<&Screen> for ScreenView {
    fn from(screen: &Screen) -> Self {
        ScreenView {
            state: screen.state(),
            modal_visible: screen.modal_visible(),
            scanner_enabled: screen.scanner_enabled(),
            payload: screen.payload().map(str::to_string),
            is_printing: screen.is_printing(),
            can_print: screen.can_print(),
            printer: screen.printer().cloned(),
            scan_button_label: scan_button_label(screen).to_string(),
            printer_status: printer_status(screen).to_string(),
        }
    }
}

fn scan_button_label(screen: &Screen) -> &'static str {
    if screen.scan_result().is_some() {
        "Scan Again"
    } else {
        "Start Scan"
    }
}

fn printer_status(screen: &Screen) -> &'static str {
    match (screen.printer(), screen.is_printing()) {
        (None, _) => "No printer is connected",
        (Some(_), true) => "Printer is printing",
        (Some(_), false) => "Printer is standing by",
    }
}
