//! # Screen State Machine
//!
//! The scan-and-print screen as a value with a single transition function.
//!
//! ## Transition Table
//! ```text
//! ┌──────────────────────┬───────────────────────────┬──────────────────────┬───────────────────────────────┐
//! │ State                │ Event                     │ Next state           │ Effects                       │
//! ├──────────────────────┼───────────────────────────┼──────────────────────┼───────────────────────────────┤
//! │ Idle / Scanned       │ ScanRequested (granted)   │ Scanning             │ OpenScanner                   │
//! │ Idle / Scanned       │ ScanRequested (otherwise) │ AwaitingPermission   │ RequestPermission             │
//! │ AwaitingPermission   │ PermissionResolved(true)  │ Scanning             │ OpenScanner                   │
//! │ AwaitingPermission   │ PermissionResolved(false) │ Idle / Scanned       │ Notify(PermissionDenied)      │
//! │ Scanning             │ CodeDecoded (valid)       │ Scanned              │ CloseScanner                  │
//! │ Scanning             │ CodeDecoded (invalid)     │ Idle                 │ CloseScanner, Notify          │
//! │ Scanning             │ ModalClosed               │ Idle / Scanned       │ CloseScanner, Notify(info)    │
//! │ Scanned              │ PrintRequested (printer)  │ Printing             │ Print                         │
//! │ Scanned              │ PrintRequested (none)     │ Scanned (selecting)  │ SelectPrinter                 │
//! │ Scanned (selecting)  │ PrinterSelected           │ Printing             │ Print                         │
//! │ Scanned (selecting)  │ PrinterSelectionCancelled │ Scanned              │ Notify                        │
//! │ Printing             │ PrintCompleted            │ Scanned              │ Notify(info)                  │
//! │ Printing             │ PrintFailed               │ Scanned              │ Notify(PrintFailed)           │
//! │ any (call pending)   │ Aborted                   │ Idle / Scanned       │ CloseScanner if modal open    │
//! └──────────────────────┴───────────────────────────┴──────────────────────┴───────────────────────────────┘
//! ```
//!
//! "Idle / Scanned" means: `Scanned` if a scan result is held, else `Idle`.
//!
//! ## Invariants
//! - At most one collaborator call (permission, selection, print) is pending.
//! - `is_printing()` is true exactly while the state is `Printing`.
//! - Only the first valid decode of a session is kept; later decodes for the
//!   same session, and decodes for older sessions, are ignored.
//! - Collaborator results that do not match the pending call are ignored.
//! - A rejected action (`Err`) leaves the machine unchanged.

use chrono::Utc;

use crate::error::{ScreenError, ScreenResult};
use crate::event::{Effect, Event};
use crate::render::render_label;
use crate::types::{
    Notice, PermissionState, PrintJob, PrinterHandle, ScanResult, ScreenState, SessionId,
};
use crate::validation::{normalize_format, validate_payload};

/// The collaborator call the machine is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Permission,
    PrinterSelection,
    Print,
}

/// The scan-and-print screen.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    state: ScreenState,
    permission: PermissionState,
    scan: Option<ScanResult>,
    printer: Option<PrinterHandle>,
    printing: bool,
    modal_visible: bool,
    session: SessionId,
    pending: Option<Pending>,
}

impl Screen {
    /// Creates an idle screen with no permission, scan or printer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle screen that prints to `printer` without asking.
    pub fn with_printer(printer: PrinterHandle) -> Self {
        Screen {
            printer: Some(printer),
            ..Self::default()
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn scan_result(&self) -> Option<&ScanResult> {
        self.scan.as_ref()
    }

    /// Returns the held payload, if any.
    pub fn payload(&self) -> Option<&str> {
        self.scan.as_ref().map(|s| s.payload.as_str())
    }

    pub fn printer(&self) -> Option<&PrinterHandle> {
        self.printer.as_ref()
    }

    /// PrintJobState: true while a print call is in flight.
    pub fn is_printing(&self) -> bool {
        self.printing
    }

    pub fn modal_visible(&self) -> bool {
        self.modal_visible
    }

    /// Current (or most recent) scan session.
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// True while the scanner should deliver decodes.
    pub fn scanner_enabled(&self) -> bool {
        self.state == ScreenState::Scanning && self.scan.is_none()
    }

    /// True if `PrintRequested` would be accepted.
    pub fn can_print(&self) -> bool {
        self.state == ScreenState::Scanned
            && self.pending.is_none()
            && self.payload().is_some_and(|p| !p.is_empty())
    }

    // =========================================================================
    // Transition Function
    // =========================================================================

    /// Applies one event and returns the effects to run, in order.
    ///
    /// ## Errors
    /// Returns `Err` only for user actions that are not allowed right now
    /// (`NothingToPrint`, `Busy`, `InvalidTransition`). The machine is left
    /// unchanged in that case. Collaborator failures are not errors here:
    /// they transition the machine and come back as `Effect::Notify`.
    pub fn handle(&mut self, event: Event) -> ScreenResult<Vec<Effect>> {
        match event {
            Event::ScanRequested => self.on_scan_requested(),
            Event::ModalClosed => self.on_modal_closed(),
            Event::PrintRequested => self.on_print_requested(),
            Event::PermissionResolved { granted } => Ok(self.on_permission_resolved(granted)),
            Event::CodeDecoded {
                session,
                format,
                payload,
            } => Ok(self.on_code_decoded(session, &format, &payload)),
            Event::PrinterSelected(printer) => Ok(self.on_printer_selected(printer)),
            Event::PrinterSelectionCancelled { reason } => Ok(self.on_selection_cancelled(reason)),
            Event::PrintCompleted => Ok(self.on_print_completed()),
            Event::PrintFailed { reason } => Ok(self.on_print_failed(reason)),
            Event::Aborted => Ok(self.on_aborted()),
        }
    }

    // =========================================================================
    // User Actions
    // =========================================================================

    fn on_scan_requested(&mut self) -> ScreenResult<Vec<Effect>> {
        if self.pending.is_some() {
            return Err(ScreenError::Busy);
        }

        match self.state {
            ScreenState::Idle | ScreenState::Scanned => {}
            state => {
                return Err(ScreenError::InvalidTransition {
                    action: "start a scan",
                    state,
                })
            }
        }

        if self.permission.is_granted() {
            return Ok(self.open_scanner());
        }

        self.state = ScreenState::AwaitingPermission;
        self.pending = Some(Pending::Permission);
        Ok(vec![Effect::RequestPermission])
    }

    fn on_modal_closed(&mut self) -> ScreenResult<Vec<Effect>> {
        // The decode closed the modal just before the user did.
        if self.state == ScreenState::Scanned
            && self.scan.as_ref().is_some_and(|s| s.session == self.session)
            && self.pending.is_none()
        {
            return Ok(Vec::new());
        }

        if self.state != ScreenState::Scanning {
            return Err(ScreenError::InvalidTransition {
                action: "close the scanner",
                state: self.state,
            });
        }

        self.modal_visible = false;
        self.state = self.settled_state();
        Ok(vec![
            Effect::CloseScanner,
            Effect::Notify(Notice::info("Scanner closed")),
        ])
    }

    fn on_print_requested(&mut self) -> ScreenResult<Vec<Effect>> {
        if self.pending.is_some() {
            return Err(ScreenError::Busy);
        }

        if !self.payload().is_some_and(|p| !p.is_empty()) {
            return Err(ScreenError::NothingToPrint);
        }

        if self.state != ScreenState::Scanned {
            return Err(ScreenError::InvalidTransition {
                action: "print",
                state: self.state,
            });
        }

        if self.printer.is_none() {
            self.pending = Some(Pending::PrinterSelection);
            return Ok(vec![Effect::SelectPrinter]);
        }

        Ok(self.start_print())
    }

    // =========================================================================
    // Collaborator Results
    // =========================================================================

    fn on_permission_resolved(&mut self, granted: bool) -> Vec<Effect> {
        if self.pending != Some(Pending::Permission) {
            return Vec::new();
        }
        self.pending = None;

        if granted {
            self.permission = PermissionState::Granted;
            return self.open_scanner();
        }

        self.permission = PermissionState::Denied;
        self.state = self.settled_state();
        vec![Effect::Notify(Notice::from(&ScreenError::PermissionDenied))]
    }

    fn on_code_decoded(&mut self, session: SessionId, format: &str, payload: &str) -> Vec<Effect> {
        if !self.scanner_enabled() || session != self.session {
            return Vec::new();
        }

        self.modal_visible = false;

        match validate_payload(payload) {
            Ok(payload) => {
                self.scan = Some(ScanResult {
                    payload,
                    format: normalize_format(format),
                    session,
                    scanned_at: Utc::now(),
                });
                self.state = ScreenState::Scanned;
                vec![Effect::CloseScanner]
            }
            Err(err) => {
                self.state = self.settled_state();
                vec![
                    Effect::CloseScanner,
                    Effect::Notify(Notice::from(&ScreenError::from(err))),
                ]
            }
        }
    }

    fn on_printer_selected(&mut self, printer: PrinterHandle) -> Vec<Effect> {
        if self.pending != Some(Pending::PrinterSelection) {
            return Vec::new();
        }
        self.pending = None;
        self.printer = Some(printer);
        self.start_print()
    }

    fn on_selection_cancelled(&mut self, reason: Option<String>) -> Vec<Effect> {
        if self.pending != Some(Pending::PrinterSelection) {
            return Vec::new();
        }
        self.pending = None;
        vec![Effect::Notify(Notice::from(
            &ScreenError::PrinterSelectionCancelled { reason },
        ))]
    }

    fn on_print_completed(&mut self) -> Vec<Effect> {
        if self.pending != Some(Pending::Print) {
            return Vec::new();
        }
        self.finish_print();

        let target = self
            .printer
            .as_ref()
            .map(|p| p.label().to_string())
            .unwrap_or_else(|| "printer".to_string());
        vec![Effect::Notify(Notice::info(format!("Sent to {target}")))]
    }

    fn on_print_failed(&mut self, reason: String) -> Vec<Effect> {
        if self.pending != Some(Pending::Print) {
            return Vec::new();
        }
        self.finish_print();
        vec![Effect::Notify(Notice::from(&ScreenError::PrintFailed(reason)))]
    }

    fn on_aborted(&mut self) -> Vec<Effect> {
        match self.pending.take() {
            Some(Pending::Permission) => self.state = self.settled_state(),
            Some(Pending::Print) => self.finish_print(),
            Some(Pending::PrinterSelection) | None => {}
        }

        if self.state == ScreenState::Scanning {
            self.modal_visible = false;
            self.state = self.settled_state();
            return vec![Effect::CloseScanner];
        }
        Vec::new()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Starts a new scan session: clears the previous result, opens the modal.
    fn open_scanner(&mut self) -> Vec<Effect> {
        self.scan = None;
        self.session = self.session.next();
        self.modal_visible = true;
        self.state = ScreenState::Scanning;
        vec![Effect::OpenScanner {
            session: self.session,
        }]
    }

    /// Enters `Printing`. Callers guarantee a payload and a printer are held.
    fn start_print(&mut self) -> Vec<Effect> {
        let (Some(scan), Some(printer)) = (self.scan.as_ref(), self.printer.as_ref()) else {
            return Vec::new();
        };

        let job = PrintJob::new(render_label(&scan.payload), printer.clone());
        self.state = ScreenState::Printing;
        self.printing = true;
        self.pending = Some(Pending::Print);
        vec![Effect::Print(job)]
    }

    fn finish_print(&mut self) {
        self.printing = false;
        self.pending = None;
        self.state = self.settled_state();
    }

    fn settled_state(&self) -> ScreenState {
        if self.scan.is_some() {
            ScreenState::Scanned
        } else {
            ScreenState::Idle
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoticeLevel;

    /// Screen with permission granted and the scanner open.
    fn scanning() -> Screen {
        let mut screen = Screen::new();
        screen.handle(Event::ScanRequested).unwrap();
        screen
            .handle(Event::PermissionResolved { granted: true })
            .unwrap();
        screen
    }

    /// Screen holding `payload`.
    fn scanned(payload: &str) -> Screen {
        let mut screen = scanning();
        let session = screen.session();
        screen
            .handle(Event::decoded(session, "qr", payload))
            .unwrap();
        screen
    }

    fn notices(effects: &[Effect]) -> Vec<&Notice> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn print_job(effects: &[Effect]) -> &PrintJob {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Print(job) => Some(job),
                _ => None,
            })
            .expect("expected a Print effect")
    }

    // =========================================================================
    // Permission + Scanning
    // =========================================================================

    #[test]
    fn test_first_scan_requests_permission() {
        let mut screen = Screen::new();
        let effects = screen.handle(Event::ScanRequested).unwrap();

        assert_eq!(effects, vec![Effect::RequestPermission]);
        assert_eq!(screen.state(), ScreenState::AwaitingPermission);
        assert_eq!(screen.pending(), Some(Pending::Permission));
        assert!(!screen.modal_visible());
    }

    #[test]
    fn test_permission_granted_opens_scanner() {
        let mut screen = Screen::new();
        screen.handle(Event::ScanRequested).unwrap();
        let effects = screen
            .handle(Event::PermissionResolved { granted: true })
            .unwrap();

        assert_eq!(
            effects,
            vec![Effect::OpenScanner {
                session: SessionId(1)
            }]
        );
        assert_eq!(screen.state(), ScreenState::Scanning);
        assert_eq!(screen.permission(), PermissionState::Granted);
        assert!(screen.modal_visible());
        assert!(screen.scanner_enabled());
    }

    #[test]
    fn test_permission_denied_stays_idle_and_notifies() {
        let mut screen = Screen::new();
        screen.handle(Event::ScanRequested).unwrap();
        let effects = screen
            .handle(Event::PermissionResolved { granted: false })
            .unwrap();

        assert_eq!(screen.state(), ScreenState::Idle);
        assert_eq!(screen.permission(), PermissionState::Denied);
        assert!(!screen.modal_visible());
        assert!(screen.pending().is_none());

        let notices = notices(&effects);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Camera permission denied");
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::OpenScanner { .. })));
    }

    #[test]
    fn test_denied_permission_is_asked_again() {
        let mut screen = Screen::new();
        screen.handle(Event::ScanRequested).unwrap();
        screen
            .handle(Event::PermissionResolved { granted: false })
            .unwrap();

        let effects = screen.handle(Event::ScanRequested).unwrap();
        assert_eq!(effects, vec![Effect::RequestPermission]);
    }

    #[test]
    fn test_granted_permission_is_cached() {
        let mut screen = scanned("A1B2C3");
        let effects = screen.handle(Event::ScanRequested).unwrap();

        assert_eq!(
            effects,
            vec![Effect::OpenScanner {
                session: SessionId(2)
            }]
        );
        assert_eq!(screen.state(), ScreenState::Scanning);
    }

    #[test]
    fn test_new_session_clears_previous_result() {
        let mut screen = scanned("A1B2C3");
        screen.handle(Event::ScanRequested).unwrap();

        assert!(screen.scan_result().is_none());
        assert!(!screen.can_print());
    }

    #[test]
    fn test_stray_permission_result_is_ignored() {
        let mut screen = Screen::new();
        let effects = screen
            .handle(Event::PermissionResolved { granted: true })
            .unwrap();

        assert!(effects.is_empty());
        assert_eq!(screen.state(), ScreenState::Idle);
        assert_eq!(screen.permission(), PermissionState::Unknown);
    }

    #[test]
    fn test_scan_rejected_while_scanning() {
        let mut screen = scanning();
        let err = screen.handle(Event::ScanRequested).unwrap_err();
        assert!(matches!(err, ScreenError::InvalidTransition { .. }));
        assert_eq!(screen.session(), SessionId(1));
    }

    #[test]
    fn test_scan_rejected_while_awaiting_permission() {
        let mut screen = Screen::new();
        screen.handle(Event::ScanRequested).unwrap();
        assert_eq!(
            screen.handle(Event::ScanRequested).unwrap_err(),
            ScreenError::Busy
        );
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    #[test]
    fn test_decode_stores_payload_and_closes_modal() {
        let mut screen = scanning();
        let effects = screen
            .handle(Event::decoded(SessionId(1), "CODE_128", "A1B2C3"))
            .unwrap();

        assert_eq!(effects, vec![Effect::CloseScanner]);
        assert_eq!(screen.state(), ScreenState::Scanned);
        assert_eq!(screen.payload(), Some("A1B2C3"));
        assert_eq!(screen.scan_result().unwrap().format, "code_128");
        assert!(!screen.modal_visible());
        assert!(!screen.scanner_enabled());
    }

    #[test]
    fn test_only_first_decode_per_session_is_kept() {
        let mut screen = scanning();
        let session = screen.session();

        screen
            .handle(Event::decoded(session, "qr", "FIRST"))
            .unwrap();
        for payload in ["SECOND", "THIRD", "FIRST", ""] {
            let effects = screen
                .handle(Event::decoded(session, "qr", payload))
                .unwrap();
            assert!(effects.is_empty());
        }

        assert_eq!(screen.payload(), Some("FIRST"));
        assert_eq!(screen.state(), ScreenState::Scanned);
    }

    #[test]
    fn test_decode_from_old_session_is_ignored() {
        let mut screen = scanned("OLD");
        screen.handle(Event::ScanRequested).unwrap();
        assert_eq!(screen.session(), SessionId(2));

        let effects = screen
            .handle(Event::decoded(SessionId(1), "qr", "LATE"))
            .unwrap();
        assert!(effects.is_empty());
        assert!(screen.scan_result().is_none());
        assert_eq!(screen.state(), ScreenState::Scanning);
    }

    #[test]
    fn test_decode_outside_scanning_is_ignored() {
        let mut screen = Screen::new();
        let effects = screen
            .handle(Event::decoded(SessionId(0), "qr", "A1"))
            .unwrap();
        assert!(effects.is_empty());
        assert_eq!(screen.state(), ScreenState::Idle);
    }

    #[test]
    fn test_empty_decode_is_an_error_not_a_placeholder() {
        let mut screen = scanning();
        let effects = screen
            .handle(Event::decoded(SessionId(1), "qr", "   "))
            .unwrap();

        assert_eq!(screen.state(), ScreenState::Idle);
        assert!(screen.scan_result().is_none());
        assert!(!screen.modal_visible());
        assert_eq!(effects[0], Effect::CloseScanner);

        let notices = notices(&effects);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
        assert!(notices[0].message.starts_with("Scanned code is invalid"));
    }

    #[test]
    fn test_decode_payload_is_trimmed() {
        let screen = scanned("  4006381333931\n");
        assert_eq!(screen.payload(), Some("4006381333931"));
    }

    // =========================================================================
    // Modal
    // =========================================================================

    #[test]
    fn test_close_without_scan_returns_to_idle() {
        let mut screen = scanning();
        let effects = screen.handle(Event::ModalClosed).unwrap();

        assert_eq!(screen.state(), ScreenState::Idle);
        assert!(!screen.modal_visible());
        assert_eq!(effects[0], Effect::CloseScanner);
        assert_eq!(notices(&effects)[0].level, NoticeLevel::Info);
    }

    #[test]
    fn test_close_after_decode_keeps_scanned() {
        let mut screen = scanned("A1B2C3");
        let effects = screen.handle(Event::ModalClosed).unwrap();

        assert!(effects.is_empty());
        assert_eq!(screen.state(), ScreenState::Scanned);
        assert_eq!(screen.payload(), Some("A1B2C3"));
        assert!(!screen.modal_visible());
    }

    #[test]
    fn test_close_while_printing_is_rejected() {
        let mut screen = Screen::with_printer(PrinterHandle::new("P1"));
        screen.handle(Event::ScanRequested).unwrap();
        screen
            .handle(Event::PermissionResolved { granted: true })
            .unwrap();
        screen
            .handle(Event::decoded(SessionId(1), "qr", "A1B2C3"))
            .unwrap();
        screen.handle(Event::PrintRequested).unwrap();

        let err = screen.handle(Event::ModalClosed).unwrap_err();
        assert!(matches!(err, ScreenError::InvalidTransition { .. }));
        assert_eq!(screen.state(), ScreenState::Printing);
    }

    #[test]
    fn test_gs1_payload_is_scanned_verbatim() {
        let gs1 = "0109501101530003\u{1d}17250101\u{1d}10ABC123";
        let screen = scanned(gs1);

        assert_eq!(screen.state(), ScreenState::Scanned);
        assert_eq!(screen.payload(), Some(gs1));
    }

    #[test]
    fn test_vcard_payload_prints_all_lines() {
        let vcard = "BEGIN:VCARD\nVERSION:3.0\nFN:Ada Lovelace\nEND:VCARD";
        let mut screen = scanned(vcard);
        assert_eq!(screen.payload(), Some(vcard));

        screen.handle(Event::PrintRequested).unwrap();
        let effects = screen
            .handle(Event::PrinterSelected(PrinterHandle::new("P1")))
            .unwrap();
        assert!(print_job(&effects)
            .content
            .contains("BEGIN:VCARD<br>VERSION:3.0<br>FN:Ada Lovelace<br>END:VCARD"));
    }

    #[test]
    fn test_long_qr_payload_is_scanned() {
        let payload = "A".repeat(2953);
        let screen = scanned(&payload);
        assert_eq!(screen.payload(), Some(payload.as_str()));
    }

    #[test]
    fn test_decode_after_close_is_ignored() {
        let mut screen = scanning();
        screen.handle(Event::ModalClosed).unwrap();
        let effects = screen
            .handle(Event::decoded(SessionId(1), "qr", "LATE"))
            .unwrap();

        assert!(effects.is_empty());
        assert_eq!(screen.state(), ScreenState::Idle);
    }

    // =========================================================================
    // Printing
    // =========================================================================

    #[test]
    fn test_print_rejected_without_scan() {
        let mut screen = Screen::new();
        assert_eq!(
            screen.handle(Event::PrintRequested).unwrap_err(),
            ScreenError::NothingToPrint
        );
        assert_eq!(screen.state(), ScreenState::Idle);
        assert!(!screen.is_printing());

        let mut screen = scanning();
        assert_eq!(
            screen.handle(Event::PrintRequested).unwrap_err(),
            ScreenError::NothingToPrint
        );
        assert_eq!(screen.state(), ScreenState::Scanning);
    }

    #[test]
    fn test_scan_select_print_success_scenario() {
        let mut screen = scanned("A1B2C3");
        assert_eq!(screen.state(), ScreenState::Scanned);
        assert!(screen.can_print());

        let effects = screen.handle(Event::PrintRequested).unwrap();
        assert_eq!(effects, vec![Effect::SelectPrinter]);
        assert_eq!(screen.state(), ScreenState::Scanned);
        assert!(!screen.is_printing());

        let effects = screen
            .handle(Event::PrinterSelected(PrinterHandle::new("P1")))
            .unwrap();
        let job = print_job(&effects);
        assert_eq!(job.printer, PrinterHandle::new("P1"));
        assert!(job.content.contains("<h1>A1B2C3</h1>"));
        assert_eq!(screen.state(), ScreenState::Printing);
        assert!(screen.is_printing());

        let effects = screen.handle(Event::PrintCompleted).unwrap();
        assert_eq!(screen.state(), ScreenState::Scanned);
        assert!(!screen.is_printing());
        assert_eq!(notices(&effects)[0].message, "Sent to P1");
        assert_eq!(screen.printer(), Some(&PrinterHandle::new("P1")));
    }

    #[test]
    fn test_print_failure_scenario() {
        let mut screen = scanned("A1B2C3");
        screen.handle(Event::PrintRequested).unwrap();
        screen
            .handle(Event::PrinterSelected(PrinterHandle::new("P1")))
            .unwrap();

        let effects = screen
            .handle(Event::PrintFailed {
                reason: "offline".to_string(),
            })
            .unwrap();

        assert_eq!(screen.state(), ScreenState::Scanned);
        assert!(!screen.is_printing());
        assert!(screen.can_print());
        let notices = notices(&effects);
        assert!(notices[0].is_error());
        assert_eq!(notices[0].message, "Print failed: offline");
    }

    #[test]
    fn test_printer_handle_is_reused() {
        let mut screen = scanned("A1B2C3");
        screen.handle(Event::PrintRequested).unwrap();
        screen
            .handle(Event::PrinterSelected(PrinterHandle::new("P1")))
            .unwrap();
        screen.handle(Event::PrintCompleted).unwrap();

        let effects = screen.handle(Event::PrintRequested).unwrap();
        assert_eq!(print_job(&effects).printer.url, "P1");
        assert_eq!(screen.state(), ScreenState::Printing);
    }

    #[test]
    fn test_preselected_printer_skips_selection() {
        let mut screen = Screen::with_printer(PrinterHandle::new("ipp://label"));
        screen.handle(Event::ScanRequested).unwrap();
        screen
            .handle(Event::PermissionResolved { granted: true })
            .unwrap();
        screen
            .handle(Event::decoded(SessionId(1), "qr", "X"))
            .unwrap();

        let effects = screen.handle(Event::PrintRequested).unwrap();
        assert!(matches!(effects.as_slice(), [Effect::Print(_)]));
    }

    #[test]
    fn test_selection_cancelled_stays_scanned() {
        let mut screen = scanned("A1B2C3");
        screen.handle(Event::PrintRequested).unwrap();
        let effects = screen
            .handle(Event::PrinterSelectionCancelled { reason: None })
            .unwrap();

        assert_eq!(screen.state(), ScreenState::Scanned);
        assert!(!screen.is_printing());
        assert!(screen.printer().is_none());
        assert!(screen.pending().is_none());
        assert_eq!(notices(&effects)[0].message, "Printer selection cancelled");
    }

    #[test]
    fn test_second_print_while_selecting_is_busy() {
        let mut screen = scanned("A1B2C3");
        screen.handle(Event::PrintRequested).unwrap();

        assert_eq!(
            screen.handle(Event::PrintRequested).unwrap_err(),
            ScreenError::Busy
        );
        assert_eq!(
            screen.handle(Event::ScanRequested).unwrap_err(),
            ScreenError::Busy
        );
    }

    #[test]
    fn test_print_rejected_while_printing() {
        let mut screen = Screen::with_printer(PrinterHandle::new("P1"));
        screen.handle(Event::ScanRequested).unwrap();
        screen
            .handle(Event::PermissionResolved { granted: true })
            .unwrap();
        screen
            .handle(Event::decoded(SessionId(1), "qr", "X"))
            .unwrap();
        screen.handle(Event::PrintRequested).unwrap();

        assert_eq!(
            screen.handle(Event::PrintRequested).unwrap_err(),
            ScreenError::Busy
        );
        assert!(screen.is_printing());
    }

    #[test]
    fn test_stray_print_results_are_ignored() {
        let mut screen = scanned("A1B2C3");
        assert!(screen.handle(Event::PrintCompleted).unwrap().is_empty());
        assert!(screen
            .handle(Event::PrintFailed {
                reason: "late".into()
            })
            .unwrap()
            .is_empty());
        assert!(screen
            .handle(Event::PrinterSelected(PrinterHandle::new("P9")))
            .unwrap()
            .is_empty());
        assert!(screen.printer().is_none());
        assert_eq!(screen.state(), ScreenState::Scanned);
    }

    #[test]
    fn test_printing_flag_clears_after_every_outcome() {
        let outcomes = [
            Event::PrintCompleted,
            Event::PrintFailed {
                reason: "jam".into(),
            },
            Event::Aborted,
        ];

        for outcome in outcomes {
            let mut screen = scanned("A1B2C3");
            screen.handle(Event::PrintRequested).unwrap();
            screen
                .handle(Event::PrinterSelected(PrinterHandle::new("P1")))
                .unwrap();
            assert!(screen.is_printing());

            screen.handle(outcome).unwrap();
            assert!(!screen.is_printing());
            assert_eq!(screen.state(), ScreenState::Scanned);
            assert!(screen.state().is_stable());
        }
    }

    // =========================================================================
    // Abort
    // =========================================================================

    #[test]
    fn test_abort_while_awaiting_permission() {
        let mut screen = Screen::new();
        screen.handle(Event::ScanRequested).unwrap();
        screen.handle(Event::Aborted).unwrap();

        assert_eq!(screen.state(), ScreenState::Idle);
        assert!(screen.pending().is_none());
        assert_eq!(screen.permission(), PermissionState::Unknown);
    }

    #[test]
    fn test_abort_while_scanning_closes_modal() {
        let mut screen = scanning();
        let effects = screen.handle(Event::Aborted).unwrap();

        assert_eq!(effects, vec![Effect::CloseScanner]);
        assert!(!screen.modal_visible());
        assert_eq!(screen.state(), ScreenState::Idle);
    }

    #[test]
    fn test_abort_while_selecting_keeps_scan() {
        let mut screen = scanned("A1B2C3");
        screen.handle(Event::PrintRequested).unwrap();
        screen.handle(Event::Aborted).unwrap();

        assert_eq!(screen.state(), ScreenState::Scanned);
        assert!(screen.pending().is_none());
        assert!(screen.can_print());
    }

    #[test]
    fn test_abort_when_idle_is_noop() {
        let mut screen = Screen::new();
        assert!(screen.handle(Event::Aborted).unwrap().is_empty());
        assert_eq!(screen.state(), ScreenState::Idle);
    }

    #[test]
    fn test_rejection_leaves_machine_unchanged() {
        let mut screen = scanned("A1B2C3");
        screen.handle(Event::PrintRequested).unwrap();
        let before = format!("{:?}", screen);

        let _ = screen.handle(Event::ModalClosed);
        let _ = screen.handle(Event::ScanRequested);
        let _ = screen.handle(Event::PrintRequested);

        assert_eq!(format!("{:?}", screen), before);
    }
}
