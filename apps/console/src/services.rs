//! Terminal implementations of the screen's collaborators.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use scanprint_core::{Notice, PrintJob, PrinterHandle, ScreenView};
use scanprint_runtime::{
    Capability, DecodeSink, PermissionProvider, PermissionStatus, PrinterError, PrinterResult,
    PrinterService, ScannerService, ScreenEventEmitter,
};

// =============================================================================
// Permission
// =============================================================================

/// Grants the camera unless `SCANPRINT_CAMERA=deny`.
pub struct EnvPermission {
    granted: bool,
}

impl EnvPermission {
    pub fn new(granted: bool) -> Self {
        EnvPermission { granted }
    }

    pub fn from_env() -> Self {
        let denied = std::env::var("SCANPRINT_CAMERA")
            .map(|v| v.eq_ignore_ascii_case("deny"))
            .unwrap_or(false);
        Self::new(!denied)
    }
}

#[async_trait]
impl PermissionProvider for EnvPermission {
    async fn request(&self, capability: Capability) -> PermissionStatus {
        info!(?capability, granted = self.granted, "Permission requested");
        if self.granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Treats lines typed while the modal is open as decoded codes.
#[derive(Default)]
pub struct ConsoleScanner {
    sink: Mutex<Option<DecodeSink>>,
}

impl ConsoleScanner {
    pub fn is_active(&self) -> bool {
        self.sink.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Forwards `line` as a decode. Returns false if the scanner is closed or
    /// the screen dropped it.
    pub fn deliver(&self, line: &str) -> bool {
        let sink = match self.sink.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };
        match sink {
            Some(sink) => sink.decoded("text", line),
            None => false,
        }
    }
}

impl ScannerService for ConsoleScanner {
    fn activate(&self, sink: DecodeSink) {
        debug!(session = %sink.session(), "Console scanner active");
        println!("Scanner open: type a code and press Enter (or `close`).");
        if let Ok(mut guard) = self.sink.lock() {
            *guard = Some(sink);
        }
    }

    fn deactivate(&self) {
        if let Ok(mut guard) = self.sink.lock() {
            *guard = None;
        }
    }
}

// =============================================================================
// Printer
// =============================================================================

/// "Prints" by writing each label to `<dir>/<job-id>.html`.
pub struct SpoolPrinter {
    dir: PathBuf,
}

impl SpoolPrinter {
    pub fn new(dir: PathBuf) -> Self {
        SpoolPrinter { dir }
    }

    fn job_path(&self, job: &PrintJob) -> PathBuf {
        self.dir.join(format!("{}.html", job.id))
    }
}

#[async_trait]
impl PrinterService for SpoolPrinter {
    async fn select_printer(&self) -> PrinterResult<Option<PrinterHandle>> {
        let handle = PrinterHandle::new(self.dir.display().to_string()).with_name("Spool directory");
        Ok(Some(handle))
    }

    async fn print(&self, job: &PrintJob) -> PrinterResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PrinterError::Offline(format!("{}: {}", self.dir.display(), e)))?;

        let path = self.job_path(job);
        tokio::fs::write(&path, job.content.as_bytes()).await?;

        info!(job_id = %job.id, path = %path.display(), "Label spooled");
        println!("Label written to {}", path.display());
        Ok(())
    }
}

/// Returns the spool directory: `SCANPRINT_SPOOL_DIR`, else the platform
/// data dir, else a temp dir.
pub fn spool_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SCANPRINT_SPOOL_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("org", "scanprint", "scanprint")
        .map(|dirs| dirs.data_dir().join("spool"))
        .unwrap_or_else(|| std::env::temp_dir().join("scanprint-spool"))
}

// =============================================================================
// Emitter
// =============================================================================

/// Prints notices and a status line whenever the view changes.
#[derive(Default)]
pub struct ConsoleEmitter {
    last: Mutex<Option<ScreenView>>,
}

impl ScreenEventEmitter for ConsoleEmitter {
    fn emit_view(&self, view: &ScreenView) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if last.as_ref() == Some(view) {
            return;
        }
        println!("{}", describe(view));
        *last = Some(view.clone());
    }

    fn emit_notice(&self, notice: &Notice) {
        if notice.is_error() {
            println!("! {}", notice.message);
        } else {
            println!("* {}", notice.message);
        }
    }
}

/// One-line rendering of the screen.
pub fn describe(view: &ScreenView) -> String {
    let mut line = format!("[{}] {} | {}", view.state, view.scan_button_label, view.printer_status);
    if let Some(payload) = &view.payload {
        line.push_str(&format!(" | code: {payload}"));
    }
    if view.can_print {
        line.push_str(" | print available");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanprint_core::render::render_label;

    #[tokio::test]
    async fn test_spool_printer_writes_label() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("spool");
        let printer = SpoolPrinter::new(dir.clone());

        let handle = printer.select_printer().await.unwrap().unwrap();
        assert_eq!(handle.label(), "Spool directory");

        let job = PrintJob::new(render_label("A1B2C3"), handle);
        printer.print(&job).await.unwrap();

        let written = std::fs::read_to_string(dir.join(format!("{}.html", job.id))).unwrap();
        assert!(written.contains("<h1>A1B2C3</h1>"));
    }

    #[tokio::test]
    async fn test_env_permission() {
        assert_eq!(
            EnvPermission::new(false).request(Capability::Camera).await,
            PermissionStatus::Denied
        );
        assert_eq!(
            EnvPermission::new(true).request(Capability::Camera).await,
            PermissionStatus::Granted
        );
    }

    #[test]
    fn test_inactive_scanner_drops_input() {
        let scanner = ConsoleScanner::default();
        assert!(!scanner.is_active());
        assert!(!scanner.deliver("A1B2C3"));
    }

    #[test]
    fn test_describe() {
        let view = ScreenView::from(&scanprint_core::Screen::new());
        assert_eq!(describe(&view), "[idle] Start Scan | No printer is connected");
    }
}
