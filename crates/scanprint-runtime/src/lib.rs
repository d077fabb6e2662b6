//! # scanprint-runtime
//!
//! Async controller for the scan-print screen.
//!
//! `scanprint-core` decides *what* happens; this crate makes it happen. It
//! owns a [`Screen`](scanprint_core::Screen) on a tokio task, talks to the
//! host's permission, scanner and printer services, and bounds every call
//! with a timeout.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        scanprint-runtime                                │
//! │                                                                         │
//! │  screen.rs    ScanPrintScreen (builder) ─► spawn() ─► ScreenHandle     │
//! │               Controller task, ScreenEventEmitter                       │
//! │                                                                         │
//! │  services.rs  PermissionProvider, ScannerService + DecodeSink,         │
//! │               PrinterService                                            │
//! │                                                                         │
//! │  config.rs    ScreenConfig (screen.toml + SCANPRINT_* env vars)        │
//! │                                                                         │
//! │  error.rs     RuntimeError, PrinterError                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = ScreenConfig::load(None)?;
//! let (handle, task) = ScanPrintScreen::builder(config)
//!     .with_permission_provider(Arc::new(MyPermissions))
//!     .with_scanner(Arc::new(MyCamera::new()))
//!     .with_printer(Arc::new(MyPrinter))
//!     .with_emitter(Arc::new(MyUi))
//!     .build()?
//!     .spawn();
//!
//! handle.request_scan().await?;
//! // ... camera calls sink.decoded("qr", "A1B2C3") ...
//! handle.request_print().await?;
//!
//! handle.shutdown();
//! task.await?;
//! ```

pub mod config;
pub mod error;
pub mod screen;
pub mod services;

pub use config::{PrinterSettings, RuntimeSettings, ScreenConfig, TimeoutSettings};
pub use error::{PrinterError, PrinterResult, RuntimeError, RuntimeResult};
pub use screen::{
    NoOpEmitter, ScanPrintScreen, ScanPrintScreenBuilder, ScreenEventEmitter, ScreenHandle,
};
pub use services::{
    Capability, DecodeSink, PermissionProvider, PermissionStatus, PrinterService, ScannerService,
};
