//! # scanprint console
//!
//! Terminal host for the scan-print screen.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ────────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,scanprint=debug, override with RUST_LOG             │
//! │                                                                         │
//! │  2. Load Config ───────────────────────────────────────────────────────► │
//! │     • screen.toml (optional path as first argument) + SCANPRINT_* env   │
//! │                                                                         │
//! │  3. Spawn Screen ──────────────────────────────────────────────────────► │
//! │     • EnvPermission, ConsoleScanner, SpoolPrinter, ConsoleEmitter       │
//! │                                                                         │
//! │  4. Read Commands ─────────────────────────────────────────────────────► │
//! │     • scan | print | close | status | quit | <code while scanning>      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod services;

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scanprint_core::ScreenState;
use scanprint_runtime::{RuntimeError, ScanPrintScreen, ScreenConfig};

use services::{describe, spool_dir, ConsoleEmitter, ConsoleScanner, EnvPermission, SpoolPrinter};

/// Errors that end the console session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("stdin error: {0}")]
    Io(#[from] std::io::Error),

    #[error("screen task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Scan,
    Print,
    Close,
    Status,
    Help,
    Quit,
    /// Text typed while the scanner is open.
    Decode(String),
    Unknown(String),
}

impl ConsoleCommand {
    /// Parses a line. Returns `None` for blank lines outside a scan.
    pub fn parse(line: &str, scanning: bool) -> Option<Self> {
        let trimmed = line.trim();
        let command = match trimmed.to_ascii_lowercase().as_str() {
            "scan" => ConsoleCommand::Scan,
            "print" => ConsoleCommand::Print,
            "close" => ConsoleCommand::Close,
            "status" => ConsoleCommand::Status,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            _ if scanning => ConsoleCommand::Decode(line.to_string()),
            "" => return None,
            _ => ConsoleCommand::Unknown(trimmed.to_string()),
        };
        Some(command)
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=scanprint_runtime=trace` - Trace the controller only
/// - Default: INFO, DEBUG for scanprint crates
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,scanprint=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the screen until `quit` or end of input.
pub async fn run(config: ScreenConfig) -> Result<(), ConsoleError> {
    let spool = spool_dir();
    info!(spool = %spool.display(), "Starting scanprint console");

    let scanner = Arc::new(ConsoleScanner::default());
    let (handle, task) = ScanPrintScreen::builder(config)
        .with_permission_provider(Arc::new(EnvPermission::from_env()))
        .with_scanner(scanner.clone())
        .with_printer(Arc::new(SpoolPrinter::new(spool)))
        .with_emitter(Arc::new(ConsoleEmitter::default()))
        .build()?
        .spawn();

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = ConsoleCommand::parse(&line, scanner.is_active()) else {
            continue;
        };

        let result = match command {
            ConsoleCommand::Scan => handle.request_scan().await,
            ConsoleCommand::Print => handle.request_print().await,
            ConsoleCommand::Close => handle.close_modal().await,
            ConsoleCommand::Status => handle.view().await.map(|view| println!("{}", describe(&view))),
            ConsoleCommand::Help => {
                print_help();
                Ok(())
            }
            ConsoleCommand::Quit => break,
            ConsoleCommand::Decode(code) => {
                if !scanner.deliver(&code) {
                    println!("Code dropped, scanner is not accepting input.");
                }
                Ok(())
            }
            // The scanner may have opened after `is_active` was read.
            ConsoleCommand::Unknown(word) => handle.view().await.map(|view| {
                if !view.scanner_enabled {
                    println!("{}", unknown_input_hint(view.state, &word));
                } else if !scanner.deliver(&word) {
                    println!("Code dropped, scanner is not accepting input.");
                }
            }),
        };

        match result {
            Ok(()) => {}
            // Already shown to the user as a notice.
            Err(e) if e.as_screen_error().is_some() => {}
            Err(e) => {
                error!(error = %e, "Screen stopped unexpectedly");
                break;
            }
        }
    }

    handle.shutdown();
    task.await?;
    info!("Console session ended");
    Ok(())
}

fn print_help() {
    println!("Commands: scan, print, close, status, help, quit");
}

/// Message for a line that is neither a command nor a decode.
fn unknown_input_hint(state: ScreenState, word: &str) -> String {
    match state {
        ScreenState::AwaitingPermission => {
            "Waiting for camera permission, type the code again once the scanner opens.".to_string()
        }
        _ => format!("Unknown command `{word}`. Type `help` for commands."),
    }
}
