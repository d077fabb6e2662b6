//! # scanprint-core: Pure Screen Logic for scanprint
//!
//! This crate is the **heart** of scanprint. It models the scan-and-print
//! screen as an explicit finite state machine with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        scanprint Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Host (console, webview, ...)                 │   │
//! │  │    Scan button ──► Scanner modal ──► Print button               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ScreenHandle                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               scanprint-runtime (tokio task)                    │   │
//! │  │    permission / printer calls, timeouts, cancellation           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Event in, Effect out                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ scanprint-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  machine  │  │   event   │  │   view    │  │ validation│  │   │
//! │  │   │  Screen   │  │  Event    │  │ScreenView │  │  payload  │  │   │
//! │  │   │  handle() │  │  Effect   │  │  labels   │  │  rules    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • NO LOGGING • PURE TRANSITIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Screen state, scan results, printer handles, notices
//! - [`event`] - Input events and output effects of the machine
//! - [`machine`] - The `Screen` state machine and its transition function
//! - [`render`] - Label rendering (payload → printable HTML)
//! - [`view`] - Serializable view snapshot for hosts
//! - [`validation`] - Scanned payload validation
//! - [`error`] - Screen error types
//!
//! ## Example Usage
//!
//! ```rust
//! use scanprint_core::{Effect, Event, Screen, ScreenState};
//!
//! let mut screen = Screen::new();
//!
//! // First scan asks the camera permission
//! let effects = screen.handle(Event::ScanRequested).unwrap();
//! assert_eq!(effects, vec![Effect::RequestPermission]);
//!
//! screen.handle(Event::PermissionResolved { granted: true }).unwrap();
//! assert_eq!(screen.state(), ScreenState::Scanning);
//!
//! let session = screen.session();
//! screen
//!     .handle(Event::decoded(session, "code128", "A1B2C3"))
//!     .unwrap();
//! assert_eq!(screen.state(), ScreenState::Scanned);
//! assert_eq!(screen.payload(), Some("A1B2C3"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod event;
pub mod machine;
pub mod render;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ScreenError, ScreenResult, ValidationError};
pub use event::{Effect, Event};
pub use machine::Screen;
pub use types::*;
pub use view::ScreenView;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum accepted length of a decoded payload, in bytes.
///
/// ## Reason
/// The largest QR code (version 40, numeric mode, level L) holds 7089
/// characters. Anything longer did not come from a single symbol.
pub const MAX_PAYLOAD_LEN: usize = 7089;
