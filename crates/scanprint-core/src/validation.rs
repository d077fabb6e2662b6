//! # Validation Module
//!
//! Checks a decoded payload before the screen accepts it.
//!
//! ## Why Validate?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Payload Validation                                 │
//! │                                                                         │
//! │  Scanner callback ("  A1B2C3\n")                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  validate_payload ← THIS MODULE                                         │
//! │  ├── trim whitespace                                                    │
//! │  ├── empty?            → ValidationError::Required                      │
//! │  ├── > MAX_PAYLOAD_LEN → ValidationError::TooLong                       │
//! │  └── NUL / U+FFFD / stray control char? → InvalidFormat                 │
//! │                                                                         │
//! │  Kept as-is: line breaks (vCard, Wi-Fi QR), tabs and the                │
//! │  ISO 15434 separators EOT / FS / GS / RS / US (GS1, DataMatrix).        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  "A1B2C3" stored as ScanResult                                          │
//! │                                                                         │
//! │  An empty decode is an error, never replaced by a placeholder.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use scanprint_core::validation::validate_payload;
//!
//! assert_eq!(validate_payload("  A1B2C3 ").unwrap(), "A1B2C3");
//! assert!(validate_payload("").is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_PAYLOAD_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a decoded payload and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most `MAX_PAYLOAD_LEN` bytes
/// - Must not contain NUL, the replacement character, or a control
///   character outside [`is_allowed_control`] (garbled decode)
pub fn validate_payload(payload: &str) -> ValidationResult<String> {
    let payload = payload.trim();

    if payload.is_empty() {
        return Err(ValidationError::Required {
            field: "payload".to_string(),
        });
    }

    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ValidationError::TooLong {
            field: "payload".to_string(),
            max: MAX_PAYLOAD_LEN,
        });
    }

    if payload.contains(char::REPLACEMENT_CHARACTER) {
        return Err(ValidationError::InvalidFormat {
            field: "payload".to_string(),
            reason: "contains undecodable bytes".to_string(),
        });
    }

    if let Some(c) = payload
        .chars()
        .find(|c| c.is_control() && !is_allowed_control(*c))
    {
        return Err(ValidationError::InvalidFormat {
            field: "payload".to_string(),
            reason: format!("contains control character U+{:04X}", c as u32),
        });
    }

    Ok(payload.to_string())
}

/// Control characters that real symbologies carry in their data.
///
/// - `\t`, `\n`, `\r`: multi-line QR contents (vCard, MeCard, Wi-Fi)
/// - EOT, FS, GS, RS, US: ISO 15434 / GS1 field separators
pub fn is_allowed_control(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{04}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{1f}'
    )
}

/// Normalizes the symbology name reported by a scanner.
///
/// Scanners disagree on naming (`"QR_CODE"`, `"org.iso.QRCode"`, `"qr"`);
/// only the lowercase form is kept, and a missing name becomes `"unknown"`.
pub fn normalize_format(format: &str) -> String {
    let format = format.trim();
    if format.is_empty() {
        "unknown".to_string()
    } else {
        format.to_lowercase()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
