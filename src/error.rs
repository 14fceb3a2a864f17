//! Error types for telemetry decoding.
//!
//! Every failure the decoder can hit is an ordinary value of [`TelemetryError`];
//! nothing here is fatal to the host process.
//!
//! ## Error Categories
//!
//! - **Rejections**: the payload was refused before any event was decoded
//!   ([`TelemetryError::PayloadTooLarge`], [`TelemetryError::UnsupportedRevision`])
//! - **Decode failures**: the stream ended early or carried an impossible value
//!   ([`TelemetryError::BufferUnderrun`], [`TelemetryError::MalformedVarint`],
//!   [`TelemetryError::StringTooLong`])
//! - **Configuration**: invalid or unreadable decoder configuration
//!
//! An unknown event tag is not an error. It ends the stream successfully and is
//! reported through [`crate::DecodeReport::unknown_tag`].
//!
//! ```rust
//! use poppet::TelemetryError;
//!
//! let error = TelemetryError::buffer_underrun(8, 3, 61);
//! assert!(error.is_client_error());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry decoding.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Telemetry revision {revision:#x} uses an unsupported legacy layout")]
    UnsupportedRevision { revision: u16 },

    #[error(
        "Buffer underrun at bit {position}: needed {requested_bits} bits, {available_bits} available"
    )]
    BufferUnderrun { requested_bits: usize, available_bits: usize, position: usize },

    #[error("Malformed {bits}-bit varint ending at bit {position}")]
    MalformedVarint { bits: u32, position: usize },

    #[error("String field '{field}' exceeds {max} bytes at bit {position}")]
    StringTooLong { field: &'static str, max: usize, position: usize },

    #[error("Invalid decoder configuration: {reason}")]
    Config { reason: String },

    #[error("Configuration file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TelemetryError {
    /// Returns whether the uploading client is at fault.
    ///
    /// Configuration problems are the host's fault; everything derived from the
    /// payload is the client's.
    pub fn is_client_error(&self) -> bool {
        match self {
            TelemetryError::PayloadTooLarge { .. } => true,
            TelemetryError::UnsupportedRevision { .. } => true,
            TelemetryError::BufferUnderrun { .. } => true,
            TelemetryError::MalformedVarint { .. } => true,
            TelemetryError::StringTooLong { .. } => true,
            TelemetryError::Config { .. } => false,
            TelemetryError::File { .. } => false,
        }
    }

    /// Returns whether this error ends a decode session after events may
    /// already have been produced.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            TelemetryError::BufferUnderrun { .. }
                | TelemetryError::MalformedVarint { .. }
                | TelemetryError::StringTooLong { .. }
        )
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::PayloadTooLarge { .. } => vec![
                "Official clients never exceed the size cap; treat the sender as untrusted",
                "Raise max_payload_size only for known development builds",
            ],
            TelemetryError::UnsupportedRevision { .. } => vec![
                "Revisions 0x10 and 0x11 are not decoded",
                "Ask the client to update to a current build",
            ],
            TelemetryError::BufferUnderrun { .. } => vec![
                "Check that the upload was not truncated in transit",
                "Verify the client revision matches the decoded layout",
            ],
            TelemetryError::MalformedVarint { .. } => vec![
                "Verify source data integrity",
                "Check the client revision for layout changes",
            ],
            TelemetryError::StringTooLong { .. } => vec![
                "Use StringLimitPolicy::Truncate to keep decoding oversized strings",
                "Verify the client revision matches the decoded layout",
            ],
            TelemetryError::Config { .. } => vec![
                "Check the decoder configuration values",
                "Fall back to DecoderConfig::default()",
            ],
            TelemetryError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
        }
    }

    /// Helper constructor for buffer underruns.
    pub fn buffer_underrun(requested_bits: usize, available_bits: usize, position: usize) -> Self {
        TelemetryError::BufferUnderrun { requested_bits, available_bits, position }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        TelemetryError::Config { reason: reason.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::File { path, source }
    }
}
