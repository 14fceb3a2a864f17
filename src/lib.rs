//! Revision-aware decoder for game client telemetry uploads.
//!
//! Poppet turns the packed binary stream a game client uploads (a header
//! followed by tagged events, all varint encoded) into strongly typed events.
//!
//! # Features
//!
//! - **Revision aware**: every layout change across client builds is handled
//!   from a single [revision table](schema::revision)
//! - **Streaming**: events are produced one at a time through an [`Iterator`],
//!   a [`futures::Stream`] or an [`EventSink`]
//! - **Partial results**: a truncated upload still yields every event before the damage
//! - **Bounded**: payload size and string lengths are capped
//!
//! # Quick Start
//!
//! ```rust
//! use poppet::{DecodeOutcome, TelemetryEvent, decode};
//!
//! // revision 0x05, player 1, TestInt(42)
//! let report = decode(&[0x05, 0x01, 0x02, 0x2A], 8128);
//!
//! assert_eq!(report.outcome, DecodeOutcome::Success);
//! assert_eq!(report.events, vec![TelemetryEvent::TestInt { value: 42 }]);
//! ```
//!
//! ## Example (HTTP handler)
//!
//! ```rust
//! use poppet::{DecoderConfig, IngestVerdict, TracingSink, ingest};
//!
//! fn handle_upload(body: &[u8], user: &str) -> u16 {
//!     let mut sink = TracingSink::new(user);
//!     match ingest(body, user, &DecoderConfig::default(), &mut sink) {
//!         IngestVerdict::Accepted { .. } => 200,
//!         IngestVerdict::TooLarge => 413,
//!         IngestVerdict::Unsupported | IngestVerdict::Malformed { .. } => 400,
//!     }
//! }
//!
//! assert_eq!(handle_upload(&[0x05, 0x01], "sackboy"), 200);
//! ```

// Core types and error handling
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Wire format
pub mod schema;
pub mod wire;

// Decoding pipeline
pub mod decoder;
pub mod ingest;
pub mod sink;
pub mod stream;

// Core exports
pub use config::{DEFAULT_MAX_PAYLOAD_SIZE, DecoderConfig};
pub use error::*;
pub use types::*;

// Pipeline exports
pub use decoder::{
    DecodeOutcome, DecodeReport, DecodeSummary, EventDecoder, decode, decode_into, decode_with,
};
pub use ingest::{IngestVerdict, ingest};
pub use sink::{CollectingSink, EventSink, TracingSink};
pub use stream::EventStream;

// Wire exports
pub use wire::{BitCursor, StringLimit, StringLimitPolicy};
