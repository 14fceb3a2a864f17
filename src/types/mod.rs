//! Core types for decoded telemetry.
//!
//! ## Architecture
//!
//! - [`TelemetryHeader`] is parsed once at the start of every upload
//! - [`EventTag`] is the closed table of wire discriminators
//! - [`EventKind`] groups tags that share a payload shape (13 position tags, for example)
//! - [`TelemetryEvent`] is one decoded event
//!
//! All types are plain immutable data: produced once by the decoder, handed to a
//! sink, and dropped.

mod event;
mod header;
mod metrics;
mod tag;

pub use event::{CostumeWorn, Sha1, TelemetryEvent};
pub use header::{SlotId, TelemetryHeader};
pub use metrics::{PlayerNetStats, UserExperienceMetrics};
pub use tag::{BoolFlagKind, EventKind, EventShape, EventTag, PositionKind, TutorialKind};
