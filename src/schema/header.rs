//! Telemetry header parsing
//!
//! # Layout
//!
//! ```text
//! revision          u16 varint
//! hashed_player_id  u32 varint
//! level_hash        20 raw bytes     (revision >= 0x12)
//! slot_type         u32 varint       (revision >= 0x13)
//! slot_number       u32 varint       (revision >= 0x13)
//! ```
//!
//! The revision is checked against the legacy gap as soon as it is read, so a
//! refused stream consumes nothing past its first field.

use tracing::{debug, trace};

use super::revision::{self, HeaderFields};
use crate::types::{SlotId, TelemetryHeader};
use crate::wire::{BitCursor, HASH_LEN};
use crate::{Result, TelemetryError};

impl TelemetryHeader {
    /// Parse the header from the start of a stream.
    pub fn parse(cursor: &mut BitCursor<'_>) -> Result<Self> {
        trace!(bits = cursor.bits_remaining(), "Parsing telemetry header");

        let revision = cursor.read_u16()?;
        if revision::is_legacy_gap(revision) {
            return Err(TelemetryError::UnsupportedRevision { revision });
        }

        let hashed_player_id = cursor.read_u32()?;
        let fields = revision::header_fields(revision);

        let level_hash = if fields.contains(HeaderFields::LEVEL_HASH) {
            Some(cursor.read_fixed::<HASH_LEN>()?)
        } else {
            None
        };

        let slot = if fields.contains(HeaderFields::SLOT) {
            Some(SlotId { slot_type: cursor.read_u32()?, slot_number: cursor.read_u32()? })
        } else {
            None
        };

        debug!(
            revision,
            hashed_player_id,
            has_level_hash = level_hash.is_some(),
            slot_type = slot.map(|s| s.slot_type),
            slot_number = slot.map(|s| s.slot_number),
            "Parsed telemetry header"
        );

        Ok(Self { revision, hashed_player_id, level_hash, slot })
    }

    /// Whether hashes in this stream carry all 20 significant bytes.
    pub fn has_full_hashes(&self) -> bool {
        revision::has_full_hashes(self.revision)
    }

    pub fn has_frame_timestamps(&self) -> bool {
        revision::has_frame_timestamps(self.revision)
    }
}
