//! Stream header type

use serde::{Deserialize, Serialize};

use super::Sha1;

/// Header at the start of every telemetry upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TelemetryHeader {
    /// Protocol revision; fixes the layout of everything that follows
    pub revision: u16,
    pub hashed_player_id: u32,
    /// Level being played (revision 0x12 onwards)
    pub level_hash: Option<Sha1>,
    /// Slot being played (revision 0x13 onwards)
    pub slot: Option<SlotId>,
}

/// Slot reference carried in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SlotId {
    pub slot_type: u32,
    pub slot_number: u32,
}
