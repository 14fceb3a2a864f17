//! Revision policy
//!
//! The protocol has no per-event lengths, so the only way to know what follows a
//! tag is the header's revision number. Every revision-dependent decision in the
//! crate is answered here, from the [`GATES`] table, so the layouts can be audited
//! in one place:
//!
//! | Revision        | Effect                                                             |
//! |-----------------|--------------------------------------------------------------------|
//! | `< 0x05`        | hashes carry only 4 significant bytes (full width is still read)    |
//! | `>= 0x0d`       | `Start` carries a 6-byte opaque address                            |
//! | `0x10..0x12`    | rejected: position events carry an extra hash                      |
//! | `>= 0x12`       | header carries the level hash                                      |
//! | `>= 0x13`       | header carries slot type and number                                |
//! | `>= 0x14`       | game message, poppet, pod computer and expression payloads exist   |
//! | `0x14..0x15`    | game message carries a removed field where the key later goes      |
//! | `>= 0x15`       | game message carries a key                                         |
//! | `>= 0x17`       | user experience metrics are recognized                             |
//! | `>= 0x19`       | position frame; inventory, PSID, import profile payloads; 32-bit flags |
//! | `>= 0x1a`       | game progression payload                                           |
//! | `>= 0x1d`       | frame timestamps; costume frames; poppet player state              |

use std::ops::Range;

use bitflags::bitflags;

use crate::types::EventKind;

/// Hashes are full SHA-1s from this revision on.
pub const FULL_HASHES: u16 = 0x05;
/// `Start` carries its opaque address.
pub const START_ADDRESS: u16 = 0x0d;
/// Revisions in this range are refused outright.
pub const LEGACY_GAP: Range<u16> = 0x10..0x12;
pub const LEVEL_HASH: u16 = 0x12;
pub const SLOT: u16 = 0x13;
pub const STATE_PAYLOADS: u16 = 0x14;
pub const MESSAGE_KEY: u16 = 0x15;
pub const USER_EXPERIENCE_METRICS: u16 = 0x17;
pub const EXTENDED_EVENTS: u16 = 0x19;
pub const GAME_PROGRESSION: u16 = 0x1a;
pub const FRAME_TIMESTAMPS: u16 = 0x1d;

bitflags! {
    /// Optional field groups of an event payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldSet: u32 {
        /// The event has a payload at all.
        const PAYLOAD = 1 << 0;
        /// `Start`: 6-byte address.
        const ADDRESS = 1 << 1;
        /// `CostumesWorn`: frame before each costume name.
        const COSTUME_FRAME = 1 << 2;
        /// `Position`: trailing frame number.
        const POSITION_FRAME = 1 << 3;
        /// `GameMessage`: removed field, read and discarded.
        const LEGACY_MESSAGE_FIELD = 1 << 4;
        /// `GameMessage`: key.
        const MESSAGE_KEY = 1 << 5;
        /// `PoppetState`: trailing player state string.
        const PLAYER_STATE = 1 << 6;
        /// `BooleanFlag`: value is a 32-bit varint rather than a byte.
        const WIDE_BOOLEAN = 1 << 7;
    }
}

bitflags! {
    /// Optional header fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFields: u8 {
        const LEVEL_HASH = 1 << 0;
        const SLOT = 1 << 1;
    }
}

/// One row of the revision table: `kind` gains `fields` from revision `since`,
/// up to but excluding `until` when set.
#[derive(Debug, Clone)]
pub struct Gate {
    pub kind: EventKind,
    pub fields: FieldSet,
    pub since: u16,
    pub until: Option<u16>,
}

impl Gate {
    pub fn applies(&self, revision: u16) -> bool {
        revision >= self.since && self.until.is_none_or(|until| revision < until)
    }
}

const fn since(kind: EventKind, fields: FieldSet, revision: u16) -> Gate {
    Gate { kind, fields, since: revision, until: None }
}

const fn between(kind: EventKind, fields: FieldSet, revisions: Range<u16>) -> Gate {
    Gate { kind, fields, since: revisions.start, until: Some(revisions.end) }
}

/// Every revision-dependent payload rule.
///
/// Kinds without a `PAYLOAD` row here always have their payload.
pub static GATES: &[Gate] = &[
    since(EventKind::Start, FieldSet::ADDRESS, START_ADDRESS),
    since(EventKind::CostumesWorn, FieldSet::COSTUME_FRAME, FRAME_TIMESTAMPS),
    since(EventKind::Position, FieldSet::POSITION_FRAME, EXTENDED_EVENTS),
    since(EventKind::GameMessage, FieldSet::PAYLOAD, STATE_PAYLOADS),
    between(EventKind::GameMessage, FieldSet::LEGACY_MESSAGE_FIELD, STATE_PAYLOADS..MESSAGE_KEY),
    since(EventKind::GameMessage, FieldSet::MESSAGE_KEY, MESSAGE_KEY),
    since(EventKind::PoppetState, FieldSet::PAYLOAD, STATE_PAYLOADS),
    since(EventKind::PoppetState, FieldSet::PLAYER_STATE, FRAME_TIMESTAMPS),
    since(EventKind::PodComputerState, FieldSet::PAYLOAD, STATE_PAYLOADS),
    since(EventKind::ExpressionState, FieldSet::PAYLOAD, STATE_PAYLOADS),
    since(EventKind::InventoryItemClick, FieldSet::PAYLOAD, EXTENDED_EVENTS),
    since(EventKind::OpenPsid, FieldSet::PAYLOAD, EXTENDED_EVENTS),
    // Older clients send the flag as a single byte, so 0x80 there is one true byte
    // and not the start of a varint.
    since(EventKind::BooleanFlag, FieldSet::WIDE_BOOLEAN, EXTENDED_EVENTS),
    since(EventKind::ImportProfile, FieldSet::PAYLOAD, EXTENDED_EVENTS),
    since(EventKind::GameProgression, FieldSet::PAYLOAD, GAME_PROGRESSION),
];

/// Kinds that are unknown tags before a given revision.
pub static RECOGNIZED_SINCE: &[(EventKind, u16)] =
    &[(EventKind::UserExperienceMetrics, USER_EXPERIENCE_METRICS)];

/// How an event of some kind is laid out at some revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The tag does not exist yet; treat it as the end of the stream.
    Unrecognized,
    /// The tag exists but carries no bytes.
    Empty,
    /// The payload is present with these optional groups.
    Fields(FieldSet),
}

fn gated_payload(kind: EventKind) -> bool {
    GATES.iter().any(|gate| gate.kind == kind && gate.fields.contains(FieldSet::PAYLOAD))
}

/// Union of every optional field group `kind` carries at `revision`.
///
/// `PAYLOAD` is always set for kinds whose payload is not revision gated.
pub fn fields_for(revision: u16, kind: EventKind) -> FieldSet {
    let mut fields = if gated_payload(kind) { FieldSet::empty() } else { FieldSet::PAYLOAD };
    for gate in GATES.iter().filter(|gate| gate.kind == kind) {
        if gate.applies(revision) {
            fields |= gate.fields;
        }
    }
    fields
}

/// Full layout decision for `kind` at `revision`.
pub fn layout_for(revision: u16, kind: EventKind) -> Layout {
    let recognized = RECOGNIZED_SINCE
        .iter()
        .find(|(gated, _)| *gated == kind)
        .is_none_or(|(_, since)| revision >= *since);
    if !recognized {
        return Layout::Unrecognized;
    }

    let fields = fields_for(revision, kind);
    if fields.contains(FieldSet::PAYLOAD) { Layout::Fields(fields) } else { Layout::Empty }
}

pub fn header_fields(revision: u16) -> HeaderFields {
    let mut fields = HeaderFields::empty();
    if revision >= LEVEL_HASH {
        fields |= HeaderFields::LEVEL_HASH;
    }
    if revision >= SLOT {
        fields |= HeaderFields::SLOT;
    }
    fields
}

pub fn is_legacy_gap(revision: u16) -> bool {
    LEGACY_GAP.contains(&revision)
}

/// Before 0x05 only the first four bytes of each hash are meaningful.
pub fn has_full_hashes(revision: u16) -> bool {
    revision >= FULL_HASHES
}

/// Events other than parameterless ones carry a leading frame timestamp.
pub fn has_frame_timestamps(revision: u16) -> bool {
    revision >= FRAME_TIMESTAMPS
}
