//! Decoded telemetry events

use serde::{Deserialize, Serialize};

use super::{
    BoolFlagKind, EventKind, EventTag, PositionKind, TutorialKind, UserExperienceMetrics,
};

/// A 20-byte SHA-1 as carried on the wire.
pub type Sha1 = [u8; 20];

/// One decoded event.
///
/// Each variant carries only the fields that exist at the revision that
/// produced it; revision-gated fields are `Option`s. `timestamp` is the frame
/// counter that prefixes events from revision 0x1d onwards, kept on position and
/// state events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Session start. The six-byte payload is opaque.
    Start { mac_address: Option<[u8; 6]> },
    TestInt { value: u32 },
    TestVector3 { x: f32, y: f32, z: f32 },
    TestChar { value: u8 },
    /// The sixteen matrix components are consumed but not kept.
    TestMatrix44,
    CostumesWorn { items: Vec<CostumeWorn> },
    Position {
        kind: PositionKind,
        timestamp: Option<u32>,
        x: f32,
        y: f32,
        layer: u32,
        frame: Option<u32>,
    },
    GameMessage { timestamp: Option<u32>, message_type: u32, key: Option<u32>, text: String },
    PoppetState { timestamp: Option<u32>, mode: u32, sub_mode: u32, player: Option<String> },
    PodComputerState { timestamp: Option<u32>, state: String },
    /// `trailing` is a signed value the clients always seem to send as zero.
    ExpressionState { timestamp: Option<u32>, index: u32, level: u32, trailing: i32 },
    UserExperienceMetrics(Box<UserExperienceMetrics>),
    InventoryItemClick { action: u32, kind: u32, guids: Vec<u32>, hashes: Vec<Sha1> },
    OpenPsid { high: u64, low: u64 },
    BooleanFlag { kind: BoolFlagKind, value: bool },
    ImportProfile { a: u32, b: u32 },
    ModalOverlayState { timestamp: Option<u32>, state: String },
    GameProgression { a: u32, b: u32 },
    MainPlayerCostume { piece_guids: Vec<u32> },
    Tutorial { kind: TutorialKind },
    /// A known tag whose payload does not exist at the stream's revision.
    Empty { tag: EventTag },
}

/// One costume entry of a [`TelemetryEvent::CostumesWorn`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CostumeWorn {
    pub frame_worn: Option<u32>,
    pub name: String,
}

impl TelemetryEvent {
    /// Payload shape of this event, or `None` for [`TelemetryEvent::Empty`].
    pub fn kind(&self) -> Option<EventKind> {
        Some(match self {
            TelemetryEvent::Start { .. } => EventKind::Start,
            TelemetryEvent::TestInt { .. } => EventKind::TestInt,
            TelemetryEvent::TestVector3 { .. } => EventKind::TestVector3,
            TelemetryEvent::TestChar { .. } => EventKind::TestChar,
            TelemetryEvent::TestMatrix44 => EventKind::TestMatrix44,
            TelemetryEvent::CostumesWorn { .. } => EventKind::CostumesWorn,
            TelemetryEvent::Position { .. } => EventKind::Position,
            TelemetryEvent::GameMessage { .. } => EventKind::GameMessage,
            TelemetryEvent::PoppetState { .. } => EventKind::PoppetState,
            TelemetryEvent::PodComputerState { .. } => EventKind::PodComputerState,
            TelemetryEvent::ExpressionState { .. } => EventKind::ExpressionState,
            TelemetryEvent::UserExperienceMetrics(_) => EventKind::UserExperienceMetrics,
            TelemetryEvent::InventoryItemClick { .. } => EventKind::InventoryItemClick,
            TelemetryEvent::OpenPsid { .. } => EventKind::OpenPsid,
            TelemetryEvent::BooleanFlag { .. } => EventKind::BooleanFlag,
            TelemetryEvent::ImportProfile { .. } => EventKind::ImportProfile,
            TelemetryEvent::ModalOverlayState { .. } => EventKind::ModalOverlayState,
            TelemetryEvent::GameProgression { .. } => EventKind::GameProgression,
            TelemetryEvent::MainPlayerCostume { .. } => EventKind::MainPlayerCostume,
            TelemetryEvent::Tutorial { .. } => EventKind::Tutorial,
            TelemetryEvent::Empty { .. } => return None,
        })
    }

    /// Frame timestamp retained on position and state events.
    pub fn timestamp(&self) -> Option<u32> {
        match self {
            TelemetryEvent::Position { timestamp, .. }
            | TelemetryEvent::GameMessage { timestamp, .. }
            | TelemetryEvent::PoppetState { timestamp, .. }
            | TelemetryEvent::PodComputerState { timestamp, .. }
            | TelemetryEvent::ExpressionState { timestamp, .. }
            | TelemetryEvent::ModalOverlayState { timestamp, .. } => *timestamp,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_events_have_no_kind() {
        let event = TelemetryEvent::Empty { tag: EventTag::GameMessage };
        assert_eq!(event.kind(), None);
        assert_eq!(TelemetryEvent::TestMatrix44.kind(), Some(EventKind::TestMatrix44));
    }

    #[test]
    fn timestamps_only_surface_on_position_and_state_events() {
        let position = TelemetryEvent::Position {
            kind: PositionKind::Death,
            timestamp: Some(900),
            x: 1.0,
            y: 2.0,
            layer: 0,
            frame: Some(901),
        };
        assert_eq!(position.timestamp(), Some(900));

        let state = TelemetryEvent::PodComputerState { timestamp: Some(12), state: "Earth".into() };
        assert_eq!(state.timestamp(), Some(12));

        assert_eq!(TelemetryEvent::TestInt { value: 1 }.timestamp(), None);
    }

    #[test]
    fn events_serialize_with_a_tag_field() {
        let event = TelemetryEvent::TestInt { value: 42 };
        let yaml = serde_yaml_ng::to_string(&event).unwrap();
        assert!(yaml.contains("event: test_int"));
        assert!(yaml.contains("value: 42"));
    }
}
