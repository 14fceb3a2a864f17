//! Event tag table
//!
//! Every event in the stream starts with a varint tag. The tag space is closed:
//! [`EventTag::from_wire`] knows every value, and anything else ends the stream.

use serde::{Deserialize, Serialize};

/// Wire discriminator of a telemetry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[repr(u32)]
pub enum EventTag {
    Start = 0x01,
    TestInt = 0x02,
    TestVector3 = 0x03,
    TestChar = 0x04,
    TestMatrix44 = 0x05,
    CostumesWorn = 0x06,
    UpdatePosition = 0x07,
    DeathPosition = 0x08,
    SuicidePosition = 0x09,
    RestartPosition = 0x0a,
    QuitPosition = 0x0b,
    SwitchToEasyPosition = 0x0c,
    OffScreenPosition = 0x0d,
    PhotoPosition = 0x0e,
    LostAllLivesPosition = 0x0f,
    StickerPosition = 0x10,
    PadDisconnectPosition = 0x11,
    GameMessage = 0x12,
    PoppetState = 0x13,
    PodComputerState = 0x14,
    ExpressionState = 0x15,
    AiDeathPosition = 0x16,
    OffscreenDeathPosition = 0x17,
    UserExperienceMetrics = 0x18,
    InventoryItemClick = 0x19,
    OpenPsid = 0x1a,
    Is50HzTv = 0x1b,
    IsStandardDefTv = 0x1c,
    UsingImportedProfile = 0x1d,
    ImportProfile = 0x1e,
    MoveTutorial = 0x1f,
    MoveCalibration = 0x20,
    ModalOverlayState = 0x21,
    GameProgression = 0x22,
    MainPlayerCostume = 0x23,
}

impl EventTag {
    /// Every known tag, in wire order.
    pub const ALL: [EventTag; 35] = [
        EventTag::Start,
        EventTag::TestInt,
        EventTag::TestVector3,
        EventTag::TestChar,
        EventTag::TestMatrix44,
        EventTag::CostumesWorn,
        EventTag::UpdatePosition,
        EventTag::DeathPosition,
        EventTag::SuicidePosition,
        EventTag::RestartPosition,
        EventTag::QuitPosition,
        EventTag::SwitchToEasyPosition,
        EventTag::OffScreenPosition,
        EventTag::PhotoPosition,
        EventTag::LostAllLivesPosition,
        EventTag::StickerPosition,
        EventTag::PadDisconnectPosition,
        EventTag::GameMessage,
        EventTag::PoppetState,
        EventTag::PodComputerState,
        EventTag::ExpressionState,
        EventTag::AiDeathPosition,
        EventTag::OffscreenDeathPosition,
        EventTag::UserExperienceMetrics,
        EventTag::InventoryItemClick,
        EventTag::OpenPsid,
        EventTag::Is50HzTv,
        EventTag::IsStandardDefTv,
        EventTag::UsingImportedProfile,
        EventTag::ImportProfile,
        EventTag::MoveTutorial,
        EventTag::MoveCalibration,
        EventTag::ModalOverlayState,
        EventTag::GameProgression,
        EventTag::MainPlayerCostume,
    ];

    /// Look up a raw wire value.
    pub fn from_wire(raw: u32) -> Option<EventTag> {
        let index = raw.checked_sub(EventTag::Start as u32)? as usize;
        EventTag::ALL.get(index).copied()
    }

    /// Raw wire value of this tag.
    pub const fn wire(self) -> u32 {
        self as u32
    }

    /// Payload shape of this tag, with the position, flag or tutorial variant
    /// resolved.
    pub const fn shape(self) -> EventShape {
        match self {
            EventTag::Start => EventShape::Start,
            EventTag::TestInt => EventShape::TestInt,
            EventTag::TestVector3 => EventShape::TestVector3,
            EventTag::TestChar => EventShape::TestChar,
            EventTag::TestMatrix44 => EventShape::TestMatrix44,
            EventTag::CostumesWorn => EventShape::CostumesWorn,
            EventTag::UpdatePosition => EventShape::Position(PositionKind::Update),
            EventTag::DeathPosition => EventShape::Position(PositionKind::Death),
            EventTag::SuicidePosition => EventShape::Position(PositionKind::Suicide),
            EventTag::RestartPosition => EventShape::Position(PositionKind::Restart),
            EventTag::QuitPosition => EventShape::Position(PositionKind::Quit),
            EventTag::SwitchToEasyPosition => EventShape::Position(PositionKind::SwitchToEasy),
            EventTag::OffScreenPosition => EventShape::Position(PositionKind::OffScreen),
            EventTag::PhotoPosition => EventShape::Position(PositionKind::Photo),
            EventTag::LostAllLivesPosition => EventShape::Position(PositionKind::LostAllLives),
            EventTag::StickerPosition => EventShape::Position(PositionKind::Sticker),
            EventTag::PadDisconnectPosition => EventShape::Position(PositionKind::PadDisconnect),
            EventTag::GameMessage => EventShape::GameMessage,
            EventTag::PoppetState => EventShape::PoppetState,
            EventTag::PodComputerState => EventShape::PodComputerState,
            EventTag::ExpressionState => EventShape::ExpressionState,
            EventTag::AiDeathPosition => EventShape::Position(PositionKind::AiDeath),
            EventTag::OffscreenDeathPosition => EventShape::Position(PositionKind::OffscreenDeath),
            EventTag::UserExperienceMetrics => EventShape::UserExperienceMetrics,
            EventTag::InventoryItemClick => EventShape::InventoryItemClick,
            EventTag::OpenPsid => EventShape::OpenPsid,
            EventTag::Is50HzTv => EventShape::BooleanFlag(BoolFlagKind::Is50HzTv),
            EventTag::IsStandardDefTv => EventShape::BooleanFlag(BoolFlagKind::IsStandardDefTv),
            EventTag::UsingImportedProfile => {
                EventShape::BooleanFlag(BoolFlagKind::UsingImportedProfile)
            }
            EventTag::ImportProfile => EventShape::ImportProfile,
            EventTag::MoveTutorial => EventShape::Tutorial(TutorialKind::MoveTutorial),
            EventTag::MoveCalibration => EventShape::Tutorial(TutorialKind::MoveCalibration),
            EventTag::ModalOverlayState => EventShape::ModalOverlayState,
            EventTag::GameProgression => EventShape::GameProgression,
            EventTag::MainPlayerCostume => EventShape::MainPlayerCostume,
        }
    }

    /// Payload shape shared by this tag.
    pub const fn kind(self) -> EventKind {
        self.shape().kind()
    }

    /// Which position report this tag carries, if any.
    pub const fn position_kind(self) -> Option<PositionKind> {
        match self.shape() {
            EventShape::Position(kind) => Some(kind),
            _ => None,
        }
    }

    pub const fn bool_flag_kind(self) -> Option<BoolFlagKind> {
        match self.shape() {
            EventShape::BooleanFlag(kind) => Some(kind),
            _ => None,
        }
    }

    pub const fn tutorial_kind(self) -> Option<TutorialKind> {
        match self.shape() {
            EventShape::Tutorial(kind) => Some(kind),
            _ => None,
        }
    }

    /// Parameterless tags never carry a frame timestamp.
    pub const fn is_parameterless(self) -> bool {
        matches!(self.kind(), EventKind::Tutorial)
    }
}

/// Payload shape of an event; several tags may share one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum EventKind {
    Start,
    TestInt,
    TestVector3,
    TestChar,
    TestMatrix44,
    CostumesWorn,
    Position,
    GameMessage,
    PoppetState,
    PodComputerState,
    ExpressionState,
    UserExperienceMetrics,
    InventoryItemClick,
    OpenPsid,
    BooleanFlag,
    ImportProfile,
    ModalOverlayState,
    GameProgression,
    MainPlayerCostume,
    Tutorial,
}

/// An [`EventKind`] with the variant that selects it, as resolved from a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventShape {
    Start,
    TestInt,
    TestVector3,
    TestChar,
    TestMatrix44,
    CostumesWorn,
    Position(PositionKind),
    GameMessage,
    PoppetState,
    PodComputerState,
    ExpressionState,
    UserExperienceMetrics,
    InventoryItemClick,
    OpenPsid,
    BooleanFlag(BoolFlagKind),
    ImportProfile,
    ModalOverlayState,
    GameProgression,
    MainPlayerCostume,
    Tutorial(TutorialKind),
}

impl EventShape {
    pub const fn kind(self) -> EventKind {
        match self {
            EventShape::Start => EventKind::Start,
            EventShape::TestInt => EventKind::TestInt,
            EventShape::TestVector3 => EventKind::TestVector3,
            EventShape::TestChar => EventKind::TestChar,
            EventShape::TestMatrix44 => EventKind::TestMatrix44,
            EventShape::CostumesWorn => EventKind::CostumesWorn,
            EventShape::Position(_) => EventKind::Position,
            EventShape::GameMessage => EventKind::GameMessage,
            EventShape::PoppetState => EventKind::PoppetState,
            EventShape::PodComputerState => EventKind::PodComputerState,
            EventShape::ExpressionState => EventKind::ExpressionState,
            EventShape::UserExperienceMetrics => EventKind::UserExperienceMetrics,
            EventShape::InventoryItemClick => EventKind::InventoryItemClick,
            EventShape::OpenPsid => EventKind::OpenPsid,
            EventShape::BooleanFlag(_) => EventKind::BooleanFlag,
            EventShape::ImportProfile => EventKind::ImportProfile,
            EventShape::ModalOverlayState => EventKind::ModalOverlayState,
            EventShape::GameProgression => EventKind::GameProgression,
            EventShape::MainPlayerCostume => EventKind::MainPlayerCostume,
            EventShape::Tutorial(_) => EventKind::Tutorial,
        }
    }
}

/// Situation a position report was sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PositionKind {
    Update,
    Death,
    Suicide,
    Restart,
    Quit,
    SwitchToEasy,
    OffScreen,
    Photo,
    LostAllLives,
    Sticker,
    PadDisconnect,
    AiDeath,
    OffscreenDeath,
}

/// Display and profile flags reported once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum BoolFlagKind {
    Is50HzTv,
    IsStandardDefTv,
    UsingImportedProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TutorialKind {
    MoveTutorial,
    MoveCalibration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_dense_and_ordered() {
        for (index, tag) in EventTag::ALL.iter().enumerate() {
            assert_eq!(tag.wire(), index as u32 + 1, "{tag:?} out of order");
            assert_eq!(EventTag::from_wire(tag.wire()), Some(*tag));
        }
    }

    #[test]
    fn unknown_values_are_not_tags() {
        assert_eq!(EventTag::from_wire(0), None);
        assert_eq!(EventTag::from_wire(0x24), None);
        assert_eq!(EventTag::from_wire(u32::MAX), None);
    }

    #[test]
    fn thirteen_tags_share_the_position_shape() {
        let positions: Vec<_> =
            EventTag::ALL.iter().filter(|tag| tag.kind() == EventKind::Position).collect();
        assert_eq!(positions.len(), 13);
        assert!(positions.iter().all(|tag| tag.position_kind().is_some()));
        assert_eq!(EventTag::GameMessage.position_kind(), None);
    }

    #[test]
    fn only_tutorial_tags_are_parameterless() {
        let parameterless: Vec<_> =
            EventTag::ALL.iter().copied().filter(|tag| tag.is_parameterless()).collect();
        assert_eq!(parameterless, vec![EventTag::MoveTutorial, EventTag::MoveCalibration]);
        assert_eq!(EventTag::MoveCalibration.tutorial_kind(), Some(TutorialKind::MoveCalibration));
    }

    #[test]
    fn shape_agrees_with_kind_for_every_tag() {
        for tag in EventTag::ALL {
            let shape = tag.shape();
            assert_eq!(shape.kind(), tag.kind(), "{tag:?}");
            assert_eq!(
                matches!(shape, EventShape::Position(_)),
                tag.kind() == EventKind::Position,
                "{tag:?}"
            );
        }
        assert_eq!(
            EventTag::OffscreenDeathPosition.shape(),
            EventShape::Position(PositionKind::OffscreenDeath)
        );
    }

    #[test]
    fn boolean_flags_map_to_their_kind() {
        assert_eq!(EventTag::Is50HzTv.bool_flag_kind(), Some(BoolFlagKind::Is50HzTv));
        assert_eq!(
            EventTag::UsingImportedProfile.bool_flag_kind(),
            Some(BoolFlagKind::UsingImportedProfile)
        );
        assert_eq!(EventTag::TestInt.bool_flag_kind(), None);
    }
}
