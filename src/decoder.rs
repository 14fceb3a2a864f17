//! Event dispatcher
//!
//! Decoding is a single forward pass:
//!
//! 1. refuse payloads over the configured size cap without reading them
//! 2. parse the [`TelemetryHeader`], refusing the legacy revision gap
//! 3. while at least one whole byte remains: read a tag, read the frame
//!    timestamp when the revision has them (never for parameterless tags), then
//!    read the payload the [revision policy](crate::schema::revision) describes
//!
//! An unknown tag ends the stream successfully. An underrun, malformed varint or
//! oversized string ends it with [`DecodeOutcome::DecodeFailed`]; events already
//! produced stay valid. Up to seven trailing pad bits are ignored.
//!
//! ```rust
//! use poppet::{DecoderConfig, EventDecoder, TelemetryEvent};
//!
//! // revision 0x05, player 1, TestInt(42)
//! let payload = [0x05, 0x01, 0x02, 0x2A];
//! let mut decoder = EventDecoder::new(&payload, &DecoderConfig::default())?;
//!
//! assert_eq!(decoder.next().transpose()?, Some(TelemetryEvent::TestInt { value: 42 }));
//! assert!(decoder.next().is_none());
//! # Ok::<(), poppet::TelemetryError>(())
//! ```

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::DecoderConfig;
use crate::schema::{FieldSet, Layout, layout_for};
use crate::sink::{CollectingSink, EventSink};
use crate::types::{
    CostumeWorn, EventShape, EventTag, PlayerNetStats, TelemetryEvent, TelemetryHeader,
    UserExperienceMetrics,
};
use crate::wire::{ADDRESS_LEN, BitCursor, HASH_LEN, StringLimit, StringLimitPolicy};
use crate::{Result, TelemetryError};

/// Terminal state of a decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum DecodeOutcome {
    /// Reached the end of the buffer or an unknown tag.
    Success,
    /// Refused before parsing.
    PayloadTooLarge,
    /// Header revision falls in the unsupported legacy gap.
    UnsupportedRevisionRange,
    /// The stream ended mid-event or carried an impossible value.
    DecodeFailed,
}

impl DecodeOutcome {
    fn of(error: &TelemetryError) -> Self {
        match error {
            TelemetryError::PayloadTooLarge { .. } => DecodeOutcome::PayloadTooLarge,
            TelemetryError::UnsupportedRevision { .. } => DecodeOutcome::UnsupportedRevisionRange,
            _ => DecodeOutcome::DecodeFailed,
        }
    }

    pub fn is_success(self) -> bool {
        self == DecodeOutcome::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Exhausted,
    UnknownTag(u32),
    Failed,
}

/// Incremental decoder over one upload.
///
/// Yields one `Result<TelemetryEvent>` per event. After an unknown tag or the
/// first error it yields nothing more.
#[derive(Debug, Clone)]
pub struct EventDecoder<'a> {
    cursor: BitCursor<'a>,
    header: TelemetryHeader,
    strings: StringLimitPolicy,
    state: State,
    events_decoded: usize,
}

impl<'a> EventDecoder<'a> {
    /// Check the size cap and parse the header of `buffer`.
    pub fn new(buffer: &'a [u8], config: &DecoderConfig) -> Result<Self> {
        if buffer.len() > config.max_payload_size {
            return Err(TelemetryError::PayloadTooLarge {
                size: buffer.len(),
                max: config.max_payload_size,
            });
        }
        Self::from_cursor(BitCursor::new(buffer), config)
    }

    /// Parse the header at the cursor's position and decode from there.
    ///
    /// No size cap is applied; the caller owns the buffer bounds.
    pub fn from_cursor(mut cursor: BitCursor<'a>, config: &DecoderConfig) -> Result<Self> {
        let header = TelemetryHeader::parse(&mut cursor)?;
        if !header.has_full_hashes() {
            debug!(revision = header.revision, "Stream hashes carry only 4 significant bytes");
        }

        Ok(Self {
            cursor,
            header,
            strings: config.string_limits,
            state: State::Running,
            events_decoded: 0,
        })
    }

    pub fn header(&self) -> &TelemetryHeader {
        &self.header
    }

    pub fn events_decoded(&self) -> usize {
        self.events_decoded
    }

    /// Terminal outcome, or `None` while events may still follow.
    pub fn outcome(&self) -> Option<DecodeOutcome> {
        match self.state {
            State::Running => None,
            State::Exhausted | State::UnknownTag(_) => Some(DecodeOutcome::Success),
            State::Failed => Some(DecodeOutcome::DecodeFailed),
        }
    }

    /// Raw value of the unrecognized tag that ended the stream.
    pub fn unknown_tag(&self) -> Option<u32> {
        match self.state {
            State::UnknownTag(raw) => Some(raw),
            _ => None,
        }
    }

    fn next_event(&mut self) -> Result<Option<TelemetryEvent>> {
        if self.cursor.bits_remaining() < 8 {
            self.state = State::Exhausted;
            return Ok(None);
        }

        let raw = self.cursor.read_u32()?;
        let Some(tag) = EventTag::from_wire(raw) else {
            debug!(raw, position = self.cursor.position(), "Unknown telemetry tag, ending stream");
            self.state = State::UnknownTag(raw);
            return Ok(None);
        };

        let timestamp = if !tag.is_parameterless() && self.header.has_frame_timestamps() {
            Some(self.cursor.read_u32()?)
        } else {
            None
        };

        trace!(?tag, timestamp, position = self.cursor.position(), "Decoding telemetry event");

        let fields = match layout_for(self.header.revision, tag.kind()) {
            Layout::Unrecognized => {
                debug!(?tag, revision = self.header.revision, "Tag not recognized at this revision");
                self.state = State::UnknownTag(raw);
                return Ok(None);
            }
            Layout::Empty => return Ok(Some(TelemetryEvent::Empty { tag })),
            Layout::Fields(fields) => fields,
        };

        self.decode_payload(tag, timestamp, fields).map(Some)
    }

    fn string(&mut self, limit: StringLimit) -> Result<String> {
        self.cursor.read_string(limit, self.strings)
    }

    // Each element takes at least one byte, so the remaining length bounds any
    // honest count.
    fn capacity_for(&self, count: u32) -> usize {
        (count as usize).min(self.cursor.bits_remaining() / 8)
    }

    fn u32_list(&mut self) -> Result<Vec<u32>> {
        let count = self.cursor.read_u32()?;
        let mut values = Vec::with_capacity(self.capacity_for(count));
        for _ in 0..count {
            values.push(self.cursor.read_u32()?);
        }
        Ok(values)
    }

    fn decode_payload(
        &mut self,
        tag: EventTag,
        timestamp: Option<u32>,
        fields: FieldSet,
    ) -> Result<TelemetryEvent> {
        let event = match tag.shape() {
            EventShape::Start => {
                let mac_address = if fields.contains(FieldSet::ADDRESS) {
                    Some(self.cursor.read_fixed::<ADDRESS_LEN>()?)
                } else {
                    None
                };
                TelemetryEvent::Start { mac_address }
            }
            EventShape::TestInt => TelemetryEvent::TestInt { value: self.cursor.read_u32()? },
            EventShape::TestVector3 => TelemetryEvent::TestVector3 {
                x: self.cursor.read_f32()?,
                y: self.cursor.read_f32()?,
                z: self.cursor.read_f32()?,
            },
            EventShape::TestChar => TelemetryEvent::TestChar { value: self.cursor.read_byte()? },
            EventShape::TestMatrix44 => {
                for _ in 0..16 {
                    self.cursor.read_f32()?;
                }
                TelemetryEvent::TestMatrix44
            }
            EventShape::CostumesWorn => {
                let count = self.cursor.read_u32()?;
                let mut items = Vec::with_capacity(self.capacity_for(count));
                for _ in 0..count {
                    let frame_worn = if fields.contains(FieldSet::COSTUME_FRAME) {
                        Some(self.cursor.read_u32()?)
                    } else {
                        None
                    };
                    let name = self.string(StringLimit::COSTUME_NAME)?;
                    items.push(CostumeWorn { frame_worn, name });
                }
                TelemetryEvent::CostumesWorn { items }
            }
            EventShape::Position(kind) => {
                let x = self.cursor.read_f32()?;
                let y = self.cursor.read_f32()?;
                let layer = self.cursor.read_u32()?;
                let frame = if fields.contains(FieldSet::POSITION_FRAME) {
                    Some(self.cursor.read_u32()?)
                } else {
                    None
                };
                TelemetryEvent::Position { kind, timestamp, x, y, layer, frame }
            }
            EventShape::GameMessage => {
                let message_type = self.cursor.read_u32()?;
                if fields.contains(FieldSet::LEGACY_MESSAGE_FIELD) {
                    self.cursor.read_u32()?;
                }
                let key = if fields.contains(FieldSet::MESSAGE_KEY) {
                    Some(self.cursor.read_u32()?)
                } else {
                    None
                };
                let text = self.string(StringLimit::GAME_MESSAGE)?;
                TelemetryEvent::GameMessage { timestamp, message_type, key, text }
            }
            EventShape::PoppetState => {
                let mode = self.cursor.read_u32()?;
                let sub_mode = self.cursor.read_u32()?;
                let player = if fields.contains(FieldSet::PLAYER_STATE) {
                    Some(self.string(StringLimit::PLAYER_STATE)?)
                } else {
                    None
                };
                TelemetryEvent::PoppetState { timestamp, mode, sub_mode, player }
            }
            EventShape::PodComputerState => TelemetryEvent::PodComputerState {
                timestamp,
                state: self.string(StringLimit::POD_COMPUTER_STATE)?,
            },
            EventShape::ExpressionState => TelemetryEvent::ExpressionState {
                timestamp,
                index: self.cursor.read_u32()?,
                level: self.cursor.read_u32()?,
                trailing: self.cursor.read_i32()?,
            },
            EventShape::UserExperienceMetrics => {
                TelemetryEvent::UserExperienceMetrics(Box::new(self.user_experience_metrics()?))
            }
            EventShape::InventoryItemClick => {
                let action = self.cursor.read_u32()?;
                let kind = self.cursor.read_u32()?;
                let guids = self.u32_list()?;

                let count = self.cursor.read_u32()?;
                let mut hashes = Vec::with_capacity(self.capacity_for(count));
                for _ in 0..count {
                    hashes.push(self.cursor.read_fixed::<HASH_LEN>()?);
                }
                TelemetryEvent::InventoryItemClick { action, kind, guids, hashes }
            }
            EventShape::OpenPsid => TelemetryEvent::OpenPsid {
                high: self.cursor.read_u64()?,
                low: self.cursor.read_u64()?,
            },
            EventShape::BooleanFlag(kind) => {
                let value = if fields.contains(FieldSet::WIDE_BOOLEAN) {
                    self.cursor.read_bool()?
                } else {
                    self.cursor.read_flag_byte()?
                };
                TelemetryEvent::BooleanFlag { kind, value }
            }
            EventShape::ImportProfile => TelemetryEvent::ImportProfile {
                a: self.cursor.read_u32()?,
                b: self.cursor.read_u32()?,
            },
            EventShape::ModalOverlayState => TelemetryEvent::ModalOverlayState {
                timestamp,
                state: self.string(StringLimit::MODAL_OVERLAY_STATE)?,
            },
            EventShape::GameProgression => TelemetryEvent::GameProgression {
                a: self.cursor.read_u32()?,
                b: self.cursor.read_u32()?,
            },
            EventShape::MainPlayerCostume => {
                TelemetryEvent::MainPlayerCostume { piece_guids: self.u32_list()? }
            }
            EventShape::Tutorial(kind) => TelemetryEvent::Tutorial { kind },
        };

        Ok(event)
    }

    fn user_experience_metrics(&mut self) -> Result<UserExperienceMetrics> {
        let c = &mut self.cursor;
        let mut metrics = UserExperienceMetrics {
            current_mspf: c.read_f32()?,
            average_mspf: c.read_f32()?,
            high_mspf: c.read_f32()?,
            predict_applied: c.read_u32()?,
            predict_desired: c.read_u32()?,
            is_host: c.read_bool()?,
            is_create: c.read_bool()?,
            num_players: c.read_u32()?,
            num_ps3s: c.read_u32()?,
            average_rtt_host: c.read_f32()?,
            bandwidth_usage: c.read_f32()?,
            worst_ping: c.read_f32()?,
            worst_bandwidth: c.read_f32()?,
            worst_packet_loss: c.read_f32()?,
            worst_players: c.read_u32()?,
            http_bandwidth_up: c.read_f32()?,
            http_bandwidth_down: c.read_f32()?,
            frame: c.read_u32()?,
            last_mgj_frame: c.read_u32()?,
            player_stats: Vec::new(),
        };

        let count = self.cursor.read_u32()?;
        metrics.player_stats.reserve(self.capacity_for(count));
        for _ in 0..count {
            let c = &mut self.cursor;
            metrics.player_stats.push(PlayerNetStats {
                frame: c.read_u32()?,
                player: c.read_u32()?,
                is_local: c.read_bool()?,
                available_bandwidth: c.read_u32()?,
                available_rnp_bandwidth: c.read_u32()?,
                available_game_bandwidth: c.read_f32()?,
                recent_total_bandwidth_used: c.read_u32()?,
                time_between_sends: c.read_f32()?,
            });
        }

        Ok(metrics)
    }
}

impl Iterator for EventDecoder<'_> {
    type Item = Result<TelemetryEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Running {
            return None;
        }

        match self.next_event() {
            Ok(Some(event)) => {
                self.events_decoded += 1;
                Some(Ok(event))
            }
            Ok(None) => None,
            Err(error) => {
                debug!(%error, events = self.events_decoded, "Telemetry decode failed");
                self.state = State::Failed;
                Some(Err(error))
            }
        }
    }
}

impl FusedIterator for EventDecoder<'_> {}

/// Everything known about a finished session except the events themselves.
#[derive(Debug)]
pub struct DecodeSummary {
    pub header: Option<TelemetryHeader>,
    pub outcome: DecodeOutcome,
    /// Error that ended the session, for every outcome except `Success`.
    pub failure: Option<TelemetryError>,
    /// Set when an unrecognized tag ended the stream.
    pub unknown_tag: Option<u32>,
    pub events_decoded: usize,
}

impl DecodeSummary {
    fn rejected(header: Option<TelemetryHeader>, error: TelemetryError) -> Self {
        Self {
            header,
            outcome: DecodeOutcome::of(&error),
            failure: Some(error),
            unknown_tag: None,
            events_decoded: 0,
        }
    }
}

/// Result of [`decode`]: the events produced plus the terminal outcome.
#[derive(Debug)]
pub struct DecodeReport {
    pub header: Option<TelemetryHeader>,
    pub events: Vec<TelemetryEvent>,
    pub outcome: DecodeOutcome,
    pub failure: Option<TelemetryError>,
    pub unknown_tag: Option<u32>,
}

/// Decode `buffer`, handing each event to `sink` as soon as it is produced.
pub fn decode_into<S: EventSink + ?Sized>(
    buffer: &[u8],
    config: &DecoderConfig,
    sink: &mut S,
) -> DecodeSummary {
    let mut decoder = match EventDecoder::new(buffer, config) {
        Ok(decoder) => decoder,
        Err(error) => {
            let summary = DecodeSummary::rejected(None, error);
            sink.on_finish(&summary);
            return summary;
        }
    };
    sink.on_header(decoder.header());

    let mut failure = None;
    for item in decoder.by_ref() {
        match item {
            Ok(event) => sink.on_event(event),
            Err(error) => failure = Some(error),
        }
    }

    let summary = DecodeSummary {
        header: Some(decoder.header().clone()),
        outcome: decoder.outcome().unwrap_or(DecodeOutcome::Success),
        failure,
        unknown_tag: decoder.unknown_tag(),
        events_decoded: decoder.events_decoded(),
    };
    debug!(
        outcome = ?summary.outcome,
        events = summary.events_decoded,
        unknown_tag = summary.unknown_tag,
        "Telemetry decode finished"
    );
    sink.on_finish(&summary);
    summary
}

/// Decode `buffer` with the given configuration, collecting every event.
pub fn decode_with(buffer: &[u8], config: &DecoderConfig) -> DecodeReport {
    let mut sink = CollectingSink::default();
    let summary = decode_into(buffer, config, &mut sink);
    DecodeReport {
        header: summary.header,
        events: sink.into_events(),
        outcome: summary.outcome,
        failure: summary.failure,
        unknown_tag: summary.unknown_tag,
    }
}

/// Decode `buffer`, refusing it when longer than `max_size` bytes.
pub fn decode(buffer: &[u8], max_size: usize) -> DecodeReport {
    decode_with(buffer, &DecoderConfig::with_max_payload_size(max_size))
}
