//! Event sinks
//!
//! The decoder hands every event to an [`EventSink`] as soon as it is complete,
//! so a host can persist or forward events without buffering a whole upload.

use tracing::{debug, warn};

use crate::decoder::DecodeSummary;
use crate::types::{TelemetryEvent, TelemetryHeader};

/// Receiver of decoded events.
pub trait EventSink {
    /// Called once after the header parsed. Not called for refused payloads.
    fn on_header(&mut self, _header: &TelemetryHeader) {}

    fn on_event(&mut self, event: TelemetryEvent);

    /// Called exactly once when the session ends, whatever the outcome.
    fn on_finish(&mut self, _summary: &DecodeSummary) {}
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_header(&mut self, header: &TelemetryHeader) {
        (**self).on_header(header)
    }

    fn on_event(&mut self, event: TelemetryEvent) {
        (**self).on_event(event)
    }

    fn on_finish(&mut self, summary: &DecodeSummary) {
        (**self).on_finish(summary)
    }
}

impl EventSink for Vec<TelemetryEvent> {
    fn on_event(&mut self, event: TelemetryEvent) {
        self.push(event);
    }
}

/// Keeps the header and every event in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    header: Option<TelemetryHeader>,
    events: Vec<TelemetryEvent>,
}

impl CollectingSink {
    pub fn header(&self) -> Option<&TelemetryHeader> {
        self.header.as_ref()
    }

    pub fn events(&self) -> &[TelemetryEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TelemetryEvent> {
        self.events
    }
}

impl EventSink for CollectingSink {
    fn on_header(&mut self, header: &TelemetryHeader) {
        self.header = Some(header.clone());
    }

    fn on_event(&mut self, event: TelemetryEvent) {
        self.events.push(event);
    }
}

/// Reports every event through `tracing`, labelled with the uploading user.
#[derive(Debug, Clone)]
pub struct TracingSink {
    user: String,
}

impl TracingSink {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl EventSink for TracingSink {
    fn on_header(&mut self, header: &TelemetryHeader) {
        debug!(
            user = %self.user,
            revision = header.revision,
            hashed_player_id = header.hashed_player_id,
            slot = ?header.slot,
            "Telemetry upload"
        );
    }

    fn on_event(&mut self, event: TelemetryEvent) {
        let user = self.user.as_str();
        match &event {
            TelemetryEvent::Position { kind, x, y, layer, frame, .. } => {
                debug!(user, ?kind, x, y, layer, frame, "Position");
            }
            TelemetryEvent::GameMessage { message_type, key, text, .. } => {
                debug!(user, message_type, key, text = %text, "Game message");
            }
            TelemetryEvent::CostumesWorn { items } => {
                for item in items {
                    debug!(user, name = %item.name, frame_worn = item.frame_worn, "Costume worn");
                }
            }
            TelemetryEvent::UserExperienceMetrics(metrics) => {
                debug!(
                    user,
                    average_mspf = metrics.average_mspf,
                    num_players = metrics.num_players,
                    worst_ping = metrics.worst_ping,
                    players_reported = metrics.player_stats.len(),
                    "User experience metrics"
                );
            }
            TelemetryEvent::Empty { tag } => {
                debug!(user, ?tag, "Event without payload at this revision");
            }
            other => debug!(user, event = ?other, "Telemetry event"),
        }
    }

    fn on_finish(&mut self, summary: &DecodeSummary) {
        match &summary.failure {
            Some(error) => warn!(
                user = %self.user,
                outcome = ?summary.outcome,
                events = summary.events_decoded,
                %error,
                "Telemetry upload ended early"
            ),
            None => debug!(
                user = %self.user,
                events = summary.events_decoded,
                unknown_tag = summary.unknown_tag,
                "Telemetry upload decoded"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::DecoderConfig;
    use crate::decoder::decode_into;
    use crate::test_utils::PayloadBuilder;
    use crate::types::EventTag;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.contents()
    }

    #[test]
    fn collecting_sink_keeps_header_and_events() {
        let bytes = PayloadBuilder::header(0x13).tag(EventTag::TestInt).u32(3).build();
        let mut sink = CollectingSink::default();
        decode_into(&bytes, &DecoderConfig::default(), &mut sink);

        assert_eq!(sink.header().map(|h| h.revision), Some(0x13));
        assert_eq!(sink.events(), &[TelemetryEvent::TestInt { value: 3 }]);
    }

    #[test]
    fn vec_is_a_sink() {
        let bytes = PayloadBuilder::header(0x05).tag(EventTag::TestChar).byte(b'a').build();
        let mut events: Vec<TelemetryEvent> = Vec::new();
        let summary = decode_into(&bytes, &DecoderConfig::default(), &mut events);

        assert_eq!(summary.events_decoded, 1);
        assert_eq!(events, vec![TelemetryEvent::TestChar { value: b'a' }]);
    }

    #[test]
    fn tracing_sink_labels_events_with_user() {
        let bytes = PayloadBuilder::header(0x15)
            .tag(EventTag::GameMessage)
            .u32(1)
            .u32(2)
            .string("Welcome")
            .build();

        let logs = capture_logs(|| {
            let mut sink = TracingSink::new("sackboy");
            decode_into(&bytes, &DecoderConfig::default(), &mut sink);
        });

        assert!(logs.contains("Game message"), "{logs}");
        assert!(logs.contains("sackboy"), "{logs}");
        assert!(logs.contains("Welcome"), "{logs}");
        assert!(logs.contains("Telemetry upload decoded"), "{logs}");
    }

    #[test]
    fn tracing_sink_warns_on_failure() {
        let bytes = PayloadBuilder::header(0x05).tag(EventTag::TestVector3).build();

        let logs = capture_logs(|| {
            decode_into(&bytes, &DecoderConfig::default(), &mut TracingSink::new("oddsock"));
        });

        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("Telemetry upload ended early"), "{logs}");
    }
}
