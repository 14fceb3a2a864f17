//! Upload ingestion
//!
//! [`ingest`] is the entry point an HTTP handler calls with a request body: it
//! decodes into a sink and reduces the outcome to a verdict the handler can turn
//! into a status code. Clients retry failed uploads, so a stream that ends early
//! still yields every event decoded before the failure.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::DecoderConfig;
use crate::decoder::{DecodeOutcome, decode_into};
use crate::sink::EventSink;

/// What the host should tell the uploading client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum IngestVerdict {
    /// Decoded to the end; `events` were delivered to the sink.
    Accepted { events: usize },
    /// Body exceeds the configured cap and was not read.
    TooLarge,
    /// Stream revision is one the decoder refuses.
    Unsupported,
    /// Stream ended mid-event; `events` were delivered before the failure.
    Malformed { events: usize },
}

impl IngestVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IngestVerdict::Accepted { .. })
    }

    /// Every refusal is the uploading client's fault, never the host's.
    pub fn is_client_error(&self) -> bool {
        !self.is_accepted()
    }

    /// Events the sink received.
    pub fn events(&self) -> usize {
        match self {
            IngestVerdict::Accepted { events } | IngestVerdict::Malformed { events } => *events,
            IngestVerdict::TooLarge | IngestVerdict::Unsupported => 0,
        }
    }
}

/// Decode one upload from `user` into `sink`.
pub fn ingest<S: EventSink + ?Sized>(
    body: &[u8],
    user: &str,
    config: &DecoderConfig,
    sink: &mut S,
) -> IngestVerdict {
    let summary = decode_into(body, config, sink);
    let events = summary.events_decoded;

    match summary.outcome {
        DecodeOutcome::Success => IngestVerdict::Accepted { events },
        DecodeOutcome::PayloadTooLarge => {
            warn!(
                user,
                size = body.len(),
                max = config.max_payload_size,
                "Telemetry upload exceeds size cap"
            );
            IngestVerdict::TooLarge
        }
        DecodeOutcome::UnsupportedRevisionRange => {
            if let Some(error) = &summary.failure {
                warn!(user, %error, "Unsupported telemetry revision");
            }
            IngestVerdict::Unsupported
        }
        DecodeOutcome::DecodeFailed => {
            if let Some(error) = &summary.failure {
                warn!(user, events, %error, "Malformed telemetry upload");
            }
            IngestVerdict::Malformed { events }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;
    use crate::test_utils::PayloadBuilder;
    use crate::types::{EventTag, TelemetryEvent};

    #[test]
    fn accepted_upload_reaches_sink() {
        let body = PayloadBuilder::header(0x1d)
            .tag(EventTag::ModalOverlayState)
            .u32(300)
            .string("PAUSED")
            .build();
        let mut sink = CollectingSink::default();

        let verdict = ingest(&body, "sackboy", &DecoderConfig::default(), &mut sink);
        assert_eq!(verdict, IngestVerdict::Accepted { events: 1 });
        assert!(verdict.is_accepted());
        assert_eq!(
            sink.events(),
            &[TelemetryEvent::ModalOverlayState { timestamp: Some(300), state: "PAUSED".into() }]
        );
    }

    #[test]
    fn oversized_upload_is_refused() {
        let body = vec![0u8; 4033];
        let mut sink = CollectingSink::default();
        let config = DecoderConfig::with_max_payload_size(4032);

        let verdict = ingest(&body, "sackboy", &config, &mut sink);
        assert_eq!(verdict, IngestVerdict::TooLarge);
        assert!(verdict.is_client_error());
        assert_eq!(verdict.events(), 0);
        assert!(sink.header().is_none());
    }

    #[test]
    fn legacy_revision_is_unsupported() {
        let body = PayloadBuilder::header(0x10).build();
        let mut events: Vec<TelemetryEvent> = Vec::new();
        let verdict = ingest(&body, "sackboy", &DecoderConfig::default(), &mut events);
        assert_eq!(verdict, IngestVerdict::Unsupported);
    }

    #[test]
    fn malformed_upload_keeps_partial_events() {
        // The costume name never terminates.
        let body = PayloadBuilder::header(0x05)
            .tag(EventTag::TestChar)
            .byte(1)
            .tag(EventTag::OpenPsid)
            .tag(EventTag::CostumesWorn)
            .u32(1)
            .bytes(b"ab")
            .build();
        let mut events: Vec<TelemetryEvent> = Vec::new();

        let verdict = ingest(&body, "sackboy", &DecoderConfig::default(), &mut events);
        assert_eq!(verdict, IngestVerdict::Malformed { events: 2 });
        assert_eq!(
            events,
            vec![
                TelemetryEvent::TestChar { value: 1 },
                TelemetryEvent::Empty { tag: EventTag::OpenPsid },
            ]
        );
    }

    #[test]
    fn verdict_serializes_with_tag() {
        let yaml = serde_yaml_ng::to_string(&IngestVerdict::Malformed { events: 2 }).unwrap();
        assert!(yaml.contains("verdict: malformed"));
        assert!(yaml.contains("events: 2"));
    }
}
