//! Async adapter over [`EventDecoder`]
//!
//! Decoding never blocks, so the stream is always ready; it exists so hosts that
//! already pipe uploads through `futures` combinators can treat one like any
//! other source.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use futures::stream::FusedStream;

use crate::Result;
use crate::decoder::{DecodeOutcome, EventDecoder};
use crate::types::{TelemetryEvent, TelemetryHeader};

/// Stream of events from one upload. Ends after an unknown tag or the first error.
#[derive(Debug, Clone)]
pub struct EventStream<'a> {
    decoder: EventDecoder<'a>,
    done: bool,
}

impl<'a> EventStream<'a> {
    pub fn header(&self) -> &TelemetryHeader {
        self.decoder.header()
    }

    /// Terminal outcome once the stream has ended.
    pub fn outcome(&self) -> Option<DecodeOutcome> {
        self.decoder.outcome()
    }

    pub fn unknown_tag(&self) -> Option<u32> {
        self.decoder.unknown_tag()
    }

    pub fn into_inner(self) -> EventDecoder<'a> {
        self.decoder
    }
}

impl<'a> EventDecoder<'a> {
    /// Turn this decoder into a [`Stream`].
    pub fn into_stream(self) -> EventStream<'a> {
        EventStream { decoder: self, done: false }
    }
}

impl Stream for EventStream<'_> {
    type Item = Result<TelemetryEvent>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let next = this.decoder.next();
        if next.is_none() {
            this.done = true;
        }
        Poll::Ready(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done { (0, Some(0)) } else { (0, None) }
    }
}

impl FusedStream for EventStream<'_> {
    fn is_terminated(&self) -> bool {
        self.done
    }
}
