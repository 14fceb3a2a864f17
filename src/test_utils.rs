//! Test utilities for building telemetry payloads by hand
//!
//! [`PayloadBuilder`] writes the same encodings the clients do, so tests and
//! benchmarks can describe a stream field by field instead of as raw bytes.

#![cfg(any(test, feature = "benchmark"))]

use crate::schema::revision;
use crate::types::EventTag;
use crate::wire::HASH_LEN;

/// Player id written by [`PayloadBuilder::header`].
pub const TEST_PLAYER_ID: u32 = 1;

/// Slot written by [`PayloadBuilder::header`] for revisions that carry one.
pub const TEST_SLOT: (u32, u32) = (1, 2);

/// Encode `value` as 7-bit little-endian groups with a continuation bit.
pub fn encode_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(group);
            return out;
        }
        out.push(group | 0x80);
    }
}

/// Shift `data` left by `offset` bits in the stream's LSB-first order.
///
/// A cursor that skips `offset` bits of the result reads `data` again; the
/// last byte keeps `8 - offset` unused high bits.
pub fn shift_bits(data: &[u8], offset: usize) -> Vec<u8> {
    assert!(offset < 8, "offset must be below one byte");
    if offset == 0 {
        return data.to_vec();
    }

    let mut out = vec![0u8; data.len() + 1];
    for (i, &byte) in data.iter().enumerate() {
        out[i] |= byte << offset;
        out[i + 1] |= byte >> (8 - offset);
    }
    out
}

/// Fluent writer for telemetry payloads.
#[derive(Debug, Default, Clone)]
pub struct PayloadBuilder {
    bytes: Vec<u8>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a payload with a valid header for `revision`.
    ///
    /// The level hash is all zeroes and the slot is [`TEST_SLOT`].
    pub fn header(revision: u16) -> Self {
        let mut builder = Self::new().u16(revision).u32(TEST_PLAYER_ID);
        let fields = revision::header_fields(revision);
        if fields.contains(revision::HeaderFields::LEVEL_HASH) {
            builder = builder.bytes(&[0; HASH_LEN]);
        }
        if fields.contains(revision::HeaderFields::SLOT) {
            builder = builder.u32(TEST_SLOT.0).u32(TEST_SLOT.1);
        }
        builder
    }

    pub fn tag(self, tag: EventTag) -> Self {
        self.u32(tag.wire())
    }

    pub fn u16(self, value: u16) -> Self {
        self.u64(u64::from(value))
    }

    pub fn u32(self, value: u32) -> Self {
        self.u64(u64::from(value))
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.bytes.extend(encode_varint(value));
        self
    }

    pub fn i32(self, value: i32) -> Self {
        self.u32(((value << 1) ^ (value >> 31)) as u32)
    }

    pub fn i64(self, value: i64) -> Self {
        self.u64(((value << 1) ^ (value >> 63)) as u64)
    }

    /// Big-endian IEEE-754, the only non-varint number on the wire.
    pub fn f32(mut self, value: f32) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn f32s(self, values: &[f32]) -> Self {
        values.iter().fold(self, |builder, &value| builder.f32(value))
    }

    pub fn byte(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn bytes(mut self, values: &[u8]) -> Self {
        self.bytes.extend_from_slice(values);
        self
    }

    /// Zero-terminated string. Characters above U+00FF are not representable.
    pub fn string(mut self, value: &str) -> Self {
        self.bytes.extend(value.chars().map(|c| u8::try_from(c).unwrap_or(b'?')));
        self.bytes.push(0);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
