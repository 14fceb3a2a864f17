//! Payload writer for integration tests.
//!
//! The crate's own `test_utils` are only compiled for unit tests and
//! benchmarks, so integration tests carry this small copy of the encoder.

use poppet::EventTag;

#[derive(Debug, Default, Clone)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    /// Header for `revision` with player 1, a zero level hash and slot (1, 2).
    pub fn header(revision: u16) -> Self {
        let mut payload = Self::default().u32(u32::from(revision)).u32(1);
        if revision >= 0x12 {
            payload = payload.bytes(&[0; 20]);
        }
        if revision >= 0x13 {
            payload = payload.u32(1).u32(2);
        }
        payload
    }

    pub fn tag(self, tag: EventTag) -> Self {
        self.u32(tag.wire())
    }

    pub fn u32(mut self, mut value: u32) -> Self {
        loop {
            let group = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.bytes.push(group);
                return self;
            }
            self.bytes.push(group | 0x80);
        }
    }

    pub fn f32(mut self, value: f32) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn bytes(mut self, values: &[u8]) -> Self {
        self.bytes.extend_from_slice(values);
        self
    }

    pub fn string(mut self, value: &str) -> Self {
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
