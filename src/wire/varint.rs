//! Variable-length integer and float decoding
//!
//! Integers are split into 7-bit groups, least significant group first. The high
//! bit of each byte (`0x80`) says another group follows:
//!
//! ```text
//! 300 = 0b10_0101100  ->  [0xAC, 0x02]
//! ```
//!
//! A value of `N` bits never needs more than `ceil(N / 7)` groups. Anything longer,
//! or a final group carrying bits that do not fit in `N`, is rejected as
//! [`TelemetryError::MalformedVarint`].
//!
//! Signed values reuse the unsigned encoding and then apply
//! `(raw >> 1) ^ -(raw & 1)`, so raw `0, 1, 2, 3` decode to `0, -1, 1, -2`. The
//! shift is taken on the unsigned raw value.
//!
//! Floats are never varint encoded: they are four raw bytes in stream order,
//! interpreted as big-endian IEEE-754 single precision.

use super::BitCursor;
use crate::{Result, TelemetryError};

/// Maximum number of 7-bit groups for a value of `bits` width.
pub const fn max_groups(bits: u32) -> u32 {
    bits.div_ceil(7)
}

impl BitCursor<'_> {
    fn read_varint(&mut self, bits: u32) -> Result<u64> {
        let mut value = 0u64;

        for group in 0..max_groups(bits) {
            let byte = self.read_byte()?;
            let payload = u64::from(byte & 0x7f);
            let shift = 7 * group;

            // Bits of the final group that would land above the target width.
            if shift + 7 > bits && payload >> (bits - shift) != 0 {
                return Err(TelemetryError::MalformedVarint { bits, position: self.position() });
            }

            value |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(TelemetryError::MalformedVarint { bits, position: self.position() })
    }

    /// Read an unsigned 16-bit varint (at most 3 groups).
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_varint(u16::BITS).map(|v| v as u16)
    }

    /// Read an unsigned 32-bit varint (at most 5 groups).
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_varint(u32::BITS).map(|v| v as u32)
    }

    /// Read an unsigned 64-bit varint (at most 10 groups).
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_varint(u64::BITS)
    }

    /// Read a signed 32-bit varint.
    pub fn read_i32(&mut self) -> Result<i32> {
        let raw = self.read_u32()?;
        Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
    }

    /// Read a signed 64-bit varint.
    pub fn read_i64(&mut self) -> Result<i64> {
        let raw = self.read_u64()?;
        Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
    }

    /// Read a 32-bit varint and test it for non-zero.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u32()? != 0)
    }

    /// Read a single byte and test it for non-zero.
    pub fn read_flag_byte(&mut self) -> Result<bool> {
        Ok(self.read_byte()? != 0)
    }

    /// Read four bytes as a big-endian `f32`.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }
}
