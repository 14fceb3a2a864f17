//! Bit-addressable read cursor
//!
//! Bits are numbered least-significant first within each byte: bit `n` of the
//! stream is `(data[n >> 3] >> (n & 7)) & 1`. Byte reads at a byte boundary take
//! the underlying byte directly; anywhere else the byte is rebuilt one bit at a
//! time in the same order, so both paths agree for every offset.

use std::borrow::Cow;

use crate::{Result, TelemetryError};

/// Read cursor over an immutable byte buffer.
///
/// The position only moves forward and never passes the end of the buffer. A
/// single bit, byte or fixed-width read that would cross the end fails with
/// [`TelemetryError::BufferUnderrun`] and leaves the position untouched.
/// Varint and string reads are built from byte reads, so on underrun they have
/// already consumed the bytes before the end.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitCursor<'a> {
    /// Create a cursor positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current position in bits.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the buffer in bits.
    pub fn total_bits(&self) -> usize {
        self.data.len() * 8
    }

    /// Bits left before the end of the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.total_bits() - self.position
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.position % 8 == 0
    }

    fn ensure(&self, bits: usize) -> Result<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(TelemetryError::buffer_underrun(bits, available, self.position));
        }
        Ok(())
    }

    /// Advance the position without reading.
    pub fn skip_bits(&mut self, bits: usize) -> Result<()> {
        self.ensure(bits)?;
        self.position += bits;
        Ok(())
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.ensure(1)?;
        Ok(self.take_bit())
    }

    // Caller has already checked that at least one bit remains.
    fn take_bit(&mut self) -> bool {
        let byte = self.data[self.position >> 3];
        let bit = byte & (1 << (self.position & 7)) != 0;
        self.position += 1;
        bit
    }

    /// Read eight bits as a byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure(8)?;

        if self.is_byte_aligned() {
            let value = self.data[self.position >> 3];
            self.position += 8;
            return Ok(value);
        }

        let mut value = 0u8;
        for i in 0..8 {
            if self.take_bit() {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    /// Read `len` bytes.
    ///
    /// Borrows straight from the buffer when byte aligned; otherwise the bytes
    /// are rebuilt one at a time into an owned buffer.
    pub fn read_exact(&mut self, len: usize) -> Result<Cow<'a, [u8]>> {
        let bits = len.checked_mul(8).ok_or_else(|| {
            TelemetryError::buffer_underrun(usize::MAX, self.bits_remaining(), self.position)
        })?;
        self.ensure(bits)?;

        if self.is_byte_aligned() {
            let start = self.position >> 3;
            self.position += bits;
            return Ok(Cow::Borrowed(&self.data[start..start + len]));
        }

        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            bytes.push(self.read_byte()?);
        }
        Ok(Cow::Owned(bytes))
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N * 8)?;

        let mut out = [0u8; N];
        if self.is_byte_aligned() {
            let start = self.position >> 3;
            out.copy_from_slice(&self.data[start..start + N]);
            self.position += N * 8;
        } else {
            for byte in &mut out {
                *byte = self.read_byte()?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::shift_bits;
    use proptest::prelude::*;

    #[test]
    fn bits_are_little_endian_within_a_byte() {
        let data = [0b1010_0001u8];
        let mut cursor = BitCursor::new(&data);

        let bits: Vec<bool> = (0..8).map(|_| cursor.read_bit().unwrap()).collect();
        assert_eq!(bits, vec![true, false, false, false, false, true, false, true]);
        assert_eq!(cursor.bits_remaining(), 0);
    }

    #[test]
    fn unaligned_byte_spans_two_bytes() {
        // Logical bits start at bit 4 of the first byte.
        let data = [0xA0u8, 0x0B];
        let mut cursor = BitCursor::new(&data);
        cursor.skip_bits(4).unwrap();

        assert_eq!(cursor.read_byte().unwrap(), 0xBA);
        assert_eq!(cursor.position(), 12);
        assert_eq!(cursor.bits_remaining(), 4);
    }

    #[test]
    fn aligned_read_exact_borrows() {
        let data = [1u8, 2, 3, 4];
        let mut cursor = BitCursor::new(&data);
        cursor.skip_bits(8).unwrap();

        let bytes = cursor.read_exact(2).unwrap();
        assert!(matches!(bytes, Cow::Borrowed(_)));
        assert_eq!(&*bytes, &[2, 3]);
    }

    #[test]
    fn underrun_leaves_position_untouched() {
        let data = [0xFFu8, 0xFF];
        let mut cursor = BitCursor::new(&data);
        cursor.skip_bits(11).unwrap();

        let err = cursor.read_byte().unwrap_err();
        match err {
            TelemetryError::BufferUnderrun { requested_bits, available_bits, position } => {
                assert_eq!(requested_bits, 8);
                assert_eq!(available_bits, 5);
                assert_eq!(position, 11);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cursor.position(), 11);

        assert!(cursor.read_exact(1).is_err());
        assert!(cursor.read_array::<1>().is_err());
        assert_eq!(cursor.position(), 11);
    }

    #[test]
    fn empty_buffer_has_nothing_to_read() {
        let mut cursor = BitCursor::new(&[]);
        assert_eq!(cursor.bits_remaining(), 0);
        assert!(cursor.read_bit().is_err());
        assert_eq!(&*cursor.read_exact(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn huge_read_exact_is_an_underrun() {
        let data = [0u8; 4];
        let mut cursor = BitCursor::new(&data);
        assert!(matches!(
            cursor.read_exact(usize::MAX),
            Err(TelemetryError::BufferUnderrun { .. })
        ));
    }

    proptest! {
        #[test]
        fn aligned_and_bitwise_reads_agree(
            data in prop::collection::vec(any::<u8>(), 1..64),
            offset in 0usize..8,
            take in 0usize..64,
        ) {
            let take = take.min(data.len());

            let mut aligned = BitCursor::new(&data);
            let expected = aligned.read_exact(take).unwrap().into_owned();

            let shifted = shift_bits(&data, offset);
            let mut unaligned = BitCursor::new(&shifted);
            unaligned.skip_bits(offset).unwrap();
            let actual = unaligned.read_exact(take).unwrap().into_owned();

            prop_assert_eq!(expected, actual);
            prop_assert_eq!(aligned.position() + offset, unaligned.position());
        }

        #[test]
        fn read_array_matches_read_exact(
            data in prop::collection::vec(any::<u8>(), 20..40),
            offset in 0usize..8,
        ) {
            let shifted = shift_bits(&data, offset);

            let mut by_array = BitCursor::new(&shifted);
            by_array.skip_bits(offset).unwrap();
            let array: [u8; 20] = by_array.read_array().unwrap();

            let mut by_slice = BitCursor::new(&shifted);
            by_slice.skip_bits(offset).unwrap();
            let slice = by_slice.read_exact(20).unwrap();

            prop_assert_eq!(&array[..], &*slice);
            prop_assert_eq!(&array[..], &data[..20]);
        }

        #[test]
        fn position_never_exceeds_length(
            data in prop::collection::vec(any::<u8>(), 0..16),
            reads in prop::collection::vec(0u8..3, 0..64),
        ) {
            let mut cursor = BitCursor::new(&data);
            for read in reads {
                let before = cursor.position();
                let _ = match read {
                    0 => cursor.read_bit().map(|_| ()),
                    1 => cursor.read_byte().map(|_| ()),
                    _ => cursor.read_exact(3).map(|_| ()),
                };
                prop_assert!(cursor.position() >= before);
                prop_assert!(cursor.position() <= cursor.total_bits());
            }
        }
    }
}
