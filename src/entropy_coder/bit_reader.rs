//! Bit cursor over a [`BitSequence`].
//!
//! Reads are strictly left to right and never look past the bits they
//! return.

use super::bit_writer::BitSequence;

pub struct BitReader<'a> {
    src: &'a BitSequence,
    /// Index of the next bit to read
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(src: &'a BitSequence) -> Self {
        Self { src, pos: 0 }
    }

    /// Read one bit, or `None` at the end of the sequence.
    #[inline(always)]
    pub fn read_bit(&mut self) -> Option<bool> {
        let bit = self.src.get(self.pos)?;
        self.pos += 1;
        Some(bit)
    }

    /// Read `n` bits (at most 32) as an MSB-first integer.
    ///
    /// Returns `None` without consuming anything if fewer than `n` bits are left.
    pub fn read_bits(&mut self, n: u8) -> Option<u32> {
        debug_assert!(n <= 32);
        if self.remaining() < n as usize {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Some(value)
    }

    /// Advance the cursor by up to `n` bits.
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    /// Index of the next bit.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits not yet consumed.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.src.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let seq = BitSequence::default();
        let mut reader = BitReader::new(&seq);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.read_bit(), None);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_read_bits_msb_first() {
        let seq: BitSequence = "0110010011".parse().unwrap();
        let mut reader = BitReader::new(&seq);
        assert_eq!(reader.read_bits(8), Some(100));
        assert_eq!(reader.position(), 8);
        assert_eq!(reader.read_bit(), Some(true));
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_read_bits_short_does_not_consume() {
        let seq: BitSequence = "0110".parse().unwrap();
        let mut reader = BitReader::new(&seq);
        assert_eq!(reader.read_bits(8), None);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_bits(4), Some(0b0110));
    }

    #[test]
    fn test_skip_clamps_to_end() {
        let seq: BitSequence = "01".parse().unwrap();
        let mut reader = BitReader::new(&seq);
        reader.skip(5);
        assert_eq!(reader.remaining(), 0);
    }
}
