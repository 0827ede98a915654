//! Bit writer and the packed bit sequence it produces.
//!
//! Bits are stored MSB-first: the first bit written lands in the top bit of
//! the first byte. The sequence keeps its exact bit length, so no padding
//! bits ever reach the decoder.

use std::fmt;
use std::str::FromStr;

use super::tables::Code;
use crate::LpicError;

/// An exact-length, MSB-first packed sequence of bits.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSequence {
    bytes: Vec<u8>,
    len: usize,
}

impl BitSequence {
    /// Wrap packed bytes holding `len` bits.
    ///
    /// Returns `None` if `bytes` is too short for `len` bits. Bits past `len`
    /// in the last byte are cleared.
    pub fn from_bytes(mut bytes: Vec<u8>, len: usize) -> Option<Self> {
        let needed = len.div_ceil(8);
        if bytes.len() < needed {
            return None;
        }
        bytes.truncate(needed);
        if len % 8 != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - len % 8);
            }
        }
        Some(Self { bytes, len })
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes; the tail of the last byte is zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bit at `index`, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80u8 >> (index % 8)) != 0)
    }

    /// The first `len` bits, or the whole sequence if shorter.
    pub fn truncated(&self, len: usize) -> Self {
        let len = len.min(self.len);
        // from_bytes only fails when bytes are short, which cannot happen here
        Self::from_bytes(self.bytes.clone(), len).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSequence({} bits: {})", self.len, self)
    }
}

/// Parses a string of `0` and `1` characters.
impl FromStr for BitSequence {
    type Err = LpicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut writer = BitWriter::with_capacity(s.len().div_ceil(8));
        for ch in s.chars() {
            match ch {
                '0' => writer.write_bit(false),
                '1' => writer.write_bit(true),
                _ => return Err(LpicError::InvalidData),
            }
        }
        Ok(writer.finish())
    }
}

/// Appends bits MSB-first into a byte buffer.
pub struct BitWriter {
    output: Vec<u8>,
    /// Pending bits, packed at the MSB side
    bits: u64,
    /// Number of valid bits in `bits`
    count: u32,
    /// Total bits written so far
    written: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// `capacity` is in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            bits: 0,
            count: 0,
            written: 0,
        }
    }

    /// Write the low `num_bits` bits of `value`, most significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, num_bits: u8) {
        debug_assert!(num_bits <= 32);
        debug_assert!(
            num_bits == 32 || value >> num_bits == 0,
            "value has bits beyond num_bits: value={:#x}, num_bits={}",
            value,
            num_bits
        );

        if num_bits == 0 {
            return;
        }

        // Left-justify into the free space below the pending bits
        let shift = 64 - self.count - num_bits as u32;
        self.bits |= (value as u64) << shift;
        self.count += num_bits as u32;
        self.written += num_bits as usize;

        self.flush_bytes();
    }

    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(u32::from(bit), 1);
    }

    #[inline]
    pub fn write_code(&mut self, code: Code) {
        self.write_bits(u32::from(code.bits), code.len);
    }

    /// Move complete bytes from the container to the output.
    #[inline]
    fn flush_bytes(&mut self) {
        while self.count >= 8 {
            self.output.push((self.bits >> 56) as u8);
            self.bits <<= 8;
            self.count -= 8;
        }
    }

    /// Bits written so far.
    pub fn len(&self) -> usize {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Flush the partial byte (zero padded) and return the sequence.
    pub fn finish(mut self) -> BitSequence {
        if self.count > 0 {
            self.output.push((self.bits >> 56) as u8);
        }
        BitSequence {
            bytes: self.output,
            len: self.written,
        }
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_single_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xAB, 8);
        let output = writer.finish();
        assert_eq!(output.as_bytes(), &[0xAB]);
        assert_eq!(output.len(), 8);
    }

    #[test]
    fn test_write_multiple_small() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xF, 4);
        writer.write_bits(0xA, 4);
        writer.write_bits(0xBC, 8);
        let output = writer.finish();
        assert_eq!(output.as_bytes(), &[0xFA, 0xBC]);
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        let output = writer.finish();
        assert_eq!(output.as_bytes(), &[0b1010_0000]);
        assert_eq!(output.len(), 3);
        assert_eq!(output.to_string(), "101");
    }

    #[test]
    fn test_write_32_bits_across_pending() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1, 1);
        writer.write_bits(0x8000_0001, 32);
        let output = writer.finish();
        assert_eq!(output.len(), 33);
        assert_eq!(output.as_bytes(), &[0xC0, 0x00, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_write_code() {
        let mut writer = BitWriter::new();
        writer.write_code(Code::new(0b011, 3));
        writer.write_code(Code::new(0b1, 1));
        assert_eq!(writer.len(), 4);
        assert_eq!(writer.finish().to_string(), "0111");
    }

    #[test]
    fn test_parse_and_display() {
        let seq: BitSequence = "0110010011".parse().unwrap();
        assert_eq!(seq.len(), 10);
        assert_eq!(seq.to_string(), "0110010011");
        assert_eq!(seq.get(1), Some(true));
        assert_eq!(seq.get(10), None);
        assert!("01x".parse::<BitSequence>().is_err());
    }

    #[test]
    fn test_truncated() {
        let seq: BitSequence = "1111111111".parse().unwrap();
        let short = seq.truncated(9);
        assert_eq!(short.to_string(), "111111111");
        assert_eq!(short.as_bytes(), &[0xFF, 0x80]);
    }

    #[test]
    fn test_from_bytes() {
        let seq = BitSequence::from_bytes(vec![0xFF, 0xFF, 0x00], 12).unwrap();
        assert_eq!(seq.as_bytes(), &[0xFF, 0xF0]);
        assert!(BitSequence::from_bytes(vec![0xFF], 9).is_none());
    }
}
