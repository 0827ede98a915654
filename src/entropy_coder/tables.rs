//! Static residual code table.
//!
//! Thirteen residuals in `-6..=6` map to fixed variable-length codes. The
//! codes are prefix-free: no code is a prefix of another, which is the only
//! property greedy decoding of a concatenated stream relies on. Entry order
//! does not matter for correctness.
//!
//! The first cell of a grid is not covered here; it is written as a raw
//! 8-bit value (see [`first_cell_code`]).

use std::fmt;

use super::bit_reader::BitReader;
use crate::{LpicError, Result};

/// Width of the raw first-cell field.
pub const FIRST_CELL_BITS: u8 = 8;

/// Longest code in [`CODE_TABLE`].
pub const MAX_CODE_BITS: u8 = 13;

pub const MIN_SYMBOL: i32 = -6;
pub const MAX_SYMBOL: i32 = 6;

/// A right-aligned bit pattern of `len` bits, written MSB first.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    pub bits: u16,
    pub len: u8,
}

impl Code {
    pub const fn new(bits: u16, len: u8) -> Self {
        Self { bits, len }
    }

    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.len as usize)
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}

/// Table entry: residual value and its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub symbol: i32,
    pub code: Code,
}

const fn entry(symbol: i32, bits: u16, len: u8) -> CodeEntry {
    CodeEntry {
        symbol,
        code: Code::new(bits, len),
    }
}

/// Residual codes, shortest first.
pub const CODE_TABLE: [CodeEntry; 13] = [
    entry(0, 0b1, 1),
    entry(1, 0b00, 2),
    entry(-1, 0b011, 3),
    entry(2, 0b0100, 4),
    entry(-2, 0b01011, 5),
    entry(3, 0b010100, 6),
    entry(-3, 0b0101011, 7),
    entry(4, 0b01010100, 8),
    entry(-4, 0b010101011, 9),
    entry(5, 0b0101010100, 10),
    entry(-5, 0b01010101011, 11),
    entry(6, 0b010101010100, 12),
    entry(-6, 0b0101010101011, 13),
];

/// Forward lookup keyed by `symbol - MIN_SYMBOL`.
static ENCODE_LUT: [Code; 13] = build_encode_lut();

const fn build_encode_lut() -> [Code; 13] {
    let mut lut = [Code::new(0, 0); 13];
    let mut i = 0;
    while i < CODE_TABLE.len() {
        let e = CODE_TABLE[i];
        lut[(e.symbol - MIN_SYMBOL) as usize] = e.code;
        i += 1;
    }
    lut
}

/// Code for a residual value.
///
/// Fails with [`LpicError::UnknownSymbol`] outside `MIN_SYMBOL..=MAX_SYMBOL`.
#[inline]
pub fn encode_symbol(value: i32) -> Result<Code> {
    if !(MIN_SYMBOL..=MAX_SYMBOL).contains(&value) {
        return Err(LpicError::UnknownSymbol(value));
    }
    Ok(ENCODE_LUT[(value - MIN_SYMBOL) as usize])
}

/// Residual value for an exact code, if the table has one.
pub fn symbol_for_code(code: Code) -> Option<i32> {
    CODE_TABLE
        .iter()
        .find(|e| e.code == code)
        .map(|e| e.symbol)
}

/// Read one code from `reader`, which must sit on a code boundary.
///
/// Bits are pulled one at a time and the accumulated prefix is checked
/// against the table after each bit, so nothing past the matched code is
/// read. Returns the residual and the number of bits consumed.
pub fn decode_symbol(reader: &mut BitReader<'_>) -> Result<(i32, u8)> {
    let start = reader.position();
    let mut acc = Code::new(0, 0);

    while acc.len < MAX_CODE_BITS {
        let bit = reader.read_bit().ok_or(LpicError::MalformedStream {
            position: start,
            reason: "stream ends inside a code",
        })?;
        acc = Code::new((acc.bits << 1) | u16::from(bit), acc.len + 1);

        if let Some(symbol) = symbol_for_code(acc) {
            return Ok((symbol, acc.len));
        }
    }

    Err(LpicError::MalformedStream {
        position: start,
        reason: "no code matches",
    })
}

/// Raw 8-bit code for the first pixel.
///
/// Fails with [`LpicError::UnknownSymbol`] if the value does not fit in
/// an unsigned byte.
pub fn first_cell_code(value: i32) -> Result<Code> {
    let byte = u8::try_from(value).map_err(|_| LpicError::UnknownSymbol(value))?;
    Ok(Code::new(u16::from(byte), FIRST_CELL_BITS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy_coder::bit_writer::BitWriter;

    #[test]
    fn test_codes_are_prefix_free() {
        for (i, x) in CODE_TABLE.iter().enumerate() {
            for (j, y) in CODE_TABLE.iter().enumerate() {
                if i != j {
                    assert!(
                        !x.code.is_prefix_of(&y.code),
                        "{} is a prefix of {}",
                        x.code,
                        y.code
                    );
                }
            }
        }
    }

    #[test]
    fn test_table_covers_alphabet_once() {
        let mut seen: Vec<i32> = CODE_TABLE.iter().map(|e| e.symbol).collect();
        seen.sort_unstable();
        assert_eq!(seen, (MIN_SYMBOL..=MAX_SYMBOL).collect::<Vec<_>>());
        assert_eq!(
            CODE_TABLE.iter().map(|e| e.code.len).max(),
            Some(MAX_CODE_BITS)
        );
    }

    #[test]
    fn test_code_strings() {
        assert_eq!(encode_symbol(0).unwrap().to_string(), "1");
        assert_eq!(encode_symbol(-1).unwrap().to_string(), "011");
        assert_eq!(encode_symbol(3).unwrap().to_string(), "010100");
        assert_eq!(encode_symbol(-6).unwrap().to_string(), "0101010101011");
    }

    #[test]
    fn test_encode_symbol_out_of_alphabet() {
        assert!(matches!(encode_symbol(7), Err(LpicError::UnknownSymbol(7))));
        assert!(matches!(encode_symbol(-7), Err(LpicError::UnknownSymbol(-7))));
    }

    #[test]
    fn test_decode_symbol_inverts_encode_symbol() {
        for value in MIN_SYMBOL..=MAX_SYMBOL {
            let code = encode_symbol(value).unwrap();
            let mut writer = BitWriter::new();
            writer.write_code(code);
            let bits = writer.finish();

            let mut reader = BitReader::new(&bits);
            assert_eq!(decode_symbol(&mut reader).unwrap(), (value, code.len));
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_decode_symbol_stops_at_code_boundary() {
        // "00" then "1": residual 1 followed by residual 0
        let bits = "001".parse().unwrap();
        let mut reader = BitReader::new(&bits);
        assert_eq!(decode_symbol(&mut reader).unwrap(), (1, 2));
        assert_eq!(reader.position(), 2);
        assert_eq!(decode_symbol(&mut reader).unwrap(), (0, 1));
    }

    #[test]
    fn test_decode_symbol_incomplete_code() {
        let bits = "0101".parse().unwrap();
        let mut reader = BitReader::new(&bits);
        reader.skip(1);
        // "101" -> "1" matches residual 0
        assert_eq!(decode_symbol(&mut reader).unwrap(), (0, 1));
        // "01" is a proper prefix of several codes
        assert!(matches!(
            decode_symbol(&mut reader),
            Err(LpicError::MalformedStream { position: 2, .. })
        ));
    }

    #[test]
    fn test_decode_symbol_no_match() {
        // 13 bits that are not a code: 0101010101010
        let bits = "0101010101010".parse().unwrap();
        let mut reader = BitReader::new(&bits);
        assert!(matches!(
            decode_symbol(&mut reader),
            Err(LpicError::MalformedStream { reason: "no code matches", .. })
        ));
    }

    #[test]
    fn test_first_cell_code() {
        assert_eq!(first_cell_code(100).unwrap().to_string(), "01100100");
        assert_eq!(first_cell_code(0).unwrap().to_string(), "00000000");
        assert!(matches!(first_cell_code(256), Err(LpicError::UnknownSymbol(256))));
        assert!(matches!(first_cell_code(-1), Err(LpicError::UnknownSymbol(-1))));
    }
}
