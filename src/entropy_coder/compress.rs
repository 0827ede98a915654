//! Residuals to codes to a packed bit sequence.
//!
//! The encoding process:
//! 1. Map every residual to its code (the first cell gets a raw 8-bit field)
//! 2. Concatenate the codes row-major with no separators or length prefix

use super::bit_writer::{BitSequence, BitWriter};
use super::tables::{encode_symbol, first_cell_code};
use crate::grid::{CodeGrid, ResidualGrid};
use crate::Result;

/// Map residuals to per-cell codes.
///
/// Fails with [`crate::LpicError::UnknownSymbol`] on the first residual that
/// has no code; nothing is clamped or substituted.
pub fn encode_codes(residuals: &ResidualGrid) -> Result<CodeGrid> {
    residuals.try_map(|row, col, &value| {
        if row == 0 && col == 0 {
            first_cell_code(value)
        } else {
            encode_symbol(value)
        }
    })
}

/// Concatenate every code row-major.
pub fn pack(codes: &CodeGrid) -> BitSequence {
    let total_bits: usize = codes.iter().map(|c| c.len as usize).sum();
    let mut writer = BitWriter::with_capacity(total_bits.div_ceil(8));
    for &code in codes {
        writer.write_code(code);
    }
    writer.finish()
}

/// Residuals straight to a packed sequence.
pub fn compress(residuals: &ResidualGrid) -> Result<BitSequence> {
    Ok(pack(&encode_codes(residuals)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::LpicError;

    #[test]
    fn test_pack_length_is_sum_of_code_lengths() {
        let residuals: ResidualGrid = Grid::from_rows(&[[100, 1], [-1, 0]]).unwrap();
        let codes = encode_codes(&residuals).unwrap();
        let bits = pack(&codes);
        assert_eq!(bits.len(), 8 + 2 + 3 + 1);
        assert_eq!(bits.to_string(), "01100100000111");
    }

    #[test]
    fn test_first_cell_bypasses_table() {
        // 42 is far outside the residual alphabet but fine as a raw byte
        let residuals: ResidualGrid = Grid::from_vec((1, 2), vec![42, 0]).unwrap();
        assert_eq!(compress(&residuals).unwrap().to_string(), "001010101");
    }

    #[test]
    fn test_unknown_symbol_is_reported() {
        let residuals: ResidualGrid = Grid::from_vec((1, 3), vec![10, 0, 7]).unwrap();
        assert!(matches!(
            encode_codes(&residuals),
            Err(LpicError::UnknownSymbol(7))
        ));
    }
}
