//! Packed bit sequence back to codes and residuals.
//!
//! The stream carries no lengths, so cell boundaries are recovered by
//! matching codes greedily from the left. The first cell is always the next
//! 8 bits verbatim.

use super::bit_reader::BitReader;
use super::bit_writer::BitSequence;
use super::tables::{decode_symbol, encode_symbol, symbol_for_code, Code, FIRST_CELL_BITS};
use crate::grid::{CodeGrid, Dimensions, Grid, ResidualGrid};
use crate::{LpicError, Result};

/// Split `bits` into `dims.cell_count()` codes.
///
/// Fails with [`LpicError::MalformedStream`] if the sequence runs out before
/// the grid is full, if a position matches no code, or if bits are left over
/// once every cell is filled.
pub fn unpack(bits: &BitSequence, dims: Dimensions) -> Result<CodeGrid> {
    let cell_count = dims.cell_count()?;
    if cell_count == 0 {
        return Err(LpicError::ImageDimensions);
    }

    let mut reader = BitReader::new(bits);
    let first = reader
        .read_bits(FIRST_CELL_BITS)
        .ok_or(LpicError::MalformedStream {
            position: 0,
            reason: "stream shorter than the first cell",
        })?;

    // Every later cell takes at least one bit
    if reader.remaining() < cell_count - 1 {
        return Err(LpicError::MalformedStream {
            position: bits.len(),
            reason: "stream too short for the grid",
        });
    }

    let mut cells = Vec::with_capacity(cell_count);
    cells.push(Code::new(first as u16, FIRST_CELL_BITS));

    while cells.len() < cell_count {
        let (symbol, _) = decode_symbol(&mut reader)?;
        cells.push(encode_symbol(symbol)?);
    }

    if reader.remaining() > 0 {
        return Err(LpicError::MalformedStream {
            position: reader.position(),
            reason: "trailing bits after the last cell",
        });
    }

    Grid::from_vec(dims, cells)
}

/// Map codes back to residuals.
pub fn decode_codes(codes: &CodeGrid) -> Result<ResidualGrid> {
    codes.try_map(|row, col, &code| {
        if row == 0 && col == 0 {
            return Ok(i32::from(code.bits));
        }
        symbol_for_code(code).ok_or(LpicError::MalformedStream {
            position: row * codes.cols() + col,
            reason: "cell holds a code missing from the table",
        })
    })
}
