//! `.lpic` files: a short text header followed by the packed bits.
//!
//! ```text
//! <rows> <cols>\n
//! <predictor index>\n
//! <bit count>\n
//! <ceil(bit count / 8) bytes>
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::entropy_coder::tables::{FIRST_CELL_BITS, MAX_CODE_BITS};
use crate::entropy_coder::BitSequence;
use crate::grid::Dimensions;
use crate::predictor::Predictor;
use crate::{LpicError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub dims: Dimensions,
    pub predictor: Predictor,
    pub bits: BitSequence,
}

impl Container {
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{} {}", self.dims.rows, self.dims.cols)?;
        writeln!(out, "{}", self.predictor.index())?;
        writeln!(out, "{}", self.bits.len())?;
        out.write_all(self.bits.as_bytes())?;
        Ok(())
    }

    pub fn read<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut line = String::new();

        reader.read_line(&mut line)?;
        let dims: Vec<usize> = line
            .split_whitespace()
            .map(|s| s.parse().map_err(|_| LpicError::InvalidData))
            .collect::<Result<Vec<usize>>>()?;
        let dims = match dims.as_slice() {
            &[rows, cols] if rows > 0 && cols > 0 => Dimensions::new(rows, cols),
            _ => return Err(LpicError::ImageDimensions),
        };

        line.clear();
        reader.read_line(&mut line)?;
        let predictor = line
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Predictor::from_index)
            .ok_or(LpicError::InvalidData)?;

        line.clear();
        reader.read_line(&mut line)?;
        let bit_count: usize = line.trim().parse().map_err(|_| LpicError::InvalidData)?;

        // First cell plus the longest code for every other cell
        let max_bits = (dims.cell_count()? - 1)
            .checked_mul(usize::from(MAX_CODE_BITS))
            .and_then(|n| n.checked_add(usize::from(FIRST_CELL_BITS)))
            .ok_or(LpicError::ImageDimensions)?;
        if bit_count > max_bits {
            return Err(LpicError::InvalidData);
        }

        let byte_count = bit_count.div_ceil(8);
        let mut bytes = Vec::new();
        reader.take(byte_count as u64).read_to_end(&mut bytes)?;
        if bytes.len() < byte_count {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        let bits = BitSequence::from_bytes(bytes, bit_count).ok_or(LpicError::InvalidData)?;

        Ok(Self {
            dims,
            predictor,
            bits,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write(&mut file)?;
        file.flush()?;
        Ok(())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read(BufReader::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_layout() {
        let container = Container {
            dims: Dimensions::new(2, 3),
            predictor: Predictor::Average,
            bits: "101".parse().unwrap(),
        };
        let mut buf = Vec::new();
        container.write(&mut buf).unwrap();
        assert_eq!(&buf[..8], b"2 3\n7\n3\n");
        assert_eq!(buf[8], 0b1010_0000);
        assert_eq!(Container::read(Cursor::new(buf)).unwrap(), container);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.lpic");
        let container = Container {
            dims: Dimensions::square(4),
            predictor: Predictor::Planar,
            bits: "0110010011111".parse().unwrap(),
        };
        container.save(&path).unwrap();
        assert_eq!(Container::open(&path).unwrap(), container);
    }

    #[test]
    fn test_rejects_unknown_predictor() {
        let data = b"2 2\n9\n1\n\x80".to_vec();
        assert!(matches!(
            Container::read(Cursor::new(data)),
            Err(LpicError::InvalidData)
        ));
    }

    #[test]
    fn test_rejects_bit_count_beyond_grid() {
        // 2 x 2 holds at most 8 + 3 * 13 bits
        let data = b"2 2\n1\n48\n\xff\xff\xff\xff\xff\xff".to_vec();
        assert!(matches!(
            Container::read(Cursor::new(data)),
            Err(LpicError::InvalidData)
        ));
        let data = b"2 2\n1\n18446744073709551615\n".to_vec();
        assert!(matches!(
            Container::read(Cursor::new(data)),
            Err(LpicError::InvalidData)
        ));
    }

    #[test]
    fn test_huge_grid_with_short_payload() {
        let data = b"4194304 4194304\n1\n1000000000000\n\xff".to_vec();
        assert!(matches!(
            Container::read(Cursor::new(data)),
            Err(LpicError::Io(_))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let data = b"2 2\n1\n20\n\xff".to_vec();
        assert!(matches!(
            Container::read(Cursor::new(data)),
            Err(LpicError::Io(_))
        ));
    }
}
