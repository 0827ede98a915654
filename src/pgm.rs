//! Minimal 8-bit PGM (P2 plain / P5 binary) reading and writing.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::grid::{Grid, Raster};
use crate::{LpicError, Result};

pub struct Pgm {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Pgm {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read(BufReader::new(File::open(path)?))
    }

    pub fn read<R: BufRead>(mut reader: R) -> Result<Self> {
        let magic = next_token(&mut reader)?;
        let binary = match magic.as_str() {
            "P5" => true,
            "P2" => false,
            _ => return Err(LpicError::UnsupportedFormat),
        };

        let width = parse_header_value(&mut reader)?;
        let height = parse_header_value(&mut reader)?;
        let max_val = parse_header_value(&mut reader)?;
        if max_val != 255 {
            return Err(LpicError::UnsupportedFormat);
        }
        if width == 0 || height == 0 {
            return Err(LpicError::ImageDimensions);
        }

        let mut data = vec![0u8; width * height];
        if binary {
            // next_token consumed exactly one whitespace byte after maxval
            reader.read_exact(&mut data)?;
        } else {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            let values = text
                .split_whitespace()
                .map(|s| s.parse::<u8>().map_err(|_| LpicError::InvalidData))
                .collect::<Result<Vec<u8>>>()?;
            if values.len() != data.len() {
                return Err(LpicError::InvalidData);
            }
            data.copy_from_slice(&values);
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert a raster; every sample must fit in a byte.
    pub fn from_raster(raster: &Raster) -> Result<Self> {
        let data = raster
            .iter()
            .map(|&v| u8::try_from(v).map_err(|_| LpicError::InvalidData))
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self {
            width: raster.cols(),
            height: raster.rows(),
            data,
        })
    }

    pub fn to_raster(&self) -> Result<Raster> {
        Grid::from_vec(
            (self.height, self.width),
            self.data.iter().map(|&b| i32::from(b)).collect(),
        )
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, binary: bool) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write(&mut file, binary)?;
        file.flush()?;
        Ok(())
    }

    pub fn write<W: Write>(&self, out: &mut W, binary: bool) -> Result<()> {
        writeln!(out, "{}", if binary { "P5" } else { "P2" })?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        if binary {
            out.write_all(&self.data)?;
        } else {
            for row in self.data.chunks(self.width) {
                let line: Vec<String> = row.iter().map(|p| p.to_string()).collect();
                writeln!(out, "{}", line.join(" "))?;
            }
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn parse_header_value<R: BufRead>(reader: &mut R) -> Result<usize> {
    next_token(reader)?
        .parse()
        .map_err(|_| LpicError::InvalidData)
}

/// Next whitespace-delimited header token, skipping `#` comments.
///
/// Consumes the single whitespace byte that ends the token.
fn next_token<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        match byte[0] {
            b'#' if token.is_empty() => {
                let mut comment = Vec::new();
                reader.read_until(b'\n', &mut comment)?;
            }
            b if b.is_ascii_whitespace() => {
                if !token.is_empty() {
                    break;
                }
            }
            b => token.push(char::from(b)),
        }
    }

    if token.is_empty() {
        return Err(LpicError::InvalidData);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_plain_with_comment() {
        let text = "P2\n# made by hand\n3 2\n255\n1 2 3\n4 5 6\n";
        let pgm = Pgm::read(Cursor::new(text)).unwrap();
        assert_eq!((pgm.width(), pgm.height()), (3, 2));
        let raster = pgm.to_raster().unwrap();
        assert_eq!(raster[(1, 0)], 4);
    }

    #[test]
    fn test_binary_round_trip() {
        let raster: Raster = Grid::from_vec((2, 2), vec![0, 10, 200, 255]).unwrap();
        let mut buf = Vec::new();
        Pgm::from_raster(&raster).unwrap().write(&mut buf, true).unwrap();
        let back = Pgm::read(Cursor::new(buf)).unwrap().to_raster().unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn test_rejects_wide_samples() {
        let text = "P2\n1 1\n65535\n300\n";
        assert!(matches!(
            Pgm::read(Cursor::new(text)),
            Err(LpicError::UnsupportedFormat)
        ));
        let raster: Raster = Grid::from_vec((1, 1), vec![300]).unwrap();
        assert!(Pgm::from_raster(&raster).is_err());
    }

    #[test]
    fn test_rejects_other_magic() {
        assert!(matches!(
            Pgm::read(Cursor::new("P6\n1 1\n255\n")),
            Err(LpicError::UnsupportedFormat)
        ));
    }
}
