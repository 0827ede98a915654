//! Compression statistics for one encode/decode run.

use std::fmt;

use crate::grid::Raster;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Raw bits over packed bits.
    pub compression_ratio: f64,
    /// Packed bits per pixel.
    pub avg_bits_per_pixel: f64,
    /// `sqrt(sum of squared differences) / pixel_count`.
    pub rms_error: f64,
}

impl Metrics {
    /// Statistics for `reconstructed` against `original`.
    ///
    /// `bit_depth` is the raw sample width used for the uncompressed size.
    /// Both rasters are expected to share one shape.
    pub fn compute(
        original: &Raster,
        reconstructed: &Raster,
        packed_bit_count: usize,
        bit_depth: u32,
    ) -> Self {
        debug_assert_eq!(original.dims(), reconstructed.dims());
        let pixel_count = original.len();
        let original_bits = bit_depth as usize * pixel_count;

        Self {
            compression_ratio: original_bits as f64 / packed_bit_count as f64,
            avg_bits_per_pixel: packed_bit_count as f64 / pixel_count as f64,
            rms_error: rms_error(original, reconstructed),
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compression ratio = {}", self.compression_ratio)?;
        writeln!(
            f,
            "Average bits per pixel in compressed image = {}",
            self.avg_bits_per_pixel
        )?;
        write!(f, "RMS error = {}", self.rms_error)
    }
}

/// Square root of the summed squared error, divided by the pixel count.
pub fn rms_error(original: &Raster, reconstructed: &Raster) -> f64 {
    let sum: f64 = original
        .iter()
        .zip(reconstructed.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    sum.sqrt() / original.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_identical_rasters() {
        let raster: Raster = Grid::filled((16, 16), 100).unwrap();
        let m = Metrics::compute(&raster, &raster, 263, 8);
        assert_eq!(m.rms_error, 0.0);
        assert_eq!(m.compression_ratio, 2048.0 / 263.0);
        assert_eq!(m.avg_bits_per_pixel, 263.0 / 256.0);
    }

    #[test]
    fn test_rms_error() {
        let a: Raster = Grid::from_vec((2, 2), vec![0, 0, 0, 0]).unwrap();
        let b: Raster = Grid::from_vec((2, 2), vec![3, 4, 0, 0]).unwrap();
        // sqrt(9 + 16) / 4
        assert_eq!(rms_error(&a, &b), 1.25);
    }
}
