//! Plain-text reports of a full encode/decode run.
//!
//! One report per predictor, listing every intermediate grid followed by the
//! compression statistics.

use std::fmt::{Display, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::grid::{Grid, Raster};
use crate::predictor::Predictor;
use crate::{compute_metrics, decode_stages, encode_stages, Metrics, Result};

/// Default column width for numeric grids.
pub const CELL_WIDTH: usize = 5;

/// Column width for code grids (wide enough for a 13-bit code).
pub const CODE_CELL_WIDTH: usize = 14;

const RULE: &str = "--------------------------------------------------";

/// Render a grid one row per line, cells left-aligned in `cell_width` columns.
/// The last cell of a row is not padded.
pub fn format_grid<T: Display>(grid: &Grid<T>, cell_width: usize) -> String {
    let mut out = String::new();
    for row in grid.row_slices() {
        let last = row.len() - 1;
        for (i, cell) in row.iter().enumerate() {
            if i < last {
                let _ = write!(out, "{:<width$}", cell.to_string(), width = cell_width);
            } else {
                let _ = writeln!(out, "{}", cell);
            }
        }
    }
    out
}

/// Outcome of one predictor run.
pub struct Report {
    pub predictor: Predictor,
    pub metrics: Metrics,
    pub packed_bits: usize,
    pub text: String,
}

impl Report {
    /// Encode and decode `raster` with `predictor`, recording every stage.
    pub fn generate(raster: &Raster, predictor: Predictor) -> Result<Self> {
        let encoded = encode_stages(raster, predictor)?;
        let decoded = decode_stages(&encoded.bits, raster.dims(), predictor)?;
        let metrics = compute_metrics(raster, &decoded.raster, encoded.bits.len());

        let mut text = String::new();
        let _ = writeln!(
            text,
            "Prediction formula {}: {}",
            predictor.index(),
            predictor.formula()
        );
        let _ = writeln!(text);
        section(&mut text, "Original image:", &format_grid(raster, CELL_WIDTH));
        section(
            &mut text,
            "Image encoded as differences:",
            &format_grid(&encoded.residuals, CELL_WIDTH),
        );
        section(
            &mut text,
            "Image encoded with codes:",
            &format_grid(&encoded.codes, CODE_CELL_WIDTH),
        );
        section(
            &mut text,
            "Image encoded as a binary sequence:",
            &encoded.bits.to_string(),
        );
        let _ = writeln!(text, "END OF ENCODE PROCESS");
        let _ = writeln!(text, "{}", RULE);
        let _ = writeln!(text, "DECODING ENCODED IMAGE:");
        section(
            &mut text,
            "Decoded image as codes:",
            &format_grid(&decoded.codes, CODE_CELL_WIDTH),
        );
        section(
            &mut text,
            "Decoded image as differences:",
            &format_grid(&decoded.residuals, CELL_WIDTH),
        );
        section(
            &mut text,
            "Final decoded image:",
            &format_grid(&decoded.raster, CELL_WIDTH),
        );
        let _ = writeln!(text);
        let _ = writeln!(text, "{}", RULE);
        let _ = writeln!(text, "COMPRESSION STATISTICS");
        let _ = writeln!(text, "{}", metrics);

        debug!(
            "{}: {} bits, ratio {:.3}",
            predictor,
            encoded.bits.len(),
            metrics.compression_ratio
        );

        Ok(Self {
            predictor,
            metrics,
            packed_bits: encoded.bits.len(),
            text,
        })
    }

    /// File name used when writing into a directory, e.g. `LosslessCodec4.txt`.
    pub fn file_name(&self) -> String {
        format!("LosslessCodec{}.txt", self.predictor.index())
    }

    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        fs::write(&path, &self.text)?;
        info!(
            "Results with prediction formula {} written to {}",
            self.predictor.index(),
            path.display()
        );
        Ok(path)
    }
}

fn section(text: &mut String, title: &str, body: &str) {
    let _ = writeln!(text, "{}", title);
    let _ = writeln!(text, "{}", body);
}

/// Run every predictor in `predictors` and write one report each into `dir`.
pub fn write_reports<P: AsRef<Path>>(
    raster: &Raster,
    predictors: &[Predictor],
    dir: P,
) -> Result<Vec<Report>> {
    fs::create_dir_all(dir.as_ref())?;
    predictors
        .iter()
        .map(|&p| -> Result<Report> {
            let report = Report::generate(raster, p)?;
            report.write_to_dir(dir.as_ref())?;
            Ok(report)
        })
        .collect()
}
