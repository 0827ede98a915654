//! Prediction residual transform.
//!
//! Border cells use fixed predictors: the first pixel is stored raw, the rest
//! of the first row is predicted from the left neighbour and the rest of the
//! first column from the pixel above. Interior cells use the selected
//! [`Predictor`].

use crate::grid::{Raster, ResidualGrid};
use crate::predictor::Predictor;
use crate::{LpicError, Result, BIT_DEPTH};

const MAX_SAMPLE: i32 = (1 << BIT_DEPTH) - 1;

/// Turn a raster into residuals. Neighbours are read from the original raster.
///
/// Fails with [`LpicError::UnknownSymbol`] on the first sample outside
/// `0..2^BIT_DEPTH`.
pub fn encode(raster: &Raster, predictor: Predictor) -> Result<ResidualGrid> {
    if let Some(&bad) = raster.iter().find(|&&x| !(0..=MAX_SAMPLE).contains(&x)) {
        return Err(LpicError::UnknownSymbol(bad));
    }

    raster.try_map(|row, col, &x| {
        let residual = match (row, col) {
            (0, 0) => x,
            (0, _) => x - raster[(0, col - 1)],
            (_, 0) => x - raster[(row - 1, 0)],
            _ => {
                let a = raster[(row, col - 1)];
                let b = raster[(row - 1, col)];
                let c = raster[(row - 1, col - 1)];
                x - predictor.predict(a, b, c)
            }
        };
        Ok(residual)
    })
}

/// Rebuild the raster from residuals.
///
/// Walks in the same row-major order as [`encode`] and feeds the predictor
/// with pixels that have already been reconstructed, never with residuals.
/// A reconstruction that overflows `i32` is reported as
/// [`LpicError::MalformedStream`] at that cell.
pub fn decode(residuals: &ResidualGrid, predictor: Predictor) -> Result<Raster> {
    let mut out = Raster::filled(residuals.dims(), 0)?;

    for row in 0..residuals.rows() {
        for col in 0..residuals.cols() {
            let dx = residuals[(row, col)];
            let x = match (row, col) {
                (0, 0) => Some(dx),
                (0, _) => out[(0, col - 1)].checked_add(dx),
                (_, 0) => out[(row - 1, 0)].checked_add(dx),
                _ => {
                    let a = out[(row, col - 1)];
                    let b = out[(row - 1, col)];
                    let c = out[(row - 1, col - 1)];
                    predictor
                        .checked_predict(a, b, c)
                        .and_then(|p| p.checked_add(dx))
                }
            };
            out[(row, col)] = x.ok_or(LpicError::MalformedStream {
                position: row * residuals.cols() + col,
                reason: "reconstructed sample overflows",
            })?;
        }
    }

    Ok(out)
}
