use thiserror::Error;

pub mod container;
pub mod entropy_coder;
pub mod grid;
pub mod metrics;
pub mod pgm;
pub mod predictor;
pub mod report;
pub mod residual;
pub mod sample;

pub use entropy_coder::{BitSequence, Code};
pub use grid::{CodeGrid, Dimensions, Grid, Raster, ResidualGrid};
pub use metrics::Metrics;
pub use predictor::Predictor;

/// Raw sample width in bits.
pub const BIT_DEPTH: u32 = 8;

#[derive(Error, Debug)]
pub enum LpicError {
    #[error("Residual {0} has no code")]
    UnknownSymbol(i32),
    #[error("Malformed bit stream at bit {position}: {reason}")]
    MalformedStream {
        position: usize,
        reason: &'static str,
    },
    #[error("Invalid image dimensions")]
    ImageDimensions,
    #[error("Unsupported format")]
    UnsupportedFormat,
    #[error("Invalid argument")]
    InvalidArgument,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid data")]
    InvalidData,
}

pub type Result<T> = std::result::Result<T, LpicError>;

/// Every intermediate of one encode run, in pipeline order.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub residuals: ResidualGrid,
    pub codes: CodeGrid,
    pub bits: BitSequence,
}

/// Every intermediate of one decode run, in pipeline order.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub codes: CodeGrid,
    pub residuals: ResidualGrid,
    pub raster: Raster,
}

/// Raster to packed bits with the given predictor.
pub fn encode(raster: &Raster, predictor: Predictor) -> Result<BitSequence> {
    Ok(encode_stages(raster, predictor)?.bits)
}

/// Packed bits back to a raster of shape `dims`.
///
/// `predictor` must be the one used to encode.
pub fn decode(
    bits: &BitSequence,
    dims: impl Into<Dimensions>,
    predictor: Predictor,
) -> Result<Raster> {
    Ok(decode_stages(bits, dims.into(), predictor)?.raster)
}

pub fn encode_stages(raster: &Raster, predictor: Predictor) -> Result<Encoded> {
    let residuals = residual::encode(raster, predictor)?;
    let codes = entropy_coder::encode_codes(&residuals)?;
    let bits = entropy_coder::pack(&codes);
    Ok(Encoded {
        residuals,
        codes,
        bits,
    })
}

pub fn decode_stages(
    bits: &BitSequence,
    dims: Dimensions,
    predictor: Predictor,
) -> Result<Decoded> {
    let codes = entropy_coder::unpack(bits, dims)?;
    let residuals = entropy_coder::decode_codes(&codes)?;
    let raster = residual::decode(&residuals, predictor)?;
    Ok(Decoded {
        codes,
        residuals,
        raster,
    })
}

/// Statistics for a run at [`BIT_DEPTH`] bits per raw sample.
pub fn compute_metrics(original: &Raster, reconstructed: &Raster, packed_bit_count: usize) -> Metrics {
    Metrics::compute(original, reconstructed, packed_bit_count, BIT_DEPTH)
}
