use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use lpic::container::Container;
use lpic::pgm::Pgm;
use lpic::report::write_reports;
use lpic::{compute_metrics, decode, encode, sample, Predictor, Raster};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lossless predictive image codec")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run predictors over an image and write one text report per predictor
    Report {
        /// PGM input; the built-in 16x16 sample image is used when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory for LosslessCodec<N>.txt files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Only run this predictor (1-7 or name); all seven by default
        #[arg(long)]
        formula: Option<Predictor>,
    },
    /// Compress a PGM into an .lpic file
    Encode {
        input: PathBuf,
        output: PathBuf,

        /// Predictor (1-7 or name)
        #[arg(long, default_value = "planar")]
        formula: Predictor,
    },
    /// Decompress an .lpic file into a PGM
    Decode { input: PathBuf, output: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::Report {
            input,
            out_dir,
            formula,
        } => run_report(input.as_deref(), &out_dir, formula),
        Command::Encode {
            input,
            output,
            formula,
        } => run_encode(&input, &output, formula),
        Command::Decode { input, output } => run_decode(&input, &output),
    }
}

fn load_raster(input: Option<&Path>) -> Result<Raster> {
    match input {
        Some(path) => Pgm::open(path)
            .and_then(|pgm| pgm.to_raster())
            .with_context(|| format!("read PGM {}", path.display())),
        None => Ok(sample::image()),
    }
}

fn run_report(input: Option<&Path>, out_dir: &Path, formula: Option<Predictor>) -> Result<()> {
    let raster = load_raster(input)?;
    info!("Image size: {}", raster.dims());

    let predictors = match formula {
        Some(p) => vec![p],
        None => Predictor::ALL.to_vec(),
    };
    let reports = write_reports(&raster, &predictors, out_dir)
        .with_context(|| format!("write reports to {}", out_dir.display()))?;

    if let Some(best) = reports.iter().min_by_key(|r| r.packed_bits) {
        info!(
            "Best predictor: {} ({}) at {:.4} bits per pixel",
            best.predictor,
            best.predictor.formula(),
            best.metrics.avg_bits_per_pixel
        );
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn run_encode(input: &Path, output: &Path, predictor: Predictor) -> Result<()> {
    let raster = load_raster(Some(input))?;
    let bits = encode(&raster, predictor)
        .with_context(|| format!("encode {} with {}", input.display(), predictor))?;

    // Never write a stream that does not decode back to the input
    let decoded = decode(&bits, raster.dims(), predictor).context("verify encoded stream")?;
    if decoded != raster {
        bail!("round trip mismatch for {}", input.display());
    }
    let metrics = compute_metrics(&raster, &decoded, bits.len());

    ensure_parent(output)?;
    Container {
        dims: raster.dims(),
        predictor,
        bits,
    }
    .save(output)
    .with_context(|| format!("write {}", output.display()))?;

    info!(
        "Encoded {} ({}) -> {}: ratio {:.3}, {:.4} bits per pixel",
        input.display(),
        raster.dims(),
        output.display(),
        metrics.compression_ratio,
        metrics.avg_bits_per_pixel
    );
    Ok(())
}

fn run_decode(input: &Path, output: &Path) -> Result<()> {
    let container =
        Container::open(input).with_context(|| format!("read {}", input.display()))?;
    let raster = decode(&container.bits, container.dims, container.predictor)
        .with_context(|| format!("decode {}", input.display()))?;

    let pgm = Pgm::from_raster(&raster).context("decoded samples do not fit in 8 bits")?;
    ensure_parent(output)?;
    pgm.save(output, true)
        .with_context(|| format!("write {}", output.display()))?;

    info!(
        "Decoded {} ({}, {}) -> {}",
        input.display(),
        container.dims,
        container.predictor.formula(),
        output.display()
    );
    Ok(())
}
