//! `spectral`: frequency-domain processing of TIFF images from the command line.

mod loader;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use ndarray::Array2;
use std::path::{Path, PathBuf};

use spectral_core::preprocess::{gray_to_samples, to_display_intensity};
use spectral_core::{
    filter_image, remove_periodic_noise, spectrum_image, DynamicRangeMode, FilterKind,
    FrequencyFilter, SpectralConfig,
};

use loader::{load_gray_tiff, save_gray_tiff};

#[derive(Debug, Parser)]
#[command(name = "spectral", version, about = "Frequency-domain image filtering and spectrum editing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the log-magnitude spectrum of an image.
    Spectrum { input: PathBuf, output: PathBuf },
    /// Apply a frequency filter. Several `--param` values write numbered outputs.
    Filter {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum)]
        kind: FilterArg,
        /// Radius (ideal) or cutoff D0 (gaussian).
        #[arg(long = "param", required = true, num_args = 1..)]
        params: Vec<f64>,
    },
    /// Suppress periodic noise by editing the spectrum image.
    Denoise {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 0.1)]
        strength: f64,
        /// Also write the spectrum images before and after edge subtraction.
        #[arg(long)]
        spectrum_out: Option<PathBuf>,
        /// Decode with the true maximum log magnitude instead of the assumed range.
        #[arg(long)]
        exact_range: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    IdealLow,
    IdealHigh,
    GaussianLow,
    GaussianHigh,
}

impl From<FilterArg> for FilterKind {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::IdealLow => FilterKind::IdealLowPass,
            FilterArg::IdealHigh => FilterKind::IdealHighPass,
            FilterArg::GaussianLow => FilterKind::GaussianLowPass,
            FilterArg::GaussianHigh => FilterKind::GaussianHighPass,
        }
    }
}

fn load_samples(path: &Path) -> Result<Array2<f64>> {
    let gray = load_gray_tiff(path).with_context(|| format!("loading {}", path.display()))?;
    info!("loaded {} ({}x{})", path.display(), gray.nrows(), gray.ncols());
    Ok(gray_to_samples(gray.view()))
}

fn save(path: &Path, image: &Array2<u8>) -> Result<()> {
    save_gray_tiff(path, image).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

/// `out.tif` -> `out_2.tif` for the second of several outputs.
fn numbered_path(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    path.with_file_name(name)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = SpectralConfig::<f64>::new();

    match cli.command {
        Commands::Spectrum { input, output } => {
            let samples = load_samples(&input)?;
            let spectrum = spectrum_image(samples.view(), &config)?;
            save(&output, &spectrum)?;
        }
        Commands::Filter {
            input,
            output,
            kind,
            params,
        } => {
            let samples = load_samples(&input)?;
            for (i, &param) in params.iter().enumerate() {
                let filter = FrequencyFilter::new(kind.into(), param)?;
                let filtered = filter_image(samples.view(), &filter, &config)?;
                let path = if params.len() == 1 {
                    output.clone()
                } else {
                    numbered_path(&output, i + 1)
                };
                info!("{:?} with parameter {}", filter.kind(), param);
                save(&path, &to_display_intensity(filtered.view()))?;
            }
        }
        Commands::Denoise {
            input,
            output,
            strength,
            spectrum_out,
            exact_range,
        } => {
            config.denoise_strength = strength;
            if exact_range {
                config.range_mode = DynamicRangeMode::Exact;
            }
            config.validate()?;

            let samples = load_samples(&input)?;
            let result = remove_periodic_noise(samples.view(), &config)?;
            save(&output, &to_display_intensity(result.image.view()))?;

            if let Some(path) = spectrum_out {
                save(&numbered_path(&path, 1), &result.spectrum_image)?;
                save(&numbered_path(&path, 2), &result.denoised_spectrum_image)?;
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
