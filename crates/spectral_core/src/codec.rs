//! Spectrum codec: log-compressed 8-bit spectrum images and their lossy inverse.
//!
//! Encoding maps each bin's magnitude to
//! `round(255 * ln(1 + |X|) / ln(1 + max|X|))`. The image carries no phase
//! and no record of `max|X|`, so [`decode`] rebuilds magnitudes against an
//! assumed dynamic range `L`:
//!
//! ```text
//! |X| ~= exp(intensity / 255 * L) - 1
//! ```
//!
//! and takes phase from a reference spectrum. Unless `L` happens to equal the
//! encoder's `ln(1 + max|X|)` the recovered magnitudes are scaled on a log
//! axis, and 8-bit quantisation loses the rest. This precision loss is
//! accepted. [`EncodedSpectrum`] keeps the true maximum alongside the image for
//! callers that want [`DynamicRangeMode::Exact`] reconstruction instead.

use log::debug;
use ndarray::{Array2, ArrayView2, Zip};

use crate::complex::Complex;
use crate::error::{Result, SpectralError};
use crate::float_trait::SpectralFloat;
use crate::transforms::{check_same_shape, phase_grid, ComplexGrid};

/// 8-bit log-magnitude image of a spectrum, same shape as the spectrum.
pub type SpectrumImage = Array2<u8>;

/// Assumed maximum log magnitude used by [`decode`] when nothing better is known.
pub const DEFAULT_DYNAMIC_RANGE: f64 = 10.0;

const MAX_INTENSITY: f64 = 255.0;

/// Which dynamic range to use when turning intensities back into magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DynamicRangeMode {
    /// Use a fixed, caller-supplied range (lossy, reproducible from the image alone).
    #[default]
    Assumed,
    /// Use the `ln(1 + max|X|)` recorded at encode time.
    Exact,
}

/// `ln(1 + max|X|)` over the spectrum (zero for an all-zero spectrum).
pub fn max_log_magnitude<F: SpectralFloat>(spectrum: ArrayView2<Complex<F>>) -> F {
    let max_mag = spectrum
        .iter()
        .map(|bin| bin.magnitude())
        .fold(F::zero(), F::max);
    max_mag.ln_1p()
}

/// Encode a spectrum as a log-compressed 8-bit image.
///
/// An all-zero spectrum encodes to an all-zero image.
pub fn encode<F: SpectralFloat>(spectrum: ArrayView2<Complex<F>>) -> SpectrumImage {
    let max_log = max_log_magnitude(spectrum);
    debug!(
        "encoding {}x{} spectrum, max log magnitude {}",
        spectrum.nrows(),
        spectrum.ncols(),
        max_log
    );
    encode_with_max_log(spectrum, max_log)
}

fn encode_with_max_log<F: SpectralFloat>(
    spectrum: ArrayView2<Complex<F>>,
    max_log: F,
) -> SpectrumImage {
    if max_log <= F::zero() {
        return Array2::zeros(spectrum.raw_dim());
    }
    let scale = F::from_f64_c(MAX_INTENSITY) / max_log;
    spectrum.map(|bin| quantise(bin.magnitude().ln_1p() * scale))
}

#[inline]
fn quantise<F: SpectralFloat>(value: F) -> u8 {
    let clamped = value
        .round()
        .max(F::zero())
        .min(F::from_f64_c(MAX_INTENSITY));
    clamped.to_u8().unwrap_or(0)
}

/// Inverse of the log compression for a single intensity: `exp(i/255 * L) - 1`.
#[inline]
pub fn intensity_to_magnitude<F: SpectralFloat>(intensity: u8, dynamic_range: F) -> F {
    let normalized = F::usize_as(intensity as usize) / F::from_f64_c(MAX_INTENSITY);
    (normalized * dynamic_range).exp_m1()
}

fn check_dynamic_range<F: SpectralFloat>(dynamic_range: F) -> Result<()> {
    if dynamic_range.is_finite() && dynamic_range > F::zero() {
        Ok(())
    } else {
        Err(SpectralError::invalid_parameter(
            "dynamic_range",
            format!("must be finite and > 0, got {}", dynamic_range),
        ))
    }
}

/// Rebuild bins from magnitudes derived from `image` and the per-bin `phase`.
fn rebuild<F: SpectralFloat>(
    image: ArrayView2<u8>,
    phase: ArrayView2<F>,
    dynamic_range: F,
) -> ComplexGrid<F> {
    let mut output = Array2::from_elem(image.raw_dim(), Complex::zero());
    Zip::from(&mut output)
        .and(&image)
        .and(&phase)
        .for_each(|out, &intensity, &angle| {
            *out = Complex::from_polar(intensity_to_magnitude(intensity, dynamic_range), angle);
        });
    output
}

/// Approximate inverse of [`encode`].
///
/// Magnitudes come from `image` under the assumed `dynamic_range`; phases
/// come from `reference`, never from the image.
///
/// # Errors
/// - [`SpectralError::DimensionMismatch`] if `image` and `reference` differ in shape.
/// - [`SpectralError::InvalidParameter`] if `dynamic_range` is not finite and positive.
pub fn decode<F: SpectralFloat>(
    image: ArrayView2<u8>,
    reference: ArrayView2<Complex<F>>,
    dynamic_range: F,
) -> Result<ComplexGrid<F>> {
    check_same_shape(reference.dim(), image.dim())?;
    check_dynamic_range(dynamic_range)?;
    let phase = reference.map(|bin| bin.phase());
    Ok(rebuild(image, phase.view(), dynamic_range))
}

/// A spectrum image paired with the side information needed to invert it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSpectrum<F: SpectralFloat> {
    /// The displayable (and editable) log-magnitude image.
    pub image: SpectrumImage,
    /// Per-bin phase of the encoded spectrum.
    pub phase: Array2<F>,
    /// `ln(1 + max|X|)` at encode time.
    pub max_log: F,
}

impl<F: SpectralFloat> EncodedSpectrum<F> {
    pub fn encode(spectrum: &ComplexGrid<F>) -> Self {
        let max_log = max_log_magnitude(spectrum.view());
        Self {
            image: encode_with_max_log(spectrum.view(), max_log),
            phase: phase_grid(spectrum),
            max_log,
        }
    }

    /// Replace the image (e.g. after editing or denoising), keeping phase and range.
    pub fn with_image(&self, image: SpectrumImage) -> Result<Self> {
        check_same_shape(self.image.dim(), image.dim())?;
        Ok(Self {
            image,
            phase: self.phase.clone(),
            max_log: self.max_log,
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.image.dim()
    }

    /// Rebuild a complex spectrum from the image and the stored phase.
    ///
    /// `Assumed` uses `assumed_range` and matches [`decode`] with the original
    /// spectrum as reference. `Exact` uses [`Self::max_log`]; an all-zero
    /// source spectrum then rebuilds to zeros.
    pub fn reconstruct(&self, mode: DynamicRangeMode, assumed_range: F) -> Result<ComplexGrid<F>> {
        let range = match mode {
            DynamicRangeMode::Assumed => {
                check_dynamic_range(assumed_range)?;
                assumed_range
            }
            DynamicRangeMode::Exact => self.max_log,
        };
        Ok(rebuild(self.image.view(), self.phase.view(), range))
    }
}
