//! End-to-end frequency-domain processing of grayscale images.
//!
//! Every operation here follows the same shape:
//!
//! 1. Resample the spatial grid up to power-of-two dimensions
//! 2. Centre it so the zero-frequency bin lands at `(rows/2, cols/2)`
//! 3. Forward 2D FFT
//! 4. Work in the frequency domain (filter, encode, denoise)
//! 5. Inverse 2D FFT, undo the centring, resample back to the input size

use log::{debug, warn};
use ndarray::{Array2, ArrayView2};

use crate::codec::{
    encode, DynamicRangeMode, EncodedSpectrum, SpectrumImage, DEFAULT_DYNAMIC_RANGE,
};
use crate::denoise::denoise_spectrum_image;
use crate::error::{GridAxis, Result, SpectralError};
use crate::filters::FrequencyFilter;
use crate::float_trait::SpectralFloat;
use crate::preprocess::{center_for_fft, pad_to_power_of_two, resize, Resampling};
use crate::transforms::{fft2d, ifft2d, ComplexGrid};

// =============================================================================
// Constants
// =============================================================================

/// Default edge-subtraction strength for periodic-noise removal.
const DEFAULT_DENOISE_STRENGTH: f64 = 0.1;

// =============================================================================
// Types
// =============================================================================

/// Configuration for the spectral pipeline.
#[derive(Debug, Clone)]
pub struct SpectralConfig<F: SpectralFloat> {
    /// Dynamic range `L` used to turn intensities back into magnitudes. Default: 10.0
    pub dynamic_range: F,
    /// Whether reconstruction uses `dynamic_range` or the true range. Default: Assumed
    pub range_mode: DynamicRangeMode,
    /// Edge-subtraction strength for [`remove_periodic_noise`]. Default: 0.1
    pub denoise_strength: F,
    /// Resampling used to reach power-of-two dimensions. Default: Nearest
    pub pad_resampling: Resampling,
    /// Resampling used to return to the input dimensions. Default: Bilinear
    pub restore_resampling: Resampling,
}

impl<F: SpectralFloat> Default for SpectralConfig<F> {
    fn default() -> Self {
        Self {
            dynamic_range: F::from_f64_c(DEFAULT_DYNAMIC_RANGE),
            range_mode: DynamicRangeMode::default(),
            denoise_strength: F::from_f64_c(DEFAULT_DENOISE_STRENGTH),
            pad_resampling: Resampling::Nearest,
            restore_resampling: Resampling::Bilinear,
        }
    }
}

impl<F: SpectralFloat> SpectralConfig<F> {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters.
    ///
    /// Every pipeline entry point calls this before touching the image.
    pub fn validate(&self) -> Result<()> {
        if !self.dynamic_range.is_finite() || self.dynamic_range <= F::zero() {
            return Err(SpectralError::invalid_parameter(
                "dynamic_range",
                "must be finite and > 0",
            ));
        }
        if !self.denoise_strength.is_finite() || self.denoise_strength <= F::zero() {
            return Err(SpectralError::invalid_parameter(
                "denoise_strength",
                "must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// A centred spectrum together with the geometry needed to map back.
#[derive(Debug, Clone)]
pub struct PreparedSpectrum<F: SpectralFloat> {
    /// Centred forward transform of the padded grid.
    pub spectrum: ComplexGrid<F>,
    /// Dimensions of the caller's grid.
    pub original_dims: (usize, usize),
    /// Power-of-two dimensions the transform ran at.
    pub padded_dims: (usize, usize),
}

/// Outputs of [`remove_periodic_noise`].
#[derive(Debug, Clone)]
pub struct DenoiseOutput<F: SpectralFloat> {
    /// Log-magnitude spectrum of the input.
    pub spectrum_image: SpectrumImage,
    /// The same spectrum after edge subtraction.
    pub denoised_spectrum_image: SpectrumImage,
    /// Reconstructed spatial image at the input dimensions.
    pub image: Array2<F>,
}

// =============================================================================
// Stages
// =============================================================================

fn check_non_empty(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 {
        return Err(SpectralError::InvalidSize {
            axis: GridAxis::Rows,
            len: 0,
        });
    }
    if cols == 0 {
        return Err(SpectralError::InvalidSize {
            axis: GridAxis::Cols,
            len: 0,
        });
    }
    Ok(())
}

/// Pad to power-of-two dimensions, centre, and run the forward transform.
pub fn prepare_spectrum<F: SpectralFloat>(
    gray: ArrayView2<F>,
    config: &SpectralConfig<F>,
) -> Result<PreparedSpectrum<F>> {
    let original_dims = gray.dim();
    check_non_empty(original_dims.0, original_dims.1)?;

    let padded = pad_to_power_of_two(gray, config.pad_resampling)?;
    let padded_dims = padded.dim();
    if padded_dims != original_dims {
        warn!(
            "resampling {}x{} input to {}x{} for the transform",
            original_dims.0, original_dims.1, padded_dims.0, padded_dims.1
        );
    }

    let spectrum = fft2d(center_for_fft(padded.view()).view())?;
    debug!("prepared {:?} spectrum", padded_dims);

    Ok(PreparedSpectrum {
        spectrum,
        original_dims,
        padded_dims,
    })
}

/// Inverse transform, undo the centring, and resample to `target_dims`.
pub fn reconstruct_image<F: SpectralFloat>(
    spectrum: &ComplexGrid<F>,
    target_dims: (usize, usize),
    config: &SpectralConfig<F>,
) -> Result<Array2<F>> {
    let spatial = center_for_fft(ifft2d(spectrum)?.view());
    resize(spatial.view(), target_dims, config.restore_resampling)
}

/// Log-magnitude spectrum image of a grayscale grid.
///
/// The image has the padded (power-of-two) dimensions.
pub fn spectrum_image<F: SpectralFloat>(
    gray: ArrayView2<F>,
    config: &SpectralConfig<F>,
) -> Result<SpectrumImage> {
    config.validate()?;
    let prepared = prepare_spectrum(gray, config)?;
    Ok(encode(prepared.spectrum.view()))
}

/// Apply a frequency filter and return the filtered image at the input size.
pub fn filter_image<F: SpectralFloat>(
    gray: ArrayView2<F>,
    filter: &FrequencyFilter<F>,
    config: &SpectralConfig<F>,
) -> Result<Array2<F>> {
    config.validate()?;
    let prepared = prepare_spectrum(gray, config)?;
    let filtered = filter.apply(prepared.spectrum.view());
    reconstruct_image(&filtered, prepared.original_dims, config)
}

/// Suppress periodic noise by subtracting Laplacian edges from the spectrum image.
///
/// Edges are scaled by [`SpectralConfig::denoise_strength`] before subtraction.
///
/// The denoised intensities are turned back into magnitudes with the
/// configured dynamic range and recombined with the original phase. In
/// [`DynamicRangeMode::Assumed`] the reconstruction is lossy even where no
/// edges were removed; the output brightness depends on how far the true range is
/// from the assumed one.
pub fn remove_periodic_noise<F: SpectralFloat>(
    gray: ArrayView2<F>,
    config: &SpectralConfig<F>,
) -> Result<DenoiseOutput<F>> {
    config.validate()?;
    let strength = config.denoise_strength.to_f64().ok_or_else(|| {
        SpectralError::invalid_parameter("denoise_strength", "not representable as f64")
    })?;
    let prepared = prepare_spectrum(gray, config)?;

    let encoded = EncodedSpectrum::encode(&prepared.spectrum);
    let denoised_image = denoise_spectrum_image(encoded.image.view(), strength)?;
    let denoised = encoded.with_image(denoised_image)?;

    let spectrum = denoised.reconstruct(config.range_mode, config.dynamic_range)?;
    let image = reconstruct_image(&spectrum, prepared.original_dims, config)?;

    Ok(DenoiseOutput {
        spectrum_image: encoded.image,
        denoised_spectrum_image: denoised.image,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterKind;

    fn arrays_approx_equal(a: &Array2<f64>, b: &Array2<f64>, tol: f64) -> bool {
        a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < tol)
    }

    fn test_image(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(r, c)| {
            let x = c as f64 / cols as f64;
            let y = r as f64 / rows as f64;
            128.0 + 60.0 * (2.0 * std::f64::consts::PI * x).sin() + 40.0 * y
        })
    }

    // ==================== Config ====================

    #[test]
    fn test_default_config() {
        let config = SpectralConfig::<f64>::new();
        assert_eq!(config.dynamic_range, 10.0);
        assert_eq!(config.range_mode, DynamicRangeMode::Assumed);
        assert_eq!(config.denoise_strength, 0.1);
        assert_eq!(config.pad_resampling, Resampling::Nearest);
        assert_eq!(config.restore_resampling, Resampling::Bilinear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SpectralConfig::<f64>::new();
        config.dynamic_range = 0.0;
        assert!(config.validate().is_err());

        let mut config = SpectralConfig::<f64>::new();
        config.denoise_strength = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_entry_points_validate_config() {
        let image = test_image(8, 8);
        let filter = FrequencyFilter::new(FilterKind::IdealLowPass, 2.0).unwrap();

        let mut config = SpectralConfig::<f64>::new();
        config.dynamic_range = f64::NAN;
        assert!(matches!(
            spectrum_image(image.view(), &config),
            Err(SpectralError::InvalidParameter {
                name: "dynamic_range",
                ..
            })
        ));
        assert!(matches!(
            filter_image(image.view(), &filter, &config),
            Err(SpectralError::InvalidParameter {
                name: "dynamic_range",
                ..
            })
        ));

        let mut config = SpectralConfig::<f64>::new();
        config.denoise_strength = 0.0;
        assert!(spectrum_image(image.view(), &config).is_err());
        assert!(filter_image(image.view(), &filter, &config).is_err());
    }

    // ==================== Prepare / Reconstruct ====================

    #[test]
    fn test_prepare_records_geometry() {
        let image = test_image(30, 50);
        let prepared = prepare_spectrum(image.view(), &SpectralConfig::new()).unwrap();
        assert_eq!(prepared.original_dims, (30, 50));
        assert_eq!(prepared.padded_dims, (32, 64));
        assert_eq!(prepared.spectrum.dim(), (32, 64));
    }

    #[test]
    fn test_prepare_centres_dc() {
        let image = Array2::from_elem((16, 16), 3.0f64);
        let prepared = prepare_spectrum(image.view(), &SpectralConfig::new()).unwrap();
        let peak = prepared.spectrum[[8, 8]];
        assert!((peak.re - 3.0 * 256.0).abs() < 1e-9);
        for ((u, v), bin) in prepared.spectrum.indexed_iter() {
            if (u, v) != (8, 8) {
                assert!(bin.magnitude() < 1e-9);
            }
        }
    }

    #[test]
    fn test_prepare_rejects_empty() {
        let image: Array2<f64> = Array2::zeros((0, 8));
        assert!(matches!(
            prepare_spectrum(image.view(), &SpectralConfig::new()),
            Err(SpectralError::InvalidSize {
                axis: GridAxis::Rows,
                len: 0
            })
        ));
    }

    #[test]
    fn test_prepare_reconstruct_roundtrip() {
        let image = test_image(32, 16);
        let config = SpectralConfig::new();
        let prepared = prepare_spectrum(image.view(), &config).unwrap();
        let back = reconstruct_image(&prepared.spectrum, prepared.original_dims, &config).unwrap();
        assert!(arrays_approx_equal(&image, &back, 1e-9));
    }

    // ==================== Filtering ====================

    #[test]
    fn test_impulse_end_to_end() {
        let mut image = Array2::<f64>::zeros((8, 8));
        image[[0, 0]] = 100.0;
        let config = SpectralConfig::new();

        let prepared = prepare_spectrum(image.view(), &config).unwrap();
        for bin in prepared.spectrum.iter() {
            assert!((bin.magnitude() - 100.0).abs() < 1e-9);
        }

        let filter = FrequencyFilter::new(FilterKind::GaussianLowPass, 1e6).unwrap();
        let filtered = filter.apply(prepared.spectrum.view());
        for (f, s) in filtered.iter().zip(prepared.spectrum.iter()) {
            assert!((*f - *s).magnitude() < 1e-6);
        }

        let back = filter_image(image.view(), &filter, &config).unwrap();
        assert!(arrays_approx_equal(&image, &back, 1e-6));
    }

    #[test]
    fn test_low_pass_smooths_checkerboard() {
        let image = Array2::from_shape_fn((16, 16), |(r, c)| {
            if (r + c) % 2 == 0 {
                200.0f64
            } else {
                50.0
            }
        });
        let filter = FrequencyFilter::new(FilterKind::IdealLowPass, 4.0).unwrap();
        let out = filter_image(image.view(), &filter, &SpectralConfig::new()).unwrap();
        // Centring moves the checkerboard to the corner bin; only the mean survives.
        for v in out.iter() {
            assert!((v - 125.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_filter_non_power_of_two_returns_input_size() {
        let image = test_image(20, 12);
        let filter = FrequencyFilter::new(FilterKind::GaussianHighPass, 5.0).unwrap();
        let out = filter_image(image.view(), &filter, &SpectralConfig::new()).unwrap();
        assert_eq!(out.dim(), (20, 12));
    }

    // ==================== Spectrum Image ====================

    #[test]
    fn test_spectrum_image_peak_at_center() {
        let image = test_image(16, 16);
        let spectrum = spectrum_image(image.view(), &SpectralConfig::new()).unwrap();
        assert_eq!(spectrum.dim(), (16, 16));
        assert_eq!(spectrum[[8, 8]], 255);
    }

    // ==================== Periodic Noise ====================

    #[test]
    fn test_remove_periodic_noise_shapes() {
        let image = test_image(24, 40);
        let out = remove_periodic_noise(image.view(), &SpectralConfig::new()).unwrap();
        assert_eq!(out.spectrum_image.dim(), (32, 64));
        assert_eq!(out.denoised_spectrum_image.dim(), (32, 64));
        assert_eq!(out.image.dim(), (24, 40));
        for (d, s) in out
            .denoised_spectrum_image
            .iter()
            .zip(out.spectrum_image.iter())
        {
            assert!(d <= s);
        }
    }

    #[test]
    fn test_remove_periodic_noise_rejects_bad_strength() {
        let image = test_image(8, 8);
        let mut config = SpectralConfig::new();
        config.denoise_strength = 0.0;
        assert!(matches!(
            remove_periodic_noise(image.view(), &config),
            Err(SpectralError::InvalidParameter {
                name: "denoise_strength",
                ..
            })
        ));
    }

    #[test]
    fn test_denoise_strength_comes_from_config() {
        let clean = test_image(32, 32);
        let noisy = Array2::from_shape_fn((32, 32), |(r, c)| {
            clean[[r, c]] + 30.0 * (2.0 * std::f64::consts::PI * 8.0 * c as f64 / 32.0).cos()
        });

        let mut weak = SpectralConfig::new();
        weak.denoise_strength = 0.1;
        let mut strong = SpectralConfig::new();
        strong.denoise_strength = 0.9;

        let weak_out = remove_periodic_noise(noisy.view(), &weak).unwrap();
        let strong_out = remove_periodic_noise(noisy.view(), &strong).unwrap();

        assert_eq!(weak_out.spectrum_image, strong_out.spectrum_image);
        assert_ne!(
            weak_out.denoised_spectrum_image,
            strong_out.denoised_spectrum_image
        );
        assert!(!arrays_approx_equal(&weak_out.image, &strong_out.image, 1e-9));
        for (s, w) in strong_out
            .denoised_spectrum_image
            .iter()
            .zip(weak_out.denoised_spectrum_image.iter())
        {
            assert!(s <= w);
        }
    }

    #[test]
    fn test_exact_range_suppresses_periodic_stripes() {
        let rows = 32;
        let cols = 32;
        let clean = test_image(rows, cols);
        let noisy = Array2::from_shape_fn((rows, cols), |(r, c)| {
            clean[[r, c]] + 30.0 * (2.0 * std::f64::consts::PI * 8.0 * c as f64 / cols as f64).cos()
        });

        let mut config = SpectralConfig::new();
        config.range_mode = DynamicRangeMode::Exact;
        config.denoise_strength = 1.0;
        let out = remove_periodic_noise(noisy.view(), &config).unwrap();

        // Stripe bins sit at (16, 16 +/- 8) in the centred spectrum.
        assert!(out.denoised_spectrum_image[[16, 24]] < out.spectrum_image[[16, 24]]);
        assert!(out.denoised_spectrum_image[[16, 8]] < out.spectrum_image[[16, 8]]);
        assert!(out.image.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_assumed_range_matches_manual_decode() {
        let image = test_image(8, 8);
        let mut config = SpectralConfig::new();
        config.denoise_strength = 0.5;
        let out = remove_periodic_noise(image.view(), &config).unwrap();

        let prepared = prepare_spectrum(image.view(), &config).unwrap();
        let decoded = crate::codec::decode(
            out.denoised_spectrum_image.view(),
            prepared.spectrum.view(),
            10.0,
        )
        .unwrap();
        let manual = reconstruct_image(&decoded, (8, 8), &config).unwrap();
        assert!(arrays_approx_equal(&out.image, &manual, 1e-9));
    }
}
