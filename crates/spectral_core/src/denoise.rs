//! Periodic-noise suppression on encoded spectrum images.
//!
//! Periodic noise in the spatial image shows up as isolated bright spikes in
//! the log-magnitude spectrum. A Laplacian responds strongly to such spikes
//! and weakly to the smooth bulk of the spectrum, so subtracting a scaled
//! edge map flattens the spikes while leaving the rest close to intact.

use log::debug;
use ndarray::{Array2, ArrayView2, Zip};

use crate::codec::SpectrumImage;
use crate::error::{Result, SpectralError};
use crate::transforms::check_same_shape;

/// 8-connected Laplacian.
pub const LAPLACIAN_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];

/// Absolute Laplacian response of a spectrum image, clamped to 255.
///
/// The one-pixel border has no full neighbourhood and is left at zero.
/// Images smaller than 3x3 therefore produce an all-zero edge map.
pub fn laplacian_edges(image: ArrayView2<u8>) -> SpectrumImage {
    let (rows, cols) = image.dim();
    let mut edges = Array2::zeros((rows, cols));
    if rows < 3 || cols < 3 {
        return edges;
    }

    for r in 1..rows - 1 {
        for c in 1..cols - 1 {
            let mut sum = 0i32;
            for (kr, kernel_row) in LAPLACIAN_KERNEL.iter().enumerate() {
                for (kc, &weight) in kernel_row.iter().enumerate() {
                    sum += weight * i32::from(image[[r + kr - 1, c + kc - 1]]);
                }
            }
            edges[[r, c]] = sum.unsigned_abs().min(255) as u8;
        }
    }
    edges
}

/// `clamp(trunc(s - strength * e), 0, 255)` per pixel.
///
/// # Errors
/// - [`SpectralError::DimensionMismatch`] if the two images differ in shape.
/// - [`SpectralError::InvalidParameter`] if `strength` is not finite and positive.
pub fn subtract_edges(
    spectrum: ArrayView2<u8>,
    edges: ArrayView2<u8>,
    strength: f64,
) -> Result<SpectrumImage> {
    check_same_shape(spectrum.dim(), edges.dim())?;
    check_strength(strength)?;

    let mut output = Array2::zeros(spectrum.raw_dim());
    Zip::from(&mut output)
        .and(&spectrum)
        .and(&edges)
        .for_each(|out, &s, &e| {
            let value = (f64::from(s) - strength * f64::from(e)).trunc();
            *out = value.clamp(0.0, 255.0) as u8;
        });
    Ok(output)
}

fn check_strength(strength: f64) -> Result<()> {
    if strength.is_finite() && strength > 0.0 {
        Ok(())
    } else {
        Err(SpectralError::invalid_parameter(
            "strength",
            format!("must be finite and > 0, got {}", strength),
        ))
    }
}

/// Edge detection followed by edge subtraction.
pub fn denoise_spectrum_image(image: ArrayView2<u8>, strength: f64) -> Result<SpectrumImage> {
    check_strength(strength)?;
    let edges = laplacian_edges(image);
    let denoised = subtract_edges(image, edges.view(), strength)?;
    debug!(
        "denoised {}x{} spectrum image (strength {}, peak edge {})",
        image.nrows(),
        image.ncols(),
        strength,
        edges.iter().copied().max().unwrap_or(0)
    );
    Ok(denoised)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Laplacian ====================

    #[test]
    fn test_flat_image_has_no_edges() {
        let image = Array2::from_elem((6, 6), 120u8);
        assert!(laplacian_edges(image.view()).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_single_spike_response() {
        let mut image = Array2::zeros((5, 5));
        image[[2, 2]] = 10u8;
        let edges = laplacian_edges(image.view());

        assert_eq!(edges[[2, 2]], 80);
        // Neighbours see -10, absolute value taken
        assert_eq!(edges[[1, 1]], 10);
        assert_eq!(edges[[2, 3]], 10);
        assert_eq!(edges[[3, 1]], 10);
    }

    #[test]
    fn test_response_clamped_to_255() {
        let mut image = Array2::zeros((3, 3));
        image[[1, 1]] = 200u8;
        assert_eq!(laplacian_edges(image.view())[[1, 1]], 255);
    }

    #[test]
    fn test_border_untouched() {
        let mut image = Array2::zeros((4, 4));
        image[[0, 0]] = 255u8;
        image[[3, 2]] = 255u8;
        let edges = laplacian_edges(image.view());
        for c in 0..4 {
            assert_eq!(edges[[0, c]], 0);
            assert_eq!(edges[[3, c]], 0);
        }
        for r in 0..4 {
            assert_eq!(edges[[r, 0]], 0);
            assert_eq!(edges[[r, 3]], 0);
        }
        // Interior still sees the border spikes
        assert_eq!(edges[[1, 1]], 255);
    }

    #[test]
    fn test_tiny_images_have_empty_edge_map() {
        let image = Array2::from_elem((2, 8), 255u8);
        assert!(laplacian_edges(image.view()).iter().all(|&v| v == 0));
    }

    // ==================== Subtraction ====================

    #[test]
    fn test_subtract_truncates_and_clamps() {
        let spectrum = Array2::from_shape_vec((1, 3), vec![100u8, 10, 255]).unwrap();
        let edges = Array2::from_shape_vec((1, 3), vec![15u8, 200, 0]).unwrap();
        let out = subtract_edges(spectrum.view(), edges.view(), 0.5).unwrap();
        // 100 - 7.5 = 92.5 -> 92, 10 - 100 -> 0, 255 - 0 -> 255
        assert_eq!(out.as_slice().unwrap(), &[92, 0, 255]);
    }

    #[test]
    fn test_subtract_rejects_shape_mismatch() {
        let a = Array2::zeros((4, 4));
        let b = Array2::zeros((4, 5));
        assert_eq!(
            subtract_edges(a.view(), b.view(), 0.1).unwrap_err(),
            SpectralError::DimensionMismatch {
                expected: (4, 4),
                actual: (4, 5)
            }
        );
    }

    #[test]
    fn test_strength_must_be_positive() {
        let image = Array2::from_elem((4, 4), 50u8);
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                denoise_spectrum_image(image.view(), bad),
                Err(SpectralError::InvalidParameter { name: "strength", .. })
            ));
        }
    }

    // ==================== Full Denoise ====================

    #[test]
    fn test_denoise_flattens_spike_only() {
        let mut image = Array2::from_elem((7, 7), 100u8);
        image[[3, 3]] = 130;
        let denoised = denoise_spectrum_image(image.view(), 1.0).unwrap();

        // Spike: 8*130 - 8*100 = 240 -> 130 - 240 clamps to 0
        assert_eq!(denoised[[3, 3]], 0);
        // Neighbour: |800 - 700 - 130| = 30 -> 70
        assert_eq!(denoised[[2, 2]], 70);
        // Far from the spike: untouched
        assert_eq!(denoised[[1, 5]], 100);
        assert_eq!(denoised[[0, 0]], 100);
    }

    #[test]
    fn test_denoise_never_increases_intensity() {
        let image = Array2::from_shape_fn((16, 16), |(r, c)| ((r * 37 + c * 91) % 256) as u8);
        let denoised = denoise_spectrum_image(image.view(), 0.3).unwrap();
        for (d, s) in denoised.iter().zip(image.iter()) {
            assert!(d <= s);
        }
    }
}
