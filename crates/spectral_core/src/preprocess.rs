//! Spatial preprocessing around the transform: grayscale reduction,
//! resampling to power-of-two sizes, checkerboard centring and conversion
//! back to displayable 8-bit intensities.

use log::debug;
use ndarray::{Array2, ArrayView2, ArrayView3};

use crate::complex::Complex;
use crate::error::{GridAxis, Result, SpectralError};
use crate::fft::{is_power_of_two, next_power_of_two};
use crate::float_trait::SpectralFloat;
use crate::transforms::ComplexGrid;

// =============================================================================
// Constants
// =============================================================================

/// ITU-R BT.601 luma weights.
const LUMA_RED: f64 = 0.299;
const LUMA_GREEN: f64 = 0.587;
const LUMA_BLUE: f64 = 0.114;

/// Largest 8-bit intensity.
const MAX_INTENSITY: f64 = 255.0;

// =============================================================================
// Types
// =============================================================================

/// Interpolation used when a grid is resampled to a new size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resampling {
    /// Nearest-neighbour: replicates source pixels.
    #[default]
    Nearest,
    /// Bilinear interpolation between the four surrounding source pixels.
    Bilinear,
}

// =============================================================================
// Grayscale
// =============================================================================

/// Reduce an `(height, width, channels)` RGB or RGBA image to luminance:
/// `round(0.299 R + 0.587 G + 0.114 B)`. A fourth (alpha) channel is ignored.
pub fn to_grayscale(rgb: ArrayView3<u8>) -> Result<Array2<u8>> {
    let (rows, cols, channels) = rgb.dim();
    if channels != 3 && channels != 4 {
        return Err(SpectralError::invalid_parameter(
            "channels",
            format!("expected 3 (RGB) or 4 (RGBA) channels, got {}", channels),
        ));
    }

    Ok(Array2::from_shape_fn((rows, cols), |(r, c)| {
        let luma = LUMA_RED * f64::from(rgb[[r, c, 0]])
            + LUMA_GREEN * f64::from(rgb[[r, c, 1]])
            + LUMA_BLUE * f64::from(rgb[[r, c, 2]]);
        luma.round().clamp(0.0, MAX_INTENSITY) as u8
    }))
}

/// Widen 8-bit intensities to floating-point samples.
pub fn gray_to_samples<F: SpectralFloat>(gray: ArrayView2<u8>) -> Array2<F> {
    gray.mapv(|v| F::usize_as(v as usize))
}

// =============================================================================
// Resampling
// =============================================================================

/// Map a destination pixel centre onto continuous source coordinates.
#[inline]
fn source_coordinate<F: SpectralFloat>(dst: usize, src_len: usize, dst_len: usize) -> F {
    let half = F::from_f64_c(0.5);
    let scale = F::usize_as(src_len) / F::usize_as(dst_len);
    (F::usize_as(dst) + half) * scale - half
}

#[inline]
fn nearest_index<F: SpectralFloat>(dst: usize, src_len: usize, dst_len: usize) -> usize {
    let pos = source_coordinate::<F>(dst, src_len, dst_len) + F::from_f64_c(0.5);
    pos.floor()
        .max(F::zero())
        .to_usize()
        .unwrap_or(0)
        .min(src_len - 1)
}

/// Neighbouring source indices and interpolation weight for one axis.
#[inline]
fn bilinear_taps<F: SpectralFloat>(dst: usize, src_len: usize, dst_len: usize) -> (usize, usize, F) {
    let max_pos = F::usize_as(src_len - 1);
    let pos = source_coordinate::<F>(dst, src_len, dst_len)
        .max(F::zero())
        .min(max_pos);
    let i0 = pos.floor().to_usize().unwrap_or(0).min(src_len - 1);
    let i1 = (i0 + 1).min(src_len - 1);
    (i0, i1, pos - F::usize_as(i0))
}

/// Resample a grid to `(rows, cols)`.
///
/// Pixel centres are aligned between source and destination and samples
/// outside the source are clamped to the edge. Resampling to the same size
/// returns an identical copy.
pub fn resize<F: SpectralFloat>(
    input: ArrayView2<F>,
    target: (usize, usize),
    method: Resampling,
) -> Result<Array2<F>> {
    let (src_rows, src_cols) = input.dim();
    if src_rows == 0 {
        return Err(SpectralError::InvalidSize {
            axis: GridAxis::Rows,
            len: 0,
        });
    }
    if src_cols == 0 {
        return Err(SpectralError::InvalidSize {
            axis: GridAxis::Cols,
            len: 0,
        });
    }
    let (dst_rows, dst_cols) = target;
    if dst_rows == 0 || dst_cols == 0 {
        return Err(SpectralError::invalid_parameter(
            "target",
            format!("target size {}x{} must be non-empty", dst_rows, dst_cols),
        ));
    }

    if target == (src_rows, src_cols) {
        return Ok(input.to_owned());
    }

    debug!(
        "resampling {}x{} -> {}x{} ({:?})",
        src_rows, src_cols, dst_rows, dst_cols, method
    );

    let output = match method {
        Resampling::Nearest => {
            let row_idx: Vec<usize> = (0..dst_rows)
                .map(|r| nearest_index::<F>(r, src_rows, dst_rows))
                .collect();
            let col_idx: Vec<usize> = (0..dst_cols)
                .map(|c| nearest_index::<F>(c, src_cols, dst_cols))
                .collect();
            Array2::from_shape_fn(target, |(r, c)| input[[row_idx[r], col_idx[c]]])
        }
        Resampling::Bilinear => {
            let row_taps: Vec<(usize, usize, F)> = (0..dst_rows)
                .map(|r| bilinear_taps(r, src_rows, dst_rows))
                .collect();
            let col_taps: Vec<(usize, usize, F)> = (0..dst_cols)
                .map(|c| bilinear_taps(c, src_cols, dst_cols))
                .collect();
            Array2::from_shape_fn(target, |(r, c)| {
                let (y0, y1, fy) = row_taps[r];
                let (x0, x1, fx) = col_taps[c];
                let one = F::one();
                input[[y0, x0]] * (one - fx) * (one - fy)
                    + input[[y0, x1]] * fx * (one - fy)
                    + input[[y1, x0]] * (one - fx) * fy
                    + input[[y1, x1]] * fx * fy
            })
        }
    };

    Ok(output)
}

/// Resample a grid up to the next power of two in each dimension.
///
/// This is a resize, not zero padding: the image content is stretched to fill
/// the new grid. Already-conforming grids are copied unchanged.
pub fn pad_to_power_of_two<F: SpectralFloat>(
    input: ArrayView2<F>,
    method: Resampling,
) -> Result<Array2<F>> {
    let (rows, cols) = input.dim();
    if is_power_of_two(rows) && is_power_of_two(cols) {
        return Ok(input.to_owned());
    }
    resize(
        input,
        (next_power_of_two(rows), next_power_of_two(cols)),
        method,
    )
}

// =============================================================================
// Centring
// =============================================================================

/// Multiply each sample by `(-1)^(i+j)`.
///
/// Applied before the forward transform this moves the zero-frequency bin to
/// `(rows/2, cols/2)`; applied after the inverse transform it undoes the
/// shift. It is its own inverse and only flips signs, so it is exact.
pub fn center_for_fft<F: SpectralFloat>(input: ArrayView2<F>) -> Array2<F> {
    let mut output = input.to_owned();
    for ((r, c), v) in output.indexed_iter_mut() {
        if (r + c) % 2 == 1 {
            *v = -*v;
        }
    }
    output
}

/// Checkerboard sign flip for complex grids.
pub fn center_complex<F: SpectralFloat>(input: ArrayView2<Complex<F>>) -> ComplexGrid<F> {
    let mut output = input.to_owned();
    for ((r, c), z) in output.indexed_iter_mut() {
        if (r + c) % 2 == 1 {
            *z = -*z;
        }
    }
    output
}

// =============================================================================
// Display conversion
// =============================================================================

/// Min-max normalise a grid onto `[0, 255]` (truncating) for display or saving.
/// A constant grid maps to all zeros.
pub fn to_display_intensity<F: SpectralFloat>(input: ArrayView2<F>) -> Array2<u8> {
    if input.is_empty() {
        return Array2::zeros(input.dim());
    }

    let min = input
        .iter()
        .copied()
        .fold(F::infinity(), |a, b| if b < a { b } else { a });
    let max = input
        .iter()
        .copied()
        .fold(F::neg_infinity(), |a, b| if b > a { b } else { a });

    let range = if max > min { max - min } else { F::one() };
    let scale = F::from_f64_c(MAX_INTENSITY) / range;

    input.mapv(|v| {
        let value = ((v - min) * scale).to_f64().unwrap_or(0.0);
        value.trunc().clamp(0.0, MAX_INTENSITY) as u8
    })
}
