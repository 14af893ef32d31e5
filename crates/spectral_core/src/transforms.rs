//! 2D FFT orchestration over `ndarray` grids.
//!
//! The 2D DFT is separable: the forward transform runs the 1D engine over
//! every row and then every column, the inverse runs columns first and rows
//! second. Both dimensions must be powers of two; this is checked once, up
//! front, before any lane is touched.

use log::debug;
use ndarray::{Array2, ArrayView2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::complex::Complex;
use crate::error::{GridAxis, Result, SpectralError};
use crate::fft::{check_len, forward_unchecked, inverse_unchecked};
use crate::float_trait::SpectralFloat;

/// A rectangular grid of complex frequency bins (or complex samples).
pub type ComplexGrid<F> = Array2<Complex<F>>;

/// Minimum number of lanes (rows or columns) before a pass is spread over the
/// rayon pool. Smaller grids are faster sequentially.
const PARALLEL_LANE_THRESHOLD: usize = 256;

/// Check that both grid dimensions are powers of two.
pub fn check_transform_shape(rows: usize, cols: usize) -> Result<()> {
    check_len(GridAxis::Rows, rows)?;
    check_len(GridAxis::Cols, cols)
}

/// Check that two grids share a shape.
pub(crate) fn check_same_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SpectralError::DimensionMismatch { expected, actual })
    }
}

/// Run a 1D transform over every lane along `axis`, writing results back in place.
///
/// `Axis(0)` iterates rows (each lane is a row), `Axis(1)` iterates columns.
fn transform_lanes<F: SpectralFloat>(
    grid: &mut ComplexGrid<F>,
    axis: Axis,
    op: fn(&[Complex<F>]) -> Vec<Complex<F>>,
) {
    let run = |mut lane: ArrayViewMut1<Complex<F>>| {
        let buffer: Vec<Complex<F>> = lane.iter().copied().collect();
        for (dst, src) in lane.iter_mut().zip(op(&buffer)) {
            *dst = src;
        }
    };

    let lanes: Vec<_> = grid.axis_iter_mut(axis).collect();
    if lanes.len() >= PARALLEL_LANE_THRESHOLD {
        lanes.into_par_iter().for_each(run);
    } else {
        lanes.into_iter().for_each(run);
    }
}

/// Forward 2D FFT of a complex grid (rows, then columns). Unnormalised.
pub fn fft2d_complex<F: SpectralFloat>(input: ArrayView2<Complex<F>>) -> Result<ComplexGrid<F>> {
    let (rows, cols) = input.dim();
    check_transform_shape(rows, cols)?;
    debug!("forward 2D FFT on {}x{} grid", rows, cols);

    let mut output = input.to_owned();
    transform_lanes(&mut output, Axis(0), forward_unchecked::<F>);
    transform_lanes(&mut output, Axis(1), forward_unchecked::<F>);
    Ok(output)
}

/// Inverse 2D FFT of a complex grid (columns, then rows). Normalised by
/// `1/(rows*cols)` through the 1D inverse.
pub fn ifft2d_complex<F: SpectralFloat>(input: ArrayView2<Complex<F>>) -> Result<ComplexGrid<F>> {
    let (rows, cols) = input.dim();
    check_transform_shape(rows, cols)?;
    debug!("inverse 2D FFT on {}x{} grid", rows, cols);

    let mut output = input.to_owned();
    transform_lanes(&mut output, Axis(1), inverse_unchecked::<F>);
    transform_lanes(&mut output, Axis(0), inverse_unchecked::<F>);
    Ok(output)
}

/// Compute the 2D FFT of a real grid.
/// Each sample is lifted onto the real axis before transforming.
/// Returns the unnormalised spectrum.
pub fn fft2d<F: SpectralFloat>(input: ArrayView2<F>) -> Result<ComplexGrid<F>> {
    let (rows, cols) = input.dim();
    check_transform_shape(rows, cols)?;

    let lifted = input.mapv(|v| Complex::from_real(v));
    fft2d_complex(lifted.view())
}

/// Compute the inverse 2D FFT and keep the real part.
///
/// The imaginary part of the result is discarded without being checked; for a
/// spectrum with Hermitian symmetry it is floating-point noise, and for an
/// edited spectrum it is simply dropped.
pub fn ifft2d<F: SpectralFloat>(input: &ComplexGrid<F>) -> Result<Array2<F>> {
    let complex = ifft2d_complex(input.view())?;
    Ok(complex.mapv(|z| z.re))
}

/// Per-bin magnitude of a complex grid.
pub fn magnitude_grid<F: SpectralFloat>(input: &ComplexGrid<F>) -> Array2<F> {
    input.mapv(|z| z.magnitude())
}

/// Per-bin phase of a complex grid.
pub fn phase_grid<F: SpectralFloat>(input: &ComplexGrid<F>) -> Array2<F> {
    input.mapv(|z| z.phase())
}
