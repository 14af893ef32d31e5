//! Frequency-domain filter bank.
//!
//! All filters assume a centred spectrum (zero frequency at
//! `(rows/2, cols/2)`, see [`crate::preprocess::center_for_fft`]) and return a
//! new grid of the same shape; the input is never modified.
//!
//! - **Ideal** filters use a hard cutoff radius. The discontinuity produces
//!   ringing in the spatial result, which is the expected behaviour of an
//!   ideal filter.
//! - **Gaussian** filters scale each bin by a smooth real transfer function,
//!   which leaves every bin's phase untouched.

use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};
use rayon::prelude::*;

use crate::complex::Complex;
use crate::error::{Result, SpectralError};
use crate::float_trait::SpectralFloat;
use crate::transforms::ComplexGrid;

/// Minimum row count before the per-bin pass runs on the rayon pool.
const PARALLEL_ROW_THRESHOLD: usize = 256;

/// Frequency filter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Keep bins with `d <= r`.
    IdealLowPass,
    /// Keep bins with `d > r`. A radius of zero keeps every bin.
    ///
    /// Discontinuous at `r = 0`: any positive radius, however small, drops the
    /// centre bin, while `r = 0` keeps it. At `r = 0` this is therefore not the
    /// complement of [`FilterKind::IdealLowPass`]; both keep the centre bin.
    IdealHighPass,
    /// `H = exp(-d^2 / (2 d0^2))`.
    GaussianLowPass,
    /// `H = 1 - exp(-d^2 / (2 d0^2))`.
    GaussianHighPass,
}

impl FilterKind {
    /// Name of the scalar parameter for this family (used in error messages).
    pub fn parameter_name(self) -> &'static str {
        match self {
            Self::IdealLowPass | Self::IdealHighPass => "radius",
            Self::GaussianLowPass | Self::GaussianHighPass => "cutoff",
        }
    }
}

/// A validated filter: a family plus its radius / cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyFilter<F: SpectralFloat> {
    kind: FilterKind,
    parameter: F,
}

impl<F: SpectralFloat> FrequencyFilter<F> {
    /// Build a filter, rejecting parameters the transfer function cannot use.
    ///
    /// Ideal filters accept any finite radius `>= 0`. Gaussian filters need a
    /// finite cutoff `> 0`.
    pub fn new(kind: FilterKind, parameter: F) -> Result<Self> {
        let name = kind.parameter_name();
        if !parameter.is_finite() {
            return Err(SpectralError::invalid_parameter(
                name,
                format!("must be finite, got {}", parameter),
            ));
        }
        match kind {
            FilterKind::IdealLowPass | FilterKind::IdealHighPass if parameter < F::zero() => {
                Err(SpectralError::invalid_parameter(
                    name,
                    format!("must be >= 0, got {}", parameter),
                ))
            }
            FilterKind::GaussianLowPass | FilterKind::GaussianHighPass
                if parameter <= F::zero() =>
            {
                Err(SpectralError::invalid_parameter(
                    name,
                    format!("must be > 0, got {}", parameter),
                ))
            }
            _ => Ok(Self { kind, parameter }),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn parameter(&self) -> F {
        self.parameter
    }

    /// Transfer function value at bin `(u, v)` of a `rows x cols` spectrum.
    pub fn transfer(&self, u: usize, v: usize, rows: usize, cols: usize) -> F {
        let d_sq = distance_sq_from_center::<F>(u, v, rows, cols);
        match self.kind {
            FilterKind::IdealLowPass => {
                if d_sq.sqrt() <= self.parameter {
                    F::one()
                } else {
                    F::zero()
                }
            }
            FilterKind::IdealHighPass => {
                if self.parameter == F::zero() || d_sq.sqrt() > self.parameter {
                    F::one()
                } else {
                    F::zero()
                }
            }
            FilterKind::GaussianLowPass => self.gaussian(d_sq),
            FilterKind::GaussianHighPass => F::one() - self.gaussian(d_sq),
        }
    }

    #[inline]
    fn gaussian(&self, d_sq: F) -> F {
        let two = F::from_f64_c(2.0);
        (-d_sq / (two * self.parameter * self.parameter)).exp()
    }

    /// Apply the filter to a centred spectrum, returning a new spectrum.
    pub fn apply(&self, spectrum: ArrayView2<Complex<F>>) -> ComplexGrid<F> {
        let (rows, cols) = spectrum.dim();
        debug!(
            "applying {:?} ({}={}) to {}x{} spectrum",
            self.kind,
            self.kind.parameter_name(),
            self.parameter,
            rows,
            cols
        );

        let mut output: ComplexGrid<F> = Array2::from_elem((rows, cols), Complex::zero());
        let filter_row =
            |u: usize, mut out_row: ArrayViewMut1<Complex<F>>, in_row: ArrayView1<Complex<F>>| {
                Zip::indexed(&mut out_row)
                    .and(&in_row)
                    .for_each(|v, out, &bin| {
                        *out = self.apply_bin(bin, self.transfer(u, v, rows, cols));
                    });
            };

        if rows >= PARALLEL_ROW_THRESHOLD {
            let out_rows: Vec<_> = output.axis_iter_mut(Axis(0)).collect();
            let in_rows: Vec<_> = spectrum.axis_iter(Axis(0)).collect();
            out_rows
                .into_par_iter()
                .zip(in_rows.into_par_iter())
                .enumerate()
                .for_each(|(u, (out_row, in_row))| filter_row(u, out_row, in_row));
        } else {
            for (u, (out_row, in_row)) in output
                .axis_iter_mut(Axis(0))
                .zip(spectrum.axis_iter(Axis(0)))
                .enumerate()
            {
                filter_row(u, out_row, in_row);
            }
        }

        output
    }

    /// Ideal filters copy or zero a bin outright; Gaussian filters scale it.
    #[inline]
    fn apply_bin(&self, bin: Complex<F>, gain: F) -> Complex<F> {
        match self.kind {
            FilterKind::IdealLowPass | FilterKind::IdealHighPass => {
                if gain > F::zero() {
                    bin
                } else {
                    Complex::zero()
                }
            }
            FilterKind::GaussianLowPass | FilterKind::GaussianHighPass => bin.scale(gain),
        }
    }
}

/// Squared Euclidean distance from `(u, v)` to the spectrum centre
/// `(rows/2, cols/2)` (integer division).
#[inline]
pub fn distance_sq_from_center<F: SpectralFloat>(u: usize, v: usize, rows: usize, cols: usize) -> F {
    let du = F::isize_as(u as isize - (rows / 2) as isize);
    let dv = F::isize_as(v as isize - (cols / 2) as isize);
    du * du + dv * dv
}

/// Ideal low-pass: keep bins within `radius` of the centre.
pub fn ideal_low_pass<F: SpectralFloat>(
    spectrum: ArrayView2<Complex<F>>,
    radius: F,
) -> Result<ComplexGrid<F>> {
    Ok(FrequencyFilter::new(FilterKind::IdealLowPass, radius)?.apply(spectrum))
}

/// Ideal high-pass: keep bins farther than `radius` from the centre.
pub fn ideal_high_pass<F: SpectralFloat>(
    spectrum: ArrayView2<Complex<F>>,
    radius: F,
) -> Result<ComplexGrid<F>> {
    Ok(FrequencyFilter::new(FilterKind::IdealHighPass, radius)?.apply(spectrum))
}

/// Gaussian low-pass with cutoff `d0`.
pub fn gaussian_low_pass<F: SpectralFloat>(
    spectrum: ArrayView2<Complex<F>>,
    cutoff: F,
) -> Result<ComplexGrid<F>> {
    Ok(FrequencyFilter::new(FilterKind::GaussianLowPass, cutoff)?.apply(spectrum))
}

/// Gaussian high-pass with cutoff `d0`.
pub fn gaussian_high_pass<F: SpectralFloat>(
    spectrum: ArrayView2<Complex<F>>,
    cutoff: F,
) -> Result<ComplexGrid<F>> {
    Ok(FrequencyFilter::new(FilterKind::GaussianHighPass, cutoff)?.apply(spectrum))
}
