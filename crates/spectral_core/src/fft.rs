//! Radix-2 Cooley-Tukey FFT over [`Complex`] sequences.
//!
//! The forward transform is a recursive decimation-in-time butterfly. The
//! inverse is expressed through the forward engine using the conjugation
//! identity `ifft(x) = conj(fft(conj(x))) / n`, so there is exactly one
//! butterfly implementation to maintain.

use crate::complex::Complex;
use crate::error::{GridAxis, Result, SpectralError};
use crate::float_trait::SpectralFloat;

/// True for 1, 2, 4, 8, ... (zero is not a power of two).
#[inline]
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Smallest power of two `>= n`. `next_power_of_two(0) == 1`.
#[inline]
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Reject lengths the radix-2 engine cannot handle.
pub(crate) fn check_len(axis: GridAxis, len: usize) -> Result<()> {
    if is_power_of_two(len) {
        Ok(())
    } else {
        Err(SpectralError::InvalidSize { axis, len })
    }
}

/// Twiddle factor `e^{-2 pi i k / n}`.
#[inline]
fn twiddle<F: SpectralFloat>(k: usize, n: usize) -> Complex<F> {
    let angle = -F::from_f64_c(2.0) * F::PI * F::usize_as(k) / F::usize_as(n);
    Complex::from_polar(F::one(), angle)
}

/// Recursive butterfly. Callers guarantee `x.len()` is a power of two.
fn fft_recursive<F: SpectralFloat>(x: &[Complex<F>]) -> Vec<Complex<F>> {
    let n = x.len();
    if n == 1 {
        return vec![x[0]];
    }

    let half = n / 2;
    let even: Vec<Complex<F>> = x.iter().step_by(2).copied().collect();
    let odd: Vec<Complex<F>> = x.iter().skip(1).step_by(2).copied().collect();

    let even_fft = fft_recursive(&even);
    let odd_fft = fft_recursive(&odd);

    let mut result = vec![Complex::zero(); n];
    for k in 0..half {
        let term = twiddle::<F>(k, n) * odd_fft[k];
        result[k] = even_fft[k] + term;
        result[k + half] = even_fft[k] - term;
    }
    result
}

/// Forward transform without the length check. Callers must have validated
/// the length with [`check_len`].
pub(crate) fn forward_unchecked<F: SpectralFloat>(x: &[Complex<F>]) -> Vec<Complex<F>> {
    fft_recursive(x)
}

/// Inverse transform without the length check: conjugate, forward,
/// conjugate, scale by `1/n`.
pub(crate) fn inverse_unchecked<F: SpectralFloat>(x: &[Complex<F>]) -> Vec<Complex<F>> {
    let conjugated: Vec<Complex<F>> = x.iter().map(|z| z.conj()).collect();
    let norm = F::one() / F::usize_as(x.len());
    fft_recursive(&conjugated)
        .into_iter()
        .map(|z| z.conj().scale(norm))
        .collect()
}

/// Forward 1D DFT of a power-of-two length sequence.
///
/// Returns a new vector; the input is untouched. A length-1 input is returned
/// unchanged.
///
/// # Errors
/// [`SpectralError::InvalidSize`] if the length is zero or not a power of two.
/// The check happens before any recursion.
pub fn forward_1d<F: SpectralFloat>(x: &[Complex<F>]) -> Result<Vec<Complex<F>>> {
    check_len(GridAxis::Sequence, x.len())?;
    Ok(forward_unchecked(x))
}

/// Inverse 1D DFT, normalised by `1/n`.
///
/// # Errors
/// [`SpectralError::InvalidSize`] under the same conditions as [`forward_1d`].
pub fn inverse_1d<F: SpectralFloat>(x: &[Complex<F>]) -> Result<Vec<Complex<F>>> {
    check_len(GridAxis::Sequence, x.len())?;
    Ok(inverse_unchecked(x))
}
