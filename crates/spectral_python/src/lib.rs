//! PyO3 Python bindings for spectral_core.
//!
//! All algorithm logic is in spectral_core; this crate only handles
//! Python/NumPy type conversions.

use numpy::{Complex64, PyArray2, PyReadonlyArray2, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use spectral_core::{
    DynamicRangeMode, FilterKind, FrequencyFilter, SpectralConfig, SpectralError,
};

fn to_py_err(e: SpectralError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_kind(kind: &str) -> PyResult<FilterKind> {
    match kind {
        "ideal_low" => Ok(FilterKind::IdealLowPass),
        "ideal_high" => Ok(FilterKind::IdealHighPass),
        "gaussian_low" => Ok(FilterKind::GaussianLowPass),
        "gaussian_high" => Ok(FilterKind::GaussianHighPass),
        other => Err(PyValueError::new_err(format!(
            "unknown filter kind '{}', expected ideal_low, ideal_high, gaussian_low or gaussian_high",
            other
        ))),
    }
}

fn config(exact_range: bool) -> SpectralConfig<f64> {
    let mut config = SpectralConfig::new();
    if exact_range {
        config.range_mode = DynamicRangeMode::Exact;
    }
    config
}

/// Forward 2D FFT of a real array with power-of-two dimensions.
#[pyfunction]
pub fn fft2d<'py>(py: Python<'py>, input: PyReadonlyArray2<f64>) -> PyResult<&'py PyArray2<Complex64>> {
    let spectrum = spectral_core::fft2d(input.as_array()).map_err(to_py_err)?;
    Ok(spectrum.mapv(|z| Complex64::new(z.re, z.im)).to_pyarray(py))
}

/// Inverse 2D FFT; returns the real part.
#[pyfunction]
pub fn ifft2d<'py>(py: Python<'py>, input: PyReadonlyArray2<Complex64>) -> PyResult<&'py PyArray2<f64>> {
    let spectrum = input
        .as_array()
        .mapv(|z| spectral_core::Complex::new(z.re, z.im));
    let output = spectral_core::ifft2d(&spectrum).map_err(to_py_err)?;
    Ok(output.to_pyarray(py))
}

/// Multiply by (-1)^(i+j).
#[pyfunction]
pub fn center_for_fft<'py>(py: Python<'py>, input: PyReadonlyArray2<f64>) -> &'py PyArray2<f64> {
    spectral_core::center_for_fft(input.as_array()).to_pyarray(py)
}

/// 8-bit log-magnitude spectrum of a grayscale image.
#[pyfunction]
pub fn spectrum_image<'py>(py: Python<'py>, image: PyReadonlyArray2<f64>) -> PyResult<&'py PyArray2<u8>> {
    let output =
        spectral_core::spectrum_image(image.as_array(), &config(false)).map_err(to_py_err)?;
    Ok(output.to_pyarray(py))
}

/// Frequency-filter a grayscale image.
#[pyfunction]
pub fn filter_image<'py>(
    py: Python<'py>,
    image: PyReadonlyArray2<f64>,
    kind: &str,
    param: f64,
) -> PyResult<&'py PyArray2<f64>> {
    let filter = FrequencyFilter::new(parse_kind(kind)?, param).map_err(to_py_err)?;
    let output = spectral_core::filter_image(image.as_array(), &filter, &config(false))
        .map_err(to_py_err)?;
    Ok(output.to_pyarray(py))
}

/// Periodic-noise removal. Returns (spectrum, denoised spectrum, image).
#[pyfunction]
#[pyo3(signature = (image, strength = 0.1, exact_range = false))]
pub fn remove_periodic_noise<'py>(
    py: Python<'py>,
    image: PyReadonlyArray2<f64>,
    strength: f64,
    exact_range: bool,
) -> PyResult<(&'py PyArray2<u8>, &'py PyArray2<u8>, &'py PyArray2<f64>)> {
    let mut config = config(exact_range);
    config.denoise_strength = strength;
    let result =
        spectral_core::remove_periodic_noise(image.as_array(), &config).map_err(to_py_err)?;
    Ok((
        result.spectrum_image.to_pyarray(py),
        result.denoised_spectrum_image.to_pyarray(py),
        result.image.to_pyarray(py),
    ))
}

#[pymodule]
fn spectral_rust(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fft2d, m)?)?;
    m.add_function(wrap_pyfunction!(ifft2d, m)?)?;
    m.add_function(wrap_pyfunction!(center_for_fft, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_image, m)?)?;
    m.add_function(wrap_pyfunction!(filter_image, m)?)?;
    m.add_function(wrap_pyfunction!(remove_periodic_noise, m)?)?;
    Ok(())
}
