//! Frequency-domain image processing core.
//!
//! Pure Rust implementation of a radix-2 FFT, 2D spectrum orchestration,
//! centred frequency filters, a log-magnitude spectrum codec and a
//! spectrum-domain periodic-noise remover. This crate contains all algorithm
//! logic without I/O or Python bindings.

pub mod codec;
pub mod complex;
pub mod denoise;
pub mod error;
pub mod fft;
pub mod filters;
pub mod float_trait;
pub mod pipeline;
pub mod preprocess;
pub mod transforms;

// Re-export commonly used types at the crate root
pub use codec::{decode, encode, DynamicRangeMode, EncodedSpectrum, SpectrumImage};
pub use complex::Complex;
pub use error::{GridAxis, Result, SpectralError};
pub use fft::{forward_1d, inverse_1d};
pub use filters::{FilterKind, FrequencyFilter};
pub use float_trait::SpectralFloat;
pub use pipeline::{
    filter_image, prepare_spectrum, reconstruct_image, remove_periodic_noise, spectrum_image,
    DenoiseOutput, PreparedSpectrum, SpectralConfig,
};
pub use preprocess::{center_for_fft, Resampling};
pub use transforms::{fft2d, ifft2d, ComplexGrid};
