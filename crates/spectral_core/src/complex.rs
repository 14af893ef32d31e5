//! Complex value type used by the transform engine.

use std::ops::{Add, Mul, Neg, Sub};

use crate::float_trait::SpectralFloat;

/// An immutable complex number with real and imaginary parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<F> {
    /// Real part.
    pub re: F,
    /// Imaginary part.
    pub im: F,
}

impl<F: SpectralFloat> Complex<F> {
    /// Creates a new complex number.
    #[inline]
    pub fn new(re: F, im: F) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero())
    }

    #[inline]
    pub fn one() -> Self {
        Self::new(F::one(), F::zero())
    }

    /// Lifts a real sample onto the real axis.
    #[inline]
    pub fn from_real(re: F) -> Self {
        Self::new(re, F::zero())
    }

    /// Creates a complex number from polar coordinates:
    /// `re = mag * cos(phase)`, `im = mag * sin(phase)`.
    #[inline]
    pub fn from_polar(magnitude: F, phase: F) -> Self {
        let (sin, cos) = phase.sin_cos();
        Self::new(magnitude * cos, magnitude * sin)
    }

    /// Multiplies both parts by a real scalar.
    #[inline]
    pub fn scale(self, scalar: F) -> Self {
        Self::new(self.re * scalar, self.im * scalar)
    }

    /// Returns the complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Returns `sqrt(re^2 + im^2)`.
    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_sq().sqrt()
    }

    /// Returns the squared magnitude (avoids sqrt).
    #[inline]
    pub fn magnitude_sq(self) -> F {
        self.re * self.re + self.im * self.im
    }

    /// Returns the phase angle `atan2(im, re)` in `(-pi, pi]`.
    #[inline]
    pub fn phase(self) -> F {
        self.im.atan2(self.re)
    }
}

impl<F: SpectralFloat> Add for Complex<F> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl<F: SpectralFloat> Sub for Complex<F> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl<F: SpectralFloat> Mul for Complex<F> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl<F: SpectralFloat> Mul<F> for Complex<F> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: F) -> Self {
        self.scale(rhs)
    }
}

impl<F: SpectralFloat> Neg for Complex<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl<F: SpectralFloat> std::fmt::Display for Complex<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} + {:.3}i", self.re, self.im)
    }
}
