// SPDX-License-Identifier: AGPL-3.0-only

//! Complex f64 arithmetic for the projected Abelian sector.
//!
//! Entries of the general 2×2 matrices built by the Abelian projection,
//! and the complex couplings of the two-doublet potential (m12², λ5, λ6,
//! λ7), are carried as [`Complex64`]. The type is `serde`-enabled so the
//! couplings can be read from a JSON configuration as `{"re": .., "im": ..}`.

use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// Complex number with f64 real and imaginary parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    #[inline]
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Purely real value.
    #[inline]
    #[must_use]
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    #[inline]
    #[must_use]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    #[inline]
    #[must_use]
    pub fn abs_sq(self) -> f64 {
        self.re.mul_add(self.re, self.im * self.im)
    }

    /// Principal argument in (−π, π].
    #[inline]
    #[must_use]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    #[inline]
    #[must_use]
    pub fn scale(self, s: f64) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }
}

impl Add for Complex64 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl AddAssign for Complex64 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl Mul for Complex64 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re.mul_add(rhs.re, -self.im * rhs.im),
            self.re.mul_add(rhs.im, self.im * rhs.re),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn multiplication_adds_phases() {
        let a = Complex64::new(0.3_f64.cos(), 0.3_f64.sin());
        let b = Complex64::new(1.1_f64.cos(), 1.1_f64.sin());
        let c = a * b;
        assert!((c.arg() - 1.4).abs() < 1e-14);
        assert!((c.abs_sq() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn arg_is_principal_value() {
        assert!((Complex64::new(-1.0, 0.0).arg() - PI).abs() < 1e-15);
        assert!((Complex64::new(-1.0, -1e-300).arg() + PI).abs() < 1e-15);
        assert!(Complex64::ONE.arg().abs() < 1e-15);
    }

    #[test]
    fn conj_negates_imaginary() {
        let z = Complex64::new(2.0, -3.0).conj();
        assert_eq!(z, Complex64::new(2.0, 3.0));
    }

    #[test]
    fn accumulate_and_scale() {
        let mut acc = Complex64::ZERO;
        for k in 0..4 {
            acc += Complex64::new(f64::from(k), 1.0);
        }
        assert_eq!(acc.scale(0.5), Complex64::new(3.0, 2.0));
    }

    #[test]
    fn serde_shape() {
        let z: Complex64 = serde_json::from_str(r#"{"re": 0.5, "im": -0.25}"#).expect("parse");
        assert_eq!(z, Complex64::new(0.5, -0.25));
    }
}
