// SPDX-License-Identifier: AGPL-3.0-only

//! General complex 2×2 matrices for the Abelian projection.
//!
//! Projected links Π₊ U Π₊ are no longer of the form u0 + i u·σ, so the
//! projection pipeline works with full complex matrices. The flat eight-real
//! layout is
//!
//!   [re m00, im m00, re m01, im m01, re m10, im m10, re m11, im m11]
//!
//! Values of this type are intermediates only and are never stored with the
//! field configuration.

use std::ops::{Add, Mul};

use super::complex_f64::Complex64;
use super::constants::CMATRIX_REALS;
use super::su2::Su2Matrix;

/// Complex 2×2 matrix, row-major `m[row][col]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use]
pub struct CMatrix2 {
    pub m: [[Complex64; 2]; 2],
}

impl CMatrix2 {
    pub const IDENTITY: Self = Self {
        m: [
            [Complex64::ONE, Complex64::ZERO],
            [Complex64::ZERO, Complex64::ONE],
        ],
    };

    pub const ZERO: Self = Self {
        m: [[Complex64::ZERO; 2]; 2],
    };

    pub fn from_reals(r: [f64; CMATRIX_REALS]) -> Self {
        Self {
            m: [
                [Complex64::new(r[0], r[1]), Complex64::new(r[2], r[3])],
                [Complex64::new(r[4], r[5]), Complex64::new(r[6], r[7])],
            ],
        }
    }

    #[must_use]
    pub fn to_reals(self) -> [f64; CMATRIX_REALS] {
        let m = &self.m;
        [
            m[0][0].re, m[0][0].im, m[0][1].re, m[0][1].im, m[1][0].re, m[1][0].im, m[1][1].re,
            m[1][1].im,
        ]
    }

    /// Conjugate transpose.
    pub fn adjoint(self) -> Self {
        let m = &self.m;
        Self {
            m: [
                [m[0][0].conj(), m[1][0].conj()],
                [m[0][1].conj(), m[1][1].conj()],
            ],
        }
    }

    /// m00 + m11
    #[must_use]
    pub fn trace(self) -> Complex64 {
        self.m[0][0] + self.m[1][1]
    }

    /// Squared Frobenius norm, Σ |m_ij|².
    #[must_use]
    pub fn norm_sq(self) -> f64 {
        self.m.iter().flatten().map(|z| z.abs_sq()).sum()
    }

    pub fn scale(self, s: f64) -> Self {
        let mut r = self;
        for row in &mut r.m {
            for z in row.iter_mut() {
                *z = z.scale(s);
            }
        }
        r
    }

    /// Projector ½(I + n̂·σ) onto the +1 eigenspace of n̂·σ for a unit
    /// vector n̂.
    pub fn projector(n: [f64; 3]) -> Self {
        Self {
            m: [
                [
                    Complex64::real(0.5 * (1.0 + n[2])),
                    Complex64::new(0.5 * n[0], -0.5 * n[1]),
                ],
                [
                    Complex64::new(0.5 * n[0], 0.5 * n[1]),
                    Complex64::real(0.5 * (1.0 - n[2])),
                ],
            ],
        }
    }
}

impl From<Su2Matrix> for CMatrix2 {
    fn from(s: Su2Matrix) -> Self {
        let [u0, u1, u2, u3] = s.u;
        Self {
            m: [
                [Complex64::new(u0, u3), Complex64::new(u2, u1)],
                [Complex64::new(-u2, u1), Complex64::new(u0, -u3)],
            ],
        }
    }
}

impl Mul for CMatrix2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..2 {
            for j in 0..2 {
                r.m[i][j] = self.m[i][0] * rhs.m[0][j] + self.m[i][1] * rhs.m[1][j];
            }
        }
        r
    }
}

impl Add for CMatrix2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut r = self;
        for i in 0..2 {
            for j in 0..2 {
                r.m[i][j] += rhs.m[i][j];
            }
        }
        r
    }
}

/// In-place product M1 ← M1·M2 or M1·M2†. `m2` is not modified.
#[inline]
pub fn general_multiply(m1: &mut CMatrix2, m2: &CMatrix2, conjugate_m2: bool) {
    let rhs = if conjugate_m2 { m2.adjoint() } else { *m2 };
    *m1 = *m1 * rhs;
}
