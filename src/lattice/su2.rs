// SPDX-License-Identifier: AGPL-3.0-only

//! SU(2) matrix operations in the four-real (quaternion) parametrization.
//!
//! A link variable is stored as four reals (u0, u1, u2, u3):
//!
//!   U = u0·I + i(u1σ1 + u2σ2 + u3σ3),   u0² + |u|² = 1
//!
//! which as a complex 2×2 matrix reads
//!
//! ```text
//!   ⎡ u0 + i u3    u2 + i u1 ⎤
//!   ⎣ −u2 + i u1   u0 − i u3 ⎦
//! ```
//!
//! Real-linear combinations of such matrices stay in the same form, so
//! staple sums and the matrix-parametrized doublet Φ = a0 + i a·σ share
//! this type. Only products and unit norm distinguish a link from a
//! doublet; `norm_sq` is det U and Re Tr U = 2u0.
//!
//! The closed-form product (U = A·B):
//!
//! | component | expression                              |
//! |-----------|-----------------------------------------|
//! | n0        | a0b0 − a1b1 − a2b2 − a3b3               |
//! | n1        | a1b0 + a0b1 + a3b2 − a2b3               |
//! | n2        | a2b0 − a3b1 + a0b2 + a1b3               |
//! | n3        | a3b0 + a2b1 − a1b2 + a0b3               |
//!
//! # References
//!
//! - Creutz, "Quarks, Gluons and Lattices" (1983), Ch. 9
//! - Kajantie, Laine, Rummukainen, Shaposhnikov, NPB 466, 189 (1996)

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};

use super::constants::{lcg_gaussian, LATTICE_DIVISION_GUARD};

/// 2×2 matrix of the form u0 + i u·σ.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Su2Matrix {
    /// (u0, u1, u2, u3)
    pub u: [f64; 4],
}

impl Su2Matrix {
    pub const IDENTITY: Self = Self {
        u: [1.0, 0.0, 0.0, 0.0],
    };

    pub const ZERO: Self = Self { u: [0.0; 4] };

    #[inline]
    #[must_use]
    pub const fn new(u0: f64, u1: f64, u2: f64, u3: f64) -> Self {
        Self {
            u: [u0, u1, u2, u3],
        }
    }

    /// U† = u0 − i u·σ
    #[inline]
    #[must_use]
    pub fn adjoint(self) -> Self {
        let [u0, u1, u2, u3] = self.u;
        Self::new(u0, -u1, -u2, -u3)
    }

    /// u0² + u1² + u2² + u3², equal to det U.
    #[inline]
    #[must_use]
    pub fn norm_sq(self) -> f64 {
        self.u.iter().map(|x| x * x).sum()
    }

    /// Re Tr U = 2 u0.
    #[inline]
    #[must_use]
    pub fn re_trace(self) -> f64 {
        2.0 * self.u[0]
    }

    #[inline]
    #[must_use]
    pub fn scale(self, s: f64) -> Self {
        let [u0, u1, u2, u3] = self.u;
        Self::new(u0 * s, u1 * s, u2 * s, u3 * s)
    }

    /// U · V†
    #[inline]
    #[must_use]
    pub fn mul_adjoint(self, rhs: Self) -> Self {
        self * rhs.adjoint()
    }

    /// U · V or U · V†, overwriting `self`.
    #[inline]
    pub fn mul_in_place(&mut self, rhs: &Self, conjugate_rhs: bool) {
        let b = if conjugate_rhs { rhs.adjoint() } else { *rhs };
        *self = *self * b;
    }

    /// Divide by √det, projecting a non-zero combination back onto SU(2).
    ///
    /// A vanishing matrix is returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let n = self.norm_sq().sqrt();
        if n > LATTICE_DIVISION_GUARD {
            self.scale(1.0 / n)
        } else {
            self
        }
    }

    /// Adjoint action U (b·σ) U† = (R b)·σ, returned as R b.
    #[must_use]
    pub fn rotate_adjoint(self, b: [f64; 3]) -> [f64; 3] {
        let r = self.rotation();
        [
            r[0][0] * b[0] + r[0][1] * b[1] + r[0][2] * b[2],
            r[1][0] * b[0] + r[1][1] * b[1] + r[1][2] * b[2],
            r[2][0] * b[0] + r[2][1] * b[1] + r[2][2] * b[2],
        ]
    }

    /// Inverse adjoint action U† (b·σ) U = (Rᵀ b)·σ.
    #[must_use]
    pub fn rotate_adjoint_inverse(self, b: [f64; 3]) -> [f64; 3] {
        let r = self.rotation();
        [
            r[0][0] * b[0] + r[1][0] * b[1] + r[2][0] * b[2],
            r[0][1] * b[0] + r[1][1] * b[1] + r[2][1] * b[2],
            r[0][2] * b[0] + r[1][2] * b[1] + r[2][2] * b[2],
        ]
    }

    /// SO(3) matrix of the adjoint representation. Exactly orthogonal only
    /// for unit-norm U; otherwise scaled by det U.
    #[must_use]
    pub fn rotation(self) -> [[f64; 3]; 3] {
        let [u0, u1, u2, u3] = self.u;
        let (s0, s1, s2, s3) = (u0 * u0, u1 * u1, u2 * u2, u3 * u3);
        [
            [
                s0 + s1 - s2 - s3,
                2.0 * (u1 * u2 + u0 * u3),
                2.0 * (u1 * u3 - u0 * u2),
            ],
            [
                2.0 * (u1 * u2 - u0 * u3),
                s0 - s1 + s2 - s3,
                2.0 * (u0 * u1 + u2 * u3),
            ],
            [
                2.0 * (u0 * u2 + u1 * u3),
                2.0 * (u2 * u3 - u0 * u1),
                s0 - s1 - s2 + s3,
            ],
        ]
    }

    /// Haar-distributed SU(2) element from four Gaussian LCG draws.
    pub fn random(seed: &mut u64) -> Self {
        let q = Self::new(
            lcg_gaussian(seed),
            lcg_gaussian(seed),
            lcg_gaussian(seed),
            lcg_gaussian(seed),
        );
        let n = q.norm_sq().sqrt();
        if n > LATTICE_DIVISION_GUARD {
            q.scale(1.0 / n)
        } else {
            Self::IDENTITY
        }
    }
}

/// In-place product U1 ← U1·U2 or U1·U2†.
#[inline]
pub fn su2_multiply(u1: &mut Su2Matrix, u2: &Su2Matrix, conjugate_u2: bool) {
    u1.mul_in_place(u2, conjugate_u2);
}

impl Mul for Su2Matrix {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let [a0, a1, a2, a3] = self.u;
        let [b0, b1, b2, b3] = rhs.u;
        Self::new(
            a0 * b0 - a1 * b1 - a2 * b2 - a3 * b3,
            a1 * b0 + a0 * b1 + a3 * b2 - a2 * b3,
            a2 * b0 - a3 * b1 + a0 * b2 + a1 * b3,
            a3 * b0 + a2 * b1 - a1 * b2 + a0 * b3,
        )
    }
}

impl Add for Su2Matrix {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        let mut r = self;
        r += rhs;
        r
    }
}

impl AddAssign for Su2Matrix {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.u.iter_mut().zip(rhs.u) {
            *a += b;
        }
    }
}

impl Sub for Su2Matrix {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Neg for Su2Matrix {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Su2Matrix, b: Su2Matrix, tol: f64) -> bool {
        a.u.iter().zip(b.u).all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn product_preserves_unit_norm() {
        let mut seed = 7u64;
        for _ in 0..200 {
            let a = Su2Matrix::random(&mut seed);
            let b = Su2Matrix::random(&mut seed);
            for conj in [false, true] {
                let mut c = a;
                su2_multiply(&mut c, &b, conj);
                let n = c.norm_sq();
                assert!((n - 1.0).abs() < 1e-12, "norm drifted to {n} (conj={conj})");
            }
        }
    }

    #[test]
    fn adjoint_is_inverse() {
        let mut seed = 11u64;
        let a = Su2Matrix::random(&mut seed);
        assert!(close(a * a.adjoint(), Su2Matrix::IDENTITY, 1e-14));
        assert!(close(a.adjoint() * a, Su2Matrix::IDENTITY, 1e-14));
    }

    #[test]
    fn pauli_algebra() {
        // (iσ1)(iσ2) = −σ1σ2 = −iσ3
        let is1 = Su2Matrix::new(0.0, 1.0, 0.0, 0.0);
        let is2 = Su2Matrix::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(is1 * is2, Su2Matrix::new(0.0, 0.0, 0.0, -1.0));
        assert_eq!(is1 * is1, Su2Matrix::new(-1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn conjugate_mode_matches_explicit_adjoint() {
        let mut seed = 3u64;
        let a = Su2Matrix::random(&mut seed);
        let b = Su2Matrix::random(&mut seed);
        let mut c = a;
        su2_multiply(&mut c, &b, true);
        assert!(close(c, a.mul_adjoint(b), 1e-15));
        assert!(close(c, a * b.adjoint(), 1e-15));
    }

    #[test]
    fn rotation_is_orthogonal() {
        let mut seed = 5u64;
        let u = Su2Matrix::random(&mut seed);
        let r = u.rotation();
        for i in 0..3 {
            for j in 0..3 {
                let dot: f64 = (0..3).map(|k| r[i][k] * r[j][k]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-12, "RRᵀ[{i}][{j}] = {dot}");
            }
        }
    }

    #[test]
    fn rotation_matches_conjugation() {
        // U (i b·σ) U† = i (R b)·σ, read off as the vector part.
        let mut seed = 21u64;
        let u = Su2Matrix::random(&mut seed);
        let b = [0.3, -1.2, 0.7];
        let q = u * Su2Matrix::new(0.0, b[0], b[1], b[2]) * u.adjoint();
        let rb = u.rotate_adjoint(b);
        for k in 0..3 {
            assert!((q.u[k + 1] - rb[k]).abs() < 1e-12, "component {k}");
        }
        let back = u.rotate_adjoint_inverse(rb);
        for k in 0..3 {
            assert!((back[k] - b[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn normalized_restores_unit_norm() {
        let v = Su2Matrix::new(2.0, 0.0, 0.0, 2.0).normalized();
        assert!((v.norm_sq() - 1.0).abs() < 1e-15);
        assert_eq!(Su2Matrix::ZERO.normalized(), Su2Matrix::ZERO);
    }

    #[test]
    fn pod_cast_layout() {
        let links = [Su2Matrix::IDENTITY, Su2Matrix::new(0.0, 1.0, 0.0, 0.0)];
        let flat: &[f64] = bytemuck::cast_slice(&links);
        assert_eq!(flat, &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
