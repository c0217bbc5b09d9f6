// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized constants for the SU(2) local-field modules.
//!
//! Collects per-site component counts, the projector floor, numerical
//! guards and the LCG PRNG used for hot starts in tests and the
//! validation binary. The evaluators themselves consume no randomness.

/// Real components of an SU(2) link, U = u0 + i u·σ.
pub const SU2_LINK_DOFS: usize = 4;

/// Real components of a doublet, Φ = a0 + i a·σ.
pub const DOUBLET_DOFS: usize = 4;

/// Real components of the adjoint field, A = ½ aᵢσᵢ.
pub const TRIPLET_DOFS: usize = 3;

/// Real components of a general complex 2×2 matrix.
pub const CMATRIX_REALS: usize = 8;

/// Maximum number of doublet species.
pub const MAX_DOUBLETS: usize = 2;

/// Smallest adjoint modulus |a| for which the Abelian projector is defined.
///
/// Below this the direction ĥ = a/|a| is numerically meaningless; the
/// projector reports `LatticeError::DegenerateAdjoint` instead of
/// propagating NaN into field-strength sums.
pub const ADJOINT_MODULUS_FLOOR: f64 = 1e-10;

/// Smallest Frobenius norm of a projected link Π(x) U Π(x+μ).
///
/// The norm is |⟨n̂(x)|U|n̂(x+μ)⟩| and vanishes when the transported
/// directions are antiparallel, leaving the plaquette phase undefined.
pub const PROJECTED_LINK_FLOOR: f64 = 1e-10;

/// Division guard for renormalization of smeared links.
pub const LATTICE_DIVISION_GUARD: f64 = 1e-30;

/// LCG multiplier (Knuth MMIX).
pub const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// LCG increment (Knuth MMIX).
pub const LCG_INCREMENT: u64 = 1_442_695_040_888_963_407;

/// `(seed >> 11) as f64 / 2^53` gives 53 bits of precision.
pub const LCG_53_DIVISOR: f64 = (1u64 << 53) as f64;

/// Spread of hot-start scalar components (Gaussian width).
pub const HOT_START_SCALAR_WIDTH: f64 = 0.5;

/// Advance the LCG state by one step.
#[inline]
pub fn lcg_step(seed: &mut u64) {
    *seed = seed
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);
}

/// Uniform f64 in [0, 1) from 53 bits of LCG state.
#[inline]
pub fn lcg_uniform_f64(seed: &mut u64) -> f64 {
    lcg_step(seed);
    (*seed >> 11) as f64 / LCG_53_DIVISOR
}

/// Box-Muller Gaussian deviate N(0, 1) from two LCG draws.
#[inline]
pub fn lcg_gaussian(seed: &mut u64) -> f64 {
    let u1 = lcg_uniform_f64(seed);
    let u2 = lcg_uniform_f64(seed);
    (-2.0 * u1.max(LATTICE_DIVISION_GUARD).ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_step_deterministic() {
        let mut a = 42u64;
        let mut b = 42u64;
        lcg_step(&mut a);
        lcg_step(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn lcg_uniform_in_range() {
        let mut seed = 12345u64;
        for _ in 0..1000 {
            let v = lcg_uniform_f64(&mut seed);
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn lcg_gaussian_is_finite() {
        let mut seed = 99u64;
        for _ in 0..1000 {
            let g = lcg_gaussian(&mut seed);
            assert!(g.is_finite(), "Gaussian deviate must be finite: {g}");
        }
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn component_counts() {
        assert_eq!(SU2_LINK_DOFS, 4);
        assert_eq!(DOUBLET_DOFS, SU2_LINK_DOFS);
        assert_eq!(CMATRIX_REALS, 2 * SU2_LINK_DOFS);
        assert!(ADJOINT_MODULUS_FLOOR > LATTICE_DIVISION_GUARD);
    }
}
