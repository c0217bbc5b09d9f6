// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with their justification.
//!
//! Thresholds shared by the integration tests under `tests/` and the
//! validation binary are defined here. Unit tests inside the modules keep
//! literal bounds next to the single operation they check.
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 | 1e-12 for a single SU(2) product |
//! | Accumulated sums | O(V) additions | 1e-10 for whole-lattice action differences |
//! | Topological | quantized flux | 1e-6 for monopole charge |

// ═══════════════════════════════════════════════════════════════════
// Compact-matrix algebra
// ═══════════════════════════════════════════════════════════════════

/// |det U − 1| after one SU(2) product or re-projection.
///
/// Each product is 16 multiply-adds on unit-norm inputs; rounding stays
/// at a few ulp, far below 1e-12.
pub const SU2_UNITARITY_ABS: f64 = 1e-12;

/// Agreement of two algebraically equal SU(2) expressions (quaternion form
/// versus the complex 2×2 embedding, adjoint rotation versus U σ U†).
pub const SU2_IDENTITY_ABS: f64 = 1e-13;

// ═══════════════════════════════════════════════════════════════════
// Plaquettes and actions
// ═══════════════════════════════════════════════════════════════════

/// Cold plaquette trace: exactly 2 for identity links.
pub const COLD_PLAQUETTE_ABS: f64 = 1e-14;

/// Cold Wilson action: exactly 0 for identity links.
pub const COLD_ACTION_ABS: f64 = 1e-12;

/// Σ local action versus an independent whole-lattice sum.
///
/// Both are O(V·D²) additions of O(β) terms; on the small lattices used
/// here the rounding stays below 1e-10 relative.
pub const ACTION_ADDITIVITY_REL: f64 = 1e-10;

/// Change of a per-variable action versus the change of the total action.
///
/// The total action differs before and after by one local move, but each
/// total carries the rounding of V sites. 1e-9 absolute covers lattices up
/// to a few thousand sites at β ≈ 10.
pub const UPDATE_LOCALITY_ABS: f64 = 1e-9;

/// Staple form of the link action versus the direct plaquette sum.
pub const STAPLE_FORM_ABS: f64 = 1e-11;

// ═══════════════════════════════════════════════════════════════════
// Abelian projection
// ═══════════════════════════════════════════════════════════════════

/// α(μ,ν) + α(ν,μ) away from the branch cut.
pub const ANGLE_ANTISYMMETRY_ABS: f64 = 1e-10;

/// Distance of a monopole charge from the nearest integer.
///
/// The flux through each face is a principal-value phase; the six faces of
/// a cube sum to 2π·n up to the rounding of four complex 2×2 products per
/// face.
pub const MONOPOLE_CHARGE_ABS: f64 = 1e-6;

// ═══════════════════════════════════════════════════════════════════
// Smearing
// ═══════════════════════════════════════════════════════════════════

/// Smeared links and triplets on trivial input reproduce the input.
pub const SMEARING_TRIVIAL_ABS: f64 = 1e-14;
