// SPDX-License-Identifier: AGPL-3.0-only

//! Local-field algebra for SU(2) lattice gauge theory with scalar matter.
//!
//! Every evaluator here reads the fields at one site or link and its
//! nearest neighbors and returns a number or a small matrix. Sweeps,
//! parity splitting and parallel reductions belong to the caller; the
//! evaluators only need the neighbor values to stay put during one call.
//!
//! | Field | Representation | Module |
//! |-------|----------------|--------|
//! | SU(2) link | quaternion `(u0, u1, u2, u3)` | `su2` |
//! | U(1) link | angle α | `wilson` |
//! | doublet | 2×2 matrix Φ = φ0 + iφ·σ | `scalar` |
//! | adjoint triplet | A = ½ aᵃσᵃ | `scalar` |
//! | singlet | real S | `scalar` |
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `complex_f64` | Complex f64 arithmetic |
//! | `su2` | SU(2) quaternion products and adjoint rotation |
//! | `cmatrix` | general complex 2×2 matrices for the projector |
//! | `layout` | neighbor maps and coordinates |
//! | `fields` | field storage and the read-only [`Lattice`] view |
//! | `wilson` | plaquettes, staples, clover, U(1) plaquettes |
//! | `scalar` | hopping terms, covariant sums, potential |
//! | `action` | local and per-variable actions |
//! | `monopole` | Abelian projection and monopole charge |
//! | `smear` | smearing and blocking |
//! | `measure` | volume observables |
//!
//! # References
//!
//! - Kajantie, Laine, Rummukainen, Shaposhnikov, NPB 466, 189 (1996)
//! - Gattringer & Lang, "Quantum Chromodynamics on the Lattice" (2010)

/// Per-variable action evaluator.
pub mod action;
/// General complex 2×2 matrices (8-real layout).
pub mod cmatrix;
/// Complex f64 arithmetic (re, im).
pub mod complex_f64;
/// Component counts, numerical guards and the LCG PRNG.
pub mod constants;
/// Field storage, flat-buffer import and the lattice view.
pub mod fields;
/// Neighbor-map trait and the periodic lattice.
pub mod layout;
/// Volume and per-site measurements.
pub mod measure;
/// Abelian projection, projected field strength, magnetic charge.
pub mod monopole;
/// Scalar hopping terms and the potential.
pub mod scalar;
/// Link and triplet smearing for blocking.
pub mod smear;
/// SU(2) matrices as quaternions.
pub mod su2;
/// Wilson plaquettes and staples.
pub mod wilson;

pub use action::ActionEvaluator;
pub use cmatrix::{general_multiply, CMatrix2};
pub use complex_f64::Complex64;
pub use fields::{Fields, FlatBuffers, Lattice};
pub use layout::{Layout, PeriodicLattice};
pub use measure::{measure, measure_local, LocalMeasurement, Measured, Observables, ReductionTimer};
pub use monopole::MonopoleEngine;
pub use scalar::{PotentialTerms, Species};
pub use smear::smear_fields;
pub use su2::{su2_multiply, Su2Matrix};
pub use wilson::StapleSense;
