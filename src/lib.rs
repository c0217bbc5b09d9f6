// SPDX-License-Identifier: AGPL-3.0-only

//! su2lattice: local-field algebra for SU(2) lattice Monte Carlo.
//!
//! SU(2) gauge links with any combination of up to two Higgs doublets, an
//! adjoint triplet, a real singlet and a U(1) hypercharge field. The crate
//! evaluates per-site and per-link quantities (plaquettes, staples,
//! hopping terms, potentials, local actions, Abelian-projected monopole
//! charges, smeared fields) for an external sampler.
//!
//! ## Modules
//!   - `config`: field content and couplings, loaded from JSON
//!   - `error`: `LatticeError` and `Result`
//!   - `lattice`: field storage and every evaluator
//!   - `tolerances`: named thresholds for tests and validation
//!   - `validation`: pass/fail harness used by the validation binary
//!
//! ## Validation binary
//!   - `validate_su2_local`: unitarity, cold-start identities, action
//!     additivity and locality, angle antisymmetry, hedgehog monopole
//!     charge, smearing of trivial fields
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod config;
pub mod error;
pub mod lattice;
pub mod tolerances;
pub mod validation;

pub use config::{FieldContent, ModelConfig};
pub use error::{LatticeError, Result};
