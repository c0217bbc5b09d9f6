// SPDX-License-Identifier: AGPL-3.0-only

//! Model configuration: which field species exist and their couplings.
//!
//! [`FieldContent`] is resolved once, when the evaluators are built, and
//! every formula branches on it. A species' couplings live in an `Option`
//! (or, for doublets, a `Vec` indexed by species) so a portal coupling is
//! only reachable when both species it connects are present.
//!
//! Configurations are read from JSON:
//!
//! ```json
//! {
//!   "dim": 4,
//!   "content": { "doublets": 1, "triplet": true, "singlet": false, "u1": false },
//!   "couplings": {
//!     "beta_su2": 8.0,
//!     "doublets": [ { "msq": -0.1, "lambda": 0.05, "a2_triplet": 0.3 } ],
//!     "triplet": { "msq": -0.2, "b4": 0.1 }
//!   }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};
use crate::lattice::complex_f64::Complex64;
use crate::lattice::constants::MAX_DOUBLETS;

/// Which field species the model carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldContent {
    /// Number of doublet species, 0, 1 or 2.
    #[serde(default)]
    pub doublets: usize,
    #[serde(default)]
    pub triplet: bool,
    #[serde(default)]
    pub singlet: bool,
    /// U(1) hypercharge links.
    #[serde(default)]
    pub u1: bool,
}

impl FieldContent {
    /// Pure SU(2) gauge theory.
    #[must_use]
    pub const fn gauge_only() -> Self {
        Self {
            doublets: 0,
            triplet: false,
            singlet: false,
            u1: false,
        }
    }
}

/// Couplings of one doublet species.
///
/// Potential: msq·φ² + λ·φ⁴ with φ² = ½Σaᵢ², plus portals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoubletCouplings {
    pub msq: f64,
    pub lambda: f64,
    /// Doublet–triplet portal a2·φ²·Tr A².
    #[serde(default)]
    pub a2_triplet: f64,
    /// Doublet–singlet portal ½a1·S·φ².
    #[serde(default)]
    pub a1_singlet: f64,
    /// Doublet–singlet portal ½a2·S²·φ².
    #[serde(default)]
    pub a2_singlet: f64,
}

/// Mixing couplings of the two-doublet potential.
///
/// The diagonal terms (m11², m22², λ1, λ2) are the `msq`/`lambda` of the
/// two [`DoubletCouplings`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwoDoubletCouplings {
    #[serde(default)]
    pub msq12: Complex64,
    #[serde(default)]
    pub lambda3: f64,
    #[serde(default)]
    pub lambda4: f64,
    #[serde(default)]
    pub lambda5: Complex64,
    #[serde(default)]
    pub lambda6: Complex64,
    #[serde(default)]
    pub lambda7: Complex64,
}

/// Adjoint self-couplings: msq·Tr A² + b4·(Tr A²)².
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TripletCouplings {
    pub msq: f64,
    pub b4: f64,
}

/// Singlet potential b1 S + ½msq S² + ⅓b3 S³ + ¼b4 S⁴ plus its triplet
/// portals a1·S·Tr A² + a2·S²·Tr A².
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingletCouplings {
    #[serde(default)]
    pub b1: f64,
    pub msq: f64,
    #[serde(default)]
    pub b3: f64,
    pub b4: f64,
    #[serde(default)]
    pub a1_triplet: f64,
    #[serde(default)]
    pub a2_triplet: f64,
}

/// All couplings, with β = 4/g² for SU(2).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Couplings {
    pub beta_su2: f64,
    #[serde(default)]
    pub beta_u1: f64,
    #[serde(default)]
    pub doublets: Vec<DoubletCouplings>,
    #[serde(default)]
    pub two_doublet: Option<TwoDoubletCouplings>,
    #[serde(default)]
    pub triplet: Option<TripletCouplings>,
    #[serde(default)]
    pub singlet: Option<SingletCouplings>,
}

/// Dimension, field content and couplings of a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub dim: usize,
    pub content: FieldContent,
    pub couplings: Couplings,
}

impl ModelConfig {
    /// Pure SU(2) gauge model at inverse coupling `beta`.
    #[must_use]
    pub fn gauge_only(dim: usize, beta: f64) -> Self {
        Self {
            dim,
            content: FieldContent::gauge_only(),
            couplings: Couplings {
                beta_su2: beta,
                ..Couplings::default()
            },
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// `Json` on malformed input, `InvalidConfig` if validation fails.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Self::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that the content and the coupling records agree.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` describing the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        let c = &self.content;
        let k = &self.couplings;
        let fail = |msg: String| Err(LatticeError::InvalidConfig(msg));

        if self.dim < 2 {
            return fail(format!("dim must be at least 2, got {}", self.dim));
        }
        if c.doublets > MAX_DOUBLETS {
            return fail(format!(
                "at most {MAX_DOUBLETS} doublets supported, got {}",
                c.doublets
            ));
        }
        if !(k.beta_su2.is_finite() && k.beta_su2 > 0.0) {
            return fail(format!("beta_su2 must be positive, got {}", k.beta_su2));
        }
        if c.u1 && !(k.beta_u1.is_finite() && k.beta_u1 > 0.0) {
            return fail(format!(
                "beta_u1 must be positive with U(1) active, got {}",
                k.beta_u1
            ));
        }
        if k.doublets.len() != c.doublets {
            return fail(format!(
                "{} doublet coupling records for {} doublets",
                k.doublets.len(), c.doublets
            ));
        }
        if k.two_doublet.is_some() != (c.doublets == 2) {
            return fail("two_doublet couplings must be present iff two doublets are active".into());
        }
        if k.triplet.is_some() != c.triplet {
            return fail("triplet couplings must be present iff the triplet is active".into());
        }
        if k.singlet.is_some() != c.singlet {
            return fail("singlet couplings must be present iff the singlet is active".into());
        }
        Ok(())
    }
}
