// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for configuration, field storage and the Abelian projector.
//!
//! The local-action algebra itself is total over well-formed field values
//! and returns plain `f64`. Errors only arise where data crosses into the
//! crate (JSON configuration, flat buffers) or where the adjoint direction
//! ĥ = a/|a| is undefined.

use thiserror::Error;

/// Errors arising from configuration, storage layout or projection.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// A model configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A flat buffer does not hold a whole number of per-site components,
    /// or holds the wrong number of sites.
    #[error("Buffer for {field} has length {len}, expected {expected}")]
    BufferLayout {
        field: &'static str,
        len: usize,
        expected: usize,
    },

    /// The operation needs a field species the configuration does not carry.
    #[error("Missing field species: {0}")]
    MissingField(&'static str),

    /// The adjoint modulus at `site` is below the projector floor.
    #[error("Adjoint field too small for projection at site {site}")]
    DegenerateAdjoint { site: usize },

    /// The projected link from `site` along `dir` is numerically zero.
    #[error("Projected link vanishes at site {site}, direction {dir}")]
    DegenerateProjection { site: usize, dir: usize },

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl LatticeError {
    /// Whether the error marks a site where the Abelian projection is
    /// undefined, as opposed to bad input.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::DegenerateAdjoint { .. } | Self::DegenerateProjection { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LatticeError>;
