// SPDX-License-Identifier: AGPL-3.0-only

//! Abelian projection and magnetic monopoles in the broken phase.
//!
//! The adjoint field singles out a direction in the Lie algebra at every
//! site, n̂(x) = a(x)/|a(x)| (ĥ = 2n̂ in the stored normalization), and
//! with it the projector onto the +1 eigenspace of n̂·σ:
//!
//!   Π(x) = ½ (I + n̂(x)·σ)
//!
//! The projected link is the part of the SU(2) link that survives between
//! the two projectors,
//!
//!   `u_μ`(x) = Π(x) `U_μ`(x) Π(x+μ)
//!
//! and the projected field strength on a plaquette is the phase of the
//! closed loop,
//!
//!   `α_μν`(x) = √β · arg Tr[`u_μ`(x) `u_ν`(x+μ) `u_μ`†(x+ν) `u_ν`†(x)]
//!
//! taken as the principal value in (−π, π]. Under gauge transformations
//! the projectors rotate with the links, so α is gauge invariant; it is
//! antisymmetric in (μ,ν). The magnetic field is
//!
//!   `B_i`(x) = Σ\_{j<k, j,k≠i} `ε_ijk` `α_jk`(x)
//!
//! and the charge in the elementary cube at x is its lattice divergence,
//! `ρ`(x) = Σ\_i [`B_i`(x+i) − `B_i`(x)]. On a periodic lattice ρ is a
//! multiple of 4π/g = 2π√β. The engine reports the raw value.
//!
//! The projector is undefined where |a| vanishes. Sites below
//! `ADJOINT_MODULUS_FLOOR` make every quantity that touches them fail with
//! `LatticeError::DegenerateAdjoint`. The plaquette phase is likewise
//! undefined when a projected link vanishes, which happens when n̂(x) and
//! the transported n̂(x+μ) are antiparallel; such links fail with
//! `LatticeError::DegenerateProjection`.
//!
//! # References
//!
//! - Davis, Hart, Kibble, Rajantie, PRD 65, 125008 (2002)
//! - Rajantie, JHEP 01 (2006) 088, hep-lat/0512006, eqs. (3.2)-(3.3)

use std::f64::consts::PI;

use crate::config::ModelConfig;
use crate::error::{LatticeError, Result};

use super::cmatrix::{general_multiply, CMatrix2};
use super::constants::{ADJOINT_MODULUS_FLOOR, PROJECTED_LINK_FLOOR};
use super::fields::{Fields, Lattice};
use super::layout::Layout;

/// Projected Abelian field strength and monopole charges.
pub struct MonopoleEngine<'a, L: Layout> {
    lattice: Lattice<'a, L>,
    sqrt_beta: f64,
}

impl<'a, L: Layout> MonopoleEngine<'a, L> {
    /// # Errors
    ///
    /// `MissingField` if the model has no triplet, `InvalidConfig` if the
    /// config fails validation or its dimension differs from the layout's,
    /// `BufferLayout` if the fields do not match the layout.
    pub fn new(layout: &'a L, fields: &'a Fields, config: &ModelConfig) -> Result<Self> {
        if !config.content.triplet {
            return Err(LatticeError::MissingField("triplet"));
        }
        config.validate()?;
        if config.dim != layout.dim() {
            return Err(LatticeError::InvalidConfig(format!(
                "config is {}-dimensional, layout is {}-dimensional",
                config.dim, layout.dim()
            )));
        }
        fields.check_against(layout, config.content)?;
        Ok(Self {
            lattice: Lattice::new(layout, fields),
            sqrt_beta: config.couplings.beta_su2.sqrt(),
        })
    }

    /// Quantum of magnetic charge, 4π/g = 2π√β.
    #[must_use]
    pub fn charge_unit(&self) -> f64 {
        2.0 * PI * self.sqrt_beta
    }

    /// ĥ(x) = 2a/|a|, the unit adjoint direction in the stored normalization.
    ///
    /// # Errors
    ///
    /// `DegenerateAdjoint` if |a(x)| is below the floor.
    pub fn adjoint_direction(&self, i: usize) -> Result<[f64; 3]> {
        let a = self.lattice.fields.triplet[i];
        let modulus = (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt();
        if !(modulus >= ADJOINT_MODULUS_FLOOR) {
            return Err(LatticeError::DegenerateAdjoint { site: i });
        }
        Ok([
            2.0 * a[0] / modulus,
            2.0 * a[1] / modulus,
            2.0 * a[2] / modulus,
        ])
    }

    /// Π(x) = ½(I + n̂·σ).
    ///
    /// # Errors
    ///
    /// As [`Self::adjoint_direction`].
    pub fn projector(&self, i: usize) -> Result<CMatrix2> {
        let h = self.adjoint_direction(i)?;
        Ok(CMatrix2::projector([0.5 * h[0], 0.5 * h[1], 0.5 * h[2]]))
    }

    /// Π(x) `U_μ`(x) Π(x+μ).
    ///
    /// # Errors
    ///
    /// `DegenerateAdjoint` at either endpoint, `DegenerateProjection` if the
    /// product is below `PROJECTED_LINK_FLOOR`.
    pub fn projected_u1_link(&self, i: usize, dir: usize) -> Result<CMatrix2> {
        let left = self.projector(i)?;
        let right = self.projector(self.lattice.next(i, dir))?;
        let link = left * CMatrix2::from(self.lattice.link(i, dir)) * right;
        if !(link.norm_sq().sqrt() >= PROJECTED_LINK_FLOOR) {
            return Err(LatticeError::DegenerateProjection { site: i, dir });
        }
        Ok(link)
    }

    /// √β · arg Tr of the projected plaquette in the (d1,d2) plane.
    ///
    /// # Errors
    ///
    /// `DegenerateAdjoint` at any corner, `DegenerateProjection` on any edge.
    pub fn projected_plaquette_angle(&self, i: usize, d1: usize, d2: usize) -> Result<f64> {
        let lat = &self.lattice;
        let mut loop_ = self.projected_u1_link(i, d1)?;
        let u2 = self.projected_u1_link(lat.next(i, d1), d2)?;
        let u3 = self.projected_u1_link(lat.next(i, d2), d1)?;
        let u4 = self.projected_u1_link(i, d2)?;
        general_multiply(&mut loop_, &u2, false);
        general_multiply(&mut loop_, &u3, true);
        general_multiply(&mut loop_, &u4, true);
        Ok(loop_.trace().arg() * self.sqrt_beta)
    }

    /// `B_dir`(x) with the ε-sign of each (d1<d2) plane orthogonal to `dir`.
    ///
    /// # Errors
    ///
    /// As [`Self::projected_plaquette_angle`] for the plaquettes involved.
    pub fn magnetic_field_component(&self, i: usize, dir: usize) -> Result<f64> {
        let d = self.lattice.dim();
        let mut res = 0.0;
        for d1 in (0..d).filter(|&d1| d1 != dir) {
            for d2 in ((d1 + 1)..d).filter(|&d2| d2 != dir) {
                let alpha = self.projected_plaquette_angle(i, d1, d2)?;
                if d1 < dir && dir < d2 {
                    res -= alpha;
                } else {
                    res += alpha;
                }
            }
        }
        Ok(res)
    }

    /// Lattice divergence of B over the elementary cube at x.
    ///
    /// # Errors
    ///
    /// As [`Self::projected_plaquette_angle`] on any face of the cube.
    pub fn magnetic_charge_density(&self, i: usize) -> Result<f64> {
        let mut res = 0.0;
        for dir in 0..self.lattice.dim() {
            let b_here = self.magnetic_field_component(i, dir)?;
            let b_next = self.magnetic_field_component(self.lattice.next(i, dir), dir)?;
            res += b_next - b_here;
        }
        Ok(res)
    }

    /// Charge at x in units of 4π/g; integral on periodic lattices.
    ///
    /// # Errors
    ///
    /// As [`Self::magnetic_charge_density`].
    pub fn monopole_charge(&self, i: usize) -> Result<f64> {
        Ok(self.magnetic_charge_density(i)? / self.charge_unit())
    }
}
