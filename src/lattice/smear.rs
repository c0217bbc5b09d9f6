// SPDX-License-Identifier: AGPL-3.0-only

//! Smearing for renormalization-group blocking.
//!
//! A blocked link spans two lattice spacings and is built from two
//! averaged single links,
//!
//!   `U'_μ`(x) ∝ `V_μ`(x) `V_μ`(x+μ),
//!   `V_μ`(y) = [`U_μ`(y) + Σ\_{ν smeared, ν≠μ} (S⁺ + S⁻)†] / (1 + 2n)
//!
//! with S± the upper and lower staples, so each S† is a path parallel to
//! `U_μ`(y). The product is not in SU(2) and is divided by √det.
//!
//! The adjoint field is averaged with its parallel-transported neighbors:
//!
//!   a'(x) = [a(x) + Σ\_ν (R(`U_ν`(x)) a(x+ν) + R(`U_ν`(x−ν))ᵀ a(x−ν))] / (1 + 2n)
//!
//! Only sites with even coordinates along every blocked direction survive
//! blocking, so [`smear_fields`] smears those and copies the rest.
//!
//! # References
//!
//! - Teper, PLB 183, 345 (1987)

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{LatticeError, Result};

use super::fields::{Fields, Lattice};
use super::layout::Layout;
use super::su2::Su2Matrix;

impl<L: Layout> Lattice<'_, L> {
    /// Blocked link of length two along `dir`, starting at x.
    ///
    /// `dir` should itself be marked in `smear_dirs`; otherwise a warning is
    /// logged and the link is smeared anyway.
    pub fn smear_link(&self, i: usize, dir: usize, smear_dirs: &[bool]) -> Su2Matrix {
        if !smear_dirs[dir] {
            warn!(site = i, dir, "smearing along an unblocked direction");
        }
        let next = self.next(i, dir);
        let mut res = self.link(i, dir);
        let mut v2 = self.link(next, dir);
        let mut paths = 1usize;
        for nu in (0..self.dim()).filter(|&nu| nu != dir && smear_dirs[nu]) {
            res += self.staple_one_direction(i, dir, nu, true);
            v2 += self.staple_one_direction(next, dir, nu, true);
            paths += 2;
        }
        let norm = 1.0 / paths as f64;
        (res.scale(norm) * v2.scale(norm)).normalized()
    }

    /// Averaged adjoint field at x.
    #[must_use]
    pub fn smear_triplet(&self, i: usize, smear_dirs: &[bool]) -> [f64; 3] {
        let trip = &self.fields.triplet;
        let mut res = trip[i];
        let mut sites = 1usize;
        for dir in (0..self.dim()).filter(|&d| smear_dirs[d]) {
            let fwd = self.link(i, dir).rotate_adjoint(trip[self.next(i, dir)]);
            let prev = self.prev(i, dir);
            let bwd = self.link(prev, dir).rotate_adjoint_inverse(trip[prev]);
            for k in 0..3 {
                res[k] += fwd[k] + bwd[k];
            }
            sites += 2;
        }
        let norm = 1.0 / sites as f64;
        res.map(|r| r * norm)
    }

    /// Doublet smearing is not implemented.
    ///
    /// # Errors
    ///
    /// Always `Unsupported`.
    pub fn smear_doublet(
        &self,
        _species: usize,
        _i: usize,
        _smear_dirs: &[bool],
    ) -> Result<Su2Matrix> {
        Err(LatticeError::Unsupported("doublet smearing"))
    }

    /// Whether x survives blocking along `block_dirs`.
    #[must_use]
    pub fn is_block_site(&self, i: usize, block_dirs: &[bool]) -> bool {
        (0..self.dim()).all(|d| !block_dirs[d] || self.layout.coord(i, d) % 2 == 0)
    }
}

/// Smeared copy of `fields` for blocking along `block_dirs`.
///
/// Links in blocked directions and the triplet are smeared at surviving
/// sites; links in other directions, U(1) angles, doublets and the singlet
/// are copied unchanged.
///
/// # Errors
///
/// `InvalidConfig` if `block_dirs` does not have one entry per direction,
/// `BufferLayout` if the fields do not match the layout.
pub fn smear_fields<L: Layout>(layout: &L, fields: &Fields, block_dirs: &[bool]) -> Result<Fields> {
    let dim = layout.dim();
    if block_dirs.len() != dim {
        return Err(LatticeError::InvalidConfig(format!(
            "{} blocking flags for a {dim}-dimensional lattice",
            block_dirs.len()
        )));
    }
    if fields.links.len() != layout.sites() * dim {
        return Err(LatticeError::BufferLayout {
            field: "links",
            len: fields.links.len(),
            expected: layout.sites() * dim,
        });
    }
    if !fields.doublets.is_empty() {
        debug!(
            species = fields.doublets.len(),
            "doublets copied to the blocked configuration unsmeared"
        );
    }

    let lat = Lattice::new(layout, fields);
    let has_triplet = !fields.triplet.is_empty();
    let smeared: Vec<(usize, Vec<(usize, Su2Matrix)>, Option<[f64; 3]>)> = (0..layout.sites())
        .into_par_iter()
        .filter(|&i| lat.is_block_site(i, block_dirs))
        .map(|i| {
            let links = (0..dim)
                .filter(|&d| block_dirs[d])
                .map(|d| (d, lat.smear_link(i, d, block_dirs)))
                .collect();
            let trip = has_triplet.then(|| lat.smear_triplet(i, block_dirs));
            (i, links, trip)
        })
        .collect();

    let mut out = fields.clone();
    for (i, links, trip) in smeared {
        for (d, u) in links {
            out.set_link(i, d, u);
        }
        if let Some(a) = trip {
            out.triplet[i] = a;
        }
    }
    Ok(out)
}
