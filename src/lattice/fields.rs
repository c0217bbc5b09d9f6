// SPDX-License-Identifier: AGPL-3.0-only

//! Field configuration storage.
//!
//! Layouts (all flat, site-major):
//!
//! | field     | element        | index              |
//! |-----------|----------------|--------------------|
//! | SU(2)     | `Su2Matrix`    | `site * dim + dir` |
//! | U(1)      | angle `f64`    | `site * dim + dir` |
//! | doublet k | `Su2Matrix`    | `site`             |
//! | triplet   | `[f64; 3]`     | `site`             |
//! | singlet   | `f64`          | `site`             |
//!
//! Storage for absent species is empty. The evaluators only read from a
//! `Fields`; mutation belongs to the sampler that owns it.

use crate::config::FieldContent;
use crate::error::{LatticeError, Result};

use super::constants::{
    lcg_gaussian, lcg_uniform_f64, DOUBLET_DOFS, HOT_START_SCALAR_WIDTH, SU2_LINK_DOFS,
    TRIPLET_DOFS,
};
use super::layout::Layout;
use super::su2::Su2Matrix;

/// Borrowed flat `f64` buffers, e.g. from an external sampler or file.
#[derive(Clone, Debug, Default)]
pub struct FlatBuffers<'a> {
    pub links: &'a [f64],
    pub u1: &'a [f64],
    pub doublets: Vec<&'a [f64]>,
    pub triplet: &'a [f64],
    pub singlet: &'a [f64],
}

/// One field configuration on a lattice.
#[derive(Clone, Debug, PartialEq)]
pub struct Fields {
    pub dim: usize,
    pub sites: usize,
    pub links: Vec<Su2Matrix>,
    pub u1: Vec<f64>,
    pub doublets: Vec<Vec<Su2Matrix>>,
    pub triplet: Vec<[f64; 3]>,
    pub singlet: Vec<f64>,
}

impl Fields {
    /// Ordered start: identity links, zero U(1) angles, vanishing scalars.
    #[must_use]
    pub fn cold(layout: &impl Layout, content: FieldContent) -> Self {
        let (dim, sites) = (layout.dim(), layout.sites());
        Self {
            dim,
            sites,
            links: vec![Su2Matrix::IDENTITY; sites * dim],
            u1: if content.u1 {
                vec![0.0; sites * dim]
            } else {
                Vec::new()
            },
            doublets: vec![vec![Su2Matrix::ZERO; sites]; content.doublets],
            triplet: if content.triplet {
                vec![[0.0; 3]; sites]
            } else {
                Vec::new()
            },
            singlet: if content.singlet {
                vec![0.0; sites]
            } else {
                Vec::new()
            },
        }
    }

    /// Disordered start: Haar-random links, uniform U(1) angles in [−π, π)
    /// and Gaussian scalar components.
    #[must_use]
    pub fn hot(layout: &impl Layout, content: FieldContent, seed: u64) -> Self {
        let mut rng = seed;
        let mut f = Self::cold(layout, content);
        for u in &mut f.links {
            *u = Su2Matrix::random(&mut rng);
        }
        for a in &mut f.u1 {
            *a = (2.0 * lcg_uniform_f64(&mut rng) - 1.0) * std::f64::consts::PI;
        }
        let mut gauss = || HOT_START_SCALAR_WIDTH * lcg_gaussian(&mut rng);
        for species in &mut f.doublets {
            for phi in species.iter_mut() {
                *phi = Su2Matrix::new(gauss(), gauss(), gauss(), gauss());
            }
        }
        for a in &mut f.triplet {
            *a = [gauss(), gauss(), gauss()];
        }
        for s in &mut f.singlet {
            *s = gauss();
        }
        f
    }

    /// Copy flat buffers into typed storage.
    ///
    /// # Errors
    ///
    /// `BufferLayout` if any buffer does not hold exactly one element per
    /// site (per link for gauge fields) for the active species.
    pub fn from_flat(
        layout: &impl Layout,
        content: FieldContent,
        bufs: &FlatBuffers<'_>,
    ) -> Result<Self> {
        let (dim, sites) = (layout.dim(), layout.sites());
        let links: &[Su2Matrix] = cast_exact("links", bufs.links, sites * dim, SU2_LINK_DOFS)?;
        let u1 = if content.u1 {
            cast_exact::<f64>("u1", bufs.u1, sites * dim, 1)?.to_vec()
        } else {
            Vec::new()
        };
        if bufs.doublets.len() != content.doublets {
            return Err(LatticeError::BufferLayout {
                field: "doublets",
                len: bufs.doublets.len(),
                expected: content.doublets,
            });
        }
        let doublets = bufs
            .doublets
            .iter()
            .map(|b| cast_exact::<Su2Matrix>("doublet", b, sites, DOUBLET_DOFS).map(<[_]>::to_vec))
            .collect::<Result<Vec<_>>>()?;
        let triplet = if content.triplet {
            cast_exact::<[f64; 3]>("triplet", bufs.triplet, sites, TRIPLET_DOFS)?.to_vec()
        } else {
            Vec::new()
        };
        let singlet = if content.singlet {
            cast_exact::<f64>("singlet", bufs.singlet, sites, 1)?.to_vec()
        } else {
            Vec::new()
        };
        Ok(Self {
            dim,
            sites,
            links: links.to_vec(),
            u1,
            doublets,
            triplet,
            singlet,
        })
    }

    /// SU(2) links as a flat `f64` slice, four reals per link.
    #[must_use]
    pub fn links_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.links)
    }

    /// Triplet as a flat `f64` slice, three reals per site.
    #[must_use]
    pub fn triplet_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.triplet)
    }

    /// Verify that storage matches `layout` and `content`.
    ///
    /// # Errors
    ///
    /// `BufferLayout` naming the first inconsistent field.
    pub fn check_against(&self, layout: &impl Layout, content: FieldContent) -> Result<()> {
        let (dim, sites) = (layout.dim(), layout.sites());
        let expect = |field: &'static str, len: usize, expected: usize| {
            if len == expected {
                Ok(())
            } else {
                Err(LatticeError::BufferLayout {
                    field,
                    len,
                    expected,
                })
            }
        };
        let on = |active: bool, n: usize| if active { n } else { 0 };
        expect("dim", self.dim, dim)?;
        expect("links", self.links.len(), sites * dim)?;
        expect("u1", self.u1.len(), on(content.u1, sites * dim))?;
        expect("doublets", self.doublets.len(), content.doublets)?;
        for d in &self.doublets {
            expect("doublet", d.len(), sites)?;
        }
        expect("triplet", self.triplet.len(), on(content.triplet, sites))?;
        expect("singlet", self.singlet.len(), on(content.singlet, sites))
    }

    /// Whether U(1) hypercharge links are stored.
    #[inline]
    #[must_use]
    pub fn has_u1(&self) -> bool {
        !self.u1.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn link(&self, site: usize, dir: usize) -> Su2Matrix {
        self.links[site * self.dim + dir]
    }

    #[inline]
    pub fn set_link(&mut self, site: usize, dir: usize, u: Su2Matrix) {
        self.links[site * self.dim + dir] = u;
    }

    /// U(1) angle α on link (site, dir).
    #[inline]
    #[must_use]
    pub fn u1_angle(&self, site: usize, dir: usize) -> f64 {
        self.u1[site * self.dim + dir]
    }

    #[inline]
    pub fn set_u1_angle(&mut self, site: usize, dir: usize, alpha: f64) {
        self.u1[site * self.dim + dir] = alpha;
    }

    #[inline]
    #[must_use]
    pub fn doublet(&self, species: usize, site: usize) -> Su2Matrix {
        self.doublets[species][site]
    }
}

/// A field configuration read through its neighbor map.
///
/// Plaquettes, hoppings, projection and smearing are all methods on this
/// view, spread over the modules that own each construction.
pub struct Lattice<'a, L: Layout> {
    pub layout: &'a L,
    pub fields: &'a Fields,
}

impl<L: Layout> Clone for Lattice<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Layout> Copy for Lattice<'_, L> {}

impl<'a, L: Layout> Lattice<'a, L> {
    #[must_use]
    pub const fn new(layout: &'a L, fields: &'a Fields) -> Self {
        Self { layout, fields }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.layout.dim()
    }

    #[inline]
    #[must_use]
    pub fn sites(&self) -> usize {
        self.layout.sites()
    }

    #[inline]
    #[must_use]
    pub fn next(&self, site: usize, dir: usize) -> usize {
        self.layout.next(site, dir)
    }

    #[inline]
    #[must_use]
    pub fn prev(&self, site: usize, dir: usize) -> usize {
        self.layout.prev(site, dir)
    }

    #[inline]
    #[must_use]
    pub fn link(&self, site: usize, dir: usize) -> Su2Matrix {
        self.fields.link(site, dir)
    }
}

/// Reinterpret `buf` as exactly `count` elements of `T`.
fn cast_exact<'a, T: bytemuck::Pod>(
    field: &'static str,
    buf: &'a [f64],
    count: usize,
    dofs: usize,
) -> Result<&'a [T]> {
    let mismatch = || LatticeError::BufferLayout {
        field,
        len: buf.len(),
        expected: count * dofs,
    };
    let typed: &[T] = bytemuck::try_cast_slice(buf).map_err(|_| mismatch())?;
    if typed.len() == count {
        Ok(typed)
    } else {
        Err(mismatch())
    }
}
