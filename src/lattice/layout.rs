// SPDX-License-Identifier: AGPL-3.0-only

//! Site indexing and neighbor maps.
//!
//! The evaluators only ever ask for `next(site, dir)` and `prev(site, dir)`
//! plus, for blocking, a site's coordinate along a direction. Any domain
//! decomposition or halo scheme can sit behind [`Layout`]; the crate ships
//! [`PeriodicLattice`], a single-domain periodic torus of arbitrary
//! dimension with precomputed neighbor tables.
//!
//! Index convention: direction 0 runs fastest,
//! `idx = x0 + N0·(x1 + N1·(x2 + …))`.

use crate::error::{LatticeError, Result};

/// Read-only neighbor map consumed by the local evaluators.
pub trait Layout: Sync {
    /// Number of lattice directions D.
    fn dim(&self) -> usize;

    /// Number of sites held locally.
    fn sites(&self) -> usize;

    /// Forward neighbor x + dir.
    fn next(&self, site: usize, dir: usize) -> usize;

    /// Backward neighbor x − dir.
    fn prev(&self, site: usize, dir: usize) -> usize;

    /// Coordinate of `site` along `dir`.
    fn coord(&self, site: usize, dir: usize) -> usize;
}

/// Periodic hypercubic lattice with tabulated neighbors.
#[derive(Clone, Debug)]
pub struct PeriodicLattice {
    dims: Vec<usize>,
    volume: usize,
    /// next[site * dim + dir]
    next: Vec<usize>,
    /// prev[site * dim + dir]
    prev: Vec<usize>,
}

impl PeriodicLattice {
    /// Build the neighbor tables for extents `dims`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for fewer than two directions or a zero extent.
    pub fn new(dims: &[usize]) -> Result<Self> {
        if dims.len() < 2 {
            return Err(LatticeError::InvalidConfig(format!(
                "lattice needs at least 2 directions, got {}",
                dims.len()
            )));
        }
        if let Some(d) = dims.iter().position(|&n| n == 0) {
            return Err(LatticeError::InvalidConfig(format!(
                "lattice extent along direction {d} is zero"
            )));
        }
        let dim = dims.len();
        let volume: usize = dims.iter().product();
        let mut next = vec![0; volume * dim];
        let mut prev = vec![0; volume * dim];
        let mut lat = Self {
            dims: dims.to_vec(),
            volume,
            next: Vec::new(),
            prev: Vec::new(),
        };
        for site in 0..volume {
            let x = lat.site_coords(site);
            for dir in 0..dim {
                let mut y = x.clone();
                y[dir] = (x[dir] + 1) % dims[dir];
                next[site * dim + dir] = lat.site_index(&y);
                y[dir] = (x[dir] + dims[dir] - 1) % dims[dir];
                prev[site * dim + dir] = lat.site_index(&y);
            }
        }
        lat.next = next;
        lat.prev = prev;
        Ok(lat)
    }

    /// Linear index of coordinates `x` (direction 0 fastest).
    #[must_use]
    pub fn site_index(&self, x: &[usize]) -> usize {
        x.iter()
            .zip(&self.dims)
            .rev()
            .fold(0, |acc, (&xi, &n)| acc * n + xi)
    }

    /// Coordinates of linear index `idx`.
    #[must_use]
    pub fn site_coords(&self, idx: usize) -> Vec<usize> {
        let mut rem = idx;
        self.dims
            .iter()
            .map(|&n| {
                let c = rem % n;
                rem /= n;
                c
            })
            .collect()
    }
}

impl Layout for PeriodicLattice {
    fn dim(&self) -> usize {
        self.dims.len()
    }

    fn sites(&self) -> usize {
        self.volume
    }

    #[inline]
    fn next(&self, site: usize, dir: usize) -> usize {
        self.next[site * self.dims.len() + dir]
    }

    #[inline]
    fn prev(&self, site: usize, dir: usize) -> usize {
        self.prev[site * self.dims.len() + dir]
    }

    fn coord(&self, site: usize, dir: usize) -> usize {
        let stride: usize = self.dims[..dir].iter().product();
        (site / stride) % self.dims[dir]
    }
}
