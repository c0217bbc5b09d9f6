// SPDX-License-Identifier: AGPL-3.0-only

//! Plaquettes, staples and the Wilson action for SU(2) and U(1) links.
//!
//! The plaquette at x in the (μ,ν) plane:
//!
//!   `P_μν`(x) = `U_μ`(x) `U_ν`(x+μ) `U_μ`†(x+ν) `U_ν`†(x)
//!
//! with Re Tr P = 2·p0 in the quaternion form. The Wilson action, with
//! β = 4/g², is
//!
//!   S = β Σ\_{x,μ<ν} (1 − ½ Re Tr `P_μν`(x))
//!
//! and the U(1) analogue with angles α is
//!
//!   `S_U1` = `β_U1` Σ\_{x,μ<ν} (1 − cos(`α_μ`(x) + `α_ν`(x+μ) − `α_μ`(x+ν) − `α_ν`(x)))
//!
//! Staples are the three-link products V with U·V closing a plaquette:
//!
//! ```text
//!   upper:  U_ν(x+μ) U_μ†(x+ν) U_ν†(x)
//!   lower:  U_ν†(x+μ−ν) U_μ†(x−ν) U_ν(x−ν)
//! ```
//!
//! For identity links every plaquette trace is 2 and the full staple is
//! 2(D−1)·I.
//!
//! # References
//!
//! - Wilson, PRD 10, 2445 (1974)
//! - Bilson-Thompson, Leinweber, Williams, hep-lat/0106023 (clover, eq. 12)

use super::fields::Lattice;
use super::layout::Layout;
use super::su2::Su2Matrix;

/// Which half of the staple sum around a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StapleSense {
    /// Counterclockwise, through x+ν.
    Upper,
    /// Clockwise, through x−ν.
    Lower,
}

impl<L: Layout> Lattice<'_, L> {
    /// Untraced plaquette `P_{d1 d2}`(x).
    pub fn su2_plaquette(&self, i: usize, d1: usize, d2: usize) -> Su2Matrix {
        let u1 = self.link(i, d1);
        let u2 = self.link(self.next(i, d1), d2);
        let u3 = self.link(self.next(i, d2), d1);
        let u4 = self.link(i, d2);
        u1 * u2 * u3.adjoint() * u4.adjoint()
    }

    /// Re Tr `P_{d1 d2}`(x); 2 for a trivial vacuum.
    #[must_use]
    pub fn plaquette_trace(&self, i: usize, d1: usize, d2: usize) -> f64 {
        self.su2_plaquette(i, d1, d2).re_trace()
    }

    /// One half of the staple of `U_μ`(x) in the (μ,ν) plane.
    pub fn staple_component(
        &self,
        i: usize,
        mu: usize,
        nu: usize,
        sense: StapleSense,
    ) -> Su2Matrix {
        let x_mu = self.next(i, mu);
        match sense {
            StapleSense::Upper => {
                let x_nu = self.next(i, nu);
                self.link(x_mu, nu) * self.link(x_nu, mu).adjoint() * self.link(i, nu).adjoint()
            }
            StapleSense::Lower => {
                let x_bnu = self.prev(i, nu);
                let x_mu_bnu = self.prev(x_mu, nu);
                self.link(x_mu_bnu, nu).adjoint()
                    * self.link(x_bnu, mu).adjoint()
                    * self.link(x_bnu, nu)
            }
        }
    }

    /// Full Wilson staple of `U_μ`(x): both senses for every ν ≠ μ.
    pub fn staple(&self, i: usize, mu: usize) -> Su2Matrix {
        let mut s = Su2Matrix::ZERO;
        for nu in (0..self.dim()).filter(|&nu| nu != mu) {
            s += self.staple_component(i, mu, nu, StapleSense::Upper);
            s += self.staple_component(i, mu, nu, StapleSense::Lower);
        }
        s
    }

    /// Upper plus lower staple in the single plane (μ,ν), conjugated when
    /// `dagger` is set. For ν = μ the identity is returned.
    pub fn staple_one_direction(&self, i: usize, mu: usize, nu: usize, dagger: bool) -> Su2Matrix {
        if mu == nu {
            return Su2Matrix::IDENTITY;
        }
        let s = self.staple_component(i, mu, nu, StapleSense::Upper)
            + self.staple_component(i, mu, nu, StapleSense::Lower);
        if dagger {
            s.adjoint()
        } else {
            s
        }
    }

    /// Sum of the four plaquettes in the (d1,d2) plane with a corner at x,
    /// each starting and ending at x.
    pub fn clover(&self, i: usize, d1: usize, d2: usize) -> Su2Matrix {
        let x_bmu = self.prev(i, d1);
        let x_bnu = self.prev(i, d2);
        let x_nu_bmu = self.prev(self.next(i, d2), d1);
        let x_bmu_bnu = self.prev(x_bmu, d2);
        let x_mu_bnu = self.next(x_bnu, d1);

        let mut c = self.su2_plaquette(i, d1, d2);
        // U_ν(x) U_μ†(x+ν−μ) U_ν†(x−μ) U_μ(x−μ)
        c += self.link(i, d2)
            * self.link(x_nu_bmu, d1).adjoint()
            * self.link(x_bmu, d2).adjoint()
            * self.link(x_bmu, d1);
        // U_μ†(x−μ) U_ν†(x−μ−ν) U_μ(x−μ−ν) U_ν(x−ν)
        c += self.link(x_bmu, d1).adjoint()
            * self.link(x_bmu_bnu, d2).adjoint()
            * self.link(x_bmu_bnu, d1)
            * self.link(x_bnu, d2);
        // U_ν†(x−ν) U_μ(x−ν) U_ν(x+μ−ν) U_μ†(x)
        c += self.link(x_bnu, d2).adjoint()
            * self.link(x_bnu, d1)
            * self.link(x_mu_bnu, d2)
            * self.link(i, d1).adjoint();
        c
    }

    /// β Σ\_{d1<d2} (1 − ½ Re Tr P) for the plaquettes based at x.
    ///
    /// Summed over all sites this is the total Wilson action.
    #[must_use]
    pub fn local_su2_wilson(&self, i: usize, beta: f64) -> f64 {
        let d = self.dim();
        let mut res = 0.0;
        for d1 in 0..d {
            for d2 in (d1 + 1)..d {
                res += 1.0 - 0.5 * self.plaquette_trace(i, d1, d2);
            }
        }
        beta * res
    }

    /// β Σ\_{ν≠μ} over the 2(D−1) plaquettes containing `U_μ`(x),
    /// constant terms included.
    #[must_use]
    pub fn su2_link_plaquettes(&self, i: usize, mu: usize, beta: f64) -> f64 {
        let mut tot = 0.0;
        for nu in (0..self.dim()).filter(|&nu| nu != mu) {
            tot += 1.0 - 0.5 * self.plaquette_trace(i, mu, nu);
            tot += 1.0 - 0.5 * self.plaquette_trace(self.prev(i, nu), mu, nu);
        }
        beta * tot
    }

    /// ⟨½ Re Tr P⟩ over all plaquettes; 1 for a cold start.
    #[must_use]
    pub fn average_plaquette(&self) -> f64 {
        let d = self.dim();
        let mut sum = 0.0;
        for i in 0..self.sites() {
            for d1 in 0..d {
                for d2 in (d1 + 1)..d {
                    sum += 0.5 * self.plaquette_trace(i, d1, d2);
                }
            }
        }
        let planes = d * (d - 1) / 2;
        sum / (self.sites() * planes) as f64
    }

    /// Total Wilson action at inverse coupling β.
    #[must_use]
    pub fn wilson_action(&self, beta: f64) -> f64 {
        (0..self.sites())
            .map(|i| self.local_su2_wilson(i, beta))
            .sum()
    }

    /// cos(α1 + α2 − α3 − α4), the real part of the U(1) plaquette.
    #[must_use]
    pub fn u1_plaquette_trace(&self, i: usize, d1: usize, d2: usize) -> f64 {
        let f = self.fields;
        let a1 = f.u1_angle(i, d1);
        let a2 = f.u1_angle(self.next(i, d1), d2);
        let a3 = f.u1_angle(self.next(i, d2), d1);
        let a4 = f.u1_angle(i, d2);
        (a1 + a2 - a3 - a4).cos()
    }

    /// `β_U1` Σ\_{d1<d2} (1 − cos θ) for the U(1) plaquettes based at x.
    #[must_use]
    pub fn local_u1_wilson(&self, i: usize, beta_u1: f64) -> f64 {
        let d = self.dim();
        let mut res = 0.0;
        for d1 in 0..d {
            for d2 in (d1 + 1)..d {
                res += 1.0 - self.u1_plaquette_trace(i, d1, d2);
            }
        }
        beta_u1 * res
    }

    /// U(1) counterpart of [`Self::su2_link_plaquettes`].
    #[must_use]
    pub fn u1_link_plaquettes(&self, i: usize, mu: usize, beta_u1: f64) -> f64 {
        let mut tot = 0.0;
        for nu in (0..self.dim()).filter(|&nu| nu != mu) {
            tot += 1.0 - self.u1_plaquette_trace(i, mu, nu);
            tot += 1.0 - self.u1_plaquette_trace(self.prev(i, nu), mu, nu);
        }
        beta_u1 * tot
    }
}
