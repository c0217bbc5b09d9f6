// SPDX-License-Identifier: AGPL-3.0-only

//! Hopping terms and potentials of the scalar species.
//!
//! # Normalizations
//!
//! | species | storage       | continuum           | invariant                 |
//! |---------|---------------|---------------------|---------------------------|
//! | doublet | Φ = a0 + i a·σ | φ†φ = ½ Tr Φ†Φ      | `doublet_sq` = ½Σaᵢ²       |
//! | triplet | a (3 reals)   | A = ½ aᵢσᵢ          | Tr A² = ½Σaᵢ²              |
//! | singlet | S             | S                   |                           |
//!
//! # Hopping terms
//!
//! Doublet, with the hypercharge rotation P = exp(−iα σ3) when U(1) links
//! are present (P = I otherwise):
//!
//!   h⁺(x,j) = −½ Re Tr Φ†(x) `U_j`(x) Φ(x+j) P(x,j)
//!
//! Triplet, with R(U) the adjoint (SO(3)) matrix of U:
//!
//!   h⁺(x,j) = −2 Tr A(x) `U_j`(x) A(x+j) `U_j`†(x) = −a(x)·R(`U_j`(x)) a(x+j)
//!
//! Both are real identically. The backward terms are the forward terms of
//! x−j, so that a per-site sum of forward terms counts each link once.
//!
//! # Two-doublet bilinear
//!
//! f12 = φ1†φ2 = R + iI with
//!
//!   R = ½ Σₖ h1ₖ h2ₖ,   I = ½ (h1₃h2₀ + h1₂h2₁ − h1₁h2₂ − h1₀h2₃)
//!
//! # References
//!
//! - Kajantie, Laine, Rummukainen, Shaposhnikov, NPB 466, 189 (1996)
//! - Niemi, Rummukainen, Seppä, Tenkanen, et al., PRL 126, 171802 (2021)

use crate::config::ModelConfig;

use super::complex_f64::Complex64;
use super::constants::MAX_DOUBLETS;
use super::fields::Lattice;
use super::layout::Layout;
use super::su2::Su2Matrix;

/// A scalar field species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    /// Doublet with the given species index.
    Doublet(usize),
    Triplet,
    Singlet,
}

/// φ†φ = ½ Tr Φ†Φ = ½Σaᵢ².
#[inline]
#[must_use]
pub fn doublet_sq(phi: Su2Matrix) -> f64 {
    0.5 * phi.norm_sq()
}

/// Tr A² = ½Σaᵢ².
#[inline]
#[must_use]
pub fn triplet_sq(a: [f64; 3]) -> f64 {
    0.5 * (a[0] * a[0] + a[1] * a[1] + a[2] * a[2])
}

/// exp(−iα σ3) in the quaternion form.
#[inline]
#[must_use]
pub fn hypercharge_phase(alpha: f64) -> Su2Matrix {
    Su2Matrix::new(alpha.cos(), 0.0, 0.0, -alpha.sin())
}

/// f12 = φ1†φ2 as R + iI.
#[must_use]
pub fn doublet_bilinear(h1: Su2Matrix, h2: Su2Matrix) -> Complex64 {
    let (a, b) = (h1.u, h2.u);
    Complex64::new(
        0.5 * (a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]),
        0.5 * (a[3] * b[0] + a[2] * b[1] - a[1] * b[2] - a[0] * b[3]),
    )
}

/// Site-local potential split by the species each term involves.
///
/// Portal and mixing terms appear once, so [`Self::total`] is the full
/// potential and [`Self::involving`] is the part that changes with a
/// single species.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PotentialTerms {
    pub doublet_self: [f64; MAX_DOUBLETS],
    pub two_doublet: f64,
    pub doublet_triplet: [f64; MAX_DOUBLETS],
    pub doublet_singlet: [f64; MAX_DOUBLETS],
    pub triplet_self: f64,
    pub singlet_self: f64,
    pub triplet_singlet: f64,
}

impl PotentialTerms {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.doublet_self.iter().sum::<f64>()
            + self.two_doublet
            + self.doublet_triplet.iter().sum::<f64>()
            + self.doublet_singlet.iter().sum::<f64>()
            + self.triplet_self
            + self.singlet_self
            + self.triplet_singlet
    }

    /// Terms that depend on `species`.
    #[must_use]
    pub fn involving(&self, species: Species) -> f64 {
        match species {
            Species::Doublet(k) => {
                self.doublet_self[k]
                    + self.two_doublet
                    + self.doublet_triplet[k]
                    + self.doublet_singlet[k]
            }
            Species::Triplet => {
                self.triplet_self
                    + self.doublet_triplet.iter().sum::<f64>()
                    + self.triplet_singlet
            }
            Species::Singlet => {
                self.singlet_self
                    + self.doublet_singlet.iter().sum::<f64>()
                    + self.triplet_singlet
            }
        }
    }
}

impl<L: Layout> Lattice<'_, L> {
    /// −½ Re Tr Φ†(x) U(x) Φ(x+j) P for doublet `k` on link (x, j).
    fn doublet_link_trace(&self, k: usize, base: usize, dir: usize) -> f64 {
        let f = self.fields;
        let phi1 = f.doublet(k, base);
        let phi2 = f.doublet(k, self.next(base, dir));
        let mut prod = phi1.adjoint() * f.link(base, dir) * phi2;
        if f.has_u1() {
            prod = prod * hypercharge_phase(f.u1_angle(base, dir));
        }
        -prod.u[0]
    }

    /// Forward doublet hopping term at (x, j).
    #[must_use]
    pub fn hopping_doublet_forward(&self, k: usize, i: usize, dir: usize) -> f64 {
        self.doublet_link_trace(k, i, dir)
    }

    /// Backward doublet hopping term: the forward term of x−j.
    #[must_use]
    pub fn hopping_doublet_backward(&self, k: usize, i: usize, dir: usize) -> f64 {
        self.doublet_link_trace(k, self.prev(i, dir), dir)
    }

    /// Forward triplet hopping term −a(x)·R(U) a(x+j).
    #[must_use]
    pub fn hopping_triplet_forward(&self, i: usize, dir: usize) -> f64 {
        let f = self.fields;
        let a1 = f.triplet[i];
        let a2 = f.link(i, dir).rotate_adjoint(f.triplet[self.next(i, dir)]);
        -(a1[0] * a2[0] + a1[1] * a2[1] + a1[2] * a2[2])
    }

    /// Backward triplet hopping term: the forward term of x−j.
    #[must_use]
    pub fn hopping_triplet_backward(&self, i: usize, dir: usize) -> f64 {
        self.hopping_triplet_forward(self.prev(i, dir), dir)
    }

    /// Generic forward hopping term for any species.
    #[must_use]
    pub fn hopping_forward(&self, species: Species, i: usize, dir: usize) -> f64 {
        match species {
            Species::Doublet(k) => self.hopping_doublet_forward(k, i, dir),
            Species::Triplet => self.hopping_triplet_forward(i, dir),
            Species::Singlet => {
                let s = &self.fields.singlet;
                -s[i] * s[self.next(i, dir)]
            }
        }
    }

    /// Generic backward hopping term for any species.
    #[must_use]
    pub fn hopping_backward(&self, species: Species, i: usize, dir: usize) -> f64 {
        self.hopping_forward(species, self.prev(i, dir), dir)
    }

    /// Σⱼ [2φ†φ(x) + h⁺(x,j)] for doublet `k`.
    #[must_use]
    pub fn covariant_doublet(&self, k: usize, i: usize) -> f64 {
        let two_mod = 2.0 * doublet_sq(self.fields.doublet(k, i));
        (0..self.dim())
            .map(|dir| two_mod + self.hopping_doublet_forward(k, i, dir))
            .sum()
    }

    /// 2 Σⱼ [Tr A² − Tr A(x) U A(x+j) U†].
    #[must_use]
    pub fn covariant_triplet(&self, i: usize) -> f64 {
        let two_mod = 2.0 * triplet_sq(self.fields.triplet[i]);
        (0..self.dim())
            .map(|dir| two_mod + self.hopping_triplet_forward(i, dir))
            .sum()
    }

    /// Σⱼ [S(x)² − S(x)S(x+j)], the lattice ½(∂S)² assigned to x.
    #[must_use]
    pub fn covariant_singlet(&self, i: usize) -> f64 {
        let s = self.fields.singlet[i];
        (0..self.dim())
            .map(|dir| s * s + self.hopping_forward(Species::Singlet, i, dir))
            .sum()
    }

    /// Potential at x split by species.
    #[must_use]
    pub fn potential_terms(&self, i: usize, config: &ModelConfig) -> PotentialTerms {
        let f = self.fields;
        let c = &config.content;
        let k = &config.couplings;
        let mut t = PotentialTerms::default();

        let mut phisq = [0.0; MAX_DOUBLETS];
        for (db, cp) in k.doublets.iter().enumerate().take(c.doublets) {
            let m = doublet_sq(f.doublet(db, i));
            phisq[db] = m;
            t.doublet_self[db] = cp.msq * m + cp.lambda * m * m;
        }

        if c.doublets == 2 {
            if let Some(two) = &k.two_doublet {
                let (f11, f22) = (phisq[0], phisq[1]);
                let f12 = doublet_bilinear(f.doublet(0, i), f.doublet(1, i));
                let (r, im) = (f12.re, f12.im);
                t.two_doublet = two.msq12.re * r - two.msq12.im * im
                    + two.lambda3 * f11 * f22
                    + two.lambda4 * (r * r + im * im)
                    + two.lambda5.re * (r * r - im * im)
                    - 2.0 * two.lambda5.im * r * im
                    + f11 * (two.lambda6.re * r - two.lambda6.im * im)
                    + f22 * (two.lambda7.re * r + two.lambda7.im * im);
            }
        }

        let trip = if c.triplet {
            let tm = triplet_sq(f.triplet[i]);
            if let Some(tc) = &k.triplet {
                t.triplet_self = tc.msq * tm + tc.b4 * tm * tm;
            }
            for (db, cp) in k.doublets.iter().enumerate().take(c.doublets) {
                t.doublet_triplet[db] = cp.a2_triplet * phisq[db] * tm;
            }
            tm
        } else {
            0.0
        };

        if c.singlet {
            let s = f.singlet[i];
            let (s2, s3) = (s * s, s * s * s);
            if let Some(sc) = &k.singlet {
                t.singlet_self = sc.b1 * s
                    + 0.5 * sc.msq * s2
                    + sc.b3 * s3 / 3.0
                    + 0.25 * sc.b4 * s2 * s2;
                if c.triplet {
                    t.triplet_singlet = (sc.a1_triplet * s + sc.a2_triplet * s2) * trip;
                }
            }
            for (db, cp) in k.doublets.iter().enumerate().take(c.doublets) {
                t.doublet_singlet[db] = 0.5 * (cp.a1_singlet * s + cp.a2_singlet * s2) * phisq[db];
            }
        }
        t
    }

    /// Full scalar potential at x; zero without scalars.
    #[must_use]
    pub fn potential(&self, i: usize, config: &ModelConfig) -> f64 {
        self.potential_terms(i, config).total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Couplings, DoubletCouplings, FieldContent, SingletCouplings, TripletCouplings,
        TwoDoubletCouplings,
    };
    use crate::lattice::fields::Fields;
    use crate::lattice::layout::PeriodicLattice;

    fn two_doublet_config() -> ModelConfig {
        ModelConfig {
            dim: 3,
            content: FieldContent {
                doublets: 2,
                triplet: true,
                singlet: true,
                u1: true,
            },
            couplings: Couplings {
                beta_su2: 8.0,
                beta_u1: 10.0,
                doublets: vec![
                    DoubletCouplings {
                        msq: -0.2,
                        lambda: 0.1,
                        a2_triplet: 0.3,
                        a1_singlet: 0.05,
                        a2_singlet: 0.02,
                    },
                    DoubletCouplings {
                        msq: 0.15,
                        lambda: 0.07,
                        a2_triplet: -0.1,
                        a1_singlet: 0.0,
                        a2_singlet: 0.04,
                    },
                ],
                two_doublet: Some(TwoDoubletCouplings {
                    msq12: Complex64::new(0.01, 0.02),
                    lambda3: 0.2,
                    lambda4: 0.1,
                    lambda5: Complex64::new(0.03, -0.01),
                    lambda6: Complex64::new(0.02, 0.01),
                    lambda7: Complex64::new(-0.01, 0.03),
                }),
                triplet: Some(TripletCouplings { msq: -0.3, b4: 0.2 }),
                singlet: Some(SingletCouplings {
                    b1: 0.01,
                    msq: 0.4,
                    b3: -0.05,
                    b4: 0.1,
                    a1_triplet: 0.02,
                    a2_triplet: 0.03,
                }),
            },
        }
    }

    #[test]
    fn hopping_is_real_part_of_trace() {
        // ½ Re Tr computed through the complex 2×2 embedding.
        use crate::lattice::cmatrix::CMatrix2;
        let cfg = two_doublet_config();
        let lat = PeriodicLattice::new(&[3, 3, 3]).expect("lattice");
        let f = Fields::hot(&lat, cfg.content, 4);
        let view = Lattice::new(&lat, &f);
        let (i, dir) = (5, 1);
        let j = lat.next(i, dir);
        let m = CMatrix2::from(f.doublet(0, i).adjoint())
            * CMatrix2::from(f.link(i, dir))
            * CMatrix2::from(f.doublet(0, j))
            * CMatrix2::from(hypercharge_phase(f.u1_angle(i, dir)));
        let expected = -0.5 * m.trace().re;
        let got = view.hopping_doublet_forward(0, i, dir);
        assert!(
            (got - expected).abs() < 1e-13,
            "hopping {got} vs {expected}"
        );
    }

    #[test]
    fn cold_links_doublet_hopping() {
        let lat = PeriodicLattice::new(&[2, 2]).expect("lattice");
        let content = FieldContent {
            doublets: 1,
            ..FieldContent::gauge_only()
        };
        let mut f = Fields::cold(&lat, content);
        for phi in &mut f.doublets[0] {
            *phi = Su2Matrix::new(1.0, 0.5, -0.5, 2.0);
        }
        let view = Lattice::new(&lat, &f);
        let h = view.hopping_doublet_forward(0, 0, 1);
        assert!(
            (h + 5.5).abs() < 1e-14,
            "uniform doublet hopping is −Σa², got {h}"
        );
        // Same φ = Φ/√2 as the mass term: −h⁺ = 2φ†φ for a uniform field.
        let phi_sq = doublet_sq(f.doublet(0, 0));
        assert!((h + 2.0 * phi_sq).abs() < 1e-14);
        assert!(
            view.covariant_doublet(0, 0).abs() < 1e-14,
            "uniform field has no gradient"
        );
    }

    #[test]
    fn triplet_hopping_matches_trace_form() {
        use crate::lattice::cmatrix::CMatrix2;
        let content = FieldContent {
            triplet: true,
            ..FieldContent::gauge_only()
        };
        let lat = PeriodicLattice::new(&[3, 3]).expect("lattice");
        let f = Fields::hot(&lat, content, 8);
        let view = Lattice::new(&lat, &f);
        let (i, dir) = (2, 0);
        // A = ½ a·σ as a quaternion: a·σ = −i(i a·σ), so A = −½i·(0, a).
        let adj = |a: [f64; 3]| -> CMatrix2 {
            let m = CMatrix2::from(Su2Matrix::new(0.0, a[0], a[1], a[2]));
            let mut r = CMatrix2::ZERO;
            for p in 0..2 {
                for q in 0..2 {
                    r.m[p][q] = m.m[p][q] * Complex64::new(0.0, -0.5);
                }
            }
            r
        };
        let u = CMatrix2::from(f.link(i, dir));
        let a1 = adj(f.triplet[i]);
        let a2 = adj(f.triplet[lat.next(i, dir)]);
        let expected = -2.0 * (a1 * u * a2 * u.adjoint()).trace().re;
        let got = view.hopping_triplet_forward(i, dir);
        assert!(
            (got - expected).abs() < 1e-13,
            "triplet hopping {got} vs {expected}"
        );
    }

    #[test]
    fn backward_is_forward_of_previous_site() {
        let cfg = two_doublet_config();
        let lat = PeriodicLattice::new(&[3, 4, 3]).expect("lattice");
        let f = Fields::hot(&lat, cfg.content, 19);
        let view = Lattice::new(&lat, &f);
        for species in [Species::Doublet(1), Species::Triplet, Species::Singlet] {
            let fwd: f64 = (0..lat.sites())
                .flat_map(|i| (0..3).map(move |d| (i, d)))
                .map(|(i, d)| view.hopping_forward(species, i, d))
                .sum();
            let bwd: f64 = (0..lat.sites())
                .flat_map(|i| (0..3).map(move |d| (i, d)))
                .map(|(i, d)| view.hopping_backward(species, i, d))
                .sum();
            assert!((fwd - bwd).abs() < 1e-10, "{species:?}: {fwd} vs {bwd}");
        }
    }

    #[test]
    fn bilinear_matches_quaternion_product() {
        // Φ1†Φ2 = 2R − 2I·(iσ3) + (iσ1, iσ2 parts)
        let h1 = Su2Matrix::new(0.3, -1.0, 0.4, 0.8);
        let h2 = Su2Matrix::new(-0.6, 0.2, 0.9, -0.1);
        let f12 = doublet_bilinear(h1, h2);
        let prod = h1.adjoint() * h2;
        assert!((f12.re - 0.5 * prod.u[0]).abs() < 1e-15);
        assert!((f12.im + 0.5 * prod.u[3]).abs() < 1e-15);
        let self_pair = doublet_bilinear(h1, h1);
        assert!((self_pair.re - doublet_sq(h1)).abs() < 1e-15);
        assert!(self_pair.im.abs() < 1e-15);
    }

    #[test]
    fn potential_terms_sum_and_split() {
        let cfg = two_doublet_config();
        let lat = PeriodicLattice::new(&[2, 2, 2]).expect("lattice");
        let f = Fields::hot(&lat, cfg.content, 23);
        let view = Lattice::new(&lat, &f);
        let t = view.potential_terms(3, &cfg);
        assert!((t.total() - view.potential(3, &cfg)).abs() < 1e-15);
        let m1 = doublet_sq(f.doublet(0, 3));
        let expected_self = -0.2 * m1 + 0.1 * m1 * m1;
        assert!((t.doublet_self[0] - expected_self).abs() < 1e-15);
        let tm = triplet_sq(f.triplet[3]);
        assert!((t.doublet_triplet[0] - 0.3 * m1 * tm).abs() < 1e-15);
        // everything except terms free of doublet 0
        let rest = t.doublet_self[1]
            + t.doublet_triplet[1]
            + t.doublet_singlet[1]
            + t.triplet_self
            + t.singlet_self
            + t.triplet_singlet;
        let d0 = t.involving(Species::Doublet(0));
        assert!((d0 + rest - t.total()).abs() < 1e-14);
    }

    #[test]
    fn two_doublet_potential_gauge_invariant() {
        let cfg = two_doublet_config();
        let lat = PeriodicLattice::new(&[2, 2, 2]).expect("lattice");
        let f = Fields::hot(&lat, cfg.content, 31);
        let mut g = f.clone();
        let mut seed = 99u64;
        let rot = Su2Matrix::random(&mut seed);
        for species in &mut g.doublets {
            for phi in species.iter_mut() {
                *phi = rot * *phi;
            }
        }
        for i in 0..lat.sites() {
            let a = Lattice::new(&lat, &f).potential(i, &cfg);
            let b = Lattice::new(&lat, &g).potential(i, &cfg);
            assert!((a - b).abs() < 1e-13, "site {i}: {a} vs {b}");
        }
    }

    #[test]
    fn singlet_kinetic_vanishes_for_constant_field() {
        let content = FieldContent {
            singlet: true,
            ..FieldContent::gauge_only()
        };
        let lat = PeriodicLattice::new(&[3, 3, 3]).expect("lattice");
        let mut f = Fields::cold(&lat, content);
        f.singlet.iter_mut().for_each(|s| *s = 1.7);
        let view = Lattice::new(&lat, &f);
        assert!(view.covariant_singlet(4).abs() < 1e-14);
    }
}
