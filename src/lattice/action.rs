// SPDX-License-Identifier: AGPL-3.0-only

//! Local action aggregation.
//!
//! Total action:
//!
//! ```text
//!   S = Σ_x [ S_W(x) + S_U1(x) + V(x)
//!             + Σ_k Σ_j (2φ_k†φ_k(x) + h⁺_k(x,j))
//!             + Σ_j (2 Tr A²(x) + h⁺_A(x,j))
//!             + Σ_j (S(x)² − S(x)S(x+j)) ]
//! ```
//!
//! where `S_W`(x) and `S_U1`(x) are the plaquettes based at x. Every
//! plaquette and hopping pair appears at exactly one site, so
//! `Σ_x local_action(x)` is the total action.
//!
//! The per-variable actions collect exactly the terms that contain one
//! variable. A sampler compares them before and after a proposal; their
//! change equals the change of the total action.
//!
//! | variable       | terms                                                      |
//! |----------------|------------------------------------------------------------|
//! | `U_μ`(x)       | 2(D−1) plaquettes, doublet and triplet h⁺ on (x,μ)          |
//! | `α_μ`(x)       | 2(D−1) U(1) plaquettes, doublet h⁺ on (x,μ)                 |
//! | scalar at x    | local kinetic, h⁺ and h⁻ in every direction, potential      |

use crate::config::ModelConfig;
use crate::error::{LatticeError, Result};

use super::fields::{Fields, Lattice};
use super::layout::Layout;
use super::scalar::{hypercharge_phase, Species};
use super::su2::Su2Matrix;

/// Evaluates local actions for one configuration under one model.
pub struct ActionEvaluator<'a, L: Layout> {
    lattice: Lattice<'a, L>,
    config: &'a ModelConfig,
}

impl<'a, L: Layout> ActionEvaluator<'a, L> {
    /// Validate `config` and the field storage once.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration is inconsistent or its
    /// dimension differs from the layout's; `BufferLayout` if the fields do
    /// not match the layout and content.
    pub fn new(layout: &'a L, fields: &'a Fields, config: &'a ModelConfig) -> Result<Self> {
        config.validate()?;
        if config.dim != layout.dim() {
            return Err(LatticeError::InvalidConfig(format!(
                "configuration is {}-dimensional, layout is {}-dimensional",
                config.dim, layout.dim()
            )));
        }
        fields.check_against(layout, config.content)?;
        Ok(Self {
            lattice: Lattice::new(layout, fields),
            config,
        })
    }

    #[must_use]
    pub fn lattice(&self) -> Lattice<'a, L> {
        self.lattice
    }

    #[must_use]
    pub fn config(&self) -> &'a ModelConfig {
        self.config
    }

    /// Contribution of site x to the total action.
    #[must_use]
    pub fn local_action(&self, i: usize) -> f64 {
        let lat = &self.lattice;
        let c = &self.config.content;
        let k = &self.config.couplings;

        let mut tot = lat.local_su2_wilson(i, k.beta_su2);
        if c.u1 {
            tot += lat.local_u1_wilson(i, k.beta_u1);
        }
        tot += lat.potential(i, self.config);
        for db in 0..c.doublets {
            tot += lat.covariant_doublet(db, i);
        }
        if c.triplet {
            tot += lat.covariant_triplet(i);
        }
        if c.singlet {
            tot += lat.covariant_singlet(i);
        }
        tot
    }

    /// Σ_x `local_action`(x).
    #[must_use]
    pub fn total_action(&self) -> f64 {
        (0..self.lattice.sites())
            .map(|i| self.local_action(i))
            .sum()
    }

    /// Every term containing the SU(2) link `U_μ`(x), constants included.
    #[must_use]
    pub fn local_action_for_link(&self, i: usize, mu: usize) -> f64 {
        let lat = &self.lattice;
        let c = &self.config.content;
        let mut tot = lat.su2_link_plaquettes(i, mu, self.config.couplings.beta_su2);
        for db in 0..c.doublets {
            tot += lat.hopping_doublet_forward(db, i, mu);
        }
        if c.triplet {
            tot += lat.hopping_triplet_forward(i, mu);
        }
        tot
    }

    /// Every term containing the U(1) angle `α_μ`(x).
    ///
    /// # Errors
    ///
    /// `MissingField` if the model has no U(1) links.
    pub fn local_action_for_u1_link(&self, i: usize, mu: usize) -> Result<f64> {
        let c = &self.config.content;
        if !c.u1 {
            return Err(LatticeError::MissingField("u1"));
        }
        let lat = &self.lattice;
        let mut tot = lat.u1_link_plaquettes(i, mu, self.config.couplings.beta_u1);
        for db in 0..c.doublets {
            tot += lat.hopping_doublet_forward(db, i, mu);
        }
        Ok(tot)
    }

    /// Every term containing the scalar `species` at site x.
    ///
    /// # Errors
    ///
    /// `MissingField` if the model does not carry `species`.
    pub fn local_action_for_field(&self, species: Species, i: usize) -> Result<f64> {
        let lat = &self.lattice;
        let c = &self.config.content;
        let kinetic = match species {
            Species::Doublet(k) if k < c.doublets => lat.covariant_doublet(k, i),
            Species::Doublet(_) => return Err(LatticeError::MissingField("doublet")),
            Species::Triplet if c.triplet => lat.covariant_triplet(i),
            Species::Triplet => return Err(LatticeError::MissingField("triplet")),
            Species::Singlet if c.singlet => lat.covariant_singlet(i),
            Species::Singlet => return Err(LatticeError::MissingField("singlet")),
        };
        let backward: f64 = (0..lat.dim())
            .map(|dir| lat.hopping_backward(species, i, dir))
            .sum();
        let pot = lat.potential_terms(i, self.config).involving(species);
        Ok(kinetic + backward + pot)
    }

    /// Staple V of `U_μ`(x) with the doublet hopping folded in, normalized
    /// so that without a triplet
    ///
    ///   `local_action_for_link` = 2β(D−1) + Re Tr U V.
    ///
    /// The triplet hopping is quadratic in U and has no staple form.
    pub fn link_staple(&self, i: usize, mu: usize) -> Su2Matrix {
        let lat = &self.lattice;
        let f = lat.fields;
        let beta = self.config.couplings.beta_su2;
        let mut v = lat.staple(i, mu).scale(-0.5 * beta);
        let next = lat.next(i, mu);
        for db in 0..self.config.content.doublets {
            let mut fwd = f.doublet(db, next);
            if f.has_u1() {
                fwd = fwd * hypercharge_phase(f.u1_angle(i, mu));
            }
            v += (fwd * f.doublet(db, i).adjoint()).scale(-0.5);
        }
        v
    }

    /// `local_action_for_link` evaluated through [`Self::link_staple`].
    ///
    /// # Errors
    ///
    /// `Unsupported` when the triplet is active.
    pub fn link_action_via_staple(&self, i: usize, mu: usize) -> Result<f64> {
        if self.config.content.triplet {
            return Err(LatticeError::Unsupported("staple form of the link action with a triplet"));
        }
        let d = self.lattice.dim() as f64;
        let beta = self.config.couplings.beta_su2;
        let uv = (self.lattice.link(i, mu) * self.link_staple(i, mu)).re_trace();
        Ok(2.0 * beta * (d - 1.0) + uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Couplings, DoubletCouplings, FieldContent, TwoDoubletCouplings};
    use crate::lattice::complex_f64::Complex64;
    use crate::lattice::layout::PeriodicLattice;

    fn two_higgs_u1(dim: usize) -> ModelConfig {
        ModelConfig {
            dim,
            content: FieldContent {
                doublets: 2,
                triplet: false,
                singlet: false,
                u1: true,
            },
            couplings: Couplings {
                beta_su2: 6.0,
                beta_u1: 9.0,
                doublets: vec![
                    DoubletCouplings {
                        msq: -0.3,
                        lambda: 0.1,
                        ..DoubletCouplings::default()
                    },
                    DoubletCouplings {
                        msq: 0.2,
                        lambda: 0.05,
                        ..DoubletCouplings::default()
                    },
                ],
                two_doublet: Some(TwoDoubletCouplings {
                    msq12: Complex64::new(0.05, -0.02),
                    lambda3: 0.1,
                    lambda4: 0.05,
                    ..TwoDoubletCouplings::default()
                }),
                ..Couplings::default()
            },
        }
    }

    #[test]
    fn cold_gauge_only_local_action_is_zero() {
        let lat = PeriodicLattice::new(&[2, 2, 2, 2]).expect("lattice");
        let cfg = ModelConfig::gauge_only(4, 2.3);
        let f = Fields::cold(&lat, cfg.content);
        let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
        for i in 0..lat.sites() {
            assert_eq!(ev.local_action(i), 0.0, "site {i}");
        }
        assert_eq!(ev.total_action(), 0.0);
    }

    #[test]
    fn gauge_only_total_matches_wilson() {
        let lat = PeriodicLattice::new(&[3, 3, 3]).expect("lattice");
        let cfg = ModelConfig::gauge_only(3, 4.0);
        let f = Fields::hot(&lat, cfg.content, 101);
        let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
        let direct = ev.lattice().wilson_action(4.0);
        assert!((ev.total_action() - direct).abs() < 1e-10);
    }

    #[test]
    fn staple_form_matches_link_action() {
        let cfg = two_higgs_u1(3);
        let lat = PeriodicLattice::new(&[3, 3, 4]).expect("lattice");
        let f = Fields::hot(&lat, cfg.content, 55);
        let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
        for i in [0, 13, 35] {
            for mu in 0..3 {
                let direct = ev.local_action_for_link(i, mu);
                let staple = ev.link_action_via_staple(i, mu).expect("no triplet");
                assert!(
                    (direct - staple).abs() < 1e-11,
                    "site {i} dir {mu}: {direct} vs {staple}"
                );
            }
        }
    }

    #[test]
    fn missing_species_is_an_error() {
        let lat = PeriodicLattice::new(&[2, 2]).expect("lattice");
        let cfg = ModelConfig::gauge_only(2, 1.0);
        let f = Fields::cold(&lat, cfg.content);
        let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
        assert!(matches!(
            ev.local_action_for_field(Species::Triplet, 0),
            Err(LatticeError::MissingField("triplet"))
        ));
        assert!(matches!(
            ev.local_action_for_field(Species::Doublet(0), 0),
            Err(LatticeError::MissingField("doublet"))
        ));
        assert!(ev.local_action_for_u1_link(0, 0).is_err());
    }

    #[test]
    fn rejects_mismatched_dimension() {
        let lat = PeriodicLattice::new(&[2, 2, 2]).expect("lattice");
        let cfg = ModelConfig::gauge_only(4, 1.0);
        let f = Fields::cold(&lat, cfg.content);
        assert!(matches!(
            ActionEvaluator::new(&lat, &f, &cfg),
            Err(LatticeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn doublet_field_locality() {
        let cfg = two_higgs_u1(2);
        let lat = PeriodicLattice::new(&[4, 3]).expect("lattice");
        let mut f = Fields::hot(&lat, cfg.content, 12);
        let (site, species) = (5, Species::Doublet(1));
        let before_total = ActionEvaluator::new(&lat, &f, &cfg)
            .expect("evaluator")
            .total_action();
        let before_local = ActionEvaluator::new(&lat, &f, &cfg)
            .expect("evaluator")
            .local_action_for_field(species, site)
            .expect("doublet present");
        f.doublets[1][site] = Su2Matrix::new(0.4, -0.9, 0.1, 0.3);
        let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
        let d_total = ev.total_action() - before_total;
        let d_local = ev.local_action_for_field(species, site).expect("present") - before_local;
        assert!((d_total - d_local).abs() < 1e-10, "{d_total} vs {d_local}");
    }
}
