// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: local actions against whole-lattice sums.
//!
//! Every per-variable action must change by exactly as much as the total
//! action when only that variable changes.

use su2lattice::config::{
    Couplings, DoubletCouplings, FieldContent, ModelConfig, SingletCouplings, TripletCouplings,
    TwoDoubletCouplings,
};
use su2lattice::lattice::constants::lcg_gaussian;
use su2lattice::lattice::{
    ActionEvaluator, Complex64, Fields, Layout, PeriodicLattice, Species, Su2Matrix,
};
use su2lattice::tolerances;

fn everything(dim: usize) -> ModelConfig {
    ModelConfig {
        dim,
        content: FieldContent {
            doublets: 2,
            triplet: true,
            singlet: true,
            u1: true,
        },
        couplings: Couplings {
            beta_su2: 9.0,
            beta_u1: 14.0,
            doublets: vec![
                DoubletCouplings {
                    msq: -0.15,
                    lambda: 0.07,
                    a2_triplet: 0.12,
                    a1_singlet: 0.02,
                    a2_singlet: 0.04,
                },
                DoubletCouplings {
                    msq: 0.05,
                    lambda: 0.09,
                    a2_triplet: -0.03,
                    a1_singlet: -0.01,
                    a2_singlet: 0.06,
                },
            ],
            two_doublet: Some(TwoDoubletCouplings {
                msq12: Complex64::new(0.03, 0.01),
                lambda3: 0.05,
                lambda4: 0.02,
                lambda5: Complex64::new(0.01, -0.02),
                lambda6: Complex64::new(0.004, 0.002),
                lambda7: Complex64::new(-0.003, 0.001),
            }),
            triplet: Some(TripletCouplings {
                msq: -0.2,
                b4: 0.11,
            }),
            singlet: Some(SingletCouplings {
                b1: 0.01,
                msq: 0.3,
                b3: -0.05,
                b4: 0.08,
                a1_triplet: 0.02,
                a2_triplet: 0.03,
            }),
        },
    }
}

fn total(lat: &PeriodicLattice, f: &Fields, cfg: &ModelConfig) -> f64 {
    ActionEvaluator::new(lat, f, cfg)
        .expect("evaluator")
        .total_action()
}

/// Apply `change` and compare Δ(local) with Δ(total).
fn assert_local<F, M>(
    lat: &PeriodicLattice,
    f: &mut Fields,
    cfg: &ModelConfig,
    local: F,
    change: M,
    what: &str,
) where
    F: Fn(&ActionEvaluator<'_, PeriodicLattice>) -> f64,
    M: FnOnce(&mut Fields),
{
    let (t0, l0) = {
        let ev = ActionEvaluator::new(lat, f, cfg).expect("evaluator");
        (ev.total_action(), local(&ev))
    };
    change(f);
    let ev = ActionEvaluator::new(lat, f, cfg).expect("evaluator");
    let d_total = ev.total_action() - t0;
    let d_local = local(&ev) - l0;
    assert!(
        d_total.abs() > 1e-8,
        "{what}: perturbation did not move the action"
    );
    assert!(
        (d_total - d_local).abs() < tolerances::UPDATE_LOCALITY_ABS,
        "{what}: Δtotal {d_total} vs Δlocal {d_local}"
    );
}

#[test]
fn cold_start_has_zero_action_for_any_content() {
    let cfg = everything(4);
    let lat = PeriodicLattice::new(&[2, 2, 2, 2]).expect("lattice");
    let f = Fields::cold(&lat, cfg.content);
    let t = total(&lat, &f, &cfg);
    assert!(t.abs() < tolerances::COLD_ACTION_ABS, "cold action {t}");
}

#[test]
fn local_sum_matches_independent_gauge_sum() {
    let lat = PeriodicLattice::new(&[3, 4, 3, 2]).expect("lattice");
    let cfg = ModelConfig::gauge_only(4, 5.5);
    let f = Fields::hot(&lat, cfg.content, 1234);
    let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
    let view = ev.lattice();
    let mut direct = 0.0;
    for i in 0..lat.sites() {
        for d1 in 0..4 {
            for d2 in (d1 + 1)..4 {
                direct += 5.5 * (1.0 - 0.5 * view.su2_plaquette(i, d1, d2).re_trace());
            }
        }
    }
    let local = ev.total_action();
    assert!(
        ((local - direct) / direct).abs() < tolerances::ACTION_ADDITIVITY_REL,
        "{local} vs {direct}"
    );
}

#[test]
fn su2_link_update_is_local() {
    let cfg = everything(3);
    let lat = PeriodicLattice::new(&[4, 3, 3]).expect("lattice");
    let mut f = Fields::hot(&lat, cfg.content, 11);
    let mut seed = 77_u64;
    for (site, mu) in [(0, 0), (17, 2), (35, 1)] {
        let u = Su2Matrix::random(&mut seed);
        assert_local(
            &lat,
            &mut f,
            &cfg,
            |ev| ev.local_action_for_link(site, mu),
            |f| f.set_link(site, mu, u),
            "SU(2) link",
        );
    }
}

#[test]
fn u1_link_update_is_local() {
    let cfg = everything(3);
    let lat = PeriodicLattice::new(&[3, 3, 4]).expect("lattice");
    let mut f = Fields::hot(&lat, cfg.content, 21);
    for (site, mu, alpha) in [(4, 0, 0.9), (20, 2, -2.3)] {
        assert_local(
            &lat,
            &mut f,
            &cfg,
            |ev| ev.local_action_for_u1_link(site, mu).expect("u1 active"),
            |f| f.set_u1_angle(site, mu, alpha),
            "U(1) link",
        );
    }
}

#[test]
fn scalar_updates_are_local() {
    let cfg = everything(3);
    let lat = PeriodicLattice::new(&[3, 4, 3]).expect("lattice");
    let mut f = Fields::hot(&lat, cfg.content, 31);
    let mut seed = 3_u64;
    let site = lat.site_index(&[1, 3, 2]);
    for species in [
        Species::Doublet(0),
        Species::Doublet(1),
        Species::Triplet,
        Species::Singlet,
    ] {
        let mut g = || lcg_gaussian(&mut seed);
        let (a, b, c, d) = (g(), g(), g(), g());
        assert_local(
            &lat,
            &mut f,
            &cfg,
            |ev| {
                ev.local_action_for_field(species, site)
                    .expect("species active")
            },
            |f| match species {
                Species::Doublet(k) => f.doublets[k][site] = Su2Matrix::new(a, b, c, d),
                Species::Triplet => f.triplet[site] = [a, b, c],
                Species::Singlet => f.singlet[site] = a,
            },
            &format!("{species:?}"),
        );
    }
}

#[test]
fn staple_form_agrees_without_triplet() {
    let mut cfg = everything(4);
    cfg.content.triplet = false;
    cfg.content.singlet = false;
    cfg.couplings.triplet = None;
    cfg.couplings.singlet = None;
    let lat = PeriodicLattice::new(&[2, 3, 2, 3]).expect("lattice");
    let f = Fields::hot(&lat, cfg.content, 8);
    let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
    for i in [0, 7, 29] {
        for mu in 0..4 {
            let direct = ev.local_action_for_link(i, mu);
            let staple = ev.link_action_via_staple(i, mu).expect("no triplet");
            assert!(
                (direct - staple).abs() < tolerances::STAPLE_FORM_ABS,
                "site {i} dir {mu}: {direct} vs {staple}"
            );
        }
    }
}

#[test]
fn staple_form_refused_with_triplet() {
    let cfg = everything(3);
    let lat = PeriodicLattice::new(&[2, 2, 2]).expect("lattice");
    let f = Fields::cold(&lat, cfg.content);
    let ev = ActionEvaluator::new(&lat, &f, &cfg).expect("evaluator");
    assert!(ev.link_action_via_staple(0, 0).is_err());
}
