// SPDX-License-Identifier: AGPL-3.0-only

//! SU(2) + scalar local-field validation.
//!
//! Checks the algebraic identities every local evaluator must satisfy on
//! small hand-built or seeded configurations.
//!
//! # Validation targets
//!
//! | Property | Expected | Tolerance | Basis |
//! |----------|----------|-----------|-------|
//! | SU(2) product unitarity | det = 1 | 1e-12 | group closure |
//! | Cold plaquette / staple | 2, 2(D−1)·I | exact | definition |
//! | Σ local action | total action | 1e-10 rel | every term at one site |
//! | Per-variable action change | total change | 1e-9 | locality |
//! | Projected angle | antisymmetric | 1e-10 | orientation |
//! | Hedgehog cube charge | ±1 | 1e-6 | flux quantization |
//! | Smearing trivial fields | unchanged | exact | averaging of identities |
//!
//! # Provenance
//!
//! Hedgehog monopole on the lattice: Davis, Hart, Kibble, Rajantie,
//! PRD 65, 125008 (2002).

use su2lattice::config::{Couplings, FieldContent, ModelConfig, TripletCouplings};
use su2lattice::lattice::constants::lcg_uniform_f64;
use su2lattice::lattice::{
    measure, smear_fields, su2_multiply, ActionEvaluator, Fields, Lattice, Layout, MonopoleEngine,
    PeriodicLattice, ReductionTimer, Species, Su2Matrix,
};
use su2lattice::tolerances;
use su2lattice::validation::ValidationHarness;
use su2lattice::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const FULL_MODEL: &str = r#"{
    "dim": 3,
    "content": { "doublets": 1, "triplet": true, "singlet": true, "u1": true },
    "couplings": {
        "beta_su2": 8.0,
        "beta_u1": 12.0,
        "doublets": [
            {
                "msq": -0.12, "lambda": 0.08,
                "a2_triplet": 0.2, "a1_singlet": 0.03, "a2_singlet": 0.05
            }
        ],
        "triplet": { "msq": -0.3, "b4": 0.15 },
        "singlet": {
            "b1": 0.01, "msq": 0.4, "b3": -0.02, "b4": 0.1,
            "a1_triplet": 0.02, "a2_triplet": 0.04
        }
    }
}"#;

fn adjoint_model(beta: f64) -> ModelConfig {
    ModelConfig {
        dim: 3,
        content: FieldContent {
            triplet: true,
            ..FieldContent::gauge_only()
        },
        couplings: Couplings {
            beta_su2: beta,
            triplet: Some(TripletCouplings {
                msq: -0.3,
                b4: 0.15,
            }),
            ..Couplings::default()
        },
    }
}

fn unitarity(harness: &mut ValidationHarness) {
    println!("═══ SU(2) product unitarity ═══");
    let mut seed = 42_u64;
    let mut worst = [0.0_f64; 2];
    for _ in 0..1000 {
        let a = Su2Matrix::random(&mut seed);
        let b = Su2Matrix::random(&mut seed);
        for (k, conj) in [false, true].into_iter().enumerate() {
            let mut p = a;
            su2_multiply(&mut p, &b, conj);
            worst[k] = worst[k].max((p.norm_sq() - 1.0).abs());
        }
    }
    println!(
        "  max |det − 1|: {:.2e} (U·V), {:.2e} (U·V†)",
        worst[0], worst[1]
    );
    harness.check_upper("unitarity U·V", worst[0], tolerances::SU2_UNITARITY_ABS);
    harness.check_upper("unitarity U·V†", worst[1], tolerances::SU2_UNITARITY_ABS);
    println!();
}

fn cold_start(harness: &mut ValidationHarness) -> Result<()> {
    println!("═══ Cold start identities ═══");
    for dims in [vec![3, 3], vec![2, 2, 2], vec![2, 2, 2, 2]] {
        let lat = PeriodicLattice::new(&dims)?;
        let d = dims.len();
        let cfg = ModelConfig::gauge_only(d, 2.5);
        let fields = Fields::cold(&lat, cfg.content);
        let view = Lattice::new(&lat, &fields);
        let staple = view.staple(0, d - 1);
        let expected = Su2Matrix::IDENTITY.scale(2.0 * (d as f64 - 1.0));
        let staple_err = staple
            .u
            .iter()
            .zip(expected.u)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        let action = ActionEvaluator::new(&lat, &fields, &cfg)?.total_action();
        let plaq = view.plaquette_trace(0, 0, 1);
        println!("  D={d}: plaquette {plaq:.6}, action {action:.3e}");
        harness.check_abs(
            &format!("cold plaquette D={d}"),
            plaq,
            2.0,
            tolerances::COLD_PLAQUETTE_ABS,
        );
        harness.check_upper(
            &format!("cold staple D={d}"),
            staple_err,
            tolerances::COLD_PLAQUETTE_ABS,
        );
        harness.check_abs(
            &format!("cold action D={d}"),
            action,
            0.0,
            tolerances::COLD_ACTION_ABS,
        );
    }
    println!();
    Ok(())
}

fn additivity(harness: &mut ValidationHarness) -> Result<()> {
    println!("═══ Action additivity (gauge only, 4^4 hot) ═══");
    let lat = PeriodicLattice::new(&[4, 4, 4, 4])?;
    let cfg = ModelConfig::gauge_only(4, 2.3);
    let fields = Fields::hot(&lat, cfg.content, 7);
    let ev = ActionEvaluator::new(&lat, &fields, &cfg)?;
    let local_sum = ev.total_action();
    let plaquettes = 6.0 * lat.sites() as f64;
    let direct = cfg.couplings.beta_su2 * plaquettes * (1.0 - ev.lattice().average_plaquette());
    println!("  Σ local: {local_sum:.10}, β·Σ(1 − ½Re Tr P): {direct:.10}");
    harness.check_rel(
        "Σ local action",
        local_sum,
        direct,
        tolerances::ACTION_ADDITIVITY_REL,
    );
    println!();
    Ok(())
}

fn locality(harness: &mut ValidationHarness) -> Result<()> {
    println!("═══ Update locality (1 doublet + triplet + singlet + U(1), 4^3) ═══");
    let cfg = ModelConfig::from_json_str(FULL_MODEL)?;
    let lat = PeriodicLattice::new(&[4, 4, 4])?;
    let mut fields = Fields::hot(&lat, cfg.content, 99);
    let mut seed = 5_u64;
    let (site, mu) = (lat.site_index(&[1, 2, 3]), 1);

    let ev = ActionEvaluator::new(&lat, &fields, &cfg)?;
    let before = (ev.total_action(), ev.local_action_for_link(site, mu));

    fields.set_link(site, mu, Su2Matrix::random(&mut seed));
    let ev = ActionEvaluator::new(&lat, &fields, &cfg)?;
    let after_link = (ev.total_action(), ev.local_action_for_link(site, mu));
    let d_total = after_link.0 - before.0;
    let d_local = after_link.1 - before.1;
    println!("  SU(2) link: Δtotal {d_total:.10}, Δlocal {d_local:.10}");
    harness.check_abs(
        "SU(2) link locality",
        d_local,
        d_total,
        tolerances::UPDATE_LOCALITY_ABS,
    );

    let before_u1 = (after_link.0, ev.local_action_for_u1_link(site, mu)?);
    let angle = 2.0 * std::f64::consts::PI * lcg_uniform_f64(&mut seed);
    fields.set_u1_angle(site, mu, angle);
    let ev = ActionEvaluator::new(&lat, &fields, &cfg)?;
    let d_total = ev.total_action() - before_u1.0;
    let d_local = ev.local_action_for_u1_link(site, mu)? - before_u1.1;
    println!("  U(1) link:  Δtotal {d_total:.10}, Δlocal {d_local:.10}");
    harness.check_abs(
        "U(1) link locality",
        d_local,
        d_total,
        tolerances::UPDATE_LOCALITY_ABS,
    );

    let trip_local = ev.local_action_for_field(Species::Triplet, site)?;
    let before_trip = (ev.total_action(), trip_local);
    fields.triplet[site] = [0.7, -0.2, 1.1];
    let ev = ActionEvaluator::new(&lat, &fields, &cfg)?;
    let d_total = ev.total_action() - before_trip.0;
    let d_local = ev.local_action_for_field(Species::Triplet, site)? - before_trip.1;
    println!("  triplet:    Δtotal {d_total:.10}, Δlocal {d_local:.10}");
    harness.check_abs(
        "triplet locality",
        d_local,
        d_total,
        tolerances::UPDATE_LOCALITY_ABS,
    );
    println!();
    Ok(())
}

fn antisymmetry(harness: &mut ValidationHarness) -> Result<()> {
    println!("═══ Projected angle antisymmetry (4^3 hot) ═══");
    let cfg = adjoint_model(3.0);
    let lat = PeriodicLattice::new(&[4, 4, 4])?;
    let fields = Fields::hot(&lat, cfg.content, 314);
    let eng = MonopoleEngine::new(&lat, &fields, &cfg)?;
    let cut = std::f64::consts::PI * cfg.couplings.beta_su2.sqrt();
    let mut worst = 0.0_f64;
    for i in 0..lat.sites() {
        for (d1, d2) in [(0, 1), (0, 2), (1, 2)] {
            let a = eng.projected_plaquette_angle(i, d1, d2)?;
            let b = eng.projected_plaquette_angle(i, d2, d1)?;
            if (a.abs() - cut).abs() > tolerances::ANGLE_ANTISYMMETRY_ABS {
                worst = worst.max((a + b).abs());
            }
        }
    }
    println!("  max |α(μ,ν) + α(ν,μ)|: {worst:.2e}");
    harness.check_upper(
        "angle antisymmetry",
        worst,
        tolerances::ANGLE_ANTISYMMETRY_ABS,
    );
    println!();
    Ok(())
}

fn hedgehog(harness: &mut ValidationHarness) -> Result<()> {
    println!("═══ Hedgehog monopole (6^3, identity links) ═══");
    let cfg = adjoint_model(4.0);
    let lat = PeriodicLattice::new(&[6, 6, 6])?;
    let mut fields = Fields::cold(&lat, cfg.content);
    for i in 0..lat.sites() {
        let mut a = [0.0; 3];
        for (d, comp) in a.iter_mut().enumerate() {
            *comp = lat.coord(i, d) as f64 - 2.5;
        }
        fields.triplet[i] = a;
    }
    let eng = MonopoleEngine::new(&lat, &fields, &cfg)?;
    let centre = eng.monopole_charge(lat.site_index(&[2, 2, 2]))?;
    let mut total = 0.0;
    let mut worst = 0.0_f64;
    for i in 0..lat.sites() {
        let q = eng.monopole_charge(i)?;
        total += q;
        worst = worst.max((q - q.round()).abs());
    }
    println!("  charge in cube (2,2,2): {centre:.8}");
    println!("  net charge: {total:.3e}, max distance from integer: {worst:.2e}");
    harness.check_abs(
        "hedgehog |charge|",
        centre.abs(),
        1.0,
        tolerances::MONOPOLE_CHARGE_ABS,
    );
    harness.check_upper("charges integral", worst, tolerances::MONOPOLE_CHARGE_ABS);
    harness.check_abs("net charge", total, 0.0, tolerances::MONOPOLE_CHARGE_ABS);
    println!();
    Ok(())
}

fn smearing(harness: &mut ValidationHarness) -> Result<()> {
    println!("═══ Smearing trivial fields (4^3) ═══");
    let cfg = adjoint_model(4.0);
    let lat = PeriodicLattice::new(&[4, 4, 4])?;
    let fields = Fields::cold(&lat, cfg.content);
    let blocked = smear_fields(&lat, &fields, &[true, true, true])?;
    let mut link_err = 0.0_f64;
    for u in &blocked.links {
        for (a, b) in u.u.iter().zip(Su2Matrix::IDENTITY.u) {
            link_err = link_err.max((a - b).abs());
        }
    }
    let trip_err = blocked
        .triplet
        .iter()
        .flat_map(|a| a.iter().map(|x| x.abs()))
        .fold(0.0, f64::max);
    println!("  max link deviation {link_err:.2e}, max triplet {trip_err:.2e}");
    harness.check_upper(
        "smeared identity links",
        link_err,
        tolerances::SMEARING_TRIVIAL_ABS,
    );
    harness.check_upper(
        "smeared zero triplet",
        trip_err,
        tolerances::SMEARING_TRIVIAL_ABS,
    );
    println!();
    Ok(())
}

fn observables(harness: &mut ValidationHarness) -> Result<()> {
    println!("═══ Volume observables (full model, 4^3 hot) ═══");
    let cfg = ModelConfig::from_json_str(FULL_MODEL)?;
    let lat = PeriodicLattice::new(&[4, 4, 4])?;
    let fields = Fields::hot(&lat, cfg.content, 2718);
    let measured = measure(&lat, &fields, &cfg, ReductionTimer::default())?;
    let obs = &measured.observables;
    info!(
        action = obs.action,
        su2_wilson = obs.su2_wilson,
        degenerate = obs.degenerate_sites,
        elapsed_us = measured.timer.total.as_micros() as u64,
        "measured volume observables"
    );
    if let Ok(json) = serde_json::to_string(obs) {
        println!("  {json}");
    }
    if let Some(trip) = &obs.triplet {
        harness.check_abs(
            "net magnetic charge",
            trip.magnetic_charge,
            0.0,
            tolerances::MONOPOLE_CHARGE_ABS,
        );
        harness.check_integral(
            "monopole count",
            trip.monopoles,
            tolerances::MONOPOLE_CHARGE_ABS,
        );
    }
    println!();
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  SU(2) + scalar local-field validation                      ║");
    println!("║  plaquettes, actions, Abelian projection, smearing          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("su2_local");
    unitarity(&mut harness);
    let sections: [(&str, fn(&mut ValidationHarness) -> Result<()>); 7] = [
        ("cold start", cold_start),
        ("additivity", additivity),
        ("locality", locality),
        ("antisymmetry", antisymmetry),
        ("hedgehog", hedgehog),
        ("smearing", smearing),
        ("observables", observables),
    ];
    for (name, run) in sections {
        if let Err(e) = run(&mut harness) {
            error!(section = name, error = %e, "validation section failed");
            harness.check_bool(name, false);
        }
    }
    harness.finish();
}
