// SPDX-License-Identifier: AGPL-3.0-only

//! Volume observables and per-site measurements.
//!
//! [`measure`] runs one parallel reduction over sites and returns the
//! volume averages a measurement driver writes out per trajectory. The
//! action and the two magnetic-charge entries are volume totals; every
//! other entry is divided by the number of sites.
//!
//! Cubes where the Abelian projection is undefined (a vanishing adjoint
//! field at a corner, or a vanishing projected link on an edge) contribute
//! nothing to the charge sums and are counted in `degenerate_sites`.

use std::ops::Add;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::Result;

use super::action::ActionEvaluator;
use super::complex_f64::Complex64;
use super::constants::MAX_DOUBLETS;
use super::fields::Fields;
use super::layout::Layout;
use super::monopole::MonopoleEngine;
use super::scalar::{doublet_bilinear, doublet_sq, triplet_sq};

/// Accumulated wall time spent in reductions.
///
/// Passed in by the caller and handed back updated; nothing in the crate
/// keeps timing state of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReductionTimer {
    pub total: Duration,
    pub calls: u64,
}

impl ReductionTimer {
    #[must_use]
    pub fn record(self, elapsed: Duration) -> Self {
        Self {
            total: self.total + elapsed,
            calls: self.calls + 1,
        }
    }
}

/// Per-species doublet averages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DoubletObservables {
    /// Forward hopping term averaged over directions.
    pub hopping: f64,
    pub phi2: f64,
    pub phi4: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TripletObservables {
    pub hopping: f64,
    pub sigma2: f64,
    pub sigma4: f64,
    /// φ₁†φ₁ Tr A², present with at least one doublet.
    pub phi2_sigma2: Option<f64>,
    /// Σρ over the volume; vanishes on a periodic lattice.
    pub magnetic_charge: f64,
    /// Σ|ρ| / (2π√β), the number of monopoles plus antimonopoles.
    pub monopoles: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SingletObservables {
    pub s: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s_phi2: Option<f64>,
    pub s2_phi2: Option<f64>,
}

/// One row of volume observables.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Observables {
    pub action: f64,
    pub su2_wilson: f64,
    pub u1_wilson: Option<f64>,
    pub doublets: Vec<DoubletObservables>,
    /// ⟨φ₁†φ₂⟩ = ⟨R⟩ + i⟨I⟩ with two doublets.
    pub f12: Option<Complex64>,
    pub triplet: Option<TripletObservables>,
    pub singlet: Option<SingletObservables>,
    pub degenerate_sites: usize,
}

/// Observables together with the updated timer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Measured {
    pub observables: Observables,
    pub timer: ReductionTimer,
}

/// Triplet quantities at one site.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocalMeasurement {
    pub site: usize,
    pub coords: Vec<usize>,
    /// Tr A² = ½ aᵃaᵃ.
    pub sigma2: f64,
    /// Charge in the cube at x in units of 2π√β; `None` at degenerate sites.
    pub charge: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default)]
struct SiteSums {
    action: f64,
    su2_wilson: f64,
    u1_wilson: f64,
    hopping_phi: [f64; MAX_DOUBLETS],
    phi2: [f64; MAX_DOUBLETS],
    phi4: [f64; MAX_DOUBLETS],
    f12: Complex64,
    hopping_sigma: f64,
    sigma2: f64,
    sigma4: f64,
    phi2_sigma2: f64,
    charge: f64,
    charge_abs: f64,
    s: [f64; 4],
    s_phi2: f64,
    s2_phi2: f64,
    degenerate: usize,
}

impl Add for SiteSums {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.action += rhs.action;
        self.su2_wilson += rhs.su2_wilson;
        self.u1_wilson += rhs.u1_wilson;
        for k in 0..MAX_DOUBLETS {
            self.hopping_phi[k] += rhs.hopping_phi[k];
            self.phi2[k] += rhs.phi2[k];
            self.phi4[k] += rhs.phi4[k];
        }
        self.f12 += rhs.f12;
        self.hopping_sigma += rhs.hopping_sigma;
        self.sigma2 += rhs.sigma2;
        self.sigma4 += rhs.sigma4;
        self.phi2_sigma2 += rhs.phi2_sigma2;
        self.charge += rhs.charge;
        self.charge_abs += rhs.charge_abs;
        for p in 0..4 {
            self.s[p] += rhs.s[p];
        }
        self.s_phi2 += rhs.s_phi2;
        self.s2_phi2 += rhs.s2_phi2;
        self.degenerate += rhs.degenerate;
        self
    }
}

fn site_sums<L: Layout>(
    ev: &ActionEvaluator<'_, L>,
    monopoles: Option<&MonopoleEngine<'_, L>>,
    i: usize,
) -> Result<SiteSums> {
    let lat = ev.lattice();
    let f = lat.fields;
    let cfg = ev.config();
    let c = &cfg.content;
    let dim = lat.dim() as f64;
    let mut s = SiteSums {
        action: ev.local_action(i),
        su2_wilson: lat.local_su2_wilson(i, cfg.couplings.beta_su2),
        ..SiteSums::default()
    };
    if c.u1 {
        s.u1_wilson = lat.local_u1_wilson(i, cfg.couplings.beta_u1);
    }

    for db in 0..c.doublets {
        let m = doublet_sq(f.doublet(db, i));
        s.hopping_phi[db] = (0..lat.dim())
            .map(|dir| lat.hopping_doublet_forward(db, i, dir))
            .sum::<f64>()
            / dim;
        s.phi2[db] = m;
        s.phi4[db] = m * m;
    }
    if c.doublets == 2 {
        s.f12 = doublet_bilinear(f.doublet(0, i), f.doublet(1, i));
    }

    if c.triplet {
        let tm = triplet_sq(f.triplet[i]);
        s.sigma2 = tm;
        s.sigma4 = tm * tm;
        s.phi2_sigma2 = s.phi2[0] * tm;
        s.hopping_sigma = (0..lat.dim())
            .map(|dir| lat.hopping_triplet_forward(i, dir))
            .sum::<f64>()
            / dim;
        if let Some(engine) = monopoles {
            match engine.magnetic_charge_density(i) {
                Ok(rho) => {
                    s.charge = rho;
                    s.charge_abs = rho.abs();
                }
                Err(e) if e.is_degenerate() => {
                    debug!(cube = i, reason = %e, "skipping cube without a defined projection");
                    s.degenerate = 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    if c.singlet {
        let v = f.singlet[i];
        s.s = [v, v * v, v * v * v, v * v * v * v];
        s.s_phi2 = v * s.phi2[0];
        s.s2_phi2 = v * v * s.phi2[0];
    }
    Ok(s)
}

/// Volume observables of one configuration.
///
/// # Errors
///
/// Configuration or storage mismatches, as in [`ActionEvaluator::new`].
pub fn measure<L: Layout>(
    layout: &L,
    fields: &Fields,
    config: &ModelConfig,
    timer: ReductionTimer,
) -> Result<Measured> {
    let ev = ActionEvaluator::new(layout, fields, config)?;
    let engine = if config.content.triplet {
        Some(MonopoleEngine::new(layout, fields, config)?)
    } else {
        None
    };

    let start = Instant::now();
    let sums = (0..layout.sites())
        .into_par_iter()
        .map(|i| site_sums(&ev, engine.as_ref(), i))
        .try_reduce(SiteSums::default, |a, b| Ok(a + b))?;
    let timer = timer.record(start.elapsed());

    let c = &config.content;
    let vol = layout.sites() as f64;
    let has_doublet = c.doublets > 0;
    let observables = Observables {
        action: sums.action,
        su2_wilson: sums.su2_wilson / vol,
        u1_wilson: c.u1.then(|| sums.u1_wilson / vol),
        doublets: (0..c.doublets)
            .map(|db| DoubletObservables {
                hopping: sums.hopping_phi[db] / vol,
                phi2: sums.phi2[db] / vol,
                phi4: sums.phi4[db] / vol,
            })
            .collect(),
        f12: (c.doublets == 2).then(|| sums.f12.scale(1.0 / vol)),
        triplet: engine.as_ref().map(|e| TripletObservables {
            hopping: sums.hopping_sigma / vol,
            sigma2: sums.sigma2 / vol,
            sigma4: sums.sigma4 / vol,
            phi2_sigma2: has_doublet.then(|| sums.phi2_sigma2 / vol),
            magnetic_charge: sums.charge,
            monopoles: sums.charge_abs / e.charge_unit(),
        }),
        singlet: c.singlet.then(|| SingletObservables {
            s: sums.s[0] / vol,
            s2: sums.s[1] / vol,
            s3: sums.s[2] / vol,
            s4: sums.s[3] / vol,
            s_phi2: has_doublet.then(|| sums.s_phi2 / vol),
            s2_phi2: has_doublet.then(|| sums.s2_phi2 / vol),
        }),
        degenerate_sites: sums.degenerate,
    };
    Ok(Measured { observables, timer })
}

/// Tr A² and the integer monopole charge at every site.
///
/// # Errors
///
/// `MissingField` without a triplet; configuration or storage mismatches.
pub fn measure_local<L: Layout>(
    layout: &L,
    fields: &Fields,
    config: &ModelConfig,
) -> Result<Vec<LocalMeasurement>> {
    let engine = MonopoleEngine::new(layout, fields, config)?;
    (0..layout.sites())
        .into_par_iter()
        .map(|i| {
            let charge = match engine.monopole_charge(i) {
                Ok(q) => Some(q),
                Err(e) if e.is_degenerate() => None,
                Err(e) => return Err(e),
            };
            Ok(LocalMeasurement {
                site: i,
                coords: (0..layout.dim()).map(|d| layout.coord(i, d)).collect(),
                sigma2: triplet_sq(fields.triplet[i]),
                charge,
            })
        })
        .collect()
}
