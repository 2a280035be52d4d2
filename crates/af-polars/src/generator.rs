//! Polar generators.

use crate::polar::{Polar, PolarSet};
use crate::PolarResult;
use af_core::numeric::linspace;
use af_geometry::Airfoil;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Flow conditions a polar set is computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarRequest {
    pub reynolds: Vec<f64>,
    pub mach: f64,
    pub alpha_deg: Vec<f64>,
    /// Let the external solver repanel the coordinates before analysis
    #[serde(default)]
    pub repanel: bool,
}

impl Default for PolarRequest {
    fn default() -> Self {
        Self {
            reynolds: vec![1e4, 3e4, 1e5, 3e5, 1e6, 3e6, 1e7],
            mach: 0.0,
            alpha_deg: linspace(-15.0, 15.0, 31),
            repanel: false,
        }
    }
}

/// Produces polars for an airfoil.
pub trait PolarGenerator {
    /// Short name used in cache fingerprints and logs.
    fn name(&self) -> &str;

    fn generate(&self, airfoil: &Airfoil, request: &PolarRequest) -> PolarResult<PolarSet>;
}

/// Thin-airfoil theory with a smooth stall limit and flat-plate profile drag.
#[derive(Debug, Clone, Copy)]
pub struct ThinAirfoilGenerator {
    /// Quadrature intervals for the camber-line integrals
    pub quadrature_points: usize,
}

impl Default for ThinAirfoilGenerator {
    fn default() -> Self {
        Self {
            quadrature_points: 400,
        }
    }
}

/// Camber-line integrals of thin-airfoil theory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThinAirfoilTheory {
    /// Zero-lift angle of attack, radians
    pub alpha_l0: f64,
    /// Pitching moment about the quarter chord
    pub cm_c4: f64,
}

impl ThinAirfoilGenerator {
    pub fn theory(&self, airfoil: &Airfoil) -> ThinAirfoilTheory {
        let n = self.quadrature_points.max(16);
        let dtheta = PI / n as f64;
        let (mut i_l0, mut a1, mut a2) = (0.0, 0.0, 0.0);
        for k in 0..n {
            // Midpoint rule avoids the endpoints where x = 0 or 1
            let theta = (k as f64 + 0.5) * dtheta;
            let x = 0.5 * (1.0 - theta.cos());
            let slope = airfoil.camber_slope(x);
            i_l0 += slope * (theta.cos() - 1.0) * dtheta;
            a1 += slope * theta.cos() * dtheta;
            a2 += slope * (2.0 * theta).cos() * dtheta;
        }
        a1 *= 2.0 / PI;
        a2 *= 2.0 / PI;
        ThinAirfoilTheory {
            alpha_l0: -i_l0 / PI,
            cm_c4: PI / 4.0 * (a2 - a1),
        }
    }

    fn section(&self, airfoil: &Airfoil, theory: ThinAirfoilTheory, alpha_deg: f64, re: f64) -> (f64, f64, f64) {
        let t = airfoil.max_thickness();
        let cl_max = (0.9 + 4.0 * t + 10.0 * airfoil.local_camber(0.4).abs()).min(1.8);
        let cl_linear = 2.0 * PI * (alpha_deg.to_radians() - theory.alpha_l0);
        let cl = cl_max * (cl_linear / cl_max).tanh();

        let cf = 0.074 / re.max(1e3).powf(0.2);
        let form_factor = 1.0 + 2.0 * t + 60.0 * t.powi(4);
        let cd = 2.0 * cf * form_factor + 0.01 * cl * cl + 0.1 * (cl_linear - cl).powi(2);

        (cl, cd, theory.cm_c4)
    }
}

impl PolarGenerator for ThinAirfoilGenerator {
    fn name(&self) -> &str {
        "thin-airfoil"
    }

    fn generate(&self, airfoil: &Airfoil, request: &PolarRequest) -> PolarResult<PolarSet> {
        let theory = self.theory(airfoil);
        let polars = request
            .reynolds
            .iter()
            .map(|&re| {
                let mut polar = Polar {
                    reynolds: re,
                    mach: request.mach,
                    alpha_deg: request.alpha_deg.clone(),
                    cl: Vec::with_capacity(request.alpha_deg.len()),
                    cd: Vec::with_capacity(request.alpha_deg.len()),
                    cm: Vec::with_capacity(request.alpha_deg.len()),
                };
                for &a in &request.alpha_deg {
                    let (cl, cd, cm) = self.section(airfoil, theory, a, re);
                    polar.cl.push(cl);
                    polar.cd.push(cd);
                    polar.cm.push(cm);
                }
                polar
            })
            .collect();
        PolarSet::new(airfoil.name(), polars)
    }
}
