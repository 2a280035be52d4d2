//! Horseshoe-vortex lattice on the chord surfaces of every wing.

use crate::axes::assemble_results;
use crate::error::AeroResult;
use crate::operating_point::OperatingPoint;
use crate::results::AeroResults;
use crate::solver::AeroSolver;
use af_geometry::{Airplane, Panel};
use af_linalg::{Bindings, Matrix, Vector, solve};
use nalgebra::{DMatrix, DVector, Vector3};
use rayon::prelude::*;
use std::f64::consts::PI;
use tracing::{debug, info};

/// Denominators below this are treated as a point on the vortex line.
const SINGULAR_EPS: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexLatticeMethod {
    pub chordwise_panels: usize,
    pub spanwise_panels_per_section: usize,
}

impl Default for VortexLatticeMethod {
    fn default() -> Self {
        Self {
            chordwise_panels: 6,
            spanwise_panels_per_section: 12,
        }
    }
}

/// One horseshoe: bound leg `a -> b`, trailing legs to infinity along the freestream.
#[derive(Debug, Clone, Copy)]
struct Horseshoe {
    a: Vector3<f64>,
    b: Vector3<f64>,
    collocation: Vector3<f64>,
    normal: Vector3<f64>,
}

impl Horseshoe {
    fn from_panel(panel: &Panel) -> Self {
        let a = panel.front_left + (panel.back_left - panel.front_left) * 0.25;
        let b = panel.front_right + (panel.back_right - panel.front_right) * 0.25;
        let left = panel.front_left + (panel.back_left - panel.front_left) * 0.75;
        let right = panel.front_right + (panel.back_right - panel.front_right) * 0.75;
        Self {
            a,
            b,
            collocation: (left + right) * 0.5,
            normal: panel.normal(),
        }
    }

    fn midpoint(&self) -> Vector3<f64> {
        (self.a + self.b) * 0.5
    }

    /// Velocity at `p` induced by unit circulation, trailing legs along `u`.
    fn induced_velocity(&self, p: &Vector3<f64>, u: &Vector3<f64>) -> Vector3<f64> {
        let ra = p - self.a;
        let rb = p - self.b;
        let (na, nb) = (ra.norm(), rb.norm());

        let guarded = |num: Vector3<f64>, den: f64| {
            if den.abs() < SINGULAR_EPS || !den.is_finite() {
                Vector3::zeros()
            } else {
                num / den
            }
        };

        let trailing_a = guarded(ra.cross(u), na * (na - ra.dot(u)));
        let bound = guarded(ra.cross(&rb) * (na + nb), na * nb * (na * nb + ra.dot(&rb)));
        let trailing_b = guarded(rb.cross(u), nb * (nb - rb.dot(u)));

        (trailing_a + bound - trailing_b) / (4.0 * PI)
    }
}

impl VortexLatticeMethod {
    pub fn new(chordwise_panels: usize, spanwise_panels_per_section: usize) -> Self {
        Self {
            chordwise_panels: chordwise_panels.max(1),
            spanwise_panels_per_section: spanwise_panels_per_section.max(1),
        }
    }

    fn horseshoes(&self, airplane: &Airplane) -> Vec<Horseshoe> {
        airplane
            .wings
            .iter()
            .flat_map(|w| w.mesh_panels(self.chordwise_panels, self.spanwise_panels_per_section))
            .map(|p| Horseshoe::from_panel(&p))
            .collect()
    }

    /// Circulation strengths that cancel normal flow at every collocation point.
    fn circulation(&self, vortices: &[Horseshoe], op: &OperatingPoint) -> AeroResult<DVector<f64>> {
        let u = op.freestream_direction_g();
        let v_inf = op.freestream_velocity_g();
        let n = vortices.len();

        let rows: Vec<Vec<f64>> = vortices
            .par_iter()
            .map(|target| {
                vortices
                    .iter()
                    .map(|source| source.induced_velocity(&target.collocation, &u).dot(&target.normal))
                    .collect()
            })
            .collect();
        let aic = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
        let rhs = DVector::from_iterator(n, vortices.iter().map(|v| -v_inf.dot(&v.normal)));

        let gamma = solve(&Matrix::Numeric(aic), &Vector::Numeric(rhs))?;
        Ok(gamma.eval(&Bindings::new())?)
    }
}

impl AeroSolver for VortexLatticeMethod {
    fn name(&self) -> &str {
        "VLM"
    }

    fn run(&self, airplane: &Airplane, op: &OperatingPoint) -> AeroResult<AeroResults> {
        op.validate()?;
        let vortices = self.horseshoes(airplane);
        debug!(panels = vortices.len(), "vortex lattice assembled");
        let gamma = self.circulation(&vortices, op)?;

        let u = op.freestream_direction_g();
        let v_inf = op.freestream_velocity_g();
        let rho = op.density_kg_m3();

        let (force, moment) = vortices
            .par_iter()
            .zip(gamma.as_slice().par_iter())
            .map(|(vortex, &g)| {
                let mid = vortex.midpoint();
                let v_local = vortices
                    .iter()
                    .zip(gamma.iter())
                    .fold(v_inf, |acc, (source, &gs)| acc + source.induced_velocity(&mid, &u) * gs);
                let f = v_local.cross(&(vortex.b - vortex.a)) * (rho * g);
                (f, (mid - airplane.xyz_ref).cross(&f))
            })
            .reduce(
                || (Vector3::zeros(), Vector3::zeros()),
                |(f1, m1), (f2, m2)| (f1 + f2, m1 + m2),
            );

        let mut results = assemble_results(force, moment, airplane, op);
        if let Some(cd) = results.get("CD") {
            results.insert("CDi", cd);
        }
        info!(airplane = %airplane.name, panels = vortices.len(), "VLM complete");
        Ok(results)
    }
}
