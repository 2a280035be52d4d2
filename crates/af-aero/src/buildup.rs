//! Strip-theory aerodynamic buildup.
//!
//! Every wing section is cut into spanwise strips. Each strip sees the
//! freestream component normal to its span, reads 2D coefficients from the
//! airfoil polars at the local angle of attack and Reynolds number, and is
//! corrected for finite span. Fuselages contribute turbulent skin-friction
//! drag only.

use crate::axes::{assemble_results, body_to_wind, geometry_to_body};
use crate::error::AeroResult;
use crate::operating_point::OperatingPoint;
use crate::results::AeroResults;
use crate::solver::AeroSolver;
use crate::stability::with_stability_derivatives;
use af_geometry::{Airplane, Fuselage, Wing};
use af_polars::{PolarGenerator, PolarLibrary, PolarRequest, PolarSet, ThinAirfoilGenerator};
use nalgebra::Vector3;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::{debug, info, warn};

pub struct AeroBuildup {
    polars: PolarLibrary,
    /// Strips per wing section
    pub spanwise_strips_per_section: usize,
    /// Span efficiency used for induced drag
    pub oswald_efficiency: f64,
}

/// Force and moment about the reference point, in geometry axes.
#[derive(Debug, Clone, Copy)]
struct Loads {
    force: Vector3<f64>,
    moment: Vector3<f64>,
    induced: Vector3<f64>,
}

impl Loads {
    fn zero() -> Self {
        Self {
            force: Vector3::zeros(),
            moment: Vector3::zeros(),
            induced: Vector3::zeros(),
        }
    }

    fn add(&mut self, other: Loads) {
        self.force += other.force;
        self.moment += other.moment;
        self.induced += other.induced;
    }
}

impl AeroBuildup {
    pub fn new(polars: PolarLibrary) -> Self {
        Self {
            polars,
            spanwise_strips_per_section: 8,
            oswald_efficiency: 0.95,
        }
    }

    pub fn with_strips(mut self, spanwise_strips_per_section: usize) -> Self {
        self.spanwise_strips_per_section = spanwise_strips_per_section.max(1);
        self
    }

    pub fn polars(&self) -> &PolarLibrary {
        &self.polars
    }

    /// Base run plus alpha and beta derivatives and the neutral point.
    pub fn run_with_stability_derivatives(
        &self,
        airplane: &Airplane,
        op: &OperatingPoint,
    ) -> AeroResult<AeroResults> {
        with_stability_derivatives(self, airplane, op)
    }

    /// Polar sets for airfoils missing from the library, from thin-airfoil theory.
    fn fallback_polars(&self, airplane: &Airplane) -> AeroResult<BTreeMap<String, PolarSet>> {
        let generator = ThinAirfoilGenerator::default();
        let request = PolarRequest::default();
        let mut fallback = BTreeMap::new();
        for airfoil in airplane.airfoils() {
            if self.polars.get(airfoil.name()).is_none() {
                warn!(
                    airfoil = airfoil.name(),
                    "no polars attached; using thin-airfoil estimate"
                );
                fallback.insert(airfoil.name().to_string(), generator.generate(airfoil, &request)?);
            }
        }
        Ok(fallback)
    }

    fn wing_loads(
        &self,
        wing: &Wing,
        airplane: &Airplane,
        op: &OperatingPoint,
        fallback: &BTreeMap<String, PolarSet>,
    ) -> AeroResult<Loads> {
        let spanwise = self.spanwise_strips_per_section.max(1);
        let strips = wing.mesh_panels(1, spanwise);
        let half = wing.section_count() * spanwise;

        // A lone lifting surface mounted on a body sees its image in the plane of symmetry
        let aspect_ratio = if wing.symmetric {
            wing.aspect_ratio()
        } else {
            2.0 * wing.aspect_ratio()
        };
        let slope_factor = if aspect_ratio > 0.0 {
            aspect_ratio / (2.0 + (aspect_ratio * aspect_ratio + 4.0).sqrt())
        } else {
            0.0
        };

        let v_inf = op.freestream_velocity_g();
        let rho = op.density_kg_m3();
        let mut loads = Loads::zero();

        for (i, strip) in strips.iter().enumerate() {
            let section = (i % half) / spanwise;
            let airfoil = &wing.xsecs[section].airfoil;
            let polar_set = self
                .polars
                .get(airfoil.name())
                .or_else(|| fallback.get(airfoil.name()));
            let Some(polar_set) = polar_set else {
                continue;
            };

            let front_mid = (strip.front_left + strip.front_right) * 0.5;
            let back_mid = (strip.back_left + strip.back_right) * 0.5;
            let chord_vec = back_mid - front_mid;
            let chord = chord_vec.norm();
            let area = strip.area();
            if !(chord > 0.0 && area > 0.0) {
                continue;
            }
            let c_hat = chord_vec / chord;
            let n_hat = strip.normal();
            let s_hat = n_hat.cross(&c_hat).normalize();

            let v_sec = v_inf - s_hat * v_inf.dot(&s_hat);
            let speed = v_sec.norm();
            if speed <= f64::EPSILON {
                continue;
            }
            let v_hat = v_sec / speed;
            let alpha_local = v_sec.dot(&n_hat).atan2(v_sec.dot(&c_hat)).to_degrees();
            let reynolds = speed * chord / op.nu_m2_s();

            let section_coeffs = polar_set.coefficients(alpha_local, reynolds)?;
            let cl = section_coeffs.cl * slope_factor;
            let cdi = if aspect_ratio > 0.0 {
                cl * cl / (PI * aspect_ratio * self.oswald_efficiency)
            } else {
                0.0
            };

            let q_area = 0.5 * rho * speed * speed * area;
            let lift_dir = v_hat.cross(&s_hat).normalize();
            let induced = v_hat * (q_area * cdi);
            let force = lift_dir * (q_area * cl) + v_hat * (q_area * section_coeffs.cd) + induced;

            let quarter_chord = front_mid + chord_vec * 0.25;
            let pitching = s_hat * (q_area * chord * section_coeffs.cm);
            let moment = (quarter_chord - airplane.xyz_ref).cross(&force) + pitching;

            loads.add(Loads {
                force,
                moment,
                induced,
            });
        }
        debug!(wing = %wing.name, strips = strips.len(), "wing strips integrated");
        Ok(loads)
    }

    fn fuselage_loads(&self, fuselage: &Fuselage, airplane: &Airplane, op: &OperatingPoint) -> Loads {
        let length = fuselage.length();
        let wetted = fuselage.wetted_area();
        if !(length > 0.0 && wetted > 0.0) {
            return Loads::zero();
        }
        let reynolds = op.reynolds(length).max(1e3);
        let cf = 0.074 / reynolds.powf(0.2);
        let fineness = fuselage.fineness_ratio();
        let form_factor = if fineness.is_finite() && fineness > 0.0 {
            1.0 + 60.0 / fineness.powi(3) + fineness / 400.0
        } else {
            1.0
        };
        let drag = op.dynamic_pressure() * cf * form_factor * wetted;
        let force = op.freestream_direction_g() * drag;

        let centroid = fuselage
            .xsecs
            .iter()
            .fold(Vector3::zeros(), |acc, x| acc + x.xyz_c)
            / fuselage.xsecs.len() as f64;
        Loads {
            force,
            moment: (centroid - airplane.xyz_ref).cross(&force),
            induced: Vector3::zeros(),
        }
    }
}

impl AeroSolver for AeroBuildup {
    fn name(&self) -> &str {
        "AeroBuildup"
    }

    fn run(&self, airplane: &Airplane, op: &OperatingPoint) -> AeroResult<AeroResults> {
        op.validate()?;
        let fallback = self.fallback_polars(airplane)?;

        let mut total = Loads::zero();
        for wing in &airplane.wings {
            total.add(self.wing_loads(wing, airplane, op, &fallback)?);
        }
        for fuselage in &airplane.fuselages {
            total.add(self.fuselage_loads(fuselage, airplane, op));
        }

        let mut results = assemble_results(total.force, total.moment, airplane, op);
        let induced_w = body_to_wind(&geometry_to_body(&total.induced), op);
        results.insert("CDi", -induced_w.x / (op.dynamic_pressure() * airplane.s_ref));

        info!(
            airplane = %airplane.name,
            alpha_deg = op.alpha_deg(),
            beta_deg = op.beta_deg(),
            "AeroBuildup complete"
        );
        Ok(results)
    }
}
