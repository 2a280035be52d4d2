//! Built-in glider used by the validation comparison.

use std::path::Path;

use af_core::numeric::cosspace;
use af_geometry::{Airplane, Naca4};
use af_project::schema::*;

use crate::error::AppResult;
use crate::project_service::build_airplane;

const WING_AIRFOIL: &str = "naca0010";
const TAIL_AIRFOIL: &str = "naca0010";
/// Fuselage radius follows this section's local thickness along the body
const FUSELAGE_PROFILE: &str = "naca0012";

fn xsec(xyz_le: [f64; 3], chord_m: f64, twist_deg: f64, airfoil: &str) -> WingXSecDef {
    WingXSecDef {
        xyz_le,
        chord_m,
        twist_deg,
        airfoil: AirfoilDef::Naca(airfoil.to_string()),
    }
}

/// Two-metre glider at 100 m/s, 5 degrees angle of attack, no sideslip.
pub fn demo_study() -> Study {
    let profile = Naca4::parse(FUSELAGE_PROFILE).unwrap_or(Naca4 { m: 0.0, p: 0.0, t: 0.12 });
    let fuselage_xsecs = cosspace(0.0, 1.0, 30)
        .into_iter()
        .map(|x| FuselageXSecDef {
            xyz_c: [x, 0.0, 0.0],
            radius_m: (2.0 * profile.half_thickness(x)).max(0.0),
        })
        .collect();

    Study {
        version: af_project::LATEST_VERSION,
        name: "Glider validation".to_string(),
        airplane: AirplaneDef {
            name: "Glider".to_string(),
            xyz_ref: [0.0, 0.0, 0.0],
            wings: vec![
                WingDef {
                    name: "Main Wing".to_string(),
                    symmetric: true,
                    translate: [0.0, 0.0, 0.0],
                    xsecs: vec![
                        xsec([0.0, 0.0, 0.0], 0.18, 0.0, WING_AIRFOIL),
                        xsec([0.01, 0.5, 0.0], 0.16, 0.0, WING_AIRFOIL),
                        xsec([0.08, 1.0, 0.1], 0.08, 0.0, WING_AIRFOIL),
                    ],
                },
                WingDef {
                    name: "Horizontal Stabilizer".to_string(),
                    symmetric: true,
                    translate: [0.6, 0.0, 0.06],
                    xsecs: vec![
                        xsec([0.0, 0.0, 0.0], 0.1, -10.0, TAIL_AIRFOIL),
                        xsec([0.02, 0.17, 0.0], 0.08, -10.0, TAIL_AIRFOIL),
                    ],
                },
                WingDef {
                    name: "Vertical Stabilizer".to_string(),
                    symmetric: false,
                    translate: [0.6, 0.0, 0.07],
                    xsecs: vec![
                        xsec([0.0, 0.0, 0.0], 0.1, 0.0, TAIL_AIRFOIL),
                        xsec([0.04, 0.0, 0.15], 0.06, 0.0, TAIL_AIRFOIL),
                    ],
                },
            ],
            fuselages: vec![FuselageDef {
                name: "Fuselage".to_string(),
                translate: [0.0, 0.0, 0.0],
                xsecs: fuselage_xsecs,
            }],
            reference: None,
        },
        operating_point: OperatingPointDef {
            velocity_mps: 100.0,
            alpha_deg: 5.0,
            beta_deg: 0.0,
            density_kg_m3: None,
            kinematic_viscosity_m2_s: None,
        },
        settings: SettingsDef::default(),
    }
}

pub fn demo_airplane() -> AppResult<Airplane> {
    build_airplane(&demo_study(), Path::new("."))
}
