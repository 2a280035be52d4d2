//! Study loading, saving, validation, and conversion to runtime geometry.

use std::path::Path;

use af_aero::OperatingPoint;
use af_core::units::{kg_m3, m2ps};
use af_geometry::{Airfoil, Airplane, Fuselage, FuselageXSec, Wing, WingXSec};
use af_project::schema::{AirfoilDef, FuselageDef, OperatingPointDef, Study, WingDef};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Summary of a study for listing.
#[derive(Debug, Clone)]
pub struct StudySummary {
    pub name: String,
    pub airplane: String,
    pub wing_count: usize,
    pub fuselage_count: usize,
    pub airfoils: Vec<String>,
    pub s_ref: f64,
    pub c_ref: f64,
    pub b_ref: f64,
}

/// Load and validate a study from a YAML or JSON file.
pub fn load_study(path: &Path) -> AppResult<Study> {
    Ok(af_project::load_study(path)?)
}

/// Validate and save a study; the extension picks YAML or JSON.
pub fn save_study(path: &Path, study: &Study) -> AppResult<()> {
    Ok(af_project::save_study(path, study)?)
}

/// Validate the study file contents and that the geometry can be built.
pub fn validate_study(study: &Study, base_dir: &Path) -> AppResult<()> {
    af_project::validate_study(study).map_err(|e| AppError::Validation(e.to_string()))?;
    build_airplane(study, base_dir)?;
    Ok(())
}

fn build_airfoil(def: &AirfoilDef, base_dir: &Path) -> AppResult<Airfoil> {
    match def {
        AirfoilDef::Naca(name) => Ok(Airfoil::new(name)?),
        AirfoilDef::File { name, dat_file } => {
            let path = if dat_file.is_absolute() {
                dat_file.clone()
            } else {
                base_dir.join(dat_file)
            };
            let content = std::fs::read_to_string(&path).map_err(|e| AppError::AirfoilFileRead {
                path: path.clone(),
                message: e.to_string(),
            })?;
            Ok(Airfoil::parse_dat(name, &content)?)
        }
        AirfoilDef::Coordinates { name, coordinates } => {
            Ok(Airfoil::from_coordinates(name, coordinates.clone())?)
        }
    }
}

fn build_wing(def: &WingDef, base_dir: &Path) -> AppResult<Wing> {
    let xsecs = def
        .xsecs
        .iter()
        .map(|x| {
            Ok(WingXSec::new(
                x.xyz_le,
                x.chord_m,
                x.twist_deg,
                build_airfoil(&x.airfoil, base_dir)?,
            ))
        })
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Wing::new(&def.name, xsecs, def.symmetric)?.translate(def.translate))
}

fn build_fuselage(def: &FuselageDef) -> AppResult<Fuselage> {
    let xsecs = def
        .xsecs
        .iter()
        .map(|x| FuselageXSec::new(x.xyz_c, x.radius_m))
        .collect();
    Ok(Fuselage::new(&def.name, xsecs)?.translate(def.translate))
}

/// Runtime airplane for a study. Relative airfoil file paths resolve against `base_dir`.
pub fn build_airplane(study: &Study, base_dir: &Path) -> AppResult<Airplane> {
    let def = &study.airplane;
    let wings = def
        .wings
        .iter()
        .map(|w| build_wing(w, base_dir))
        .collect::<AppResult<Vec<_>>>()?;
    let fuselages = def
        .fuselages
        .iter()
        .map(build_fuselage)
        .collect::<AppResult<Vec<_>>>()?;
    let mut airplane = Airplane::new(&def.name, def.xyz_ref, wings, fuselages)?;
    if let Some(r) = def.reference {
        airplane = airplane.with_reference(r.s_ref_m2, r.c_ref_m, r.b_ref_m)?;
    }
    debug!(
        airplane = %airplane.name,
        wings = airplane.wings.len(),
        fuselages = airplane.fuselages.len(),
        "airplane built"
    );
    Ok(airplane)
}

pub fn build_operating_point(def: &OperatingPointDef) -> OperatingPoint {
    let op = OperatingPoint::new(def.velocity_mps, def.alpha_deg, def.beta_deg);
    let density = def.density_kg_m3.map(kg_m3).unwrap_or(op.density);
    let nu = def.kinematic_viscosity_m2_s.map(m2ps).unwrap_or(op.kinematic_viscosity);
    op.with_atmosphere(density, nu)
}

pub fn summarize(study: &Study, airplane: &Airplane) -> StudySummary {
    StudySummary {
        name: study.name.clone(),
        airplane: airplane.name.clone(),
        wing_count: airplane.wings.len(),
        fuselage_count: airplane.fuselages.len(),
        airfoils: airplane.airfoils().iter().map(|a| a.name().to_string()).collect(),
        s_ref: airplane.s_ref,
        c_ref: airplane.c_ref,
        b_ref: airplane.b_ref,
    }
}
