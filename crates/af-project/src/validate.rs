//! Study validation logic.

use crate::schema::{AirfoilDef, AirplaneDef, FuselageDef, OperatingPointDef, SettingsDef, Study, WingDef};
use af_geometry::Naca4;
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported airfoil: {name} - {reason}")]
    UnsupportedAirfoil { name: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite"))
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn finite_point(field: &str, p: &[f64; 3]) -> Result<(), ValidationError> {
    if p.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(invalid(field, format!("{p:?}"), "must be finite"))
    }
}

pub fn validate_study(study: &Study) -> Result<(), ValidationError> {
    if study.version == 0 || study.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: study.version,
        });
    }
    validate_airplane(&study.airplane)?;
    validate_operating_point(&study.operating_point)?;
    validate_settings(&study.settings)?;
    Ok(())
}

fn validate_airplane(airplane: &AirplaneDef) -> Result<(), ValidationError> {
    if airplane.wings.is_empty() {
        return Err(invalid("airplane.wings", 0, "at least one wing is required"));
    }
    finite_point("airplane.xyz_ref", &airplane.xyz_ref)?;

    let mut names = HashSet::new();
    for wing in &airplane.wings {
        if !names.insert(&wing.name) {
            return Err(ValidationError::DuplicateName {
                name: wing.name.clone(),
                context: "wings".to_string(),
            });
        }
        validate_wing(wing)?;
    }
    let mut names = HashSet::new();
    for fuselage in &airplane.fuselages {
        if !names.insert(&fuselage.name) {
            return Err(ValidationError::DuplicateName {
                name: fuselage.name.clone(),
                context: "fuselages".to_string(),
            });
        }
        validate_fuselage(fuselage)?;
    }

    if let Some(r) = &airplane.reference {
        positive("airplane.reference.s_ref_m2", r.s_ref_m2)?;
        positive("airplane.reference.c_ref_m", r.c_ref_m)?;
        positive("airplane.reference.b_ref_m", r.b_ref_m)?;
    }
    Ok(())
}

fn validate_wing(wing: &WingDef) -> Result<(), ValidationError> {
    let ctx = format!("wing '{}'", wing.name);
    if wing.xsecs.len() < 2 {
        return Err(invalid(format!("{ctx}.xsecs"), wing.xsecs.len(), "at least 2 cross-sections are required"));
    }
    finite_point(&format!("{ctx}.translate"), &wing.translate)?;
    for (i, xsec) in wing.xsecs.iter().enumerate() {
        finite_point(&format!("{ctx}.xsecs[{i}].xyz_le"), &xsec.xyz_le)?;
        positive(&format!("{ctx}.xsecs[{i}].chord_m"), xsec.chord_m)?;
        finite(&format!("{ctx}.xsecs[{i}].twist_deg"), xsec.twist_deg)?;
        validate_airfoil(&xsec.airfoil)?;
    }
    Ok(())
}

fn validate_airfoil(airfoil: &AirfoilDef) -> Result<(), ValidationError> {
    match airfoil {
        AirfoilDef::Naca(name) => {
            if Naca4::parse(name).is_none() {
                return Err(ValidationError::UnsupportedAirfoil {
                    name: name.clone(),
                    reason: "only NACA 4-digit names are generated; give dat_file or coordinates".to_string(),
                });
            }
        }
        AirfoilDef::File { name, dat_file } => {
            if dat_file.as_os_str().is_empty() {
                return Err(ValidationError::UnsupportedAirfoil {
                    name: name.clone(),
                    reason: "empty dat_file path".to_string(),
                });
            }
        }
        AirfoilDef::Coordinates { name, coordinates } => {
            if coordinates.len() < 5 || coordinates.iter().flatten().any(|v| !v.is_finite()) {
                return Err(ValidationError::UnsupportedAirfoil {
                    name: name.clone(),
                    reason: "need at least 5 finite coordinate pairs".to_string(),
                });
            }
        }
    }
    if airfoil.name().trim().is_empty() {
        return Err(invalid("airfoil.name", "", "must not be empty"));
    }
    Ok(())
}

fn validate_fuselage(fuselage: &FuselageDef) -> Result<(), ValidationError> {
    let ctx = format!("fuselage '{}'", fuselage.name);
    if fuselage.xsecs.len() < 2 {
        return Err(invalid(format!("{ctx}.xsecs"), fuselage.xsecs.len(), "at least 2 cross-sections are required"));
    }
    finite_point(&format!("{ctx}.translate"), &fuselage.translate)?;
    for (i, xsec) in fuselage.xsecs.iter().enumerate() {
        finite_point(&format!("{ctx}.xsecs[{i}].xyz_c"), &xsec.xyz_c)?;
        if !(xsec.radius_m.is_finite() && xsec.radius_m >= 0.0) {
            return Err(invalid(format!("{ctx}.xsecs[{i}].radius_m"), xsec.radius_m, "must be non-negative"));
        }
    }
    Ok(())
}

fn validate_operating_point(op: &OperatingPointDef) -> Result<(), ValidationError> {
    positive("operating_point.velocity_mps", op.velocity_mps)?;
    finite("operating_point.alpha_deg", op.alpha_deg)?;
    finite("operating_point.beta_deg", op.beta_deg)?;
    if let Some(rho) = op.density_kg_m3 {
        positive("operating_point.density_kg_m3", rho)?;
    }
    if let Some(nu) = op.kinematic_viscosity_m2_s {
        positive("operating_point.kinematic_viscosity_m2_s", nu)?;
    }
    Ok(())
}

fn validate_settings(settings: &SettingsDef) -> Result<(), ValidationError> {
    let tol = settings.tolerance;
    if !(tol.rel.is_finite() && tol.rel >= 0.0) {
        return Err(invalid("settings.tolerance.rel", tol.rel, "must be non-negative"));
    }
    if !(tol.abs.is_finite() && tol.abs >= 0.0) {
        return Err(invalid("settings.tolerance.abs", tol.abs, "must be non-negative"));
    }
    if settings.vlm.chordwise_panels == 0 || settings.vlm.spanwise_panels_per_section == 0 {
        return Err(invalid(
            "settings.vlm",
            format!("{:?}", settings.vlm),
            "panel counts must be at least 1",
        ));
    }
    if settings.buildup_strips_per_section == 0 {
        return Err(invalid("settings.buildup_strips_per_section", 0, "must be at least 1"));
    }
    for (field, command) in [
        ("settings.avl_command", &settings.avl_command),
        ("settings.xfoil_command", &settings.xfoil_command),
    ] {
        if command.trim().is_empty() {
            return Err(invalid(field, "", "must not be empty"));
        }
    }
    Ok(())
}
