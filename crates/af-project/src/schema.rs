//! Study schema definitions.
//!
//! Plain numbers carry their unit in the field name; positions are metres in
//! geometry axes (x aft, y starboard, z up).

use af_core::Tolerances;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Study {
    pub version: u32,
    pub name: String,
    pub airplane: AirplaneDef,
    pub operating_point: OperatingPointDef,
    #[serde(default)]
    pub settings: SettingsDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirplaneDef {
    pub name: String,
    #[serde(default)]
    pub xyz_ref: [f64; 3],
    pub wings: Vec<WingDef>,
    #[serde(default)]
    pub fuselages: Vec<FuselageDef>,
    /// Overrides the main-wing reference quantities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReferenceDef {
    pub s_ref_m2: f64,
    pub c_ref_m: f64,
    pub b_ref_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WingDef {
    pub name: String,
    #[serde(default)]
    pub symmetric: bool,
    #[serde(default)]
    pub translate: [f64; 3],
    pub xsecs: Vec<WingXSecDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WingXSecDef {
    pub xyz_le: [f64; 3],
    pub chord_m: f64,
    #[serde(default)]
    pub twist_deg: f64,
    pub airfoil: AirfoilDef,
}

/// A NACA 4-digit name, a Selig `.dat` file, or inline coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AirfoilDef {
    Naca(String),
    File {
        name: String,
        /// Relative paths resolve against the study file's directory
        dat_file: PathBuf,
    },
    Coordinates {
        name: String,
        coordinates: Vec<[f64; 2]>,
    },
}

impl AirfoilDef {
    pub fn name(&self) -> &str {
        match self {
            AirfoilDef::Naca(name) => name,
            AirfoilDef::File { name, .. } | AirfoilDef::Coordinates { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuselageDef {
    pub name: String,
    #[serde(default)]
    pub translate: [f64; 3],
    pub xsecs: Vec<FuselageXSecDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FuselageXSecDef {
    pub xyz_c: [f64; 3],
    pub radius_m: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OperatingPointDef {
    pub velocity_mps: f64,
    #[serde(default)]
    pub alpha_deg: f64,
    #[serde(default)]
    pub beta_deg: f64,
    /// Sea-level standard when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_kg_m3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinematic_viscosity_m2_s: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolarSourceDef {
    #[default]
    Xfoil,
    ThinAirfoil,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsDef {
    #[serde(default = "default_cache_dir")]
    pub polar_cache_dir: PathBuf,
    #[serde(default)]
    pub polar_source: PolarSourceDef,
    #[serde(default = "default_avl")]
    pub avl_command: String,
    #[serde(default = "default_xfoil")]
    pub xfoil_command: String,
    /// AeroBuildup vs AVL agreement band
    #[serde(default = "default_tolerance")]
    pub tolerance: Tolerances,
    #[serde(default)]
    pub vlm: VlmSettingsDef,
    #[serde(default = "default_strips")]
    pub buildup_strips_per_section: usize,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_avl() -> String {
    "avl".to_string()
}

fn default_xfoil() -> String {
    "xfoil".to_string()
}

fn default_tolerance() -> Tolerances {
    Tolerances::default()
}

fn default_strips() -> usize {
    8
}

impl Default for SettingsDef {
    fn default() -> Self {
        Self {
            polar_cache_dir: default_cache_dir(),
            polar_source: PolarSourceDef::default(),
            avl_command: default_avl(),
            xfoil_command: default_xfoil(),
            tolerance: default_tolerance(),
            vlm: VlmSettingsDef::default(),
            buildup_strips_per_section: default_strips(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VlmSettingsDef {
    pub chordwise_panels: usize,
    pub spanwise_panels_per_section: usize,
}

impl Default for VlmSettingsDef {
    fn default() -> Self {
        Self {
            chordwise_panels: 6,
            spanwise_panels_per_section: 12,
        }
    }
}
