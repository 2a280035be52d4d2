//! Whole-aircraft aggregate.

use crate::error::{GeometryError, GeometryResult};
use crate::fuselage::Fuselage;
use crate::wing::Wing;
use nalgebra::Vector3;

#[derive(Debug, Clone, PartialEq)]
pub struct Airplane {
    pub name: String,
    /// Moment reference point
    pub xyz_ref: Vector3<f64>,
    pub wings: Vec<Wing>,
    pub fuselages: Vec<Fuselage>,
    /// Reference area
    pub s_ref: f64,
    /// Reference chord
    pub c_ref: f64,
    /// Reference span
    pub b_ref: f64,
}

impl Airplane {
    /// Reference quantities default to the first wing's area, MAC and span.
    pub fn new(
        name: &str,
        xyz_ref: [f64; 3],
        wings: Vec<Wing>,
        fuselages: Vec<Fuselage>,
    ) -> GeometryResult<Self> {
        let main = wings.first().ok_or_else(|| GeometryError::Invalid {
            what: format!("airplane '{name}' has no wings"),
        })?;
        let (s_ref, c_ref, b_ref) = (main.area(), main.mean_aerodynamic_chord(), main.span());
        Ok(Self {
            name: name.to_string(),
            xyz_ref: Vector3::from(xyz_ref),
            wings,
            fuselages,
            s_ref,
            c_ref,
            b_ref,
        })
    }

    pub fn with_reference(mut self, s_ref: f64, c_ref: f64, b_ref: f64) -> GeometryResult<Self> {
        if !(s_ref > 0.0 && c_ref > 0.0 && b_ref > 0.0) {
            return Err(GeometryError::Invalid {
                what: format!("reference quantities must be positive: S={s_ref}, c={c_ref}, b={b_ref}"),
            });
        }
        self.s_ref = s_ref;
        self.c_ref = c_ref;
        self.b_ref = b_ref;
        Ok(self)
    }

    /// Distinct airfoils used by any wing cross-section, in first-use order.
    pub fn airfoils(&self) -> Vec<&crate::Airfoil> {
        let mut seen: Vec<&crate::Airfoil> = Vec::new();
        for xsec in self.wings.iter().flat_map(|w| &w.xsecs) {
            if !seen.iter().any(|a| a.name() == xsec.airfoil.name()) {
                seen.push(&xsec.airfoil);
            }
        }
        seen
    }
}
