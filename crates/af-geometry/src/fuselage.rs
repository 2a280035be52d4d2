//! Bodies of revolution.

use crate::error::{GeometryError, GeometryResult};
use nalgebra::Vector3;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct FuselageXSec {
    /// Center of the circular section
    pub xyz_c: Vector3<f64>,
    pub radius: f64,
}

impl FuselageXSec {
    pub fn new(xyz_c: [f64; 3], radius: f64) -> Self {
        Self {
            xyz_c: Vector3::from(xyz_c),
            radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fuselage {
    pub name: String,
    pub xsecs: Vec<FuselageXSec>,
}

impl Fuselage {
    pub fn new(name: &str, xsecs: Vec<FuselageXSec>) -> GeometryResult<Self> {
        if xsecs.len() < 2 {
            return Err(GeometryError::Invalid {
                what: format!("fuselage '{name}' needs at least 2 cross-sections"),
            });
        }
        if let Some(x) = xsecs.iter().find(|x| !(x.radius >= 0.0)) {
            return Err(GeometryError::Invalid {
                what: format!("fuselage '{name}' has negative radius {}", x.radius),
            });
        }
        Ok(Self {
            name: name.to_string(),
            xsecs,
        })
    }

    pub fn translate(mut self, offset: [f64; 3]) -> Self {
        let offset = Vector3::from(offset);
        for xsec in &mut self.xsecs {
            xsec.xyz_c += offset;
        }
        self
    }

    /// Distance between the first and last section centers.
    pub fn length(&self) -> f64 {
        let first = &self.xsecs[0].xyz_c;
        let last = &self.xsecs[self.xsecs.len() - 1].xyz_c;
        (last - first).norm()
    }

    pub fn max_radius(&self) -> f64 {
        self.xsecs.iter().map(|x| x.radius).fold(0.0, f64::max)
    }

    fn frusta(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.xsecs.windows(2).map(|w| {
            let h = (w[1].xyz_c - w[0].xyz_c).norm();
            (w[0].radius, w[1].radius, h)
        })
    }

    /// Lateral surface area of the frustum chain.
    pub fn wetted_area(&self) -> f64 {
        self.frusta()
            .map(|(r1, r2, h)| PI * (r1 + r2) * (h * h + (r2 - r1).powi(2)).sqrt())
            .sum()
    }

    pub fn volume(&self) -> f64 {
        self.frusta()
            .map(|(r1, r2, h)| PI * h / 3.0 * (r1 * r1 + r1 * r2 + r2 * r2))
            .sum()
    }

    pub fn fineness_ratio(&self) -> f64 {
        let d = 2.0 * self.max_radius();
        if d > 0.0 { self.length() / d } else { f64::INFINITY }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_properties() {
        let f = Fuselage::new(
            "tube",
            vec![
                FuselageXSec::new([0.0, 0.0, 0.0], 0.5),
                FuselageXSec::new([2.0, 0.0, 0.0], 0.5),
            ],
        )
        .unwrap();
        assert!((f.length() - 2.0).abs() < 1e-12);
        assert!((f.wetted_area() - 2.0 * PI).abs() < 1e-12);
        assert!((f.volume() - 0.5 * PI).abs() < 1e-12);
        assert!((f.fineness_ratio() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cone_volume() {
        let f = Fuselage::new(
            "cone",
            vec![
                FuselageXSec::new([0.0, 0.0, 0.0], 0.0),
                FuselageXSec::new([3.0, 0.0, 0.0], 1.0),
            ],
        )
        .unwrap()
        .translate([1.0, 0.0, 0.0]);
        assert!((f.volume() - PI).abs() < 1e-12);
        assert_eq!(f.xsecs[0].xyz_c.x, 1.0);
    }
}
