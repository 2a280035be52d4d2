//! Flight condition.

use crate::error::{AeroError, AeroResult};
use af_core::units::{Angle, Density, KinVisc, Velocity, constants, deg, mps, to_deg, to_rad};
use nalgebra::Vector3;
use uom::si::diffusion_coefficient::square_meter_per_second;
use uom::si::mass_density::kilogram_per_cubic_meter;
use uom::si::velocity::meter_per_second;

/// Free-stream speed, attitude and atmosphere at which aerodynamics are evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub velocity: Velocity,
    pub alpha: Angle,
    pub beta: Angle,
    pub density: Density,
    pub kinematic_viscosity: KinVisc,
}

impl OperatingPoint {
    /// Sea-level standard atmosphere.
    pub fn new(velocity_mps: f64, alpha_deg: f64, beta_deg: f64) -> Self {
        Self {
            velocity: mps(velocity_mps),
            alpha: deg(alpha_deg),
            beta: deg(beta_deg),
            density: constants::rho_sl(),
            kinematic_viscosity: constants::nu_sl(),
        }
    }

    pub fn with_atmosphere(mut self, density: Density, kinematic_viscosity: KinVisc) -> Self {
        self.density = density;
        self.kinematic_viscosity = kinematic_viscosity;
        self
    }

    pub fn with_alpha_deg(mut self, alpha_deg: f64) -> Self {
        self.alpha = deg(alpha_deg);
        self
    }

    pub fn with_beta_deg(mut self, beta_deg: f64) -> Self {
        self.beta = deg(beta_deg);
        self
    }

    pub fn validate(&self) -> AeroResult<()> {
        let v = self.velocity_mps();
        if !(v > 0.0 && v.is_finite()) {
            return Err(AeroError::InvalidOperatingPoint {
                what: format!("velocity must be positive and finite, got {v}"),
            });
        }
        if !(self.density_kg_m3() > 0.0) {
            return Err(AeroError::InvalidOperatingPoint {
                what: format!("density must be positive, got {}", self.density_kg_m3()),
            });
        }
        if !(self.nu_m2_s() > 0.0) {
            return Err(AeroError::InvalidOperatingPoint {
                what: "kinematic viscosity must be positive".to_string(),
            });
        }
        if !self.alpha_deg().is_finite() || !self.beta_deg().is_finite() {
            return Err(AeroError::InvalidOperatingPoint {
                what: "angles must be finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn velocity_mps(&self) -> f64 {
        self.velocity.get::<meter_per_second>()
    }

    pub fn alpha_deg(&self) -> f64 {
        to_deg(self.alpha)
    }

    pub fn beta_deg(&self) -> f64 {
        to_deg(self.beta)
    }

    pub fn density_kg_m3(&self) -> f64 {
        self.density.get::<kilogram_per_cubic_meter>()
    }

    pub fn nu_m2_s(&self) -> f64 {
        self.kinematic_viscosity.get::<square_meter_per_second>()
    }

    /// Dynamic pressure in pascals.
    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.density_kg_m3() * self.velocity_mps().powi(2)
    }

    pub fn reynolds(&self, length_m: f64) -> f64 {
        self.velocity_mps() * length_m / self.nu_m2_s()
    }

    /// Unit direction of the air's motion relative to the aircraft, in geometry axes.
    pub fn freestream_direction_g(&self) -> Vector3<f64> {
        let (a, b) = (to_rad(self.alpha), to_rad(self.beta));
        Vector3::new(a.cos() * b.cos(), -b.sin(), a.sin() * b.cos())
    }

    pub fn freestream_velocity_g(&self) -> Vector3<f64> {
        self.freestream_direction_g() * self.velocity_mps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_pressure_sea_level() {
        let op = OperatingPoint::new(100.0, 5.0, 0.0);
        assert!((op.dynamic_pressure() - 6125.0).abs() < 1e-9);
    }

    #[test]
    fn positive_alpha_blows_upward() {
        let op = OperatingPoint::new(10.0, 5.0, 0.0);
        let d = op.freestream_direction_g();
        assert!(d.x > 0.0 && d.z > 0.0);
        assert!((d.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn positive_beta_blows_toward_port() {
        let d = OperatingPoint::new(10.0, 0.0, 5.0).freestream_direction_g();
        assert!(d.y < 0.0);
    }

    #[test]
    fn rejects_zero_velocity() {
        assert!(OperatingPoint::new(0.0, 0.0, 0.0).validate().is_err());
        assert!(OperatingPoint::new(30.0, 2.0, 0.0).validate().is_ok());
    }
}
