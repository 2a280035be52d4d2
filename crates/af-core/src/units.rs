// af-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, DiffusionCoefficient as UomKinVisc, MassDensity as UomMassDensity,
    Velocity as UomVelocity,
};

// Flight-condition quantities (SI, f64)
pub type Angle = UomAngle;
pub type KinVisc = UomKinVisc;
pub type Density = UomMassDensity;
pub type Velocity = UomVelocity;

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn kg_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn m2ps(v: f64) -> KinVisc {
    use uom::si::diffusion_coefficient::square_meter_per_second;
    KinVisc::new::<square_meter_per_second>(v)
}

/// Angle in degrees as a bare float.
#[inline]
pub fn to_deg(a: Angle) -> f64 {
    use uom::si::angle::degree;
    a.get::<degree>()
}

/// Angle in radians as a bare float.
#[inline]
pub fn to_rad(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

pub mod constants {
    use super::*;

    /// ISA sea-level density.
    pub const RHO_SL_KG_M3: f64 = 1.225;
    /// Kinematic viscosity of air at ISA sea level.
    pub const NU_SL_M2_S: f64 = 1.4607e-5;

    #[inline]
    pub fn rho_sl() -> Density {
        kg_m3(RHO_SL_KG_M3)
    }

    #[inline]
    pub fn nu_sl() -> KinVisc {
        m2ps(NU_SL_M2_S)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = mps(100.0);
        let _a = deg(5.0);
        let _rho = constants::rho_sl();
        let _nu = constants::nu_sl();
    }

    #[test]
    fn degree_radian_round_trip() {
        let a = deg(180.0);
        assert!((to_rad(a) - core::f64::consts::PI).abs() < 1e-12);
        assert!((to_deg(a) - 180.0).abs() < 1e-12);
    }
}
