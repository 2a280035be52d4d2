//! Axis conversions and result assembly shared by every solver.
//!
//! Geometry axes: x aft, y starboard, z up. Body axes: x forward, y starboard,
//! z down. Wind axes: x along the flight path.

use crate::operating_point::OperatingPoint;
use crate::results::AeroResults;
use af_core::units::to_rad;
use af_geometry::Airplane;
use nalgebra::Vector3;

pub fn geometry_to_body(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-v.x, v.y, -v.z)
}

pub fn body_to_wind(v: &Vector3<f64>, op: &OperatingPoint) -> Vector3<f64> {
    let (a, b) = (to_rad(op.alpha), to_rad(op.beta));
    let (ca, sa, cb, sb) = (a.cos(), a.sin(), b.cos(), b.sin());
    Vector3::new(
        ca * cb * v.x + sb * v.y + sa * cb * v.z,
        -ca * sb * v.x + cb * v.y - sa * sb * v.z,
        -sa * v.x + ca * v.z,
    )
}

/// Inverse of [`body_to_wind`].
pub fn wind_to_body(v: &Vector3<f64>, op: &OperatingPoint) -> Vector3<f64> {
    let (a, b) = (to_rad(op.alpha), to_rad(op.beta));
    let (ca, sa, cb, sb) = (a.cos(), a.sin(), b.cos(), b.sin());
    Vector3::new(
        ca * cb * v.x - ca * sb * v.y - sa * v.z,
        sb * v.x + cb * v.y,
        sa * cb * v.x - sa * sb * v.y + ca * v.z,
    )
}

/// Standard result set from wind-axis force coefficients and body-axis
/// moment coefficients, as reported by solvers that only give coefficients.
pub fn results_from_coefficients(
    force_coefficients: [f64; 3],
    moment_coefficients: [f64; 3],
    airplane: &Airplane,
    op: &OperatingPoint,
) -> AeroResults {
    let [cl, cy, cd] = force_coefficients;
    let [c_roll, c_pitch, c_yaw] = moment_coefficients;
    let qs = op.dynamic_pressure() * airplane.s_ref;
    let force_w = Vector3::new(-cd * qs, cy * qs, -cl * qs);
    let moment_b = Vector3::new(
        c_roll * qs * airplane.b_ref,
        c_pitch * qs * airplane.c_ref,
        c_yaw * qs * airplane.b_ref,
    );
    // Geometry/body conversion is its own inverse
    let force_g = geometry_to_body(&wind_to_body(&force_w, op));
    let moment_g = geometry_to_body(&moment_b);
    assemble_results(force_g, moment_g, airplane, op)
}

/// Build the standard result set from total force and moment in geometry axes.
///
/// `moment_g` must already be taken about `airplane.xyz_ref`.
pub fn assemble_results(
    force_g: Vector3<f64>,
    moment_g: Vector3<f64>,
    airplane: &Airplane,
    op: &OperatingPoint,
) -> AeroResults {
    let force_b = geometry_to_body(&force_g);
    let force_w = body_to_wind(&force_b, op);
    let moment_b = geometry_to_body(&moment_g);

    let lift = -force_w.z;
    let side = force_w.y;
    let drag = -force_w.x;

    let qs = op.dynamic_pressure() * airplane.s_ref;
    let mut r = AeroResults::new();
    for (prefix, v) in [("F_g", force_g), ("F_b", force_b), ("F_w", force_w)] {
        r.insert(format!("{prefix}_x"), v.x);
        r.insert(format!("{prefix}_y"), v.y);
        r.insert(format!("{prefix}_z"), v.z);
    }
    for (prefix, v) in [("M_g", moment_g), ("M_b", moment_b)] {
        r.insert(format!("{prefix}_x"), v.x);
        r.insert(format!("{prefix}_y"), v.y);
        r.insert(format!("{prefix}_z"), v.z);
    }
    r.insert("L", lift);
    r.insert("Y", side);
    r.insert("D", drag);
    r.insert("l_b", moment_b.x);
    r.insert("m_b", moment_b.y);
    r.insert("n_b", moment_b.z);
    r.insert("CL", lift / qs);
    r.insert("CY", side / qs);
    r.insert("CD", drag / qs);
    r.insert("Cl", moment_b.x / (qs * airplane.b_ref));
    r.insert("Cm", moment_b.y / (qs * airplane.c_ref));
    r.insert("Cn", moment_b.z / (qs * airplane.b_ref));
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_along_freestream_maps_to_positive_drag() {
        let op = OperatingPoint::new(10.0, 7.0, 3.0);
        let d = op.freestream_direction_g();
        let w = body_to_wind(&geometry_to_body(&(d * 5.0)), &op);
        assert!((w.x + 5.0).abs() < 1e-12);
        assert!(w.y.abs() < 1e-12);
        assert!(w.z.abs() < 1e-12);
    }

    #[test]
    fn wind_to_body_inverts_body_to_wind() {
        let op = OperatingPoint::new(10.0, 8.0, -4.0);
        let v = Vector3::new(1.0, -2.0, 3.0);
        let back = wind_to_body(&body_to_wind(&v, &op), &op);
        assert!((back - v).norm() < 1e-12);
    }

    #[test]
    fn lift_perpendicular_to_freestream_maps_to_positive_lift() {
        let op = OperatingPoint::new(10.0, 7.0, 0.0);
        let a = 7f64.to_radians();
        let lift_dir = Vector3::new(-a.sin(), 0.0, a.cos());
        let w = body_to_wind(&geometry_to_body(&(lift_dir * 3.0)), &op);
        assert!((w.z + 3.0).abs() < 1e-12);
        assert!(w.x.abs() < 1e-12);
    }
}
