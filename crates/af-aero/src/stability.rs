//! Stability derivatives by central differences around an operating point.

use crate::error::AeroResult;
use crate::operating_point::OperatingPoint;
use crate::results::AeroResults;
use crate::solver::AeroSolver;
use af_geometry::Airplane;
use tracing::debug;

/// Perturbation used for both alpha and beta, degrees.
pub const STEP_DEG: f64 = 0.5;

const COEFFICIENTS: [&str; 6] = ["CL", "CD", "CY", "Cl", "Cm", "Cn"];

/// Run `solver` at `op` and at alpha/beta perturbed by ±[`STEP_DEG`].
///
/// Adds `<coef>a` and `<coef>b` per radian for every force and moment
/// coefficient, and the neutral point `x_np` in geometry axes when the lift
/// slope is nonzero.
pub fn with_stability_derivatives<S: AeroSolver + ?Sized>(
    solver: &S,
    airplane: &Airplane,
    op: &OperatingPoint,
) -> AeroResult<AeroResults> {
    let mut results = solver.run(airplane, op)?;
    let h = 2.0 * STEP_DEG.to_radians();

    let alpha = op.alpha_deg();
    let beta = op.beta_deg();
    let perturbations = [
        ("a", op.with_alpha_deg(alpha + STEP_DEG), op.with_alpha_deg(alpha - STEP_DEG)),
        ("b", op.with_beta_deg(beta + STEP_DEG), op.with_beta_deg(beta - STEP_DEG)),
    ];

    for (suffix, plus_op, minus_op) in perturbations {
        debug!(solver = solver.name(), axis = suffix, "finite-difference pair");
        let plus = solver.run(airplane, &plus_op)?;
        let minus = solver.run(airplane, &minus_op)?;
        for coef in COEFFICIENTS {
            if let (Some(p), Some(m)) = (plus.get(coef), minus.get(coef)) {
                results.insert(format!("{coef}{suffix}"), (p - m) / h);
            }
        }
    }

    if let (Some(cla), Some(cma)) = (results.get("CLa"), results.get("Cma"))
        && cla.abs() > f64::EPSILON
    {
        results.insert("x_np", airplane.xyz_ref.x - cma / cla * airplane.c_ref);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_geometry::{Airfoil, Wing, WingXSec};

    /// CL = 2·alpha, Cm = -0.5·alpha, CY = -beta (radians), nothing else.
    struct Linear;

    impl AeroSolver for Linear {
        fn name(&self) -> &str {
            "linear"
        }

        fn run(&self, _airplane: &Airplane, op: &OperatingPoint) -> AeroResult<AeroResults> {
            let a = op.alpha_deg().to_radians();
            let b = op.beta_deg().to_radians();
            let mut r = AeroResults::new();
            r.insert("CL", 2.0 * a);
            r.insert("Cm", -0.5 * a);
            r.insert("CY", -b);
            Ok(r)
        }
    }

    fn plane() -> Airplane {
        let af = Airfoil::new("naca0012").unwrap();
        let wing = Wing::new(
            "w",
            vec![
                WingXSec::new([0.0, 0.0, 0.0], 1.0, 0.0, af.clone()),
                WingXSec::new([0.0, 4.0, 0.0], 1.0, 0.0, af),
            ],
            true,
        )
        .unwrap();
        Airplane::new("p", [0.25, 0.0, 0.0], vec![wing], vec![]).unwrap()
    }

    #[test]
    fn derivatives_are_per_radian() {
        let r = with_stability_derivatives(&Linear, &plane(), &OperatingPoint::new(20.0, 3.0, 1.0)).unwrap();
        assert!((r.get("CLa").unwrap() - 2.0).abs() < 1e-9);
        assert!((r.get("Cma").unwrap() + 0.5).abs() < 1e-9);
        assert!((r.get("CYb").unwrap() + 1.0).abs() < 1e-9);
        assert!(r.get("CLb").unwrap().abs() < 1e-12);
        assert!(!r.contains("CDa"));
    }

    #[test]
    fn neutral_point_aft_of_reference_when_stable() {
        let airplane = plane();
        let r = with_stability_derivatives(&Linear, &airplane, &OperatingPoint::new(20.0, 3.0, 0.0)).unwrap();
        // x_ref + 0.25 c_ref
        let expected = 0.25 + 0.25 * airplane.c_ref;
        assert!((r.get("x_np").unwrap() - expected).abs() < 1e-9);
    }
}
