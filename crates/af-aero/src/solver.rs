//! Common solver interface.

use crate::error::AeroResult;
use crate::operating_point::OperatingPoint;
use crate::results::AeroResults;
use af_geometry::Airplane;

/// An aerodynamic analysis method.
///
/// Implementations are deterministic functions of geometry and flight
/// condition; any state they hold is configuration.
pub trait AeroSolver {
    /// Short label used in logs and report headers.
    fn name(&self) -> &str;

    fn run(&self, airplane: &Airplane, op: &OperatingPoint) -> AeroResult<AeroResults>;
}
