//! Aerodynamic analysis of airframe geometry.
//!
//! Three methods share one [`AeroSolver`] interface and one result layout:
//! a strip-theory buildup, an in-process vortex lattice method, and an
//! adapter around the external AVL vortex-lattice program.

pub mod avl;
pub mod axes;
pub mod buildup;
pub mod error;
pub mod operating_point;
pub mod results;
pub mod solver;
pub mod stability;
pub mod vlm;

pub use avl::Avl;
pub use buildup::AeroBuildup;
pub use error::{AeroError, AeroResult};
pub use operating_point::OperatingPoint;
pub use results::AeroResults;
pub use solver::AeroSolver;
pub use stability::with_stability_derivatives;
pub use vlm::VortexLatticeMethod;
