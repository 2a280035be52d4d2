//! Aircraft geometry: airplanes, wings, fuselages and airfoils.
//!
//! Coordinates are in geometry axes: x aft, y starboard, z up. Twist angles
//! are in degrees, positive nose-up.

pub mod airfoil;
pub mod airplane;
pub mod error;
pub mod fuselage;
pub mod wing;

pub use airfoil::{Airfoil, Naca4};
pub use airplane::Airplane;
pub use error::{GeometryError, GeometryResult};
pub use fuselage::{Fuselage, FuselageXSec};
pub use nalgebra::Vector3;
pub use wing::{Panel, Wing, WingXSec};
