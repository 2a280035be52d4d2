//! af-core: stable foundation for airframe.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + comparison tolerances + spacing + interpolation)
//! - error (interpolation table errors)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AfError, AfResult};
pub use numeric::*;
pub use units::*;
