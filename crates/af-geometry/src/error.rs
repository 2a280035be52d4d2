//! Geometry errors.

use std::path::PathBuf;
use thiserror::Error;

pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Unknown airfoil '{name}': expected a NACA 4-digit name or a coordinate file")]
    UnknownAirfoil { name: String },

    #[error("Invalid airfoil coordinates for '{name}': {what}")]
    InvalidCoordinates { name: String, what: String },

    #[error("Invalid geometry: {what}")]
    Invalid { what: String },

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
