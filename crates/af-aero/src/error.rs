//! Error types for aerodynamic analyses.

use af_geometry::GeometryError;
use af_linalg::LinalgError;
use af_polars::PolarError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AeroError {
    #[error("Invalid operating point: {what}")]
    InvalidOperatingPoint { what: String },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Polar error: {0}")]
    Polar(#[from] PolarError),

    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),

    #[error("External solver '{command}' failed: {message}")]
    External { command: String, message: String },

    #[error("Failed to parse solver output: {what}")]
    Parse { what: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type AeroResult<T> = Result<T, AeroError>;

impl AeroError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AeroError::Io {
            path: path.into(),
            source,
        }
    }
}
