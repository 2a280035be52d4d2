//! Error types for the af-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI a single error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Study error: {0}")]
    Study(String),

    #[error("Study validation failed: {0}")]
    Validation(String),

    #[error("Failed to read airfoil file: {path}")]
    AirfoilFileRead { path: PathBuf, message: String },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Polar error: {0}")]
    Polar(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<af_geometry::GeometryError> for AppError {
    fn from(err: af_geometry::GeometryError) -> Self {
        AppError::Geometry(err.to_string())
    }
}

impl From<af_polars::PolarError> for AppError {
    fn from(err: af_polars::PolarError) -> Self {
        AppError::Polar(err.to_string())
    }
}

impl From<af_aero::AeroError> for AppError {
    fn from(err: af_aero::AeroError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<af_project::ProjectError> for AppError {
    fn from(err: af_project::ProjectError) -> Self {
        match err {
            af_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Study(other.to_string()),
        }
    }
}

impl From<af_vsp::VspError> for AppError {
    fn from(err: af_vsp::VspError) -> Self {
        AppError::Export(err.to_string())
    }
}
