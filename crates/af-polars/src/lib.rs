//! af-polars: airfoil polar tables, generators and the on-disk polar cache.

pub mod cache;
pub mod generator;
pub mod polar;
pub mod process;
pub mod xfoil;

pub use cache::{CacheEntry, PolarCache};
pub use generator::{PolarGenerator, PolarRequest, ThinAirfoilGenerator};
pub use polar::{Polar, PolarLibrary, PolarSet, SectionCoefficients};
pub use process::{ProcessError, run_with_keystrokes};
pub use xfoil::XfoilGenerator;

use std::path::PathBuf;

pub type PolarResult<T> = Result<T, PolarError>;

#[derive(thiserror::Error, Debug)]
pub enum PolarError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("External solver '{command}' failed: {message}")]
    External { command: String, message: String },

    #[error("No converged points for {airfoil} at Re={reynolds}")]
    NoConvergence { airfoil: String, reynolds: f64 },

    #[error("Invalid polar table: {what}")]
    InvalidTable { what: String },
}

impl PolarError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PolarError::Io {
            path: path.into(),
            source,
        }
    }
}
