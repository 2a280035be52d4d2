//! af-vsp: OpenVSP script (`*.vspscript`) generation.
//!
//! Geometry becomes `AddGeom` / `SetParmVal` statements, and
//! [`wrap_script`] puts any statement body inside a runnable `main()`.

pub mod geometry;
pub mod script;

pub use geometry::{airplane_to_vspscript, fuselage_to_vspscript, wing_to_vspscript};
pub use script::{VspScriptOptions, indent, wrap_script};

use af_geometry::Airplane;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum VspError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type VspResult<T> = Result<T, VspError>;

/// Write the wrapped script for `airplane` to `path`, creating parent directories.
pub fn write_vspscript(path: &Path, airplane: &Airplane, options: &VspScriptOptions) -> VspResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| VspError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = wrap_script(&airplane_to_vspscript(airplane), options);
    std::fs::write(path, text).map_err(|source| VspError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), airplane = %airplane.name, "vspscript written");
    Ok(())
}
