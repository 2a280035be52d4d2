//! CAD export.

use std::path::Path;

use af_geometry::Airplane;
use af_vsp::{VspScriptOptions, write_vspscript};
use tracing::info;

use crate::error::AppResult;

/// Write an OpenVSP script for `airplane` to `path`.
pub fn export_vspscript(airplane: &Airplane, path: &Path, options: &VspScriptOptions) -> AppResult<()> {
    write_vspscript(path, airplane, options)?;
    info!(airplane = %airplane.name, path = %path.display(), "wrote vspscript");
    Ok(())
}
