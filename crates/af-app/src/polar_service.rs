//! Airfoil polars for every section of an airplane, through the on-disk cache.

use std::path::PathBuf;

use af_geometry::Airplane;
use af_polars::{PolarCache, PolarGenerator, PolarLibrary, PolarRequest, ThinAirfoilGenerator, XfoilGenerator};
use af_project::schema::{PolarSourceDef, SettingsDef};
use tracing::info;

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct PolarOptions {
    pub cache_dir: PathBuf,
    pub source: PolarSourceDef,
    pub xfoil_command: String,
}

impl PolarOptions {
    /// Cache directory relative paths resolve against `base_dir`.
    pub fn from_settings(settings: &SettingsDef, base_dir: &std::path::Path) -> Self {
        let cache_dir = if settings.polar_cache_dir.is_absolute() {
            settings.polar_cache_dir.clone()
        } else {
            base_dir.join(&settings.polar_cache_dir)
        };
        Self {
            cache_dir,
            source: settings.polar_source,
            xfoil_command: settings.xfoil_command.clone(),
        }
    }

    fn generator(&self) -> Box<dyn PolarGenerator> {
        match self.source {
            PolarSourceDef::Xfoil => Box::new(XfoilGenerator::new(self.xfoil_command.clone())),
            PolarSourceDef::ThinAirfoil => Box::new(ThinAirfoilGenerator::default()),
        }
    }
}

/// Load or compute polars for every distinct airfoil on the airplane.
///
/// NACA sections are repaneled by the external solver before analysis.
pub fn attach_polars(airplane: &Airplane, options: &PolarOptions) -> AppResult<PolarLibrary> {
    let cache = PolarCache::new(&options.cache_dir);
    let generator = options.generator();
    let mut library = PolarLibrary::new();
    for airfoil in airplane.airfoils() {
        let request = PolarRequest {
            repanel: airfoil.naca().is_some(),
            ..PolarRequest::default()
        };
        let set = cache.get_or_generate(airfoil, &request, generator.as_ref())?;
        library.insert(set);
    }
    info!(
        airfoils = library.len(),
        generator = generator.name(),
        cache = %options.cache_dir.display(),
        "polars attached"
    );
    Ok(library)
}
