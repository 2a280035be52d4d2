//! JSON polar cache keyed by airfoil name.

use crate::generator::{PolarGenerator, PolarRequest};
use crate::polar::PolarSet;
use crate::{PolarError, PolarResult};
use af_geometry::Airfoil;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// On-disk cache record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub generator: String,
    pub generated_at: String,
    pub polars: PolarSet,
}

/// Directory of `{airfoil name}.json` files.
#[derive(Debug, Clone)]
pub struct PolarCache {
    root_dir: PathBuf,
}

/// Content hash of everything that determines a polar set.
pub fn fingerprint(airfoil: &Airfoil, request: &PolarRequest, generator: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(airfoil.name().as_bytes());
    for [x, y] in airfoil.coordinates() {
        hasher.update(x.to_le_bytes());
        hasher.update(y.to_le_bytes());
    }
    let request_json = serde_json::to_string(request).unwrap_or_default();
    hasher.update(request_json.as_bytes());
    hasher.update(generator.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl PolarCache {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn path_for(&self, airfoil_name: &str) -> PathBuf {
        let safe: String = airfoil_name
            .chars()
            .map(|c| if c == '/' || c == '\\' || c.is_whitespace() { '_' } else { c })
            .collect();
        self.root_dir.join(format!("{safe}.json"))
    }

    pub fn has(&self, airfoil_name: &str) -> bool {
        self.path_for(airfoil_name).exists()
    }

    /// Read a cached set if one exists for this airfoil and request.
    ///
    /// Unreadable or stale files count as a miss.
    pub fn load(
        &self,
        airfoil: &Airfoil,
        request: &PolarRequest,
        generator: &str,
    ) -> PolarResult<Option<PolarSet>> {
        let path = self.path_for(airfoil.name());
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| PolarError::io(&path, e))?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable polar cache file");
                return Ok(None);
            }
        };
        if entry.fingerprint != fingerprint(airfoil, request, generator) {
            debug!(path = %path.display(), "polar cache fingerprint mismatch");
            return Ok(None);
        }
        Ok(Some(entry.polars))
    }

    pub fn store(&self, airfoil: &Airfoil, request: &PolarRequest, generator: &str, polars: &PolarSet) -> PolarResult<PathBuf> {
        fs::create_dir_all(&self.root_dir).map_err(|e| PolarError::io(&self.root_dir, e))?;
        let entry = CacheEntry {
            fingerprint: fingerprint(airfoil, request, generator),
            generator: generator.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            polars: polars.clone(),
        };
        let path = self.path_for(airfoil.name());
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&path, json).map_err(|e| PolarError::io(&path, e))?;
        Ok(path)
    }

    /// Return cached polars, generating and writing them on a miss.
    pub fn get_or_generate(
        &self,
        airfoil: &Airfoil,
        request: &PolarRequest,
        generator: &dyn PolarGenerator,
    ) -> PolarResult<PolarSet> {
        if let Some(set) = self.load(airfoil, request, generator.name())? {
            debug!(airfoil = airfoil.name(), "polar cache hit");
            return Ok(set);
        }
        let set = generator.generate(airfoil, request)?;
        let path = self.store(airfoil, request, generator.name(), &set)?;
        info!(airfoil = airfoil.name(), generator = generator.name(), path = %path.display(), "wrote polar cache");
        Ok(set)
    }
}
