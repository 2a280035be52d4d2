//! af-project: airframe study files.
//!
//! A study bundles one airplane definition, the operating point to analyse it
//! at, and solver/cache settings. Studies are stored as YAML (the bundled
//! `projects/` format) or JSON, and are validated on every load and save.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_study};

use std::path::{Path, PathBuf};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to access study file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyFormat {
    Yaml,
    Json,
}

impl StudyFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => StudyFormat::Json,
            _ => StudyFormat::Yaml,
        }
    }

    pub fn parse(self, text: &str) -> ProjectResult<Study> {
        let study: Study = match self {
            StudyFormat::Yaml => serde_yaml::from_str(text)?,
            StudyFormat::Json => serde_json::from_str(text)?,
        };
        validate_study(&study)?;
        Ok(study)
    }

    pub fn render(self, study: &Study) -> ProjectResult<String> {
        validate_study(study)?;
        Ok(match self {
            StudyFormat::Yaml => serde_yaml::to_string(study)?,
            StudyFormat::Json => serde_json::to_string_pretty(study)?,
        })
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ProjectError + '_ {
    move |source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read and validate a study, picking the format from the file extension.
pub fn load_study(path: &Path) -> ProjectResult<Study> {
    load_as(path, StudyFormat::from_path(path))
}

/// Validate and write a study, creating missing parent directories.
pub fn save_study(path: &Path, study: &Study) -> ProjectResult<()> {
    save_as(path, study, StudyFormat::from_path(path))
}

fn load_as(path: &Path, format: StudyFormat) -> ProjectResult<Study> {
    let text = std::fs::read_to_string(path).map_err(io_error(path))?;
    format.parse(&text)
}

fn save_as(path: &Path, study: &Study, format: StudyFormat) -> ProjectResult<()> {
    let text = format.render(study)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    std::fs::write(path, text).map_err(io_error(path))
}

pub fn load_yaml(path: &Path) -> ProjectResult<Study> {
    load_as(path, StudyFormat::Yaml)
}

pub fn save_yaml(path: &Path, study: &Study) -> ProjectResult<()> {
    save_as(path, study, StudyFormat::Yaml)
}

pub fn load_json(path: &Path) -> ProjectResult<Study> {
    load_as(path, StudyFormat::Json)
}

pub fn save_json(path: &Path, study: &Study) -> ProjectResult<()> {
    save_as(path, study, StudyFormat::Json)
}
