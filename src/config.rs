//! Runtime configuration
//!
//! Environment-only: `CGM_DATABASE_PATH` picks the SQLite file and
//! `CGM_THRESHOLDS_PATH` optionally points at a JSON threshold set.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::evaluation::{EvaluationConfig, EvaluationError};

pub const DATABASE_PATH_VAR: &str = "CGM_DATABASE_PATH";
pub const THRESHOLDS_PATH_VAR: &str = "CGM_THRESHOLDS_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read thresholds file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse thresholds file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] EvaluationError),
}

/// Settings shared by the server and the utility binaries
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let evaluation = match std::env::var(THRESHOLDS_PATH_VAR) {
            Ok(path) => load_thresholds(Path::new(&path))?,
            Err(_) => EvaluationConfig::default(),
        };

        Ok(Self {
            database_path: database_path(),
            evaluation,
        })
    }
}

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("cgm.db");
            path
        })
}

/// Read and validate a JSON threshold file
pub fn load_thresholds(path: &Path) -> Result<EvaluationConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EvaluationConfig =
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
