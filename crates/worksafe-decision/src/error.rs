//! Decision pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while running a classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("unknown weather category index {0}")]
    UnknownCategory(usize),

    #[error("suitability classifier returned {0}, expected 0 or 1")]
    InvalidPrediction(usize),

    #[error("model error: {0}")]
    Model(String),
}

impl ClassifierError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ClassifierError::FeatureCount { .. } | ClassifierError::Model(_) => {
                "The prediction model could not process this input."
            }
            ClassifierError::UnknownCategory(_) | ClassifierError::InvalidPrediction(_) => {
                "The prediction model returned an unexpected result."
            }
        }
    }
}

/// Failures while loading a serialized model or encoder
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl ModelLoadError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ModelLoadError::Io { .. } => "A prediction model file could not be read.",
            ModelLoadError::Parse { .. } | ModelLoadError::Invalid { .. } => {
                "A prediction model file is corrupted. Re-export the models."
            }
        }
    }
}

/// Read and parse a JSON artifact
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, ModelLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ModelLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
