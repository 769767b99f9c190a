//! Top-level error type for dashboard interactions.
//!
//! Every failure ends the current interaction only; the session and the
//! process carry on. Use `user_message()` for what the UI shows.

use thiserror::Error;
use worksafe_core::ConfigError;
use worksafe_dataset::DatasetError;
use worksafe_decision::{ClassifierError, ModelLoadError};
use worksafe_weather::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather provider error: {0}")]
    Weather(#[from] ProviderError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Model load error: {0}")]
    Model(#[from] ModelLoadError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message().to_string(),
            AppError::Classifier(e) => e.user_message().to_string(),
            AppError::Model(e) => e.user_message().to_string(),
            AppError::Dataset(e) => e.user_message(),
            AppError::UnknownCity(city) => format!("No coordinates configured for {}.", city),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    /// The provider could not deliver usable weather data
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, AppError::Weather(e) if e.is_data_unavailable())
    }
}
