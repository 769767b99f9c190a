//! Dataset error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("No data for location: {0}")]
    NoData(String),
}

impl DatasetError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(_) => "The weather dataset could not be opened.".to_string(),
            Self::Csv(_) => "The weather dataset is not valid CSV.".to_string(),
            Self::MissingColumn(name) => {
                format!("Your data does not contain a '{}' column.", name)
            }
            Self::NoData(location) => format!("No data available for location: {}", location),
        }
    }

    /// Whether only the affected chart should be skipped
    pub fn is_chart_local(&self) -> bool {
        matches!(self, Self::MissingColumn(_))
    }
}
