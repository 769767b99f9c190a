use crate::error::ClassifierError;
use crate::features::{SuitabilityFeatures, WeatherFeatures};

/// Predicts an encoded weather category from the four weather features
pub trait WeatherClassifier: Send + Sync {
    fn predict_category(&self, features: &WeatherFeatures) -> Result<usize, ClassifierError>;
}

/// Predicts work suitability: 1 = suitable, 0 = not suitable
pub trait SuitabilityClassifier: Send + Sync {
    fn predict_suitability(&self, features: &SuitabilityFeatures) -> Result<usize, ClassifierError>;
}
