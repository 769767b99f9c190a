//! Work-suitability decision pipeline.
//!
//! A reading is normalized into features, classified into a weather
//! category, checked against the safety override rules and, when no rule
//! fires, scored by the suitability classifier.

pub mod category;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod features;
pub mod forest;

pub use category::{group_description, LabelEncoder, WeatherCategory, HARSH_CATEGORIES};
pub use classifier::{SuitabilityClassifier, WeatherClassifier};
pub use engine::{
    is_strict, DecisionEngine, Evaluation, EvaluationPath, Provenance, SessionFlags,
    Suitability, SuitabilityVerdict,
};
pub use error::{ClassifierError, ModelLoadError};
pub use features::{SuitabilityFeatures, WeatherFeatures};
pub use forest::ForestModel;
