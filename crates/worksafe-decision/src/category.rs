use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{read_json, ClassifierError, ModelLoadError};

/// Category labels (lower-cased) that always force the safety override
pub const HARSH_CATEGORIES: [&str; 4] = ["heavy rainfall", "flood", "storm", "cyclone"];

/// Canonical labels produced by [`group_description`]
pub const CLEAR: &str = "Clear";
pub const CLOUDY: &str = "Cloudy";
pub const MODERATE_RAINFALL: &str = "Moderate Rainfall";
pub const HEAVY_RAINFALL: &str = "Heavy Rainfall";
pub const STORM: &str = "Storm";

/// A decoded weather category.
///
/// Carries the human-readable label and the index the classifiers use for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCategory {
    label: String,
    code: usize,
}

impl WeatherCategory {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn code(&self) -> usize {
        self.code
    }

    /// Whether this category alone makes conditions too harsh for work
    pub fn is_harsh(&self) -> bool {
        let lower = self.label.to_lowercase();
        HARSH_CATEGORIES.contains(&lower.as_str())
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Maps category indices to labels and back.
///
/// Classes are kept sorted so index `i` is the i-th label alphabetically,
/// matching how the classifiers were trained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncoderFile")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

#[derive(Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

impl TryFrom<EncoderFile> for LabelEncoder {
    type Error = String;

    fn try_from(file: EncoderFile) -> Result<Self, Self::Error> {
        if file.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        Ok(Self::new(file.classes))
    }
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Load an encoder exported as `{"classes": [...]}`
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let encoder: Self = read_json(path)?;
        tracing::debug!(
            "Loaded label encoder with {} classes from {}",
            encoder.classes.len(),
            path.display()
        );
        Ok(encoder)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn decode(&self, code: usize) -> Result<WeatherCategory, ClassifierError> {
        self.classes
            .get(code)
            .map(|label| WeatherCategory {
                label: label.clone(),
                code,
            })
            .ok_or(ClassifierError::UnknownCategory(code))
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }
}

impl Default for LabelEncoder {
    /// The grouped categories the bundled models are trained on
    fn default() -> Self {
        Self::new([CLEAR, CLOUDY, HEAVY_RAINFALL, MODERATE_RAINFALL, STORM])
    }
}

/// Collapse a free-text weather description into one of the canonical
/// categories. Keyword groups are checked in order, so "heavy thunderstorm"
/// is Heavy Rainfall.
pub fn group_description(description: &str) -> &'static str {
    let desc = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| desc.contains(w));

    if has(&["clear", "sunny", "fair"]) {
        CLEAR
    } else if has(&["moderate", "showers"]) {
        MODERATE_RAINFALL
    } else if has(&["heavy", "flood"]) {
        HEAVY_RAINFALL
    } else if has(&["storm", "cyclone", "thunder"]) {
        STORM
    } else {
        CLOUDY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoder_is_sorted() {
        let encoder = LabelEncoder::default();
        assert_eq!(
            encoder.classes(),
            &["Clear", "Cloudy", "Heavy Rainfall", "Moderate Rainfall", "Storm"]
        );
        assert_eq!(encoder.encode("Clear"), Some(0));
        assert_eq!(encoder.encode("Storm"), Some(4));
        assert_eq!(encoder.encode("Hail"), None);
    }

    #[test]
    fn test_decode_unknown_index() {
        let encoder = LabelEncoder::default();
        assert_eq!(encoder.decode(2).unwrap().label(), "Heavy Rainfall");
        assert!(matches!(
            encoder.decode(9),
            Err(ClassifierError::UnknownCategory(9))
        ));
    }

    #[test]
    fn test_harsh_categories_ignore_case() {
        let encoder = LabelEncoder::new(["HEAVY RAINFALL", "Cyclone", "Clear", "flood"]);
        let harsh: Vec<bool> = (0..encoder.len())
            .map(|i| encoder.decode(i).unwrap().is_harsh())
            .collect();
        // sorted: "Clear", "Cyclone", "HEAVY RAINFALL", "flood"
        assert_eq!(harsh, vec![false, true, true, true]);
    }

    #[test]
    fn test_moderate_rainfall_is_not_harsh() {
        let encoder = LabelEncoder::default();
        let code = encoder.encode(MODERATE_RAINFALL).unwrap();
        assert!(!encoder.decode(code).unwrap().is_harsh());
    }

    #[test]
    fn test_group_description_keywords() {
        assert_eq!(group_description("Mostly Sunny"), CLEAR);
        assert_eq!(group_description("Fair"), CLEAR);
        assert_eq!(group_description("Light showers"), MODERATE_RAINFALL);
        assert_eq!(group_description("Flooding likely"), HEAVY_RAINFALL);
        assert_eq!(group_description("Thunderstorm"), STORM);
        assert_eq!(group_description("Cyclone warning"), STORM);
        assert_eq!(group_description("Overcast"), CLOUDY);
        assert_eq!(group_description(""), CLOUDY);
    }

    #[test]
    fn test_group_description_order_matters() {
        assert_eq!(group_description("Heavy thunderstorm"), HEAVY_RAINFALL);
        assert_eq!(group_description("Clear after storm"), CLEAR);
    }

    #[test]
    fn test_load_encoder_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoder.json");
        std::fs::write(&path, r#"{"classes": ["Storm", "Clear", "Cloudy"]}"#).unwrap();

        let encoder = LabelEncoder::load(&path).unwrap();
        assert_eq!(encoder.classes(), &["Clear", "Cloudy", "Storm"]);
    }

    #[test]
    fn test_load_empty_encoder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoder.json");
        std::fs::write(&path, r#"{"classes": []}"#).unwrap();

        assert!(matches!(
            LabelEncoder::load(&path),
            Err(ModelLoadError::Parse { .. })
        ));
    }
}
