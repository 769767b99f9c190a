//! Decision engine: category classification, safety override, suitability.

use serde::{Deserialize, Serialize};
use worksafe_weather::WeatherReading;

use crate::category::{LabelEncoder, WeatherCategory};
use crate::classifier::{SuitabilityClassifier, WeatherClassifier};
use crate::error::ClassifierError;
use crate::features::WeatherFeatures;

/// Below this temperature (°C) work is never suitable
pub const MIN_TEMPERATURE_C: f64 = 5.0;
/// Above this temperature (°C) work is never suitable
pub const MAX_TEMPERATURE_C: f64 = 40.0;
/// Above this precipitation (mm) work is never suitable
pub const MAX_PRECIPITATION_MM: f64 = 8.0;
/// Above this wind speed (km/h) work is never suitable
pub const MAX_WIND_SPEED_KMH: f64 = 30.0;

/// Where a reading came from; selects the session flag an evaluation writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationPath {
    Manual,
    RealTime,
}

impl EvaluationPath {
    pub fn other(self) -> Self {
        match self {
            Self::Manual => Self::RealTime,
            Self::RealTime => Self::Manual,
        }
    }
}

impl std::fmt::Display for EvaluationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::RealTime => f.write_str("real-time"),
        }
    }
}

/// Last strictness outcome of each path in the current session.
/// `None` means the path has not run yet and reads as not strict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    pub manual_strict: Option<bool>,
    pub realtime_strict: Option<bool>,
}

impl SessionFlags {
    pub fn get(&self, path: EvaluationPath) -> Option<bool> {
        match path {
            EvaluationPath::Manual => self.manual_strict,
            EvaluationPath::RealTime => self.realtime_strict,
        }
    }

    pub fn is_strict(&self, path: EvaluationPath) -> bool {
        self.get(path).unwrap_or(false)
    }

    #[must_use]
    pub fn with(mut self, path: EvaluationPath, strict: bool) -> Self {
        match path {
            EvaluationPath::Manual => self.manual_strict = Some(strict),
            EvaluationPath::RealTime => self.realtime_strict = Some(strict),
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    Suitable,
    NotSuitable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    RuleOverride,
    ModelPrediction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitabilityVerdict {
    pub suitability: Suitability,
    pub provenance: Provenance,
}

impl SuitabilityVerdict {
    pub fn is_suitable(&self) -> bool {
        self.suitability == Suitability::Suitable
    }
}

/// Outcome of one evaluation, including the updated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub path: EvaluationPath,
    pub category: WeatherCategory,
    pub strict: bool,
    pub verdict: SuitabilityVerdict,
    /// Both this path and the other path's last run were strict
    pub alert_triggered: bool,
    pub session: SessionFlags,
}

/// The safety override: any single condition forces "not suitable".
/// Boundary values (5, 40, 8, 30) do not trigger it.
pub fn is_strict(reading: &WeatherReading, category: &WeatherCategory) -> bool {
    reading.temperature_c < MIN_TEMPERATURE_C
        || reading.temperature_c > MAX_TEMPERATURE_C
        || reading.precipitation_mm > MAX_PRECIPITATION_MM
        || reading.wind_speed_kmh > MAX_WIND_SPEED_KMH
        || category.is_harsh()
}

/// Runs the shared decision pipeline for both manual and real-time readings
pub struct DecisionEngine {
    weather: Box<dyn WeatherClassifier>,
    suitability: Box<dyn SuitabilityClassifier>,
    encoder: LabelEncoder,
}

impl DecisionEngine {
    pub fn new(
        weather: Box<dyn WeatherClassifier>,
        suitability: Box<dyn SuitabilityClassifier>,
        encoder: LabelEncoder,
    ) -> Self {
        Self {
            weather,
            suitability,
            encoder,
        }
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Classify the reading's weather category
    pub fn classify(&self, reading: &WeatherReading) -> Result<WeatherCategory, ClassifierError> {
        let features = WeatherFeatures::from(reading);
        tracing::debug!("Classifying weather features {:?}", features.as_slice());
        let code = self.weather.predict_category(&features)?;
        self.encoder.decode(code)
    }

    /// Evaluate a reading on the given path.
    ///
    /// The returned evaluation carries `session` with this path's flag
    /// replaced. On error nothing is returned, so the caller's session
    /// stays as it was.
    pub fn evaluate(
        &self,
        reading: &WeatherReading,
        path: EvaluationPath,
        session: SessionFlags,
    ) -> Result<Evaluation, ClassifierError> {
        let features = WeatherFeatures::from(reading);
        let category = self.classify(reading)?;
        let strict = is_strict(reading, &category);

        let verdict = if strict {
            tracing::warn!(
                "Harsh conditions on {} path ({}), work not suitable by rule override",
                path,
                category
            );
            SuitabilityVerdict {
                suitability: Suitability::NotSuitable,
                provenance: Provenance::RuleOverride,
            }
        } else {
            let input = features.with_category(category.code());
            tracing::debug!("Scoring suitability features {:?}", input.as_slice());
            let suitability = match self.suitability.predict_suitability(&input)? {
                1 => Suitability::Suitable,
                0 => Suitability::NotSuitable,
                other => return Err(ClassifierError::InvalidPrediction(other)),
            };
            SuitabilityVerdict {
                suitability,
                provenance: Provenance::ModelPrediction,
            }
        };

        let session = session.with(path, strict);
        let alert_triggered = strict && session.is_strict(path.other());
        if alert_triggered {
            tracing::warn!("Harsh weather detected on both manual and real-time paths");
        }

        tracing::info!(
            "Evaluated {} reading: {} -> {:?} ({:?})",
            path,
            category,
            verdict.suitability,
            verdict.provenance
        );

        Ok(Evaluation {
            path,
            category,
            strict,
            verdict,
            alert_triggered,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SuitabilityFeatures;
    use std::sync::{Arc, Mutex};

    /// Always predicts the same category index
    struct FixedCategory(usize);

    impl WeatherClassifier for FixedCategory {
        fn predict_category(&self, _: &WeatherFeatures) -> Result<usize, ClassifierError> {
            Ok(self.0)
        }
    }

    /// Records every input and answers with a fixed label
    struct Recorder {
        answer: usize,
        calls: Arc<Mutex<Vec<SuitabilityFeatures>>>,
    }

    impl SuitabilityClassifier for Recorder {
        fn predict_suitability(&self, f: &SuitabilityFeatures) -> Result<usize, ClassifierError> {
            self.calls.lock().unwrap().push(*f);
            Ok(self.answer)
        }
    }

    struct Failing;

    impl WeatherClassifier for Failing {
        fn predict_category(&self, _: &WeatherFeatures) -> Result<usize, ClassifierError> {
            Err(ClassifierError::Model("broken".into()))
        }
    }

    fn engine(category: &str, answer: usize) -> (DecisionEngine, Arc<Mutex<Vec<SuitabilityFeatures>>>) {
        let encoder = LabelEncoder::default();
        let code = encoder.encode(category).unwrap();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let engine = DecisionEngine::new(
            Box::new(FixedCategory(code)),
            Box::new(Recorder {
                answer,
                calls: calls.clone(),
            }),
            encoder,
        );
        (engine, calls)
    }

    #[test]
    fn test_heavy_precipitation_overrides() {
        let (engine, calls) = engine("Clear", 1);
        let reading = WeatherReading::new(25.0, 50.0, 10.0, 20.0);

        let eval = engine
            .evaluate(&reading, EvaluationPath::Manual, SessionFlags::default())
            .unwrap();

        assert!(eval.strict);
        assert_eq!(eval.verdict.suitability, Suitability::NotSuitable);
        assert_eq!(eval.verdict.provenance, Provenance::RuleOverride);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_mild_reading_invokes_model_with_category() {
        let (engine, calls) = engine("Clear", 1);
        let reading = WeatherReading::new(25.0, 50.0, 5.0, 20.0);

        let eval = engine
            .evaluate(&reading, EvaluationPath::Manual, SessionFlags::default())
            .unwrap();

        assert!(!eval.strict);
        assert_eq!(eval.category.label(), "Clear");
        assert_eq!(eval.verdict.suitability, Suitability::Suitable);
        assert_eq!(eval.verdict.provenance, Provenance::ModelPrediction);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let clear = engine.encoder().encode("Clear").unwrap() as f64;
        assert_eq!(calls[0].as_slice(), &[25.0, 50.0, 5.0, 20.0, clear]);
    }

    #[test]
    fn test_model_can_say_not_suitable() {
        let (engine, _) = engine("Cloudy", 0);
        let eval = engine
            .evaluate(
                &WeatherReading::new(20.0, 90.0, 2.0, 10.0),
                EvaluationPath::RealTime,
                SessionFlags::default(),
            )
            .unwrap();
        assert_eq!(
            eval.verdict,
            SuitabilityVerdict {
                suitability: Suitability::NotSuitable,
                provenance: Provenance::ModelPrediction,
            }
        );
    }

    #[test]
    fn test_temperature_extremes_override() {
        let (engine, calls) = engine("Clear", 1);
        for temperature in [-20.0, 4.9, 40.1, 50.0] {
            let eval = engine
                .evaluate(
                    &WeatherReading::new(temperature, 50.0, 0.0, 0.0),
                    EvaluationPath::Manual,
                    SessionFlags::default(),
                )
                .unwrap();
            assert!(eval.strict, "{} °C should be strict", temperature);
            assert_eq!(eval.verdict.provenance, Provenance::RuleOverride);
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_boundaries_are_not_strict() {
        let clear = LabelEncoder::default().decode(0).unwrap();
        assert!(!is_strict(&WeatherReading::new(5.0, 50.0, 8.0, 30.0), &clear));
        assert!(!is_strict(&WeatherReading::new(40.0, 50.0, 8.0, 30.0), &clear));
        assert!(is_strict(&WeatherReading::new(25.0, 50.0, 8.01, 0.0), &clear));
        assert!(is_strict(&WeatherReading::new(25.0, 50.0, 0.0, 30.5), &clear));
    }

    #[test]
    fn test_harsh_category_overrides() {
        for label in ["Heavy Rainfall", "Storm"] {
            let (engine, calls) = engine(label, 1);
            let eval = engine
                .evaluate(
                    &WeatherReading::new(25.0, 50.0, 1.0, 5.0),
                    EvaluationPath::Manual,
                    SessionFlags::default(),
                )
                .unwrap();
            assert!(eval.strict, "{} should be strict", label);
            assert!(calls.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn test_session_flag_written_for_path() {
        let (engine, _) = engine("Clear", 1);
        let harsh = WeatherReading::new(45.0, 50.0, 0.0, 0.0);
        let mild = WeatherReading::new(25.0, 50.0, 0.0, 0.0);

        let eval = engine
            .evaluate(&harsh, EvaluationPath::RealTime, SessionFlags::default())
            .unwrap();
        assert_eq!(eval.session.realtime_strict, Some(true));
        assert_eq!(eval.session.manual_strict, None);

        let eval = engine
            .evaluate(&mild, EvaluationPath::RealTime, eval.session)
            .unwrap();
        assert_eq!(eval.session.realtime_strict, Some(false));
    }

    #[test]
    fn test_alert_when_both_paths_strict() {
        let (engine, _) = engine("Clear", 1);
        let harsh = WeatherReading::new(2.0, 50.0, 0.0, 0.0);

        let first = engine
            .evaluate(&harsh, EvaluationPath::Manual, SessionFlags::default())
            .unwrap();
        assert!(!first.alert_triggered);

        let second = engine
            .evaluate(&harsh, EvaluationPath::RealTime, first.session)
            .unwrap();
        assert!(second.alert_triggered);
    }

    #[test]
    fn test_no_alert_when_other_path_not_strict() {
        let (engine, _) = engine("Clear", 1);
        let harsh = WeatherReading::new(2.0, 50.0, 0.0, 0.0);

        let session = SessionFlags::default().with(EvaluationPath::Manual, false);
        let eval = engine
            .evaluate(&harsh, EvaluationPath::RealTime, session)
            .unwrap();
        assert!(eval.strict);
        assert!(!eval.alert_triggered);
    }

    #[test]
    fn test_no_alert_when_current_path_not_strict() {
        let (engine, _) = engine("Clear", 1);
        let session = SessionFlags::default().with(EvaluationPath::RealTime, true);
        let eval = engine
            .evaluate(
                &WeatherReading::new(25.0, 50.0, 0.0, 0.0),
                EvaluationPath::Manual,
                session,
            )
            .unwrap();
        assert!(!eval.alert_triggered);
        assert_eq!(eval.session.realtime_strict, Some(true));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let (engine, _) = engine("Cloudy", 1);
        let reading = WeatherReading::new(18.0, 70.0, 3.0, 12.0);

        let a = engine
            .evaluate(&reading, EvaluationPath::Manual, SessionFlags::default())
            .unwrap();
        let b = engine
            .evaluate(&reading, EvaluationPath::Manual, SessionFlags::default())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_classifier_failure_propagates() {
        let (_, calls) = engine("Clear", 1);
        let engine = DecisionEngine::new(
            Box::new(Failing),
            Box::new(Recorder { answer: 1, calls }),
            LabelEncoder::default(),
        );
        let result = engine.evaluate(
            &WeatherReading::default(),
            EvaluationPath::Manual,
            SessionFlags::default(),
        );
        assert!(matches!(result, Err(ClassifierError::Model(_))));
    }

    #[test]
    fn test_invalid_suitability_output() {
        let (engine, _) = engine("Clear", 7);
        let result = engine.evaluate(
            &WeatherReading::new(25.0, 50.0, 0.0, 0.0),
            EvaluationPath::Manual,
            SessionFlags::default(),
        );
        assert!(matches!(result, Err(ClassifierError::InvalidPrediction(7))));
    }

    #[test]
    fn test_unknown_category_index() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let engine = DecisionEngine::new(
            Box::new(FixedCategory(42)),
            Box::new(Recorder { answer: 1, calls }),
            LabelEncoder::default(),
        );
        let result = engine.evaluate(
            &WeatherReading::default(),
            EvaluationPath::Manual,
            SessionFlags::default(),
        );
        assert!(matches!(result, Err(ClassifierError::UnknownCategory(42))));
    }
}
