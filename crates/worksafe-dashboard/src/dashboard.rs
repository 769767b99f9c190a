use serde::Serialize;
use worksafe_core::{CityConfig, Config, ConfigError, ModelsConfig};
use worksafe_decision::{
    DecisionEngine, Evaluation, EvaluationPath, ForestModel, LabelEncoder, SessionFlags,
};
use worksafe_weather::{TomorrowClient, WeatherReading};

use crate::error::AppError;

/// Load both forests and the label encoder named in the config
pub fn load_engine(models: &ModelsConfig) -> Result<DecisionEngine, AppError> {
    let weather = ForestModel::load(&models.weather_model)?;
    let suitability = ForestModel::load(&models.suitability_model)?;
    let encoder = LabelEncoder::load(&models.label_encoder)?;

    if weather.n_classes() > encoder.len() {
        tracing::warn!(
            "Weather model has {} classes but the encoder knows {}",
            weather.n_classes(),
            encoder.len()
        );
    }

    Ok(DecisionEngine::new(
        Box::new(weather),
        Box::new(suitability),
        encoder,
    ))
}

/// A real-time evaluation together with the reading it was based on
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeOutcome {
    pub city: String,
    pub reading: WeatherReading,
    pub evaluation: Evaluation,
}

/// One user's dashboard session.
///
/// Holds the session flags between interactions; each `predict_*` call is
/// one interaction and replaces only its own path's flag.
pub struct Dashboard {
    engine: DecisionEngine,
    provider: TomorrowClient,
    cities: Vec<CityConfig>,
    flags: SessionFlags,
}

impl Dashboard {
    pub fn new(engine: DecisionEngine, provider: TomorrowClient, mut cities: Vec<CityConfig>) -> Self {
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            engine,
            provider,
            cities,
            flags: SessionFlags::default(),
        }
    }

    /// Build a session from configuration, loading models from disk
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        if config.cities.is_empty() {
            return Err(ConfigError::MissingSetting("cities".to_string()).into());
        }
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        let engine = load_engine(&config.models)?;
        let provider = TomorrowClient::from_config(&config.provider)?;
        if !provider.has_api_key() {
            tracing::warn!("No weather API key configured; real-time predictions will fail");
        }

        Ok(Self::new(engine, provider, config.cities.clone()))
    }

    /// Cities available for real-time lookups, sorted by name
    pub fn cities(&self) -> &[CityConfig] {
        &self.cities
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    /// Evaluate slider input
    pub fn predict_manual(&mut self, reading: WeatherReading) -> Result<Evaluation, AppError> {
        self.evaluate(&reading, EvaluationPath::Manual)
    }

    /// Fetch current weather for `city` and evaluate it.
    ///
    /// A failed fetch aborts before evaluation, leaving the session flags
    /// untouched.
    pub async fn predict_realtime(&mut self, city: &str) -> Result<RealtimeOutcome, AppError> {
        let coords = self
            .cities
            .iter()
            .find(|c| c.name == city)
            .ok_or_else(|| AppError::UnknownCity(city.to_string()))?;
        let name = coords.name.clone();

        let reading = self
            .provider
            .current(coords.latitude, coords.longitude)
            .await
            .map_err(|e| {
                tracing::error!("Real-time weather for {} unavailable: {}", name, e);
                AppError::Weather(e)
            })?;

        let evaluation = self.evaluate(&reading, EvaluationPath::RealTime)?;
        Ok(RealtimeOutcome {
            city: name,
            reading,
            evaluation,
        })
    }

    fn evaluate(
        &mut self,
        reading: &WeatherReading,
        path: EvaluationPath,
    ) -> Result<Evaluation, AppError> {
        let evaluation = self.engine.evaluate(reading, path, self.flags)?;
        self.flags = evaluation.session;
        Ok(evaluation)
    }
}
