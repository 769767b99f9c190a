use serde::{Deserialize, Serialize};
use worksafe_core::NetworkError;

/// Inclusive slider bounds and default for one reading field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl SliderRange {
    pub const TEMPERATURE: Self = Self { min: -20.0, max: 50.0, default: 25.0 };
    pub const HUMIDITY: Self = Self { min: 0.0, max: 100.0, default: 50.0 };
    pub const PRECIPITATION: Self = Self { min: 0.0, max: 100.0, default: 10.0 };
    pub const WIND_SPEED: Self = Self { min: 0.0, max: 100.0, default: 20.0 };

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// A single set of weather observations.
///
/// Values are taken as-is; nothing here rejects out-of-range numbers such as
/// negative precipitation from a malformed payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    #[serde(rename = "Temperature_C")]
    pub temperature_c: f64,
    #[serde(rename = "Humidity_pct")]
    pub humidity_pct: f64,
    #[serde(rename = "Precipitation_mm")]
    pub precipitation_mm: f64,
    #[serde(rename = "Wind_Speed_kmh")]
    pub wind_speed_kmh: f64,
}

impl WeatherReading {
    pub fn new(
        temperature_c: f64,
        humidity_pct: f64,
        precipitation_mm: f64,
        wind_speed_kmh: f64,
    ) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            precipitation_mm,
            wind_speed_kmh,
        }
    }

    /// Copy of this reading with every field pulled into its slider range.
    /// Only meant for seeding UI controls.
    pub fn clamped_to_sliders(&self) -> Self {
        Self {
            temperature_c: SliderRange::TEMPERATURE.clamp(self.temperature_c),
            humidity_pct: SliderRange::HUMIDITY.clamp(self.humidity_pct),
            precipitation_mm: SliderRange::PRECIPITATION.clamp(self.precipitation_mm),
            wind_speed_kmh: SliderRange::WIND_SPEED.clamp(self.wind_speed_kmh),
        }
    }
}

impl Default for WeatherReading {
    /// The slider defaults
    fn default() -> Self {
        Self::new(
            SliderRange::TEMPERATURE.default,
            SliderRange::HUMIDITY.default,
            SliderRange::PRECIPITATION.default,
            SliderRange::WIND_SPEED.default,
        )
    }
}

/// Why the provider could not produce a reading
#[derive(Debug, thiserror::Error)]
pub enum DataUnavailable {
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("incomplete weather data: {0}")]
    Incomplete(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Weather data unavailable: {0}")]
    DataUnavailable(#[from] DataUnavailable),
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Weather API key is not configured")]
    MissingApiKey,
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ProviderError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderError::DataUnavailable(DataUnavailable::Status { .. }) => {
                "Failed to fetch weather data. Please try again later."
            }
            ProviderError::DataUnavailable(DataUnavailable::Incomplete(_)) => {
                "Incomplete weather data received."
            }
            ProviderError::Network(e) => e.user_message(),
            ProviderError::MissingApiKey => "Weather API key is missing. Check settings.",
            ProviderError::Client(_) => "Weather service could not be started.",
        }
    }

    /// True for failures reported by the provider itself rather than transport
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, ProviderError::DataUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_uses_dataset_column_names() {
        let reading = WeatherReading::new(25.0, 50.0, 5.0, 20.0);
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(json["Temperature_C"], 25.0);
        assert_eq!(json["Humidity_pct"], 50.0);
        assert_eq!(json["Precipitation_mm"], 5.0);
        assert_eq!(json["Wind_Speed_kmh"], 20.0);
    }

    #[test]
    fn test_default_reading_matches_sliders() {
        assert_eq!(WeatherReading::default(), WeatherReading::new(25.0, 50.0, 10.0, 20.0));
    }

    #[test]
    fn test_clamped_to_sliders() {
        let wild = WeatherReading::new(60.0, -5.0, -1.0, 250.0);
        assert_eq!(
            wild.clamped_to_sliders(),
            WeatherReading::new(50.0, 0.0, 0.0, 100.0)
        );
    }

    #[test]
    fn test_provider_error_messages() {
        let err: ProviderError = DataUnavailable::Status {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert!(err.is_data_unavailable());
        assert!(err.to_string().contains("500"));
        assert!(err.user_message().contains("Failed to fetch"));

        assert!(!ProviderError::MissingApiKey.is_data_unavailable());
    }
}
