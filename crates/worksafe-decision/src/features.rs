//! Fixed-shape feature vectors fed to the classifiers.

use worksafe_weather::WeatherReading;

/// [temperature, humidity, precipitation, wind], in that order.
///
/// Values are copied unchanged from the reading; no range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherFeatures([f64; 4]);

impl WeatherFeatures {
    pub const LEN: usize = 4;

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Append the encoded weather category for the suitability classifier
    pub fn with_category(&self, code: usize) -> SuitabilityFeatures {
        let [t, h, p, w] = self.0;
        SuitabilityFeatures([t, h, p, w, code as f64])
    }
}

impl From<&WeatherReading> for WeatherFeatures {
    fn from(reading: &WeatherReading) -> Self {
        Self([
            reading.temperature_c,
            reading.humidity_pct,
            reading.precipitation_mm,
            reading.wind_speed_kmh,
        ])
    }
}

/// The four weather features followed by the encoded category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuitabilityFeatures([f64; 5]);

impl SuitabilityFeatures {
    pub const LEN: usize = 5;

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
