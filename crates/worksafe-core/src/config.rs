use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `provider.api_key`
pub const API_KEY_ENV: &str = "TOMORROW_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Real-time weather provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Trained classifier artifacts
    #[serde(default)]
    pub models: ModelsConfig,

    /// Historical dataset used for charts
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Cities offered for real-time lookups
    #[serde(default = "default_cities")]
    pub cities: Vec<CityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Tomorrow.io API
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// API key; `TOMORROW_API_KEY` takes precedence when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_base_url() -> String {
    "https://api.tomorrow.io".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// API key with surrounding whitespace removed, `None` when blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Weather category forest (4 features)
    pub weather_model: PathBuf,

    /// Work suitability forest (5 features)
    pub suitability_model: PathBuf,

    /// Category label encoder
    pub label_encoder: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            weather_model: PathBuf::from("models/weather_description_model.json"),
            suitability_model: PathBuf::from("models/weather_model.json"),
            label_encoder: PathBuf::from("models/label_encoder.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// CSV file with historical readings
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    /// Number of rows shown in the "recent data" table
    #[serde(default = "default_recent_rows")]
    pub recent_rows: usize,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/updated_weather_data.csv")
}

fn default_recent_rows() -> usize {
    5
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            recent_rows: default_recent_rows(),
        }
    }
}

/// Named coordinates for the real-time city selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityConfig {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

fn default_cities() -> Vec<CityConfig> {
    vec![
        CityConfig::new("Delhi", 28.6139, 77.2090),
        CityConfig::new("Mumbai", 19.0760, 72.8777),
        CityConfig::new("Agra", 27.1767, 78.0081),
        CityConfig::new("Bangalore", 12.9716, 77.5946),
        CityConfig::new("Shillong", 25.5788, 91.8933),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            models: ModelsConfig::default(),
            dataset: DatasetConfig::default(),
            cities: default_cities(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if it doesn't exist. Applies the API key environment override.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace the configured API key when an override is present and non-blank
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            self.provider.api_key = Some(key);
        }
    }

    /// Cities sorted by name, as presented in the selector
    pub fn sorted_cities(&self) -> Vec<CityConfig> {
        let mut cities = self.cities.clone();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        cities
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.provider.base_url, "provider.base_url", &mut result);

        if self.provider.timeout_secs == 0 {
            result.add_error("provider.timeout_secs", "Timeout must be greater than 0");
        } else if self.provider.timeout_secs > 120 {
            result.add_warning(
                "provider.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if self.provider.api_key().is_none() {
            result.add_warning(
                "provider.api_key",
                format!(
                    "No API key configured (set {}) - real-time weather unavailable",
                    API_KEY_ENV
                ),
            );
        }

        for (field, path) in [
            ("models.weather_model", &self.models.weather_model),
            ("models.suitability_model", &self.models.suitability_model),
            ("models.label_encoder", &self.models.label_encoder),
            ("dataset.path", &self.dataset.path),
        ] {
            if !path.exists() {
                result.add_warning(field, format!("File does not exist: {}", path.display()));
            }
        }

        if self.dataset.recent_rows == 0 {
            result.add_warning("dataset.recent_rows", "Recent data table disabled (0 rows)");
        }

        if self.cities.is_empty() {
            result.add_error("cities", "At least one city must be configured");
        }

        let mut seen = HashSet::new();
        for city in &self.cities {
            if !seen.insert(city.name.as_str()) {
                result.add_error("cities", format!("Duplicate city: {}", city.name));
            }
            if !(-90.0..=90.0).contains(&city.latitude) {
                result.add_error(
                    "cities",
                    format!("Latitude out of range for {}: {}", city.name, city.latitude),
                );
            }
            if !(-180.0..=180.0).contains(&city.longitude) {
                result.add_error(
                    "cities",
                    format!("Longitude out of range for {}: {}", city.name, city.longitude),
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("worksafe");

        Ok(config_dir.join("config.toml"))
    }
}
