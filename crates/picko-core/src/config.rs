use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use picko_outfit::client::{DEFAULT_API_URL, DEFAULT_MAX_TOKENS};
use picko_weather::geocode::NOMINATIM_URL;
use picko_weather::provider::OPEN_METEO_URL;
use picko_weather::Coordinates;

/// Environment variable overriding `generation.api_url`
pub const API_URL_ENV: &str = "PICKO_API_URL";
/// Environment variable overriding `generation.project_id`
pub const PROJECT_ID_ENV: &str = "PICKO_PROJECT_ID";

const DEFAULT_PROJECT_ID: &str = "70f2e5c3-28e1-4e0a-88de-548110d8b628";

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

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
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
    /// Directory holding config.toml and the local database
    pub config_dir: PathBuf,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Text-generation API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub api_url: String,
    pub project_id: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_generation_timeout() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Forecast and geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub forecast_url: String,
    pub geocode_url: String,
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
    /// Used when no coordinates are given on the command line
    pub default_latitude: Option<f64>,
    pub default_longitude: Option<f64>,
}

fn default_weather_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: OPEN_METEO_URL.to_string(),
            geocode_url: NOMINATIM_URL.to_string(),
            timeout_secs: default_weather_timeout(),
            default_latitude: None,
            default_longitude: None,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured fallback location, if both halves are set
    pub fn default_location(&self) -> Option<Coordinates> {
        match (self.default_latitude, self.default_longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Recommendation cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_ttl_hours() -> u32 {
    12
}

fn default_database_file() -> String {
    "picko.db".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            database_file: default_database_file(),
        }
    }
}

impl CacheConfig {
    pub fn ttl_ms(&self) -> i64 {
        i64::from(self.ttl_hours) * 60 * 60 * 1000
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("picko");

        Self {
            config_dir,
            generation: GenerationConfig::default(),
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Override generation settings from the environment. `lookup` is
    /// `std::env::var` outside of tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Using {} from environment", API_URL_ENV);
            self.generation.api_url = url;
        }
        if let Some(project_id) = lookup(PROJECT_ID_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Using {} from environment", PROJECT_ID_ENV);
            self.generation.project_id = project_id;
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.generation.api_url, "generation.api_url", &mut result);
        self.validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);
        self.validate_url(&self.weather.geocode_url, "weather.geocode_url", &mut result);

        if self.generation.project_id.trim().is_empty() {
            result.add_error("generation.project_id", "Project ID must not be empty");
        }

        if self.generation.max_tokens == 0 {
            result.add_error("generation.max_tokens", "max_tokens must be greater than 0");
        }

        if self.generation.timeout_secs == 0 {
            result.add_warning("generation.timeout_secs", "No request timeout (0 seconds)");
        }

        match (self.weather.default_latitude, self.weather.default_longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error(
                        "weather.default_latitude",
                        "Latitude must be between -90 and 90",
                    );
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error(
                        "weather.default_longitude",
                        "Longitude must be between -180 and 180",
                    );
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                result.add_warning(
                    "weather",
                    "Only one of default_latitude/default_longitude is set, ignoring it",
                );
            }
            (None, None) => {}
        }

        if self.cache.ttl_hours == 0 {
            result.add_warning("cache.ttl_hours", "Recommendation cache disabled (0 hours)");
        }

        if self.cache.database_file.trim().is_empty() {
            result.add_error("cache.database_file", "Database file name must not be empty");
        }

        result
    }

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

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the SQLite database backing the cache and preferences
    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join(&self.cache.database_file)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("picko");

        Ok(config_dir.join("config.toml"))
    }
}
