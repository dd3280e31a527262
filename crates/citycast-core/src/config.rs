use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `geocoding.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

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
    /// Application configuration directory (history file lives here too)
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub autocomplete: AutocompleteConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the direct geocoding API (`<base>/direct`)
    pub base_url: String,

    /// API key, can also be supplied through `OPENWEATHER_API_KEY`
    #[serde(default)]
    pub api_key: String,

    /// Maximum suggestions returned per query
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/geo/1.0".to_string(),
            api_key: String::new(),
            suggestion_limit: default_suggestion_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the current/forecast API
    pub base_url: String,

    /// Number of forecast entries passed through to the page
    #[serde(default = "default_forecast_entries")]
    pub forecast_entries: usize,
}

fn default_forecast_entries() -> usize {
    8
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            forecast_entries: default_forecast_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    /// Minimum normalized query length before suggestions are requested
    pub min_length: usize,

    /// Quiet period after the last keystroke, in milliseconds
    pub debounce_ms: u64,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_length: 2,
            debounce_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub max_items: usize,
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: 5,
            storage_key: "weatherSearchHistory".to_string(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("citycast")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            server: ServerConfig::default(),
            geocoding: GeocodingConfig::default(),
            weather: WeatherConfig::default(),
            autocomplete: AutocompleteConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the user config dir, creating a default file if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it with defaults if missing.
    /// Environment overrides are applied after reading.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            config
        };

        config.apply_env();
        Ok(config)
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

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.geocoding.api_key = key;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.geocoding.base_url, "geocoding.base_url", &mut result);
        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            result.add_error(
                "server.bind_addr",
                format!("Not a socket address: {}", self.server.bind_addr),
            );
        }

        if self.geocoding.api_key.trim().is_empty() {
            result.add_warning(
                "geocoding.api_key",
                format!("No API key configured; set {} or geocoding.api_key", API_KEY_ENV),
            );
        }

        if self.geocoding.suggestion_limit == 0 {
            result.add_error(
                "geocoding.suggestion_limit",
                "Suggestion limit must be greater than 0",
            );
        }

        if self.geocoding.timeout_secs == 0 {
            result.add_error("geocoding.timeout_secs", "Timeout must be greater than 0");
        }

        if self.weather.forecast_entries == 0 {
            result.add_warning("weather.forecast_entries", "Forecast disabled (0 entries)");
        }

        if self.autocomplete.min_length == 0 {
            result.add_error(
                "autocomplete.min_length",
                "Minimum query length must be greater than 0",
            );
        }

        if self.autocomplete.debounce_ms > 5_000 {
            result.add_warning(
                "autocomplete.debounce_ms",
                "Debounce is unusually long (>5s)",
            );
        }

        if self.history.max_items == 0 {
            result.add_error("history.max_items", "History size must be greater than 0");
        }

        if self.history.storage_key.trim().is_empty() {
            result.add_error("history.storage_key", "Storage key cannot be empty");
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

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("citycast");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_defaults_match_page_behaviour() {
        let config = Config::default();
        assert_eq!(config.autocomplete.min_length, 2);
        assert_eq!(config.autocomplete.debounce_ms, 300);
        assert_eq!(config.geocoding.suggestion_limit, 5);
        assert_eq!(config.history.max_items, 5);
        assert_eq!(config.history.storage_key, "weatherSearchHistory");
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.geocoding.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "geocoding.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_limits_are_errors() {
        let mut config = Config::default();
        config.geocoding.suggestion_limit = 0;
        config.history.max_items = 0;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "geocoding.suggestion_limit"));
        assert!(result.errors.iter().any(|e| e.field == "history.max_items"));
    }

    #[test]
    fn test_bad_bind_addr() {
        let mut config = Config::default();
        config.server.bind_addr = "localhost".to_string();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let mut config = Config::default();
        config.geocoding.api_key.clear();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "geocoding.api_key"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.autocomplete.debounce_ms, 300);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[autocomplete]\nmin_length = 3\ndebounce_ms = 150\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.autocomplete.min_length, 3);
        assert_eq!(config.autocomplete.debounce_ms, 150);
        assert_eq!(config.history.max_items, 5);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
