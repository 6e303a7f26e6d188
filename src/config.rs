//! Configuration management for the weather reporter
//!
//! Settings come from an optional TOML file, overridden by
//! `WEATHER_REPORT_<SECTION>__<KEY>` environment variables. The provider
//! credentials may also live in a separate `api_data.json` file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ReporterError;
use crate::models::Units;

/// Default settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "weather-report.toml";

/// Largest hourly window a report may show
pub const MAX_HOURLY_POINTS: usize = 48;

/// Largest daily window a report may show
pub const MAX_DAILY_POINTS: usize = 7;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Forecast provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Report window and output settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Forecast provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// One Call endpoint URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Unit system for temperatures and wind
    #[serde(default)]
    pub units: Units,
    /// Language used when a location does not name one
    #[serde(default = "default_language")]
    pub language: String,
    /// JSON file holding `owm_api_url` and `api_key`
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
}

/// Where rendered reports go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Print to standard output
    #[default]
    Console,
    /// Write dated text files
    Files,
}

/// Report window and output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Locations data file
    #[serde(default = "default_locations_file")]
    pub locations_file: String,
    /// Number of hourly points per report
    #[serde(default = "default_hourly_hours")]
    pub hourly_hours: usize,
    /// Number of daily points per report
    #[serde(default = "default_daily_days")]
    pub daily_days: usize,
    /// Locations processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Output destination
    #[serde(default)]
    pub output: OutputMode,
    /// Directory for file output
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP endpoint for span export, disabled when unset
    pub otlp_endpoint: Option<String>,
}

/// Contents of the `api_data.json` credentials file
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredentials {
    #[serde(rename = "owm_api_url")]
    pub api_url: Option<String>,
    pub api_key: String,
}

impl ApiCredentials {
    /// Read a credentials file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid credentials file: {}", path.display()))
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.openweathermap.org/data/3.0/onecall".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_language() -> String {
    "en".to_string()
}

fn default_credentials_file() -> String {
    "api_data.json".to_string()
}

fn default_locations_file() -> String {
    "locations_data.json".to_string()
}

fn default_hourly_hours() -> usize {
    MAX_HOURLY_POINTS
}

fn default_daily_days() -> usize {
    MAX_DAILY_POINTS
}

fn default_concurrency() -> usize {
    1
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            units: Units::default(),
            language: default_language(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locations_file: default_locations_file(),
            hourly_hours: default_hourly_hours(),
            daily_days: default_daily_days(),
            concurrency: default_concurrency(),
            output: OutputMode::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl ReporterConfig {
    /// Load configuration from the specified path.
    ///
    /// A missing settings file is not an error; everything has a default
    /// except the API key, which must come from the file, the environment or
    /// the credentials file.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_file.exists() {
            debug!("Using settings from {}", config_file.display());
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("WEATHER_REPORT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ReporterConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();

        let credentials_path = PathBuf::from(&config.provider.credentials_file);
        if config.provider.api_key.is_none() && credentials_path.exists() {
            let credentials = ApiCredentials::load(&credentials_path)?;
            config.apply_credentials(credentials);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.provider.base_url.is_empty() {
            self.provider.base_url = default_base_url();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_timeout();
        }
        if self.provider.language.is_empty() {
            self.provider.language = default_language();
        }
        if self.report.locations_file.is_empty() {
            self.report.locations_file = default_locations_file();
        }
        if self.report.concurrency == 0 {
            self.report.concurrency = default_concurrency();
        }
        if self.report.output_dir.is_empty() {
            self.report.output_dir = default_output_dir();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Fill the API key, and the endpoint if still the default, from a
    /// credentials file. Values already present in the settings win.
    pub fn apply_credentials(&mut self, credentials: ApiCredentials) {
        if self.provider.api_key.is_none() {
            self.provider.api_key = Some(credentials.api_key);
        }
        if let Some(url) = credentials.api_url {
            if self.provider.base_url == default_base_url() {
                self.provider.base_url = url;
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the API key if one is configured
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.provider.api_key {
            if api_key.trim().is_empty() {
                return Err(ReporterError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(ReporterError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 300 {
            return Err(
                ReporterError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(1..=MAX_HOURLY_POINTS).contains(&self.report.hourly_hours) {
            return Err(ReporterError::config(format!(
                "Hourly window must be between 1 and {MAX_HOURLY_POINTS} hours"
            ))
            .into());
        }

        if !(1..=MAX_DAILY_POINTS).contains(&self.report.daily_days) {
            return Err(ReporterError::config(format!(
                "Daily window must be between 1 and {MAX_DAILY_POINTS} days"
            ))
            .into());
        }

        if self.report.concurrency > 16 {
            return Err(ReporterError::config("Concurrency cannot exceed 16 locations").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ReporterError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ReporterError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(ReporterError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ReporterConfig::default();
        assert_eq!(
            config.provider.base_url,
            "https://api.openweathermap.org/data/3.0/onecall"
        );
        assert_eq!(config.provider.timeout_seconds, 30);
        assert_eq!(config.provider.units, Units::Metric);
        assert_eq!(config.report.hourly_hours, 48);
        assert_eq!(config.report.daily_days, 7);
        assert_eq!(config.report.concurrency, 1);
        assert_eq!(config.report.output, OutputMode::Console);
        assert_eq!(config.logging.level, "info");
        assert!(config.provider.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ReporterConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = ReporterConfig::default();
        config.provider.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_windows_cannot_exceed_limits() {
        let mut config = ReporterConfig::default();
        config.report.hourly_hours = 49;
        assert!(config.validate().unwrap_err().to_string().contains("Hourly window"));

        let mut config = ReporterConfig::default();
        config.report.daily_days = 8;
        assert!(config.validate().unwrap_err().to_string().contains("Daily window"));

        let mut config = ReporterConfig::default();
        config.report.daily_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = ReporterConfig::default();
        config.provider.api_key = Some("  ".to_string());
        assert!(config.validate_api_key().is_err());
    }

    #[test]
    fn test_apply_credentials_fills_missing_values() {
        let mut config = ReporterConfig::default();
        config.apply_credentials(ApiCredentials {
            api_url: Some("https://api.openweathermap.org/data/2.5/onecall".to_string()),
            api_key: "0123456789abcdef".to_string(),
        });
        assert_eq!(config.provider.api_key.as_deref(), Some("0123456789abcdef"));
        assert_eq!(
            config.provider.base_url,
            "https://api.openweathermap.org/data/2.5/onecall"
        );
    }

    #[test]
    fn test_apply_credentials_keeps_explicit_settings() {
        let mut config = ReporterConfig::default();
        config.provider.api_key = Some("from-settings".to_string());
        config.provider.base_url = "http://localhost:9000/onecall".to_string();
        config.apply_credentials(ApiCredentials {
            api_url: Some("https://example.org/onecall".to_string()),
            api_key: "from-file".to_string(),
        });
        assert_eq!(config.provider.api_key.as_deref(), Some("from-settings"));
        assert_eq!(config.provider.base_url, "http://localhost:9000/onecall");
    }

    #[test]
    fn test_credentials_file_parsing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"owm_api_url": "https://api.openweathermap.org/data/3.0/onecall", "api_key": "abc123"}}"#
        )
        .unwrap();

        let credentials = ApiCredentials::load(file.path()).unwrap();
        assert_eq!(credentials.api_key, "abc123");
        assert!(credentials.api_url.is_some());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather-report.toml");
        std::fs::write(
            &path,
            r#"
[provider]
api_key = "toml-key-123"
units = "imperial"

[report]
hourly_hours = 24
output = "files"
output_dir = "reports"

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = ReporterConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.provider.api_key.as_deref(), Some("toml-key-123"));
        assert_eq!(config.provider.units, Units::Imperial);
        assert_eq!(config.report.hourly_hours, 24);
        assert_eq!(config.report.daily_days, 7);
        assert_eq!(config.report.output, OutputMode::Files);
        assert_eq!(config.report.output_dir, "reports");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_toml_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather-report.toml");
        std::fs::write(&path, "[report]\ndaily_days = 10\n").unwrap();

        let err = ReporterConfig::load_from_path(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Daily window"));
    }
}
