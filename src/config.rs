//! Configuration management for the trip planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripPlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the trip planner
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripPlannerConfig {
    /// Attraction dataset
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Embedding provider
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Itinerary planning knobs
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Summary and tips generation
    #[serde(default)]
    pub narrator: NarratorConfig,
    /// Preferences read from free-text notes
    #[serde(default)]
    pub extractor: ExtractorConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the attraction CSV file
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

/// Which embedder produces vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Local feature-hashing embedder, no network access
    #[default]
    Hashing,
    /// OpenAI-compatible `/v1/embeddings` endpoint
    Http,
}

/// Embedding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,
    /// Vector length (hashing provider) or expected length (http provider)
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: u32,
    /// Base URL of the embedding service
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// API key for the embedding service
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Itinerary planning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Minimum number of attractions retrieved per request
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Longest trip accepted
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    /// Hours of sightseeing per day
    #[serde(default = "default_daily_hour_cap")]
    pub daily_hour_cap: f32,
    /// Currency label shown next to amounts
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Re-score retrieved attractions by interests, group and budget
    #[serde(default = "default_true")]
    pub preference_rerank: bool,
}

/// Which narrator writes the summary and tips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NarratorProvider {
    /// Deterministic template text
    #[default]
    Template,
    /// OpenAI-compatible chat completion endpoint
    Llm,
}

/// Narrator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorConfig {
    #[serde(default)]
    pub provider: NarratorProvider,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Which extractor reads free-text trip notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorProvider {
    /// Keyword matching, no network access
    #[default]
    Keyword,
    /// OpenAI-compatible chat completion endpoint
    Llm,
}

/// Preference extractor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub provider: ExtractorProvider,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether remote results are cached on disk
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cache TTL in hours
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u32,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
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
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the static form
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// PEM certificate, enables HTTPS together with `tls_key`
    pub tls_cert: Option<String>,
    /// PEM private key
    pub tls_key: Option<String>,
}

// Default value functions
fn default_dataset_path() -> String {
    "data/attractions.csv".to_string()
}

fn default_embedding_dimensions() -> u32 {
    256
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_http_timeout() -> u32 {
    30
}

fn default_max_results() -> u32 {
    15
}

fn default_max_days() -> u32 {
    15
}

fn default_daily_hour_cap() -> f32 {
    8.0
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl() -> u32 {
    168
}

fn default_cache_location() -> String {
    "~/.cache/trip-planner".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

fn default_request_timeout() -> u32 {
    60
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            dimensions: default_embedding_dimensions(),
            base_url: default_openai_base_url(),
            model: default_embedding_model(),
            api_key: None,
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            max_days: default_max_days(),
            daily_hour_cap: default_daily_hour_cap(),
            currency: default_currency(),
            preference_rerank: true,
        }
    }
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            provider: NarratorProvider::default(),
            base_url: default_openai_base_url(),
            model: default_chat_model(),
            api_key: None,
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            provider: ExtractorProvider::default(),
            base_url: default_openai_base_url(),
            model: default_chat_model(),
            api_key: None,
            timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
            request_timeout_seconds: default_request_timeout(),
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl TripPlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|p| p.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides like TRIPPLANNER_PLANNER__MAX_DAYS=10
        builder = builder.add_source(
            Environment::with_prefix("TRIPPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trip-planner").join("config.toml"))
    }

    /// Cache directory with a leading `~` expanded
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        expand_home(&self.cache.location)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.dataset.path.is_empty() {
            self.dataset.path = default_dataset_path();
        }
        if self.embedding.dimensions == 0 {
            self.embedding.dimensions = default_embedding_dimensions();
        }
        if self.embedding.base_url.is_empty() {
            self.embedding.base_url = default_openai_base_url();
        }
        if self.embedding.timeout_seconds == 0 {
            self.embedding.timeout_seconds = default_http_timeout();
        }
        if self.narrator.base_url.is_empty() {
            self.narrator.base_url = default_openai_base_url();
        }
        if self.narrator.timeout_seconds == 0 {
            self.narrator.timeout_seconds = default_http_timeout();
        }
        if self.extractor.base_url.is_empty() {
            self.extractor.base_url = default_openai_base_url();
        }
        if self.extractor.timeout_seconds == 0 {
            self.extractor.timeout_seconds = default_http_timeout();
        }
        if self.planner.max_results == 0 {
            self.planner.max_results = default_max_results();
        }
        if self.planner.max_days == 0 {
            self.planner.max_days = default_max_days();
        }
        if self.planner.daily_hour_cap <= 0.0 {
            self.planner.daily_hour_cap = default_daily_hour_cap();
        }
        if self.planner.currency.is_empty() {
            self.planner.currency = default_currency();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Remote providers need a usable key
    pub fn validate_api_keys(&self) -> Result<()> {
        if self.embedding.provider == EmbeddingProvider::Http {
            check_api_key("Embedding", self.embedding.api_key.as_deref())?;
        }
        if self.narrator.provider == NarratorProvider::Llm {
            check_api_key("Narrator", self.narrator.api_key.as_deref())?;
        }
        if self.extractor.provider == ExtractorProvider::Llm {
            check_api_key("Extractor", self.extractor.api_key.as_deref())?;
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.embedding.dimensions > 8192 {
            return Err(TripPlannerError::config("Embedding dimensions cannot exceed 8192").into());
        }

        if [
            self.embedding.timeout_seconds,
            self.narrator.timeout_seconds,
            self.extractor.timeout_seconds,
        ]
        .iter()
        .any(|&t| t > 300)
        {
            return Err(TripPlannerError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        if self.planner.max_results > 350 {
            return Err(TripPlannerError::config("Maximum results cannot exceed 350").into());
        }

        if self.planner.max_days > 60 {
            return Err(TripPlannerError::config("Maximum trip length cannot exceed 60 days").into());
        }

        if !self.planner.daily_hour_cap.is_finite() {
            return Err(
                TripPlannerError::config("Daily hour cap must be a finite number of hours").into(),
            );
        }

        if self.planner.daily_hour_cap > 24.0 {
            return Err(
                TripPlannerError::config("Daily hour cap cannot exceed 24 hours").into(),
            );
        }

        if self.cache.ttl_hours > 24 * 90 {
            return Err(TripPlannerError::config("Cache TTL cannot exceed 90 days").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Embedding", &self.embedding.base_url),
            ("Narrator", &self.narrator.base_url),
            ("Extractor", &self.extractor.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripPlannerError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.server.tls_cert.is_some() != self.server.tls_key.is_some() {
            return Err(TripPlannerError::config(
                "Both tls_cert and tls_key must be set to enable HTTPS",
            )
            .into());
        }

        Ok(())
    }
}

fn check_api_key(service: &str, api_key: Option<&str>) -> Result<()> {
    match api_key {
        None | Some("") => Err(TripPlannerError::config(format!(
            "{service} API key is required for the remote provider"
        ))
        .into()),
        Some(key) if key.len() < 8 => Err(TripPlannerError::config(format!(
            "{service} API key appears to be invalid (too short). Please check your API key."
        ))
        .into()),
        Some(_) => Ok(()),
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TripPlannerConfig::default();
        assert_eq!(config.dataset.path, "data/attractions.csv");
        assert_eq!(config.embedding.provider, EmbeddingProvider::Hashing);
        assert_eq!(config.embedding.dimensions, 256);
        assert_eq!(config.planner.daily_hour_cap, 8.0);
        assert_eq!(config.planner.max_days, 15);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_provider_requires_api_key() {
        let mut config = TripPlannerConfig::default();
        config.embedding.provider = EmbeddingProvider::Http;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key is required"));

        config.embedding.api_key = Some("sk-valid-test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_llm_extractor_requires_api_key() {
        let mut config = TripPlannerConfig::default();
        assert_eq!(config.extractor.provider, ExtractorProvider::Keyword);
        config.extractor.provider = ExtractorProvider::Llm;
        assert!(config.validate().is_err());

        config.extractor.api_key = Some("sk-valid-test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripPlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripPlannerConfig::default();
        config.planner.daily_hour_cap = 30.0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("hour cap cannot exceed"));
    }

    #[test]
    fn test_nan_hour_cap_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[planner]\ndaily_hour_cap = nan").unwrap();

        let result = TripPlannerConfig::load_from_path(Some(file.path().to_path_buf()));
        assert!(result.unwrap_err().to_string().contains("finite"));

        let mut config = TripPlannerConfig::default();
        config.planner.daily_hour_cap = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_half_configured_tls_is_rejected() {
        let mut config = TripPlannerConfig::default();
        config.server.tls_cert = Some("cert.pem".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = TripPlannerConfig::default();
        config.planner.max_results = 0;
        config.planner.daily_hour_cap = 0.0;
        config.apply_defaults();
        assert_eq!(config.planner.max_results, 15);
        assert_eq!(config.planner.daily_hour_cap, 8.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[planner]\nmax_days = 7\ndaily_hour_cap = 6.5\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = TripPlannerConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.planner.max_days, 7);
        assert_eq!(config.planner.daily_hour_cap, 6.5);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.planner.max_results, 15);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TripPlannerConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("trip-planner"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
