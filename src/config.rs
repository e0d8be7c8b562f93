//! Runtime configuration
//!
//! [`TourConfig`] can be deserialized from any serde source or read from the
//! process environment with [`TourConfig::from_env`].

use crate::error::{Result, TourError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest radius the Places nearby search accepts
pub const MAX_RADIUS_METERS: f64 = 50_000.0;

/// Largest page the Places search endpoints return
pub const MAX_RESULT_COUNT: u32 = 20;

/// Log level for tour operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(TourError::Configuration(format!(
                "unknown log level '{}'",
                other
            ))),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Gateway and controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourConfig {
    pub places_api_key: String,

    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,

    #[serde(default = "default_routes_base_url")]
    pub routes_base_url: String,

    #[serde(
        default = "default_request_timeout",
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,

    #[serde(default = "default_max_result_count")]
    pub max_result_count: u32,

    #[serde(default = "default_radius_meters")]
    pub default_radius_meters: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,

    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_places_base_url() -> String {
    "https://places.googleapis.com/v1".to_string()
}

fn default_routes_base_url() -> String {
    "https://routes.googleapis.com".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_result_count() -> u32 {
    MAX_RESULT_COUNT
}

fn default_radius_meters() -> f64 {
    1000.0
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_secs())
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}

impl TourConfig {
    /// Configuration with defaults for everything but the API key
    pub fn new(places_api_key: impl Into<String>) -> Self {
        Self {
            places_api_key: places_api_key.into(),
            places_base_url: default_places_base_url(),
            routes_base_url: default_routes_base_url(),
            request_timeout: default_request_timeout(),
            max_result_count: default_max_result_count(),
            default_radius_meters: default_radius_meters(),
            language_code: None,
            log_level: LogLevel::default(),
        }
    }

    /// Read configuration from the process environment.
    ///
    /// `PLACES_API_KEY` is required. `PLACES_BASE_URL`, `ROUTES_BASE_URL`,
    /// `TOUR_REQUEST_TIMEOUT_SECS`, `TOUR_LANGUAGE_CODE` and `TOUR_LOG_LEVEL`
    /// override the defaults when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("PLACES_API_KEY")
            .ok_or_else(|| TourError::Configuration("PLACES_API_KEY is not set".to_string()))?;
        let mut config = Self::new(api_key);

        if let Some(url) = lookup("PLACES_BASE_URL") {
            config.places_base_url = url;
        }
        if let Some(url) = lookup("ROUTES_BASE_URL") {
            config.routes_base_url = url;
        }
        if let Some(secs) = lookup("TOUR_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                TourError::Configuration(format!(
                    "TOUR_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(code) = lookup("TOUR_LANGUAGE_CODE") {
            config.language_code = Some(code);
        }
        if let Some(level) = lookup("TOUR_LOG_LEVEL") {
            config.log_level = level.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_places_base_url(mut self, url: impl Into<String>) -> Self {
        self.places_base_url = url.into();
        self
    }

    pub fn with_routes_base_url(mut self, url: impl Into<String>) -> Self {
        self.routes_base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = Some(code.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.places_api_key.trim().is_empty() {
            return Err(TourError::Configuration(
                "places_api_key must not be empty".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(TourError::Configuration(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_RESULT_COUNT).contains(&self.max_result_count) {
            return Err(TourError::Configuration(format!(
                "max_result_count must be between 1 and {}, got {}",
                MAX_RESULT_COUNT, self.max_result_count
            )));
        }
        if !(self.default_radius_meters > 0.0 && self.default_radius_meters <= MAX_RADIUS_METERS) {
            return Err(TourError::Configuration(format!(
                "default_radius_meters must be in (0, {}], got {}",
                MAX_RADIUS_METERS, self.default_radius_meters
            )));
        }
        Ok(())
    }
}
