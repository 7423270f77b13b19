//! Configuration for the dashboard pipeline

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Alpha Vantage query endpoint
pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Number of days projected by default
pub const DEFAULT_FORECAST_HORIZON: usize = 90;

/// Model used for recommendations by default
pub const DEFAULT_LLM_MODEL: &str = "llama3-8b-8192";

/// How much history the daily endpoint returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Latest 100 data points
    #[default]
    Compact,
    /// Full history
    Full,
}

impl OutputSize {
    /// Query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// Configuration for fetching, forecasting and recommending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Alpha Vantage API key
    pub alpha_vantage_api_key: Option<String>,

    /// Alpha Vantage query URL
    pub base_url: String,

    /// History size requested from the daily endpoint
    pub output_size: OutputSize,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Client-side request budget per minute
    pub rate_limit_per_minute: u32,

    /// Number of future days to forecast
    pub forecast_horizon: usize,

    /// Model used for recommendations
    pub llm_model: String,

    /// Completion token budget for recommendations
    pub llm_max_tokens: usize,

    /// Sampling temperature for recommendations (provider default when unset)
    pub llm_temperature: Option<f32>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
            output_size: OutputSize::Compact,
            request_timeout: Duration::from_secs(30),
            rate_limit_per_minute: 5, // free tier
            forecast_horizon: DEFAULT_FORECAST_HORIZON,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_max_tokens: 1024,
            llm_temperature: None,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// The API key, or a configuration error when it is missing
    pub fn api_key(&self) -> Result<&str> {
        self.alpha_vantage_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                StockError::ConfigError("ALPHA_VANTAGE_API_KEY is not configured".to_string())
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.forecast_horizon == 0 {
            return Err(StockError::ConfigError(
                "forecast_horizon must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(StockError::ConfigError(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.llm_model.trim().is_empty() {
            return Err(StockError::ConfigError("llm_model must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    alpha_vantage_api_key: Option<String>,
    base_url: Option<String>,
    output_size: Option<OutputSize>,
    request_timeout: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
    forecast_horizon: Option<usize>,
    llm_model: Option<String>,
    llm_max_tokens: Option<usize>,
    llm_temperature: Option<f32>,
}

impl StockConfigBuilder {
    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Override the query URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the daily history size
    pub fn output_size(mut self, size: OutputSize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the per-minute request budget
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Set the forecast horizon in days
    pub fn forecast_horizon(mut self, days: usize) -> Self {
        self.forecast_horizon = Some(days);
        self
    }

    /// Set the recommendation model
    pub fn llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = Some(model.into());
        self
    }

    /// Read the recommendation model from `LLM_MODEL` when set
    pub fn with_env_llm_model(mut self) -> Self {
        if let Ok(model) = std::env::var("LLM_MODEL") {
            if !model.trim().is_empty() {
                self.llm_model = Some(model);
            }
        }
        self
    }

    /// Set the completion token budget
    pub fn llm_max_tokens(mut self, tokens: usize) -> Self {
        self.llm_max_tokens = Some(tokens);
        self
    }

    /// Set the sampling temperature
    pub fn llm_temperature(mut self, temperature: f32) -> Self {
        self.llm_temperature = Some(temperature);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            base_url: self.base_url.unwrap_or(defaults.base_url),
            output_size: self.output_size.unwrap_or(defaults.output_size),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            forecast_horizon: self.forecast_horizon.unwrap_or(defaults.forecast_horizon),
            llm_model: self.llm_model.unwrap_or(defaults.llm_model),
            llm_max_tokens: self.llm_max_tokens.unwrap_or(defaults.llm_max_tokens),
            llm_temperature: self.llm_temperature.or(defaults.llm_temperature),
        };

        config.validate()?;
        Ok(config)
    }
}
