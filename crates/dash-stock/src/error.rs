//! Error types for the fetch/forecast/chat pipeline

use thiserror::Error;

/// Stock dashboard errors
///
/// The `Display` text of each variant is what the dashboard shows to the
/// user, so messages are written for people rather than logs.
#[derive(Debug, Error)]
pub enum StockError {
    /// Provider reported the symbol as unknown
    #[error("Invalid stock symbol. Please check input.")]
    InvalidSymbol {
        symbol: String,
    },

    /// Provider returned a rate-limit notice
    #[error("API rate limit exceeded. Please wait and try again.")]
    RateLimited {
        provider: String,
    },

    /// Provider payload matched none of the known shapes
    #[error("Unexpected error occurred.")]
    UnexpectedProviderResponse {
        reason: String,
    },

    /// No price history to work with
    #[error("No historical data found for the given stock symbol.")]
    EmptyInput,

    /// The trend fit or projection failed
    #[error("Forecasting failed: {0}")]
    ForecastFailed(String),

    /// The news payload carried no feed
    #[error("No news sentiment data available.")]
    NoNewsAvailable {
        symbol: String,
    },

    /// The LLM collaborator failed to produce a recommendation
    #[error("Recommendation failed: {0}")]
    RecommendationFailed(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Anything else
    #[error("{0}")]
    UnexpectedError(String),
}

impl StockError {
    /// Whether this is a data problem the user can act on
    ///
    /// Data errors are shown verbatim; everything else is reported as an
    /// unexpected error.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSymbol { .. }
                | Self::RateLimited { .. }
                | Self::UnexpectedProviderResponse { .. }
                | Self::EmptyInput
                | Self::ForecastFailed(_)
                | Self::NoNewsAvailable { .. }
                | Self::RecommendationFailed(_)
        )
    }

    pub(crate) fn unexpected_response(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!("Unexpected provider response: {}", reason);
        Self::UnexpectedProviderResponse { reason }
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<dash_llm::LLMError> for StockError {
    fn from(err: dash_llm::LLMError) -> Self {
        StockError::RecommendationFailed(err.to_string())
    }
}

impl From<minijinja::Error> for StockError {
    fn from(err: minijinja::Error) -> Self {
        StockError::RecommendationFailed(format!("prompt rendering: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidSymbol {
            symbol: "ZZZZ".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid stock symbol. Please check input.");

        let err = StockError::RateLimited {
            provider: "Alpha Vantage".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API rate limit exceeded. Please wait and try again."
        );

        let err = StockError::ForecastFailed("singular fit".to_string());
        assert_eq!(err.to_string(), "Forecasting failed: singular fit");
    }

    #[test]
    fn test_data_error_classification() {
        assert!(StockError::EmptyInput.is_data_error());
        assert!(
            StockError::NoNewsAvailable {
                symbol: "AAPL".to_string()
            }
            .is_data_error()
        );
        assert!(!StockError::ConfigError("missing key".to_string()).is_data_error());
        assert!(!StockError::UnexpectedError("boom".to_string()).is_data_error());
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: StockError = dash_llm::LLMError::Unauthorized.into();
        match err {
            StockError::RecommendationFailed(msg) => {
                assert!(msg.contains("API key"));
            }
            _ => panic!("Expected RecommendationFailed variant"),
        }
    }
}
