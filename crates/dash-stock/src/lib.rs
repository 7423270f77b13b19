//! Stock dashboard pipeline
//!
//! This crate fetches daily prices and news for a ticker, fits a linear
//! trend to the closing prices and projects it forward, and answers chat
//! queries about the ticker. It includes:
//!
//! - An Alpha Vantage client behind the [`MarketDataSource`] trait
//! - An ordinary-least-squares trend forecaster over standardized day indices
//! - A keyword router for chat queries (price/forecast, recommendation, news)
//! - LLM recommendations rendered from a prompt template
//! - Plotly-style chart figures
//!
//! # Architecture
//!
//! [`Dashboard`] exposes the two entry points a front end calls:
//! - `update_price_trend`: chart of history plus forecast for a ticker
//! - `update_chatbot`: reply to a chat message about the selected ticker
//!
//! Neither entry point returns an error. Failures become a titled empty
//! figure or an `"An error occurred: ..."` reply.
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_stock::{Dashboard, StockConfig};
//! use dash_llm::providers::ChatCompletionProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::builder().with_env_api_key().build()?;
//!     let llm = Arc::new(ChatCompletionProvider::from_env()?);
//!
//!     let dashboard = Dashboard::with_alpha_vantage(&config, Some(llm))?;
//!
//!     let figure = dashboard.update_price_trend(Some("AAPL")).await;
//!     println!("{}", serde_json::to_string_pretty(&figure)?);
//!
//!     let reply = dashboard.update_chatbot(Some(1), Some("any news?"), Some("AAPL")).await;
//!     println!("{reply}");
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod news;
pub mod prompts;
pub mod recommendation;
pub mod router;
pub mod series;

// Re-export main types for convenience
pub use api::{AlphaVantageClient, MarketDataSource};
pub use chart::Figure;
pub use config::{OutputSize, StockConfig};
pub use dashboard::Dashboard;
pub use error::{Result, StockError};
pub use forecast::{ForecastPoint, ForecastSeries, LinearTrend, forecast};
pub use news::NewsItem;
pub use recommendation::RecommendationComposer;
pub use router::{ChatIntent, ChatQuery, QueryRouter};
pub use series::{DailyBar, PriceSeries};
