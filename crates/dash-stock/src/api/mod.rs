//! Market data sources

pub mod alpha_vantage;

pub use alpha_vantage::{AlphaVantageClient, parse_daily_series, parse_news_feed};

use crate::error::Result;
use crate::news::NewsItem;
use crate::series::PriceSeries;
use async_trait::async_trait;

/// A provider of daily prices and news for ticker symbols
///
/// Each call issues at most one upstream request and never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily OHLCV history for `symbol`, oldest bar first
    async fn fetch_daily_series(&self, symbol: &str) -> Result<PriceSeries>;

    /// Recent news for `symbol`, in provider order
    async fn fetch_news(&self, symbol: &str) -> Result<Vec<NewsItem>>;
}
