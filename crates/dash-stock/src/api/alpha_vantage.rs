//! Alpha Vantage API client

use super::MarketDataSource;
use crate::config::{OutputSize, StockConfig};
use crate::error::{Result, StockError};
use crate::news::NewsItem;
use crate::series::{DailyBar, PriceSeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, instrument};

const PROVIDER: &str = "Alpha Vantage";
const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
const NEWS_FEED_KEY: &str = "feed";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    output_size: OutputSize,
    rate_limiter: SharedRateLimiter,
}

/// A daily record as Alpha Vantage encodes it: numbers as strings
#[derive(Debug, Deserialize)]
struct RawDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

impl AlphaVantageClient {
    /// Create a client from configuration
    ///
    /// Fails when no API key is configured.
    pub fn new(config: &StockConfig) -> Result<Self> {
        config.validate()?;
        let api_key = config.api_key()?.to_string();

        let per_minute = NonZeroU32::new(config.rate_limit_per_minute).ok_or_else(|| {
            StockError::ConfigError("rate_limit_per_minute must be greater than 0".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            output_size: config.output_size,
            rate_limiter,
        })
    }

    /// Issue one GET against the query endpoint and decode the JSON body
    async fn query(&self, params: &[(&str, &str)]) -> Result<Value> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let request = self.build_request(params)?;
        let response = self.client.execute(request).await?;
        check_status(response.status())?;

        Ok(response.json().await?)
    }

    /// The GET for `params`, with the API key appended
    fn build_request(&self, params: &[(&str, &str)]) -> Result<Request> {
        Ok(self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .build()?)
    }
}

fn daily_series_params(symbol: &str, output_size: OutputSize) -> [(&'static str, &str); 3] {
    [
        ("function", "TIME_SERIES_DAILY"),
        ("symbol", symbol),
        ("outputsize", output_size.as_str()),
    ]
}

fn news_params(symbol: &str) -> [(&'static str, &str); 2] {
    [("function", "NEWS_SENTIMENT"), ("tickers", symbol)]
}

/// Alpha Vantage reports most failures in a 200 body; any other status is unexpected
fn check_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(StockError::unexpected_response(format!("HTTP error: {status}")))
    }
}

#[async_trait]
impl MarketDataSource for AlphaVantageClient {
    #[instrument(skip(self))]
    async fn fetch_daily_series(&self, symbol: &str) -> Result<PriceSeries> {
        let data = self
            .query(&daily_series_params(symbol, self.output_size))
            .await?;

        let series = parse_daily_series(symbol, &data)?;
        debug!("Fetched {} daily bars", series.len());
        Ok(series)
    }

    #[instrument(skip(self))]
    async fn fetch_news(&self, symbol: &str) -> Result<Vec<NewsItem>> {
        let data = self.query(&news_params(symbol)).await?;

        let items = parse_news_feed(symbol, data)?;
        debug!("Fetched {} news items", items.len());
        Ok(items)
    }
}

/// Interpret a `TIME_SERIES_DAILY` payload
///
/// A series payload wins over any notice in the same body; otherwise an
/// error message means a bad symbol and a note means the quota is spent.
pub fn parse_daily_series(symbol: &str, data: &Value) -> Result<PriceSeries> {
    if let Some(series) = data.get(DAILY_SERIES_KEY) {
        let records = series.as_object().ok_or_else(|| {
            StockError::unexpected_response(format!("{DAILY_SERIES_KEY} is not an object"))
        })?;

        let bars = records
            .iter()
            .map(|(date, record)| parse_bar(date, record))
            .collect::<Result<Vec<_>>>()?;

        return Ok(PriceSeries::new(symbol, bars));
    }

    Err(classify_notice(symbol, data))
}

/// Interpret a `NEWS_SENTIMENT` payload, keeping feed order
pub fn parse_news_feed(symbol: &str, mut data: Value) -> Result<Vec<NewsItem>> {
    match data.get_mut(NEWS_FEED_KEY).map(Value::take) {
        Some(feed @ Value::Array(_)) => serde_json::from_value(feed)
            .map_err(|e| StockError::unexpected_response(format!("malformed news item: {e}"))),
        _ => Err(StockError::NoNewsAvailable {
            symbol: symbol.to_string(),
        }),
    }
}

fn classify_notice(symbol: &str, data: &Value) -> StockError {
    if data.get("Error Message").is_some() {
        return StockError::InvalidSymbol {
            symbol: symbol.to_string(),
        };
    }

    // "Information" also covers a missing or rejected key; the text tells them apart
    if let Some(notice) = data.get("Note").or_else(|| data.get("Information")) {
        debug!(%notice, "Provider notice read as rate limit");
        return StockError::RateLimited {
            provider: PROVIDER.to_string(),
        };
    }

    StockError::unexpected_response("payload has no time series, error or note")
}

fn parse_bar(date: &str, record: &Value) -> Result<DailyBar> {
    let date: NaiveDate = date
        .parse()
        .map_err(|e| StockError::unexpected_response(format!("bad date {date:?}: {e}")))?;

    let raw = RawDailyBar::deserialize(record)
        .map_err(|e| StockError::unexpected_response(format!("bad record for {date}: {e}")))?;

    let volume = parse_number(date, "volume", &raw.volume)?;
    if volume < 0.0 {
        return Err(StockError::unexpected_response(format!(
            "negative volume on {date}"
        )));
    }

    Ok(DailyBar {
        date,
        open: parse_number(date, "open", &raw.open)?,
        high: parse_number(date, "high", &raw.high)?,
        low: parse_number(date, "low", &raw.low)?,
        close: parse_number(date, "close", &raw.close)?,
        volume: volume.round() as u64,
    })
}

fn parse_number(date: NaiveDate, field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            StockError::unexpected_response(format!("bad {field} {raw:?} on {date}"))
        })
}
