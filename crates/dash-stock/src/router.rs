//! Keyword router for chat queries
//!
//! A query is lower-cased and checked for keywords in a fixed order:
//! price/forecast, then recommendation, then news. The first match wins,
//! so "price recommendation" is a price question.

use crate::api::MarketDataSource;
use crate::error::{Result, StockError};
use crate::forecast::forecast;
use crate::news::join_titles;
use crate::recommendation::RecommendationComposer;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reply to an empty message
pub const EMPTY_QUERY_REPLY: &str = "Type your query and click 'Send'.";

/// Header line above news headlines
pub const NEWS_HEADER: &str = "Recent news headlines:";

/// Prefix of every chat error reply
pub const ERROR_PREFIX: &str = "An error occurred: ";

mod keywords {
    pub const FORECAST: &[&str] = &["price", "forecast"];
    pub const RECOMMENDATION: &[&str] = &["recommendation"];
    pub const NEWS: &[&str] = &["news"];
}

/// What a chat query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatIntent {
    /// Next forecast price
    Forecast,
    /// LLM recommendation built from forecast and news
    Recommendation,
    /// Recent headlines
    News,
    /// Anything else
    General,
}

impl ChatIntent {
    /// Classify a query by keyword, case-insensitively
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();

        if matches_any(&text, keywords::FORECAST) {
            Self::Forecast
        } else if matches_any(&text, keywords::RECOMMENDATION) {
            Self::Recommendation
        } else if matches_any(&text, keywords::NEWS) {
            Self::News
        } else {
            Self::General
        }
    }
}

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// A chat message and the ticker currently selected, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatQuery {
    pub raw_text: String,
    pub ticker_context: Option<String>,
}

impl ChatQuery {
    /// A blank ticker counts as no ticker
    pub fn new(raw_text: impl Into<String>, ticker: Option<&str>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ticker_context: ticker
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }

    /// Intent of the query; `General` when no ticker is selected
    pub fn intent(&self) -> ChatIntent {
        if self.ticker_context.is_some() {
            ChatIntent::classify(&self.raw_text)
        } else {
            ChatIntent::General
        }
    }
}

/// Answers chat queries
///
/// Holds no per-conversation state; every call fetches fresh data.
#[derive(Clone)]
pub struct QueryRouter {
    source: Arc<dyn MarketDataSource>,
    composer: Option<RecommendationComposer>,
    horizon: usize,
}

impl QueryRouter {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        composer: Option<RecommendationComposer>,
        horizon: usize,
    ) -> Self {
        Self {
            source,
            composer,
            horizon,
        }
    }

    /// Produce the reply for `query`
    ///
    /// Never fails: downstream errors become an `"An error occurred: ..."`
    /// reply.
    pub async fn route(&self, query: &ChatQuery) -> String {
        if query.raw_text.is_empty() {
            return EMPTY_QUERY_REPLY.to_string();
        }

        let intent = query.intent();
        debug!(?intent, ticker = ?query.ticker_context, "Routing chat query");

        match self.dispatch(intent, query.ticker_context.as_deref()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Chatbot error: {}", e);
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }

    async fn dispatch(&self, intent: ChatIntent, ticker: Option<&str>) -> Result<String> {
        let Some(ticker) = ticker else {
            return Ok(general_reply(None));
        };

        match intent {
            ChatIntent::Forecast => {
                let price = self.forecast_price(ticker).await?;
                Ok(format!(
                    "The forecasted price for {} in the next period is ${price:.2}.",
                    ticker.to_uppercase()
                ))
            }
            ChatIntent::Recommendation => {
                let price = self.forecast_price(ticker).await?;
                let news = self.source.fetch_news(ticker).await?;
                let headlines = join_titles(&news, " ");

                let composer = self.composer.as_ref().ok_or_else(|| {
                    StockError::RecommendationFailed("no language model is configured".to_string())
                })?;
                composer.compose(ticker, price, &headlines).await
            }
            ChatIntent::News => {
                let news = self.source.fetch_news(ticker).await?;
                Ok(format!("{NEWS_HEADER}\n{}", join_titles(&news, "\n")))
            }
            ChatIntent::General => Ok(general_reply(Some(ticker))),
        }
    }

    /// Last value of a fresh forecast for `ticker`
    async fn forecast_price(&self, ticker: &str) -> Result<f64> {
        let series = self.source.fetch_daily_series(ticker).await?;
        let forecast = forecast(&series, self.horizon)?;
        forecast.final_price().ok_or(StockError::EmptyInput)
    }
}

fn general_reply(ticker: Option<&str>) -> String {
    let subject = ticker.map_or_else(|| "any stock".to_string(), str::to_uppercase);
    format!("I'm here to assist you with stock-related questions for {subject}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataSource;
    use crate::config::StockConfig;
    use crate::news::NewsItem;
    use crate::series::{DailyBar, PriceSeries};
    use async_trait::async_trait;
    use chrono::{Days, NaiveDate};
    use dash_llm::{
        CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason,
        TokenUsage,
    };

    fn linear_series(symbol: &str, n: u32) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + f64::from(i);
                DailyBar {
                    date: start + Days::new(u64::from(i)),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1,
                }
            })
            .collect();
        PriceSeries::new(symbol, bars)
    }

    fn headlines() -> Vec<NewsItem> {
        vec![NewsItem::new("Chip launch"), NewsItem::new("Supply update")]
    }

    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        async fn complete(&self, request: CompletionRequest) -> dash_llm::Result<CompletionResponse> {
            Ok(CompletionResponse {
                message: Message::assistant(format!("ECHO: {}", request.messages[0].content)),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct DownProvider;

    #[async_trait]
    impl LLMProvider for DownProvider {
        async fn complete(&self, _request: CompletionRequest) -> dash_llm::Result<CompletionResponse> {
            Err(LLMError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            })
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    fn router(source: MockMarketDataSource, llm: Option<Arc<dyn LLMProvider>>) -> QueryRouter {
        let composer = llm.map(|p| RecommendationComposer::new(p, &StockConfig::default()));
        QueryRouter::new(Arc::new(source), composer, 1)
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(ChatIntent::classify("price please"), ChatIntent::Forecast);
        assert_eq!(ChatIntent::classify("Any FORECAST?"), ChatIntent::Forecast);
        assert_eq!(
            ChatIntent::classify("price and recommendation"),
            ChatIntent::Forecast
        );
        assert_eq!(
            ChatIntent::classify("recommendation from the news"),
            ChatIntent::Recommendation
        );
        assert_eq!(ChatIntent::classify("latest NEWS"), ChatIntent::News);
        assert_eq!(ChatIntent::classify("hello there"), ChatIntent::General);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            ChatIntent::classify("What's the PRICE outlook?"),
            ChatIntent::classify("what's the price outlook?")
        );
    }

    #[test]
    fn test_blank_ticker_is_no_ticker() {
        assert_eq!(ChatQuery::new("price", Some("  ")).ticker_context, None);
        assert_eq!(ChatQuery::new("price", Some(" aapl ")).ticker_context.as_deref(), Some("aapl"));
        assert_eq!(ChatQuery::new("price", None).intent(), ChatIntent::General);
    }

    #[tokio::test]
    async fn test_empty_query_returns_prompt() {
        let source = MockMarketDataSource::new();
        let router = router(source, None);

        assert_eq!(router.route(&ChatQuery::new("", Some("AAPL"))).await, EMPTY_QUERY_REPLY);
        assert_eq!(router.route(&ChatQuery::new("", None)).await, EMPTY_QUERY_REPLY);
    }

    #[tokio::test]
    async fn test_price_query_reports_last_forecast() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_daily_series()
            .withf(|symbol| symbol.eq_ignore_ascii_case("aapl"))
            .times(1)
            .returning(|symbol| Ok(linear_series(symbol, 10)));
        source.expect_fetch_news().never();

        let reply = router(source, None)
            .route(&ChatQuery::new("What's the PRICE outlook?", Some("aapl")))
            .await;
        assert_eq!(reply, "The forecasted price for AAPL in the next period is $110.00.");
    }

    #[tokio::test]
    async fn test_price_beats_recommendation() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_daily_series()
            .times(1)
            .returning(|symbol| Ok(linear_series(symbol, 10)));
        source.expect_fetch_news().never();

        let reply = router(source, Some(Arc::new(EchoProvider)))
            .route(&ChatQuery::new("price recommendation", Some("AAPL")))
            .await;
        assert!(reply.starts_with("The forecasted price for AAPL"));
    }

    #[tokio::test]
    async fn test_recommendation_returns_completion_verbatim() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_daily_series()
            .times(1)
            .returning(|symbol| Ok(linear_series(symbol, 10)));
        source
            .expect_fetch_news()
            .times(1)
            .returning(|_| Ok(headlines()));

        let reply = router(source, Some(Arc::new(EchoProvider)))
            .route(&ChatQuery::new("Recommendation?", Some("AAPL")))
            .await;
        assert_eq!(
            reply,
            "ECHO: Given the forecasted stock price of AAPL is $110.00 and the recent news \
             sentiment is: Chip launch Supply update. What investment action would you recommend?"
        );
    }

    #[tokio::test]
    async fn test_recommendation_failure_becomes_error_reply() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_daily_series()
            .returning(|symbol| Ok(linear_series(symbol, 10)));
        source.expect_fetch_news().returning(|_| Ok(headlines()));

        let reply = router(source, Some(Arc::new(DownProvider)))
            .route(&ChatQuery::new("recommendation", Some("AAPL")))
            .await;
        assert!(reply.starts_with(ERROR_PREFIX));
        assert!(reply.contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_recommendation_without_llm_is_error_reply() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_daily_series()
            .returning(|symbol| Ok(linear_series(symbol, 10)));
        source.expect_fetch_news().returning(|_| Ok(headlines()));

        let reply = router(source, None)
            .route(&ChatQuery::new("recommendation", Some("AAPL")))
            .await;
        assert_eq!(
            reply,
            "An error occurred: Recommendation failed: no language model is configured"
        );
    }

    #[tokio::test]
    async fn test_news_query_lists_headlines() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_daily_series().never();
        source
            .expect_fetch_news()
            .times(1)
            .returning(|_| Ok(headlines()));

        let reply = router(source, None)
            .route(&ChatQuery::new("any news?", Some("AAPL")))
            .await;
        assert_eq!(reply, "Recent news headlines:\nChip launch\nSupply update");
    }

    #[tokio::test]
    async fn test_general_reply_names_ticker() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_daily_series().never();
        source.expect_fetch_news().never();
        let router = router(source, None);

        assert_eq!(
            router.route(&ChatQuery::new("hello", Some("tsla"))).await,
            "I'm here to assist you with stock-related questions for TSLA."
        );
        assert_eq!(
            router.route(&ChatQuery::new("price?", None)).await,
            "I'm here to assist you with stock-related questions for any stock."
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_error_reply() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_daily_series().returning(|symbol| {
            Err(StockError::InvalidSymbol {
                symbol: symbol.to_string(),
            })
        });

        let reply = router(source, None)
            .route(&ChatQuery::new("forecast", Some("ZZZZ")))
            .await;
        assert_eq!(reply, "An error occurred: Invalid stock symbol. Please check input.");
    }

    #[tokio::test]
    async fn test_empty_series_becomes_error_reply() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_daily_series()
            .returning(|symbol| Ok(PriceSeries::new(symbol, Vec::new())));

        let reply = router(source, None)
            .route(&ChatQuery::new("forecast", Some("AAPL")))
            .await;
        assert!(reply.starts_with(ERROR_PREFIX));
    }

    #[tokio::test]
    async fn test_missing_news_becomes_error_reply() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_news().returning(|symbol| {
            Err(StockError::NoNewsAvailable {
                symbol: symbol.to_string(),
            })
        });

        let reply = router(source, None)
            .route(&ChatQuery::new("news", Some("AAPL")))
            .await;
        assert_eq!(reply, "An error occurred: No news sentiment data available.");
    }
}
