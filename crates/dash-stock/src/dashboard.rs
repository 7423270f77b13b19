//! The two dashboard entry points: the price-trend chart and the chatbot

use crate::api::{AlphaVantageClient, MarketDataSource};
use crate::chart::Figure;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::forecast::forecast;
use crate::recommendation::RecommendationComposer;
use crate::router::{ChatQuery, QueryRouter};
use dash_llm::LLMProvider;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Stock dashboard
///
/// Every call fetches fresh data; nothing is kept between calls.
#[derive(Clone)]
pub struct Dashboard {
    source: Arc<dyn MarketDataSource>,
    router: QueryRouter,
    horizon: usize,
}

impl Dashboard {
    /// Wire a dashboard from a market-data source and an optional LLM
    ///
    /// Without an LLM, recommendation queries answer with an error reply.
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        llm: Option<Arc<dyn LLMProvider>>,
        config: &StockConfig,
    ) -> Self {
        let composer = llm.map(|provider| RecommendationComposer::new(provider, config));
        let router = QueryRouter::new(Arc::clone(&source), composer, config.forecast_horizon);

        Self {
            source,
            router,
            horizon: config.forecast_horizon,
        }
    }

    /// Dashboard backed by Alpha Vantage
    pub fn with_alpha_vantage(
        config: &StockConfig,
        llm: Option<Arc<dyn LLMProvider>>,
    ) -> Result<Self> {
        let client = AlphaVantageClient::new(config)?;
        Ok(Self::new(Arc::new(client), llm, config))
    }

    /// Chart for `ticker`
    ///
    /// No ticker yields an empty figure; failures yield an empty figure
    /// titled with the error.
    #[instrument(skip(self))]
    pub async fn update_price_trend(&self, ticker: Option<&str>) -> Figure {
        let Some(ticker) = ticker.map(str::trim).filter(|t| !t.is_empty()) else {
            return Figure::empty();
        };

        match self.price_trend(ticker).await {
            Ok(figure) => figure,
            Err(e) => {
                warn!("Price trend for {} failed: {}", ticker, e);
                Figure::from_error(&e)
            }
        }
    }

    async fn price_trend(&self, ticker: &str) -> Result<Figure> {
        let series = self.source.fetch_daily_series(ticker).await?;
        if series.is_empty() {
            return Err(StockError::EmptyInput);
        }

        let forecast = forecast(&series, self.horizon)?;
        Ok(Figure::price_trend(&series, &forecast))
    }

    /// Reply to a chat message
    ///
    /// `button_clicks` is only logged.
    pub async fn update_chatbot(
        &self,
        button_clicks: Option<u64>,
        message: Option<&str>,
        ticker: Option<&str>,
    ) -> String {
        info!(
            button_clicks = ?button_clicks,
            message = ?message,
            ticker = ?ticker,
            "Chatbot callback triggered"
        );

        let query = ChatQuery::new(message.unwrap_or_default(), ticker);
        self.router.route(&query).await
    }
}
