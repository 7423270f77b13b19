//! Turning a forecast and headlines into an investment recommendation

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::prompts::recommendation_prompt;
use dash_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Asks the language model for a recommendation
#[derive(Clone)]
pub struct RecommendationComposer {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
    temperature: Option<f32>,
}

impl RecommendationComposer {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &StockConfig) -> Self {
        Self {
            provider,
            model: config.llm_model.clone(),
            max_tokens: config.llm_max_tokens,
            temperature: config.llm_temperature,
        }
    }

    /// Model the composer asks
    pub fn model(&self) -> &str {
        &self.model
    }

    /// One prompt, one completion; the completion text is returned as is
    #[instrument(skip(self, headlines), fields(provider = self.provider.name(), model = %self.model))]
    pub async fn compose(
        &self,
        symbol: &str,
        forecasted_price: f64,
        headlines: &str,
    ) -> Result<String> {
        let prompt = recommendation_prompt(symbol, forecasted_price, headlines)?;
        debug!("Recommendation prompt: {}", prompt);

        let mut request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }

        let response = self
            .provider
            .complete(request.build())
            .await
            .map_err(StockError::from)?;

        Ok(response.text().to_string())
    }
}
