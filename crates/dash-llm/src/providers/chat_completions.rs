//! OpenAI-compatible chat-completions provider
//!
//! Groq, OpenAI and most self-hosted servers (llama.cpp, vLLM, LM Studio)
//! expose the same `POST {api_base}/chat/completions` endpoint. This module
//! implements [`LLMProvider`] against that endpoint.
//!
//! # Examples
//!
//! ```no_run
//! use dash_llm::{CompletionRequest, LLMProvider, Message};
//! use dash_llm::providers::{ChatCompletionConfig, ChatCompletionProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ChatCompletionProvider::with_config(ChatCompletionConfig::groq("gsk-..."))?;
//!
//!     let request = CompletionRequest::builder("llama3-8b-8192")
//!         .add_message(Message::user("Hello!"))
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Groq's OpenAI-compatible endpoint
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where and how to reach a chat-completions endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
    /// Sent as a bearer token
    pub api_key: String,

    /// Base URL, without the trailing `/chat/completions`
    pub api_base: String,

    pub timeout_secs: u64,
}

impl ChatCompletionConfig {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: api_base.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new(api_key, GROQ_API_BASE)
    }

    /// Read `GROQ_API_KEY` (or `LLM_API_KEY`) and an optional `LLM_API_BASE`
    pub fn from_env() -> Result<Self> {
        let api_key = ["GROQ_API_KEY", "LLM_API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                LLMError::Config("GROQ_API_KEY (or LLM_API_KEY) environment variable not set".to_string())
            })?;

        let config = Self::groq(api_key);
        Ok(match std::env::var("LLM_API_BASE") {
            Ok(base) if !base.trim().is_empty() => config.with_api_base(base),
            _ => config,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    fn provider_name(&self) -> &'static str {
        if self.api_base.contains("groq.com") {
            "groq"
        } else {
            "openai-compatible"
        }
    }
}

/// Provider for any OpenAI-compatible chat-completions API
pub struct ChatCompletionProvider {
    client: Client,
    config: ChatCompletionConfig,
}

impl ChatCompletionProvider {
    pub fn with_config(config: ChatCompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(ChatCompletionConfig::from_env()?)
    }

    pub fn config(&self) -> &ChatCompletionConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for ChatCompletionProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = WireRequest::from_request(&request);
        debug!("Sending {} message(s) to {}", body.messages.len(), self.config.completions_url());

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(status_error(status, body, &request.model));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LLMError::MalformedResponse(e.to_string()))?;

        let completion = wire.into_completion()?;
        debug!(
            stop_reason = ?completion.stop_reason,
            tokens = completion.usage.total(),
            "Received completion"
        );
        Ok(completion)
    }

    fn name(&self) -> &str {
        self.config.provider_name()
    }
}

fn status_error(status: StatusCode, body: String, model: &str) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::Unauthorized,
        429 => LLMError::RateLimited(body),
        400 => LLMError::Rejected(body),
        404 => LLMError::UnknownModel(model.to_string()),
        code => LLMError::Status { status: code, body },
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

impl WireResponse {
    /// Only one choice is ever requested
    fn into_completion(self) -> Result<CompletionResponse> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::MalformedResponse("no choices in response".to_string()))?;

        let usage = self.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(CompletionResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            stop_reason: map_stop_reason(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

fn map_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        Some("stop") | None => StopReason::EndTurn,
        Some(other) => {
            debug!("Unknown stop reason: {}", other);
            StopReason::EndTurn
        }
    }
}
