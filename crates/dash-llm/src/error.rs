//! Failures talking to a language model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Debug, Error)]
pub enum LLMError {
    /// The request never got an HTTP answer
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401 or 403
    #[error("the provider rejected the API key")]
    Unauthorized,

    /// 429
    #[error("provider rate limit hit: {0}")]
    RateLimited(String),

    /// 400
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// 404
    #[error("model {0} is not served by this provider")]
    UnknownModel(String),

    /// Any other non-2xx status
    #[error("provider answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx body that is not a usable completion
    #[error("malformed completion: {0}")]
    MalformedResponse(String),

    #[error("missing configuration: {0}")]
    Config(String),
}
