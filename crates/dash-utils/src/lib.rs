//! Shared utilities for stockdash
//!
//! Logging setup, `.env` loading and the small amount of process-level
//! configuration shared by the binaries.

pub mod config;
pub mod logging;

pub use config::{AppConfig, EnvError, load_env_file, require_env};
pub use logging::{init_tracing, init_tracing_with_default};
