pub use classcope_api::error::{CatalogError, Result};
use thiserror::Error;

/// Errors raised while loading a [`CatalogConfig`](crate::config::CatalogConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
