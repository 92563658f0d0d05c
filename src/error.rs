//! Typed errors. Compilation itself never fails; only configuration and persistence do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid identifier for {field}: '{value}'")]
    InvalidIdentifier { field: &'static str, value: String },
    #[error("validation: {0}")]
    Validation(String),
}

/// Failure reported by the external resource store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store rejected {category} record: {message}")]
    Rejected { category: String, message: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
