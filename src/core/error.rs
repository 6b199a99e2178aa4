use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Failed to read model artifact {}: {source}", .path.display())]
    ModelLoadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact: {0}")]
    ModelFormatError(#[from] serde_json::Error),

    #[error("Model schema mismatch: {0}")]
    ModelSchemaError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),
}

pub type PriceResult<T> = Result<T, PriceError>;
