use thiserror::Error;

/// Top-level error type for Market X.
#[derive(Debug, Error)]
pub enum MarketxError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Translation table could not be loaded or is incomplete.
    #[error("translation error: {0}")]
    Translation(String),

    /// Price feed request or payload error.
    #[error("feed error: {0}")]
    Feed(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
