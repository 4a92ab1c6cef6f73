use thiserror::Error;

/// Errors raised while loading configuration or compiling rule sets.
///
/// `Configuration` and `PatternExpansion` are fatal: no partial result is
/// produced. Advisory conditions (tracing cost, ignored inputs) are logged
/// through `tracing` instead and never appear here.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("pattern expansion error: {0}")]
    PatternExpansion(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pattern file error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
