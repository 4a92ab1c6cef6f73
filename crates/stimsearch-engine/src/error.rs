use polars::error::PolarsError;
use stimsearch_model::SearchError;
use thiserror::Error;

/// Errors surfaced by the evaluation operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] SearchError),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
