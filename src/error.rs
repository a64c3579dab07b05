//! @ai:module:intent Error taxonomy for the contest pipeline
//! @ai:module:layer domain
//! @ai:module:public_api PipelineError, Result
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Unified error type for all pipeline stages
///
/// Per-item failures (`Provider`, `Analysis`) are logged by callers and the
/// affected item is skipped or degraded; `Config` and `MissingData` abort the
/// stage that raised them.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("provider error for model {model}: {message}")]
    Provider { model: String, message: String },

    #[error("analysis error: {0}")]
    Analysis(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing data: {0}")]
    MissingData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
