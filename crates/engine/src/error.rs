use thiserror::Error;

/// Failures that abort a whole correlation cycle.
///
/// Per-asset history failures never appear here; they degrade to empty series.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("API client error: {0}")]
    ApiClient(#[from] api_client::ApiError),

    #[error("History fetch task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("History fetch limiter closed: {0}")]
    Limiter(#[from] tokio::sync::AcquireError),
}
