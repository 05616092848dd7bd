use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache payload is not valid JSON for an entry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache payload is structurally invalid: {0}")]
    Malformed(String),

    #[error("Cache entry is stale ({age_ms} ms old)")]
    Stale { age_ms: i64 },

    #[error("Invalid cache key '{0}'")]
    InvalidKey(String),
}
