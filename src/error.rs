use thiserror::Error;

/// Failures surfaced by the provider clients and the catalog built on them.
///
/// Listing operations propagate these instead of degrading to an empty page,
/// so callers can tell an empty catalog apart from an unreachable provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid provider record: {0}")]
    Record(String),

    #[error("not found")]
    NotFound,
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound)
    }
}

/// Failures from the persistence backend behind the personalization store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored payload is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}
