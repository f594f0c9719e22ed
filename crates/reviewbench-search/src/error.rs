use thiserror::Error;

pub const BACKEND: &str = "ElasticSearch";

#[derive(Debug, Error)]
pub enum EsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context}: HTTP {status}: {body}")]
    Status { context: String, status: u16, body: String },

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{context}: unexpected response: {source}")]
    Decode { context: String, source: serde_json::Error },
}

impl From<EsError> for reviewbench_core::Error {
    fn from(e: EsError) -> Self {
        reviewbench_core::Error::backend(BACKEND, e.to_string())
    }
}
