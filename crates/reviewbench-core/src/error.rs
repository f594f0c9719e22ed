use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{service} not available after {attempts} attempts")]
    Unavailable { service: String, attempts: u32 },

    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("invalid dataset {}: {reason}", path.display())]
    Dataset { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{backend}: {message}")]
    Backend { backend: &'static str, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Error::Backend { backend, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
