use thiserror::Error;

pub const BACKEND: &str = "PostgreSQL";

#[derive(Debug, Error)]
pub enum SqlError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("row {id}: {reason}")]
    Row { id: String, reason: String },

    #[error("{value} does not fit column {column}")]
    OutOfRange { column: &'static str, value: u64 },
}

impl From<SqlError> for reviewbench_core::Error {
    fn from(e: SqlError) -> Self {
        reviewbench_core::Error::backend(BACKEND, e.to_string())
    }
}
