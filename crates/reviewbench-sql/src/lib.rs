//! reviewbench-sql
//!
//! PostgreSQL backend: table DDL with a GIN full-text index, row-wise
//! transactional loading and the comparison queries, over an `sqlx` pool.
#![deny(unused_imports)]

pub mod error;
pub mod statements;
pub mod store;

pub use error::SqlError;
pub use statements::Statements;
pub use store::PostgresStore;
