//! reviewbench-core
//!
//! Domain types, error taxonomy, Figment-based configuration, the JSON
//! dataset file, readiness polling and the store traits implemented by the
//! search-engine and relational backends.
#![deny(unused_imports)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod readiness;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
