//! reviewbench-search
//!
//! Elasticsearch backend: a small REST client, index mappings, query bodies,
//! the review store used by the loader and the comparison harness, and the
//! product catalog demo.
#![deny(unused_imports)]

pub mod bulk;
pub mod client;
pub mod error;
pub mod mapping;
pub mod products;
pub mod query;
pub mod response;
pub mod store;

pub use client::EsClient;
pub use error::EsError;
pub use products::{Product, ProductCatalog};
pub use store::ElasticsearchStore;
