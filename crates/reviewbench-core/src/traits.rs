use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Category, CategoryBreakdown, CategoryFilter, CategoryStats, LoadSummary, Review, ReviewId, SearchPage,
    StoreFootprint,
};

/// Lifecycle of one backing store: availability, destructive reset, load,
/// read-back.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Short human name ("ElasticSearch", "PostgreSQL").
    fn name(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    /// Drop the index/table if present and recreate it with the explicit schema.
    async fn reset(&self) -> Result<()>;

    /// Insert every record, then make them visible (refresh or commit).
    async fn load(&self, reviews: &[Review]) -> Result<LoadSummary>;

    async fn count(&self) -> Result<u64>;

    async fn footprint(&self) -> Result<StoreFootprint>;
}

/// The query shapes the comparison harness issues against every store.
#[async_trait]
pub trait ReviewQueries: Send + Sync {
    async fn text_search(&self, text: &str, limit: usize) -> Result<SearchPage>;

    /// Sorted by rating then helpful count, both descending.
    async fn filter_search(&self, filter: &CategoryFilter, limit: usize) -> Result<SearchPage>;

    async fn compound_search(&self, text: &str, filter: &CategoryFilter, limit: usize) -> Result<SearchPage>;

    async fn category_stats(&self, category: Category, top_n: usize) -> Result<CategoryStats>;

    async fn category_breakdown(&self) -> Result<CategoryBreakdown>;

    /// Every id matching `filter`, unpaged. Used for the parity check.
    async fn matching_ids(&self, filter: &CategoryFilter) -> Result<Vec<ReviewId>>;
}
