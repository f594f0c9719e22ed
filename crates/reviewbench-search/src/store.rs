use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use reviewbench_core::config::ElasticsearchSettings;
use reviewbench_core::progress::load_bar;
use reviewbench_core::traits::{ReviewQueries, ReviewStore};
use reviewbench_core::types::{
    Category, CategoryBreakdown, CategoryFilter, CategoryStats, LoadSummary, Review, ReviewId, ReviewSummary,
    SearchPage, StoreFootprint,
};
use reviewbench_core::Result;

use crate::bulk;
use crate::client::EsClient;
use crate::error::{EsError, BACKEND};
use crate::mapping::{self, REVIEW_TEXT};
use crate::query;
use crate::response::{Hit, SearchResponse, TermsAgg, ValueAgg};

#[derive(Debug, Deserialize)]
pub(crate) struct StatsAggs {
    pub avg_rating: ValueAgg,
    pub rating_distribution: TermsAgg<u8>,
    pub top_products: TermsAgg<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BreakdownAggs {
    pub by_category: TermsAgg<String>,
}

/// The review index behind an [`EsClient`].
pub struct ElasticsearchStore {
    client: EsClient,
    index: String,
    chunk_size: usize,
    settings: ElasticsearchSettings,
}

impl ElasticsearchStore {
    pub fn new(settings: &ElasticsearchSettings) -> Result<Self> {
        let client = EsClient::new(&settings.url, Duration::from_secs(settings.timeout_secs))?;
        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: EsClient, settings: &ElasticsearchSettings) -> Self {
        Self {
            client,
            index: settings.index.clone(),
            chunk_size: settings.bulk_chunk_size.max(1),
            settings: settings.clone(),
        }
    }

    pub fn client(&self) -> &EsClient {
        &self.client
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    async fn page(&self, body: serde_json::Value) -> Result<SearchPage> {
        let resp: SearchResponse<Review> = self.client.search(&self.index, &body).await?;
        Ok(to_page(resp))
    }
}

pub(crate) fn to_summary(hit: Hit<Review>) -> Option<ReviewSummary> {
    let review = hit.source?;
    let mut summary = ReviewSummary::from(&review);
    summary.score = hit.score;
    summary.highlights = hit.highlight.get(REVIEW_TEXT).cloned().unwrap_or_default();
    Some(summary)
}

pub(crate) fn to_page<A>(resp: SearchResponse<Review, A>) -> SearchPage {
    let total = resp.total();
    if !resp.total_is_exact() {
        tracing::warn!(total, "hit count is a lower bound");
    }
    let hits = resp.hits.hits.into_iter().filter_map(to_summary).collect();
    SearchPage { total, hits }
}

pub(crate) fn to_stats(total: u64, aggs: StatsAggs, top_n: usize) -> CategoryStats {
    let mut rating_distribution: Vec<(u8, u64)> =
        aggs.rating_distribution.buckets.into_iter().map(|b| (b.key, b.doc_count)).collect();
    rating_distribution.sort_by(|a, b| b.0.cmp(&a.0));
    let mut top_products: Vec<(String, u64)> =
        aggs.top_products.buckets.into_iter().map(|b| (b.key, b.doc_count)).collect();
    top_products.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_products.truncate(top_n);
    CategoryStats {
        avg_rating: aggs.avg_rating.value,
        total_reviews: total,
        rating_distribution,
        top_products,
    }
}

pub(crate) fn to_breakdown(aggs: BreakdownAggs) -> CategoryBreakdown {
    let counts = aggs
        .by_category
        .buckets
        .into_iter()
        .filter_map(|b| match b.key.parse::<Category>() {
            Ok(c) => Some((c, b.doc_count)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping bucket");
                None
            }
        })
        .collect();
    CategoryBreakdown::from_counts(counts)
}

#[async_trait]
impl ReviewStore for ElasticsearchStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn ping(&self) -> Result<()> {
        Ok(self.client.ping().await?)
    }

    async fn reset(&self) -> Result<()> {
        if self.client.index_exists(&self.index).await? {
            self.client.delete_index(&self.index).await?;
            tracing::info!(index = %self.index, "deleted existing index");
        }
        self.client.create_index(&self.index, &mapping::review_index(&self.settings)).await?;
        tracing::info!(index = %self.index, "created index");
        Ok(())
    }

    async fn load(&self, reviews: &[Review]) -> Result<LoadSummary> {
        let pb = load_bar(reviews.len() as u64);
        let mut summary = LoadSummary::default();
        for chunk in reviews.chunks(self.chunk_size) {
            let body = bulk::index_body(&self.index, chunk.iter().map(|r| (r.id.as_str(), r)))
                .map_err(EsError::Encode)?;
            let resp = self.client.bulk(body).await?;
            let failed: Vec<_> = resp.failures().collect();
            for (id, err) in &failed {
                tracing::warn!(id, kind = %err.kind, reason = %err.reason, "bulk item rejected");
            }
            summary.rejected += failed.len() as u64;
            summary.accepted += resp.succeeded();
            pb.inc(chunk.len() as u64);
        }
        pb.finish_with_message("indexed");
        self.client.refresh(&self.index).await?;
        Ok(summary)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.client.count(&self.index).await?)
    }

    async fn footprint(&self) -> Result<StoreFootprint> {
        let stats = self.client.stats(&self.index).await?;
        let bytes = stats.size_in_bytes(&self.index).unwrap_or(0);
        Ok(StoreFootprint::from_bytes(bytes))
    }
}

#[async_trait]
impl ReviewQueries for ElasticsearchStore {
    async fn text_search(&self, text: &str, limit: usize) -> Result<SearchPage> {
        self.page(query::text_match(text, limit)).await
    }

    async fn filter_search(&self, filter: &CategoryFilter, limit: usize) -> Result<SearchPage> {
        self.page(query::category_rating(filter, limit)).await
    }

    async fn compound_search(&self, text: &str, filter: &CategoryFilter, limit: usize) -> Result<SearchPage> {
        self.page(query::compound(text, filter, limit)).await
    }

    async fn category_stats(&self, category: Category, top_n: usize) -> Result<CategoryStats> {
        let resp: SearchResponse<serde::de::IgnoredAny, StatsAggs> =
            self.client.search(&self.index, &query::category_stats(category, top_n)).await?;
        let total = resp.total();
        let aggs = resp
            .aggregations
            .ok_or_else(|| reviewbench_core::Error::backend(BACKEND, "stats response has no aggregations"))?;
        Ok(to_stats(total, aggs, top_n))
    }

    async fn category_breakdown(&self) -> Result<CategoryBreakdown> {
        let resp: SearchResponse<serde::de::IgnoredAny, BreakdownAggs> =
            self.client.search(&self.index, &query::category_breakdown()).await?;
        let aggs = resp
            .aggregations
            .ok_or_else(|| reviewbench_core::Error::backend(BACKEND, "breakdown response has no aggregations"))?;
        Ok(to_breakdown(aggs))
    }

    async fn matching_ids(&self, filter: &CategoryFilter) -> Result<Vec<ReviewId>> {
        let resp: SearchResponse<serde::de::IgnoredAny> =
            self.client.search(&self.index, &query::matching_ids(filter)).await?;
        if resp.total() > query::MAX_ID_WINDOW as u64 {
            tracing::warn!(total = resp.total(), window = query::MAX_ID_WINDOW, "id list truncated");
        }
        Ok(resp.hits.hits.into_iter().map(|h| h.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;
    use serde_json::json;

    fn review_source(id: &str, rating: u8) -> serde_json::Value {
        json!({
            "id": id,
            "product_name": "Camiseta",
            "category": "Ropa",
            "rating": rating,
            "review_text": "Excelente camiseta. Buena calidad.",
            "reviewer_name": "Ana López",
            "reviewer_email": "ana.lopez@gmail.com",
            "date": "2024-03-01T10:15:00.123456",
            "verified_purchase": true,
            "helpful_count": 7
        })
    }

    #[test]
    fn search_hits_become_summaries_with_highlights() {
        let body = json!({
            "took": 3,
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "hits": [
                    {
                        "_id": "a",
                        "_score": 2.5,
                        "_source": review_source("a", 5),
                        "highlight": { "review_text": ["<em>Buena</em> <em>calidad</em>."] }
                    },
                    { "_id": "b", "_score": 1.0, "_source": review_source("b", 4) }
                ]
            }
        });
        let resp: SearchResponse<Review> = serde_json::from_value(body).expect("decode");
        let page = to_page(resp);
        assert_eq!(page.total, 42);
        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.hits[0].score, Some(2.5));
        assert_eq!(page.hits[0].highlights, vec!["<em>Buena</em> <em>calidad</em>.".to_string()]);
        assert!(page.hits[1].highlights.is_empty());
        assert_eq!(page.hits[1].category, Category::Clothing);
    }

    #[test]
    fn lower_bound_totals_are_flagged() {
        let capped: SearchResponse<Review> =
            serde_json::from_value(json!({ "hits": { "total": { "value": 10000, "relation": "gte" }, "hits": [] } }))
                .expect("decode");
        assert!(!capped.total_is_exact());
        assert_eq!(to_page(capped).total, 10_000);

        let exact: SearchResponse<Review> =
            serde_json::from_value(json!({ "hits": { "total": { "value": 7, "relation": "eq" }, "hits": [] } }))
                .expect("decode");
        assert!(exact.total_is_exact());
    }

    #[test]
    fn stats_orders_ratings_and_products() {
        let body = json!({
            "hits": { "total": { "value": 9, "relation": "eq" }, "hits": [] },
            "aggregations": {
                "avg_rating": { "value": 3.4 },
                "rating_distribution": { "buckets": [
                    { "key": 3, "doc_count": 4 }, { "key": 5, "doc_count": 3 }, { "key": 1, "doc_count": 2 }
                ] },
                "top_products": { "buckets": [
                    { "key": "Historia", "doc_count": 3 },
                    { "key": "Biografía", "doc_count": 3 },
                    { "key": "Libro de Cocina", "doc_count": 5 }
                ] }
            }
        });
        let resp: SearchResponse<IgnoredAny, StatsAggs> = serde_json::from_value(body).expect("decode");
        let total = resp.total();
        let stats = to_stats(total, resp.aggregations.expect("aggs"), 2);
        assert_eq!(stats.total_reviews, 9);
        assert_eq!(stats.avg_rating, Some(3.4));
        assert_eq!(stats.rating_distribution, vec![(5, 3), (3, 4), (1, 2)]);
        assert_eq!(
            stats.top_products,
            vec![("Libro de Cocina".to_string(), 5), ("Biografía".to_string(), 3)]
        );
    }

    #[test]
    fn empty_category_has_no_average() {
        let body = json!({
            "hits": { "total": { "value": 0, "relation": "eq" }, "hits": [] },
            "aggregations": {
                "avg_rating": { "value": null },
                "rating_distribution": { "buckets": [] },
                "top_products": { "buckets": [] }
            }
        });
        let resp: SearchResponse<IgnoredAny, StatsAggs> = serde_json::from_value(body).expect("decode");
        let stats = to_stats(0, resp.aggregations.expect("aggs"), 5);
        assert_eq!(stats, CategoryStats::default());
    }

    #[test]
    fn breakdown_skips_unknown_categories() {
        let body = json!({
            "hits": { "total": { "value": 6, "relation": "eq" }, "hits": [] },
            "aggregations": { "by_category": { "buckets": [
                { "key": "Libros", "doc_count": 4 },
                { "key": "Jardín", "doc_count": 1 },
                { "key": "Hogar", "doc_count": 1 }
            ] } }
        });
        let resp: SearchResponse<IgnoredAny, BreakdownAggs> = serde_json::from_value(body).expect("decode");
        let breakdown = to_breakdown(resp.aggregations.expect("aggs"));
        assert_eq!(breakdown.buckets, vec![(Category::Books, 4), (Category::Home, 1)]);
        assert_eq!(breakdown.total(), 5);
    }
}
