use std::collections::BTreeMap;

use async_trait::async_trait;

use reviewbench_compare::{canned_shapes, ComparisonHarness, Outcome, QueryShape};
use reviewbench_core::config::Settings;
use reviewbench_core::traits::{ReviewQueries, ReviewStore};
use reviewbench_core::types::{
    Category, CategoryBreakdown, CategoryFilter, CategoryStats, LoadSummary, Review, ReviewId, ReviewSummary,
    SearchPage, StoreFootprint,
};
use reviewbench_core::{Error, Result};
use reviewbench_datagen::ReviewGenerator;

/// In-memory store answering every query by scanning its records.
struct MemStore {
    name: &'static str,
    reviews: Vec<Review>,
    broken_stats: bool,
    up: bool,
}

impl MemStore {
    fn new(name: &'static str, reviews: Vec<Review>) -> Self {
        Self { name, reviews, broken_stats: false, up: true }
    }

    fn page<'a>(&self, matches: impl Iterator<Item = &'a Review>, limit: usize) -> SearchPage {
        let all: Vec<&Review> = matches.collect();
        SearchPage { total: all.len() as u64, hits: all.iter().take(limit).map(|r| ReviewSummary::from(*r)).collect() }
    }
}

fn mentions(review: &Review, text: &str) -> bool {
    let body = review.review_text.to_lowercase();
    text.split_whitespace().all(|w| body.contains(&w.to_lowercase()))
}

#[async_trait]
impl ReviewStore for MemStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn ping(&self) -> Result<()> {
        if self.up {
            Ok(())
        } else {
            Err(Error::backend(self.name, "connection refused"))
        }
    }

    async fn reset(&self) -> Result<()> {
        Ok(())
    }

    async fn load(&self, reviews: &[Review]) -> Result<LoadSummary> {
        Ok(LoadSummary { accepted: reviews.len() as u64, rejected: 0 })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.reviews.len() as u64)
    }

    async fn footprint(&self) -> Result<StoreFootprint> {
        Ok(StoreFootprint::from_bytes(0))
    }
}

#[async_trait]
impl ReviewQueries for MemStore {
    async fn text_search(&self, text: &str, limit: usize) -> Result<SearchPage> {
        Ok(self.page(self.reviews.iter().filter(|r| mentions(r, text)), limit))
    }

    async fn filter_search(&self, filter: &CategoryFilter, limit: usize) -> Result<SearchPage> {
        let mut matches: Vec<&Review> = self.reviews.iter().filter(|r| filter.matches(r)).collect();
        matches.sort_by(|a, b| b.rating.cmp(&a.rating).then(b.helpful_count.cmp(&a.helpful_count)));
        Ok(self.page(matches.into_iter(), limit))
    }

    async fn compound_search(&self, text: &str, filter: &CategoryFilter, limit: usize) -> Result<SearchPage> {
        Ok(self.page(self.reviews.iter().filter(|r| filter.matches(r) && mentions(r, text)), limit))
    }

    async fn category_stats(&self, category: Category, top_n: usize) -> Result<CategoryStats> {
        if self.broken_stats {
            return Err(Error::backend(self.name, "aggregation timed out"));
        }
        let rows: Vec<&Review> = self.reviews.iter().filter(|r| r.category == category).collect();
        let mut ratings: BTreeMap<u8, u64> = BTreeMap::new();
        let mut products: BTreeMap<String, u64> = BTreeMap::new();
        for r in &rows {
            *ratings.entry(r.rating).or_default() += 1;
            *products.entry(r.product_name.clone()).or_default() += 1;
        }
        let mut top_products: Vec<(String, u64)> = products.into_iter().collect();
        top_products.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_products.truncate(top_n);
        let sum: u64 = rows.iter().map(|r| u64::from(r.rating)).sum();
        Ok(CategoryStats {
            avg_rating: (!rows.is_empty()).then(|| sum as f64 / rows.len() as f64),
            total_reviews: rows.len() as u64,
            rating_distribution: ratings.into_iter().rev().collect(),
            top_products,
        })
    }

    async fn category_breakdown(&self) -> Result<CategoryBreakdown> {
        let counts = Category::ALL
            .into_iter()
            .map(|c| (c, self.reviews.iter().filter(|r| r.category == c).count() as u64))
            .collect();
        Ok(CategoryBreakdown::from_counts(counts))
    }

    async fn matching_ids(&self, filter: &CategoryFilter) -> Result<Vec<ReviewId>> {
        Ok(self.reviews.iter().filter(|r| filter.matches(r)).map(|r| r.id.clone()).collect())
    }
}

fn dataset() -> Vec<Review> {
    ReviewGenerator::with_seed(42).generate(400)
}

#[tokio::test]
async fn category_rating_results_agree_across_stores() {
    let reviews = dataset();
    let harness = ComparisonHarness::new(MemStore::new("left", reviews.clone()), MemStore::new("right", reviews), 10);
    let filter = CategoryFilter::new(Category::Electronics, 4);

    let cmp = harness.run_shape(&QueryShape::CategoryRating { filter }).await;
    for m in [&cmp.left, &cmp.right] {
        let Ok(Outcome::Page(page)) = &m.outcome else { panic!("expected a page from {}", m.store) };
        assert!(page.hits.len() <= 10);
        assert!(page.hits.iter().all(|h| h.category == Category::Electronics && h.rating >= 4));
    }
    assert_eq!(cmp.left.total(), cmp.right.total());

    let parity = harness.check_parity(&filter).await.expect("parity");
    assert!(parity.is_consistent());
    assert_eq!(parity.left_matches, parity.right_matches);
}

#[tokio::test]
async fn parity_reports_diverging_stores() {
    let reviews = dataset();
    let mut fewer = reviews.clone();
    let dropped = fewer.iter().position(|r| r.category == Category::Electronics && r.rating >= 4).expect("a match");
    let gone = fewer.remove(dropped);

    let harness = ComparisonHarness::new(MemStore::new("left", reviews), MemStore::new("right", fewer), 10);
    let parity = harness.check_parity(&CategoryFilter::new(Category::Electronics, 4)).await.expect("parity");
    assert!(!parity.is_consistent());
    assert_eq!(parity.only_left, vec![gone.id]);
    assert!(parity.only_right.is_empty());
    assert!(parity.to_string().contains("Stores differ"));
}

#[tokio::test]
async fn breakdown_buckets_sum_to_record_count() {
    let reviews = dataset();
    let harness = ComparisonHarness::new(MemStore::new("left", reviews.clone()), MemStore::new("right", reviews), 10);
    let cmp = harness.run_shape(&QueryShape::CategoryBreakdown).await;
    let Ok(Outcome::Breakdown(b)) = &cmp.left.outcome else { panic!("expected a breakdown") };
    assert_eq!(b.total(), 400);
    assert!(b.buckets.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[tokio::test]
async fn failing_query_is_recorded_and_the_run_continues() {
    let reviews = dataset();
    let mut right = MemStore::new("right", reviews.clone());
    right.broken_stats = true;
    let harness = ComparisonHarness::new(MemStore::new("left", reviews), right, 10);

    let shapes = canned_shapes(&Settings::default().compare);
    let results = harness.run_all(&shapes).await;
    assert_eq!(results.len(), shapes.len());

    let stats = results
        .iter()
        .find(|c| matches!(c.shape, QueryShape::CategoryStats { .. }))
        .expect("stats shape");
    assert!(stats.left.is_ok());
    assert_eq!(stats.right.outcome, Err("right: aggregation timed out".to_string()));
    assert_eq!(stats.ratio(), None);
    assert!(stats.to_string().contains("Failed"));

    let last = results.last().expect("last");
    assert!(last.left.is_ok() && last.right.is_ok());
    assert!(last.ratio().is_some() || last.left.elapsed.is_zero());
}

#[tokio::test]
async fn unreachable_store_fails_the_ping() {
    let mut down = MemStore::new("right", Vec::new());
    down.up = false;
    let harness = ComparisonHarness::new(MemStore::new("left", Vec::new()), down, 10);
    let err = harness.ping().await.expect_err("down");
    assert!(matches!(err, Error::Unavailable { .. }));
}
