use std::collections::BTreeSet;
use std::fmt;

use reviewbench_core::readiness::{wait_until_ready, RetryPolicy};
use reviewbench_core::traits::{ReviewQueries, ReviewStore};
use reviewbench_core::types::{CategoryFilter, ReviewId};
use reviewbench_core::Result;

use crate::measure::{measure, Measurement, Outcome, ShapeComparison};
use crate::shape::QueryShape;

/// Runs every shape against a baseline store (`left`) and a contender
/// (`right`), one query at a time.
pub struct ComparisonHarness<L, R> {
    left: L,
    right: R,
    page_size: usize,
}

/// Counts and filter membership as seen by each store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityReport {
    pub left: &'static str,
    pub right: &'static str,
    pub left_count: u64,
    pub right_count: u64,
    pub filter: CategoryFilter,
    pub left_matches: usize,
    pub right_matches: usize,
    pub only_left: Vec<ReviewId>,
    pub only_right: Vec<ReviewId>,
}

impl ParityReport {
    pub fn is_consistent(&self) -> bool {
        self.left_count == self.right_count && self.only_left.is_empty() && self.only_right.is_empty()
    }
}

impl fmt::Display for ParityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records: {} {} / {} {}", self.left, self.left_count, self.right, self.right_count)?;
        writeln!(
            f,
            "Matches for '{}' rating >= {}: {} {} / {} {}",
            self.filter.category, self.filter.min_rating, self.left, self.left_matches, self.right, self.right_matches
        )?;
        if self.is_consistent() {
            writeln!(f, "✓ Both stores hold the same records")
        } else {
            writeln!(
                f,
                "⚠ Stores differ: {} only in {}, {} only in {}; timings compare different data",
                self.only_left.len(),
                self.left,
                self.only_right.len(),
                self.right
            )
        }
    }
}

impl<L, R> ComparisonHarness<L, R>
where
    L: ReviewStore + ReviewQueries,
    R: ReviewStore + ReviewQueries,
{
    pub fn new(left: L, right: R, page_size: usize) -> Self {
        Self { left, right, page_size: page_size.max(1) }
    }

    /// One probe per store, no retries.
    pub async fn ping(&self) -> Result<()> {
        wait_until_ready(self.left.name(), RetryPolicy::once(), || self.left.ping()).await?;
        wait_until_ready(self.right.name(), RetryPolicy::once(), || self.right.ping()).await?;
        Ok(())
    }

    pub async fn check_parity(&self, filter: &CategoryFilter) -> Result<ParityReport> {
        let left_count = self.left.count().await?;
        let right_count = self.right.count().await?;
        let left_ids: BTreeSet<ReviewId> = self.left.matching_ids(filter).await?.into_iter().collect();
        let right_ids: BTreeSet<ReviewId> = self.right.matching_ids(filter).await?.into_iter().collect();
        let report = ParityReport {
            left: self.left.name(),
            right: self.right.name(),
            left_count,
            right_count,
            filter: *filter,
            left_matches: left_ids.len(),
            right_matches: right_ids.len(),
            only_left: left_ids.difference(&right_ids).cloned().collect(),
            only_right: right_ids.difference(&left_ids).cloned().collect(),
        };
        if !report.is_consistent() {
            tracing::warn!(
                left_count,
                right_count,
                only_left = report.only_left.len(),
                only_right = report.only_right.len(),
                "stores are out of sync"
            );
        }
        Ok(report)
    }

    async fn run_on<S: ReviewQueries>(store: &S, name: &'static str, shape: &QueryShape, limit: usize) -> Measurement {
        match shape {
            QueryShape::FullText { text } => measure(name, store.text_search(text, limit), Outcome::Page).await,
            QueryShape::CategoryRating { filter } => {
                measure(name, store.filter_search(filter, limit), Outcome::Page).await
            }
            QueryShape::Compound { text, filter } => {
                measure(name, store.compound_search(text, filter, limit), Outcome::Page).await
            }
            QueryShape::CategoryStats { category, top_n } => {
                measure(name, store.category_stats(*category, *top_n), Outcome::Stats).await
            }
            QueryShape::CategoryBreakdown => measure(name, store.category_breakdown(), Outcome::Breakdown).await,
        }
    }

    /// Left first, then right. Failures are recorded, never propagated.
    pub async fn run_shape(&self, shape: &QueryShape) -> ShapeComparison {
        let left = Self::run_on(&self.left, self.left.name(), shape, self.page_size).await;
        let right = Self::run_on(&self.right, self.right.name(), shape, self.page_size).await;
        ShapeComparison { shape: shape.clone(), left, right }
    }

    pub async fn run_all(&self, shapes: &[QueryShape]) -> Vec<ShapeComparison> {
        let mut out = Vec::with_capacity(shapes.len());
        for shape in shapes {
            out.push(self.run_shape(shape).await);
        }
        out
    }
}
