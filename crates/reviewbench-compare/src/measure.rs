//! Timed results and their console rendering.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use reviewbench_core::types::{stars, CategoryBreakdown, CategoryStats, SearchPage};
use reviewbench_core::Result;

use crate::shape::QueryShape;

const SAMPLE_CHARS: usize = 100;

/// What a store answered for one shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Page(SearchPage),
    Stats(CategoryStats),
    Breakdown(CategoryBreakdown),
}

/// One store's timed answer, or the error it returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub store: &'static str,
    pub elapsed: Duration,
    pub outcome: std::result::Result<Outcome, String>,
}

impl Measurement {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn total(&self) -> Option<u64> {
        match &self.outcome {
            Ok(Outcome::Page(p)) => Some(p.total),
            Ok(Outcome::Stats(s)) => Some(s.total_reviews),
            Ok(Outcome::Breakdown(b)) => Some(b.total()),
            Err(_) => None,
        }
    }
}

/// Await `fut` and record the wall-clock time around it.
pub async fn measure<T, Fut, W>(store: &'static str, fut: Fut, wrap: W) -> Measurement
where
    Fut: Future<Output = Result<T>>,
    W: FnOnce(T) -> Outcome,
{
    let start = Instant::now();
    let result = fut.await;
    let elapsed = start.elapsed();
    let outcome = match result {
        Ok(v) => Ok(wrap(v)),
        Err(e) => {
            tracing::warn!(store, error = %e, "query failed");
            Err(e.to_string())
        }
    };
    Measurement { store, elapsed, outcome }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeComparison {
    pub shape: QueryShape,
    /// The search engine, the baseline of the ratio.
    pub left: Measurement,
    pub right: Measurement,
}

impl ShapeComparison {
    /// `right / left` elapsed; `None` when either side failed or the
    /// baseline measured zero.
    pub fn ratio(&self) -> Option<f64> {
        if !self.left.is_ok() || !self.right.is_ok() || self.left.elapsed.is_zero() {
            return None;
        }
        Some(self.right.elapsed.as_secs_f64() / self.left.elapsed.as_secs_f64())
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(SAMPLE_CHARS).collect();
    if text.chars().count() > SAMPLE_CHARS {
        out.push_str("...");
    }
    out
}

fn write_page(f: &mut fmt::Formatter<'_>, page: &SearchPage) -> fmt::Result {
    writeln!(f, "  📄 Results found: {}", page.total)?;
    writeln!(f, "  📋 Showing: first {}", page.hits.len())?;
    if let Some(first) = page.hits.first() {
        writeln!(f, "  Sample result:")?;
        writeln!(f, "    Product: {}", first.product_name)?;
        writeln!(f, "    Rating: {}", stars(first.rating))?;
        writeln!(f, "    Review: {}", preview(&first.review_text))?;
        if let Some(fragment) = first.highlights.first() {
            writeln!(f, "    Highlight: {fragment}")?;
        }
    }
    Ok(())
}

fn write_stats(f: &mut fmt::Formatter<'_>, stats: &CategoryStats) -> fmt::Result {
    match stats.avg_rating {
        Some(avg) => writeln!(f, "  ⭐ Average rating: {avg:.2}")?,
        None => writeln!(f, "  ⭐ Average rating: n/a")?,
    }
    writeln!(f, "  📄 Reviews: {}", stats.total_reviews)?;
    writeln!(f, "  📊 Rating distribution:")?;
    for (rating, count) in &stats.rating_distribution {
        writeln!(f, "    {}: {count} reviews", stars(*rating))?;
    }
    writeln!(f, "  🏆 Top products:")?;
    for (name, count) in &stats.top_products {
        writeln!(f, "    {name}: {count}")?;
    }
    Ok(())
}

fn write_breakdown(f: &mut fmt::Formatter<'_>, breakdown: &CategoryBreakdown) -> fmt::Result {
    writeln!(f, "  📄 Reviews: {}", breakdown.total())?;
    for (category, count) in &breakdown.buckets {
        writeln!(f, "    {category}: {count}")?;
    }
    Ok(())
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 {}:", self.store)?;
        writeln!(f, "  ⏱️  Time: {:.2} ms", self.elapsed_ms())?;
        match &self.outcome {
            Ok(Outcome::Page(page)) => write_page(f, page),
            Ok(Outcome::Stats(stats)) => write_stats(f, stats),
            Ok(Outcome::Breakdown(b)) => write_breakdown(f, b),
            Err(e) => writeln!(f, "  ✗ Failed: {e}"),
        }
    }
}

impl fmt::Display for ShapeComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "🔍 {}", self.shape)?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "{}", self.left)?;
        writeln!(f, "{}", self.right)?;
        match self.ratio() {
            Some(r) => writeln!(f, "⚡ {} took {r:.2}x the time of {}", self.right.store, self.left.store),
            None => writeln!(f, "⚡ ratio: n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(ms: u64, ok: bool) -> Measurement {
        Measurement {
            store: "x",
            elapsed: Duration::from_millis(ms),
            outcome: if ok { Ok(Outcome::Page(SearchPage::default())) } else { Err("boom".into()) },
        }
    }

    fn cmp(left: Measurement, right: Measurement) -> ShapeComparison {
        ShapeComparison { shape: QueryShape::CategoryBreakdown, left, right }
    }

    #[test]
    fn ratio_is_right_over_left() {
        let r = cmp(m(4, true), m(10, true)).ratio().expect("ratio");
        assert!((r - 2.5).abs() < 1e-9);
    }

    #[test]
    fn ratio_is_undefined_on_failure_or_zero_baseline() {
        assert_eq!(cmp(m(4, false), m(10, true)).ratio(), None);
        assert_eq!(cmp(m(4, true), m(10, false)).ratio(), None);
        assert_eq!(cmp(m(0, true), m(10, true)).ratio(), None);
        assert!(cmp(m(0, true), m(10, true)).to_string().contains("ratio: n/a"));
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "ñ".repeat(150);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 103);
        assert!(p.ends_with("..."));
        assert_eq!(preview("corto"), "corto");
    }
}
