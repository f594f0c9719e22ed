use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;

use reviewbench_core::config::PostgresSettings;
use reviewbench_core::progress::load_bar;
use reviewbench_core::traits::{ReviewQueries, ReviewStore};
use reviewbench_core::types::{
    Category, CategoryBreakdown, CategoryFilter, CategoryStats, LoadSummary, Review, ReviewId, ReviewSummary,
    SearchPage, StoreFootprint,
};
use reviewbench_core::Result;

use crate::error::{SqlError, BACKEND};
use crate::statements::Statements;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SummaryRow {
    pub id: String,
    pub product_name: String,
    pub category: String,
    pub rating: i32,
    pub review_text: String,
    pub reviewer_name: String,
    pub date: NaiveDateTime,
    pub helpful_count: i32,
}

impl TryFrom<SummaryRow> for ReviewSummary {
    type Error = SqlError;

    fn try_from(row: SummaryRow) -> std::result::Result<Self, SqlError> {
        let bad = |reason: String| SqlError::Row { id: row.id.clone(), reason };
        let category = row.category.parse::<Category>().map_err(|e| bad(e.to_string()))?;
        let rating = u8::try_from(row.rating).map_err(|_| bad(format!("rating {} out of range", row.rating)))?;
        let helpful_count =
            u32::try_from(row.helpful_count).map_err(|_| bad(format!("helpful_count {} is negative", row.helpful_count)))?;
        Ok(Self {
            id: row.id,
            product_name: row.product_name,
            category,
            rating,
            review_text: row.review_text,
            reviewer_name: row.reviewer_name,
            date: row.date,
            helpful_count,
            score: None,
            highlights: Vec::new(),
        })
    }
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

/// The review table behind a small connection pool.
///
/// The pool connects lazily, so construction never touches the network and
/// [`ReviewStore::ping`] is the first round trip.
pub struct PostgresStore {
    pool: PgPool,
    sql: Statements,
}

impl PostgresStore {
    pub fn new(settings: &PostgresSettings) -> Result<Self> {
        let sql = Statements::from_settings(settings)?;
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.database);
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy_with(options);
        Ok(Self { pool, sql })
    }

    pub fn statements(&self) -> &Statements {
        &self.sql
    }

    fn page(rows: Vec<SummaryRow>, total: i64) -> Result<SearchPage> {
        let hits = rows
            .into_iter()
            .map(ReviewSummary::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(SearchPage { total: to_count(total), hits })
    }

    async fn insert_all(&self, reviews: &[Review]) -> std::result::Result<u64, SqlError> {
        let insert = self.sql.insert();
        let pb = load_bar(reviews.len() as u64);
        let mut tx = self.pool.begin().await?;
        for r in reviews {
            let helpful = i32::try_from(r.helpful_count)
                .map_err(|_| SqlError::OutOfRange { column: "helpful_count", value: u64::from(r.helpful_count) })?;
            sqlx::query(&insert)
                .bind(&r.id)
                .bind(&r.product_name)
                .bind(r.category.as_str())
                .bind(i32::from(r.rating))
                .bind(&r.review_text)
                .bind(&r.reviewer_name)
                .bind(&r.reviewer_email)
                .bind(r.date)
                .bind(r.verified_purchase)
                .bind(helpful)
                .execute(&mut *tx)
                .await?;
            pb.inc(1);
        }
        tx.commit().await?;
        pb.finish_with_message("committed");
        Ok(reviews.len() as u64)
    }
}

fn limit(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl ReviewStore for PostgresStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query(self.sql.ping()).execute(&self.pool).await.map_err(SqlError::from)?;
        Ok(())
    }

    /// Drop, create and index in one transaction.
    async fn reset(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(SqlError::from)?;
        sqlx::query(&self.sql.drop_table()).execute(&mut *tx).await.map_err(SqlError::from)?;
        sqlx::query(&self.sql.create_table()).execute(&mut *tx).await.map_err(SqlError::from)?;
        for stmt in self.sql.create_indexes() {
            sqlx::query(&stmt).execute(&mut *tx).await.map_err(SqlError::from)?;
        }
        tx.commit().await.map_err(SqlError::from)?;
        tracing::info!(table = self.sql.table(), "table recreated with indexes");
        Ok(())
    }

    /// Row-wise inserts inside one transaction; any failure rolls the whole
    /// load back.
    async fn load(&self, reviews: &[Review]) -> Result<LoadSummary> {
        let accepted = self.insert_all(reviews).await?;
        Ok(LoadSummary { accepted, rejected: 0 })
    }

    async fn count(&self) -> Result<u64> {
        let n: i64 = sqlx::query_scalar(&self.sql.count_all())
            .fetch_one(&self.pool)
            .await
            .map_err(SqlError::from)?;
        Ok(to_count(n))
    }

    async fn footprint(&self) -> Result<StoreFootprint> {
        let (bytes, pretty): (i64, String) = sqlx::query_as(&self.sql.footprint())
            .fetch_one(&self.pool)
            .await
            .map_err(SqlError::from)?;
        Ok(StoreFootprint { bytes: to_count(bytes), pretty })
    }
}

#[async_trait]
impl ReviewQueries for PostgresStore {
    async fn text_search(&self, text: &str, n: usize) -> Result<SearchPage> {
        let rows: Vec<SummaryRow> = sqlx::query_as(&self.sql.text_page())
            .bind(text)
            .bind(limit(n))
            .fetch_all(&self.pool)
            .await
            .map_err(SqlError::from)?;
        let total: i64 = sqlx::query_scalar(&self.sql.text_count())
            .bind(text)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlError::from)?;
        Self::page(rows, total)
    }

    async fn filter_search(&self, filter: &CategoryFilter, n: usize) -> Result<SearchPage> {
        let rows: Vec<SummaryRow> = sqlx::query_as(&self.sql.filter_page())
            .bind(filter.category.as_str())
            .bind(i32::from(filter.min_rating))
            .bind(limit(n))
            .fetch_all(&self.pool)
            .await
            .map_err(SqlError::from)?;
        let total: i64 = sqlx::query_scalar(&self.sql.filter_count())
            .bind(filter.category.as_str())
            .bind(i32::from(filter.min_rating))
            .fetch_one(&self.pool)
            .await
            .map_err(SqlError::from)?;
        Self::page(rows, total)
    }

    async fn compound_search(&self, text: &str, filter: &CategoryFilter, n: usize) -> Result<SearchPage> {
        let rows: Vec<SummaryRow> = sqlx::query_as(&self.sql.compound_page())
            .bind(text)
            .bind(filter.category.as_str())
            .bind(i32::from(filter.min_rating))
            .bind(limit(n))
            .fetch_all(&self.pool)
            .await
            .map_err(SqlError::from)?;
        let total: i64 = sqlx::query_scalar(&self.sql.compound_count())
            .bind(text)
            .bind(filter.category.as_str())
            .bind(i32::from(filter.min_rating))
            .fetch_one(&self.pool)
            .await
            .map_err(SqlError::from)?;
        Self::page(rows, total)
    }

    async fn category_stats(&self, category: Category, top_n: usize) -> Result<CategoryStats> {
        let (avg_rating, total): (Option<f64>, i64) = sqlx::query_as(&self.sql.stats_summary())
            .bind(category.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(SqlError::from)?;
        let ratings: Vec<(i32, i64)> = sqlx::query_as(&self.sql.stats_ratings())
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(SqlError::from)?;
        let products: Vec<(String, i64)> = sqlx::query_as(&self.sql.stats_products())
            .bind(category.as_str())
            .bind(limit(top_n))
            .fetch_all(&self.pool)
            .await
            .map_err(SqlError::from)?;
        Ok(CategoryStats {
            avg_rating,
            total_reviews: to_count(total),
            rating_distribution: ratings
                .into_iter()
                .filter_map(|(r, n)| u8::try_from(r).ok().map(|r| (r, to_count(n))))
                .collect(),
            top_products: products.into_iter().map(|(p, n)| (p, to_count(n))).collect(),
        })
    }

    async fn category_breakdown(&self) -> Result<CategoryBreakdown> {
        let rows: Vec<(String, i64)> = sqlx::query_as(&self.sql.breakdown())
            .fetch_all(&self.pool)
            .await
            .map_err(SqlError::from)?;
        let counts = rows
            .into_iter()
            .filter_map(|(name, n)| match name.parse::<Category>() {
                Ok(c) => Some((c, to_count(n))),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping group");
                    None
                }
            })
            .collect();
        Ok(CategoryBreakdown::from_counts(counts))
    }

    async fn matching_ids(&self, filter: &CategoryFilter) -> Result<Vec<ReviewId>> {
        let ids: Vec<String> = sqlx::query_scalar(&self.sql.filter_ids())
            .bind(filter.category.as_str())
            .bind(i32::from(filter.min_rating))
            .fetch_all(&self.pool)
            .await
            .map_err(SqlError::from)?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(category: &str, rating: i32) -> SummaryRow {
        SummaryRow {
            id: "r1".into(),
            product_name: "Tablet".into(),
            category: category.into(),
            rating,
            review_text: "Excelente tablet.".into(),
            reviewer_name: "Luis Pérez".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|d| d.and_hms_opt(8, 0, 0)).expect("date"),
            helpful_count: 3,
        }
    }

    #[test]
    fn row_converts_to_summary() {
        let s = ReviewSummary::try_from(row("Electrónica", 5)).expect("convert");
        assert_eq!(s.category, Category::Electronics);
        assert_eq!(s.rating, 5);
        assert_eq!(s.score, None);
    }

    #[test]
    fn row_with_unknown_category_is_rejected() {
        let err = ReviewSummary::try_from(row("Jardín", 5)).expect_err("unknown category");
        assert!(err.to_string().contains("r1"));
        assert!(ReviewSummary::try_from(row("Libros", -1)).is_err());
    }
}
