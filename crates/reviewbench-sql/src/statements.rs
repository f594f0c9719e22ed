//! SQL text for the review table.
//!
//! The table name and text-search configuration are spliced into the SQL, so
//! both must be plain identifiers; every value goes through a bind parameter.

use reviewbench_core::config::{is_identifier, PostgresSettings};
use reviewbench_core::{Error, Result};

const SUMMARY_COLUMNS: &str = "id, product_name, category, rating, review_text, reviewer_name, date, helpful_count";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    table: String,
    config: String,
}

impl Statements {
    pub fn new(table: &str, text_search_config: &str) -> Result<Self> {
        for (key, value) in [("table", table), ("text search config", text_search_config)] {
            if !is_identifier(value) {
                return Err(Error::Config(format!("{key} must be a plain identifier, got '{value}'")));
            }
        }
        Ok(Self { table: table.to_string(), config: text_search_config.to_string() })
    }

    pub fn from_settings(settings: &PostgresSettings) -> Result<Self> {
        Self::new(&settings.table, &settings.text_search_config)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn text_match(&self, param: usize) -> String {
        format!(
            "to_tsvector('{cfg}', review_text) @@ plainto_tsquery('{cfg}', ${param})",
            cfg = self.config
        )
    }

    pub fn drop_table(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.table)
    }

    pub fn create_table(&self) -> String {
        format!(
            "CREATE TABLE {} (
    id VARCHAR(255) PRIMARY KEY,
    product_name VARCHAR(255),
    category VARCHAR(100),
    rating INTEGER,
    review_text TEXT,
    reviewer_name VARCHAR(255),
    reviewer_email VARCHAR(255),
    date TIMESTAMP,
    verified_purchase BOOLEAN,
    helpful_count INTEGER
)",
            self.table
        )
    }

    /// B-tree indexes on the filter columns plus the GIN full-text index.
    pub fn create_indexes(&self) -> Vec<String> {
        let t = &self.table;
        let mut stmts: Vec<String> = ["product_name", "category", "rating"]
            .iter()
            .map(|col| format!("CREATE INDEX idx_{t}_{col} ON {t}({col})"))
            .collect();
        stmts.push(format!(
            "CREATE INDEX idx_{t}_review_text_gin ON {t} USING gin(to_tsvector('{}', review_text))",
            self.config
        ));
        stmts
    }

    pub fn insert(&self) -> String {
        format!(
            "INSERT INTO {} (id, product_name, category, rating, review_text, reviewer_name, \
             reviewer_email, date, verified_purchase, helpful_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            self.table
        )
    }

    pub fn ping(&self) -> &'static str {
        "SELECT 1"
    }

    pub fn count_all(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.table)
    }

    pub fn footprint(&self) -> String {
        format!(
            "SELECT pg_total_relation_size('{t}'), pg_size_pretty(pg_total_relation_size('{t}'))",
            t = self.table
        )
    }

    /// `$1` text, `$2` limit.
    pub fn text_page(&self) -> String {
        format!("SELECT {SUMMARY_COLUMNS} FROM {} WHERE {} LIMIT $2", self.table, self.text_match(1))
    }

    pub fn text_count(&self) -> String {
        format!("SELECT COUNT(*) FROM {} WHERE {}", self.table, self.text_match(1))
    }

    /// `$1` category, `$2` minimum rating, `$3` limit.
    pub fn filter_page(&self) -> String {
        format!(
            "SELECT {SUMMARY_COLUMNS} FROM {} WHERE category = $1 AND rating >= $2 \
             ORDER BY rating DESC, helpful_count DESC LIMIT $3",
            self.table
        )
    }

    pub fn filter_count(&self) -> String {
        format!("SELECT COUNT(*) FROM {} WHERE category = $1 AND rating >= $2", self.table)
    }

    pub fn filter_ids(&self) -> String {
        format!("SELECT id FROM {} WHERE category = $1 AND rating >= $2", self.table)
    }

    /// `$1` text, `$2` category, `$3` minimum rating, `$4` limit.
    pub fn compound_page(&self) -> String {
        format!(
            "SELECT {SUMMARY_COLUMNS} FROM {} WHERE {} AND category = $2 AND rating >= $3 LIMIT $4",
            self.table,
            self.text_match(1)
        )
    }

    pub fn compound_count(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {} AND category = $2 AND rating >= $3",
            self.table,
            self.text_match(1)
        )
    }

    /// `AVG` is cast so it decodes as a float, not NUMERIC.
    pub fn stats_summary(&self) -> String {
        format!("SELECT AVG(rating)::float8, COUNT(*) FROM {} WHERE category = $1", self.table)
    }

    pub fn stats_ratings(&self) -> String {
        format!(
            "SELECT rating, COUNT(*) FROM {} WHERE category = $1 GROUP BY rating ORDER BY rating DESC",
            self.table
        )
    }

    /// `$1` category, `$2` top-N. Ties break on byte order, as the search
    /// side's `_key` ordering does.
    pub fn stats_products(&self) -> String {
        format!(
            "SELECT product_name, COUNT(*) AS n FROM {} WHERE category = $1 \
             GROUP BY product_name ORDER BY n DESC, product_name COLLATE \"C\" LIMIT $2",
            self.table
        )
    }

    pub fn breakdown(&self) -> String {
        format!("SELECT category, COUNT(*) FROM {} GROUP BY category", self.table)
    }
}
