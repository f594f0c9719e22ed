use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{Category, CategoryFilter, MAX_RATING, MIN_RATING};

/// Elasticsearch's default `index.max_result_window`; larger pages are
/// refused by the search side.
pub const MAX_PAGE_SIZE: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub elasticsearch: ElasticsearchSettings,
    pub postgres: PostgresSettings,
    pub readiness: ReadinessSettings,
    pub data: DataSettings,
    pub compare: CompareSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchSettings {
    pub url: String,
    pub index: String,
    pub products_index: String,
    pub bulk_chunk_size: usize,
    pub timeout_secs: u64,
    pub shards: u32,
    pub replicas: u32,
    pub analyzer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: String,
    pub text_search_config: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSettings {
    pub max_retries: u32,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    pub reviews_file: String,
    pub products_file: String,
    pub review_count: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSettings {
    pub page_size: usize,
    pub text_query: String,
    pub filter_category: Category,
    pub min_rating: u8,
    pub compound_text: String,
    pub compound_category: Category,
    pub aggregation_category: Category,
    pub top_products: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            elasticsearch: ElasticsearchSettings {
                url: "http://localhost:9200".to_string(),
                index: "product_reviews".to_string(),
                products_index: "productos".to_string(),
                bulk_chunk_size: 500,
                timeout_secs: 30,
                shards: 1,
                replicas: 0,
                analyzer: "spanish".to_string(),
            },
            postgres: PostgresSettings {
                host: "localhost".to_string(),
                port: 5432,
                user: "admin".to_string(),
                password: "admin123".to_string(),
                database: "products_db".to_string(),
                table: "product_reviews".to_string(),
                text_search_config: "spanish".to_string(),
                max_connections: 2,
            },
            readiness: ReadinessSettings { max_retries: 30, interval_secs: 2 },
            data: DataSettings {
                reviews_file: "sample_reviews.json".to_string(),
                products_file: "productos.json".to_string(),
                review_count: 1000,
                seed: None,
            },
            compare: CompareSettings {
                page_size: 10,
                text_query: "excelente calidad".to_string(),
                filter_category: Category::Electronics,
                min_rating: 4,
                compound_text: "buena calidad".to_string(),
                compound_category: Category::Clothing,
                aggregation_category: Category::Books,
                top_products: 5,
            },
        }
    }
}

impl Settings {
    /// Defaults, then `config.toml`, then `config.<env>.toml`, then `APP_*`
    /// variables (`__` separates sections, e.g. `APP_POSTGRES__PORT`).
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let settings: Settings = Self::figment(env_name)
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn figment(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.compare.page_size == 0 {
            return Err(Error::Config("compare.page_size must be at least 1".into()));
        }
        if self.compare.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "compare.page_size must be at most {MAX_PAGE_SIZE}, got {}",
                self.compare.page_size
            )));
        }
        if self.compare.top_products == 0 {
            return Err(Error::Config("compare.top_products must be at least 1".into()));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.compare.min_rating) {
            return Err(Error::Config(format!(
                "compare.min_rating must be within {MIN_RATING}..={MAX_RATING}, got {}",
                self.compare.min_rating
            )));
        }
        if self.readiness.max_retries == 0 {
            return Err(Error::Config("readiness.max_retries must be at least 1".into()));
        }
        if self.elasticsearch.bulk_chunk_size == 0 {
            return Err(Error::Config("elasticsearch.bulk_chunk_size must be at least 1".into()));
        }
        check_identifier("postgres.table", &self.postgres.table)?;
        check_identifier("postgres.text_search_config", &self.postgres.text_search_config)?;
        Ok(())
    }

    pub fn reviews_path(&self) -> PathBuf {
        expand_path(&self.data.reviews_file)
    }

    pub fn products_path(&self) -> PathBuf {
        expand_path(&self.data.products_file)
    }
}

impl ReadinessSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl CompareSettings {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter::new(self.filter_category, self.min_rating)
    }

    pub fn compound_filter(&self) -> CategoryFilter {
        CategoryFilter::new(self.compound_category, self.min_rating)
    }
}

/// Table and text-search configuration names end up inside SQL text, so only
/// plain identifiers are accepted.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

fn check_identifier(key: &str, value: &str) -> Result<()> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(Error::Config(format!("{key} must be a plain identifier, got '{value}'")))
    }
}

/// `~` and `$VAR`/`${VAR}` expansion for configured file names. Unset
/// variables leave the input as written; nothing is canonicalized.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
