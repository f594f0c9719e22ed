//! Product catalog demo index: per-document loading, index statistics and a
//! handful of sample searches and aggregations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use reviewbench_core::config::ElasticsearchSettings;
use reviewbench_core::progress::load_bar;
use reviewbench_core::{dataset, Result};

use crate::client::EsClient;
use crate::mapping;
use crate::response::{ClusterInfo, RangeAgg, SearchResponse, StatsAgg, TermsAgg};

pub const PRICE_BAND: (f64, f64) = (100.0, 300.0);
pub const MIN_SCORE: f64 = 4.0;
pub const SAMPLE_NAME: &str = "Logitech";
pub const SAMPLE_CATEGORY: &str = "Accesorios";
pub const SAMPLE_KEYWORD: &str = "inalámbrico";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub nombre: String,
    pub categoria: String,
    pub descripcion: String,
    pub precio: f64,
    pub marca: String,
    pub stock: i64,
    pub calificacion: f64,
    pub fecha_lanzamiento: NaiveDate,
}

pub fn read_products(path: &Path) -> Result<Vec<Product>> {
    dataset::read_json_array(path)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductHit {
    pub product: Product,
    pub score: Option<f32>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub total: u64,
    pub hits: Vec<ProductHit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub documents: u64,
    pub store_bytes: u64,
    pub segments: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub count: u64,
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) => write!(f, "${from:.0} - ${to:.0}"),
            (None, Some(to)) => write!(f, "under ${to:.0}"),
            (Some(from), None) => write!(f, "${from:.0} and up"),
            (None, None) => f.write_str("any price"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogAnalytics {
    pub by_category: Vec<(String, u64)>,
    pub top_brands: Vec<(String, u64)>,
    pub price: Option<PriceStats>,
    pub price_ranges: Vec<PriceRange>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyticsAggs {
    pub by_category: TermsAgg<String>,
    pub by_brand: TermsAgg<String>,
    pub price_stats: StatsAgg,
    pub price_ranges: RangeAgg,
}

impl From<AnalyticsAggs> for CatalogAnalytics {
    fn from(aggs: AnalyticsAggs) -> Self {
        let terms = |agg: TermsAgg<String>| -> Vec<(String, u64)> { agg.buckets.into_iter().map(|b| (b.key, b.doc_count)).collect() };
        let s = aggs.price_stats;
        let price = match (s.count, s.avg, s.min, s.max) {
            (n, Some(avg), Some(min), Some(max)) if n > 0 => Some(PriceStats { avg, min, max }),
            _ => None,
        };
        Self {
            by_category: terms(aggs.by_category),
            top_brands: terms(aggs.by_brand),
            price,
            price_ranges: aggs
                .price_ranges
                .buckets
                .into_iter()
                .map(|b| PriceRange { from: b.from, to: b.to, count: b.doc_count })
                .collect(),
        }
    }
}

pub mod query {
    use super::*;

    pub fn name_match(term: &str) -> Value {
        json!({
            "query": { "match": { "nombre": term } },
            "highlight": { "fields": { "nombre": {} } }
        })
    }

    pub fn price_range(min: f64, max: f64) -> Value {
        json!({
            "query": { "range": { "precio": { "gte": min, "lte": max } } },
            "sort": [{ "precio": { "order": "asc" } }]
        })
    }

    pub fn category(categoria: &str) -> Value {
        json!({ "query": { "term": { "categoria": categoria } } })
    }

    /// Price band and minimum score are required; at least one of the keyword
    /// or category clauses must match.
    pub fn combined() -> Value {
        let (min, max) = PRICE_BAND;
        json!({
            "query": {
                "bool": {
                    "must": [
                        { "range": { "precio": { "gte": min, "lte": max } } },
                        { "range": { "calificacion": { "gte": MIN_SCORE } } }
                    ],
                    "should": [
                        { "match": { "descripcion": SAMPLE_KEYWORD } },
                        { "match": { "categoria": SAMPLE_CATEGORY } }
                    ],
                    "minimum_should_match": 1
                }
            },
            "sort": [
                { "calificacion": { "order": "desc" } },
                { "precio": { "order": "asc" } }
            ]
        })
    }

    pub fn analytics() -> Value {
        let (low, high) = PRICE_BAND;
        json!({
            "size": 0,
            "aggs": {
                "by_category": { "terms": { "field": "categoria", "size": 10 } },
                "by_brand": { "terms": { "field": "marca", "size": 5 } },
                "price_stats": { "stats": { "field": "precio" } },
                "price_ranges": {
                    "range": {
                        "field": "precio",
                        "ranges": [{ "to": low }, { "from": low, "to": high }, { "from": high }]
                    }
                }
            }
        })
    }
}

pub struct ProductCatalog {
    client: EsClient,
    index: String,
    settings: ElasticsearchSettings,
}

impl ProductCatalog {
    pub fn new(settings: &ElasticsearchSettings) -> Result<Self> {
        let client = EsClient::new(&settings.url, Duration::from_secs(settings.timeout_secs))?;
        Ok(Self { client, index: settings.products_index.clone(), settings: settings.clone() })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Ping, then fetch the cluster info.
    pub async fn connect(&self) -> Result<ClusterInfo> {
        self.client.ping().await?;
        Ok(self.client.info().await?)
    }

    pub async fn reset(&self) -> Result<()> {
        if self.client.index_exists(&self.index).await? {
            self.client.delete_index(&self.index).await?;
            tracing::info!(index = %self.index, "deleted existing index");
        }
        self.client.create_index(&self.index, &mapping::product_index(&self.settings)).await?;
        tracing::info!(index = %self.index, "created index");
        Ok(())
    }

    /// Index each product under its own id, then refresh.
    pub async fn load(&self, products: &[Product]) -> Result<u64> {
        let pb = load_bar(products.len() as u64);
        for product in products {
            self.client.index_document(&self.index, &product.id.to_string(), product).await?;
            pb.inc(1);
        }
        pb.finish_with_message("indexed");
        self.client.refresh(&self.index).await?;
        Ok(products.len() as u64)
    }

    pub async fn stats(&self) -> Result<CatalogStats> {
        let documents = self.client.count(&self.index).await?;
        let stats = self.client.stats(&self.index).await?;
        Ok(CatalogStats {
            documents,
            store_bytes: stats.size_in_bytes(&self.index).unwrap_or(0),
            segments: stats.segment_count(&self.index),
        })
    }

    pub async fn search(&self, body: &Value) -> Result<ProductPage> {
        let resp: SearchResponse<Product> = self.client.search(&self.index, body).await?;
        Ok(to_page(resp))
    }

    pub async fn by_name(&self, term: &str) -> Result<ProductPage> {
        self.search(&query::name_match(term)).await
    }

    pub async fn by_price(&self, min: f64, max: f64) -> Result<ProductPage> {
        self.search(&query::price_range(min, max)).await
    }

    pub async fn by_category(&self, categoria: &str) -> Result<ProductPage> {
        self.search(&query::category(categoria)).await
    }

    pub async fn combined(&self) -> Result<ProductPage> {
        self.search(&query::combined()).await
    }

    pub async fn analytics(&self) -> Result<CatalogAnalytics> {
        let resp: SearchResponse<serde::de::IgnoredAny, AnalyticsAggs> =
            self.client.search(&self.index, &query::analytics()).await?;
        resp.aggregations
            .map(CatalogAnalytics::from)
            .ok_or_else(|| reviewbench_core::Error::backend(crate::error::BACKEND, "analytics response has no aggregations"))
    }
}

pub(crate) fn to_page(resp: SearchResponse<Product>) -> ProductPage {
    let total = resp.total();
    let hits = resp
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| {
            let highlights = hit.highlight.get("nombre").cloned().unwrap_or_default();
            hit.source.map(|product| ProductHit { product, score: hit.score, highlights })
        })
        .collect();
    ProductPage { total, hits }
}
