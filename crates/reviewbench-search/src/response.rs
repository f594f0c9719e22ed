//! Response bodies, decoded only as far as the callers need them.

use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub cluster_name: String,
    pub version: VersionInfo,
}

#[derive(Debug, Deserialize)]
pub struct VersionInfo {
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse<T, A = IgnoredAny> {
    pub hits: Hits<T>,
    pub aggregations: Option<A>,
}

impl<T, A> SearchResponse<T, A> {
    pub fn total(&self) -> u64 {
        self.hits.total.as_ref().map_or(self.hits.hits.len() as u64, |t| t.value)
    }

    /// False when the server only counted up to a lower bound.
    pub fn total_is_exact(&self) -> bool {
        !matches!(&self.hits.total, Some(t) if t.relation == "gte")
    }
}

#[derive(Debug, Deserialize)]
pub struct Hits<T> {
    pub total: Option<TotalHits>,
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    #[serde(default)]
    pub relation: String,
}

#[derive(Debug, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f32>,
    #[serde(rename = "_source")]
    pub source: Option<T>,
    #[serde(default)]
    pub highlight: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct TermsAgg<K> {
    pub buckets: Vec<TermsBucket<K>>,
}

#[derive(Debug, Deserialize)]
pub struct TermsBucket<K> {
    pub key: K,
    pub doc_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ValueAgg {
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct StatsAgg {
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RangeAgg {
    pub buckets: Vec<RangeBucket>,
}

#[derive(Debug, Deserialize)]
pub struct RangeBucket {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub doc_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    pub errors: bool,
    pub items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItem {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub status: u16,
    pub error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItemError {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

impl BulkResponse {
    /// Items the server refused, as `(id, error)`.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &BulkItemError)> + '_ {
        self.items
            .iter()
            .flat_map(|action| action.values())
            .filter_map(|item| item.error.as_ref().map(|e| (item.id.as_deref().unwrap_or("?"), e)))
    }

    pub fn succeeded(&self) -> u64 {
        self.items.iter().flat_map(|a| a.values()).filter(|i| i.error.is_none() && (200..300).contains(&i.status)).count() as u64
    }
}

#[derive(Debug, Deserialize)]
pub struct IndexStats {
    pub indices: HashMap<String, IndexStatsEntry>,
}

#[derive(Debug, Deserialize)]
pub struct IndexStatsEntry {
    pub total: StatsSection,
}

#[derive(Debug, Deserialize)]
pub struct StatsSection {
    pub store: StoreStats,
    pub segments: Option<SegmentStats>,
}

#[derive(Debug, Deserialize)]
pub struct StoreStats {
    pub size_in_bytes: u64,
}

#[derive(Debug, Deserialize)]
pub struct SegmentStats {
    pub count: u64,
}

impl IndexStats {
    pub fn size_in_bytes(&self, index: &str) -> Option<u64> {
        self.indices.get(index).map(|e| e.total.store.size_in_bytes)
    }

    pub fn segment_count(&self, index: &str) -> Option<u64> {
        self.indices.get(index).and_then(|e| e.total.segments.as_ref()).map(|s| s.count)
    }
}
