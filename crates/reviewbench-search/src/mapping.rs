use serde_json::{json, Value};

use reviewbench_core::config::ElasticsearchSettings;

pub const PRODUCT_NAME_KEYWORD: &str = "product_name.keyword";
pub const CATEGORY: &str = "category";
pub const RATING: &str = "rating";
pub const REVIEW_TEXT: &str = "review_text";
pub const HELPFUL_COUNT: &str = "helpful_count";

fn index_settings(settings: &ElasticsearchSettings) -> Value {
    json!({
        "number_of_shards": settings.shards,
        "number_of_replicas": settings.replicas
    })
}

/// Explicit mapping for the review index. `review_text` goes through the
/// language analyzer; names keep a `keyword` sub-field for terms aggregations.
pub fn review_index(settings: &ElasticsearchSettings) -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "product_name": { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
                "category": { "type": "keyword" },
                "rating": { "type": "integer" },
                "review_text": { "type": "text", "analyzer": settings.analyzer },
                "reviewer_name": { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
                "reviewer_email": { "type": "keyword" },
                "date": { "type": "date" },
                "verified_purchase": { "type": "boolean" },
                "helpful_count": { "type": "integer" }
            }
        },
        "settings": index_settings(settings)
    })
}

pub fn product_index(settings: &ElasticsearchSettings) -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "integer" },
                "nombre": {
                    "type": "text",
                    "analyzer": settings.analyzer,
                    "fields": { "keyword": { "type": "keyword" } }
                },
                "categoria": { "type": "keyword" },
                "descripcion": { "type": "text", "analyzer": settings.analyzer },
                "precio": { "type": "float" },
                "marca": { "type": "keyword" },
                "stock": { "type": "integer" },
                "calificacion": { "type": "float" },
                "fecha_lanzamiento": { "type": "date" }
            }
        },
        "settings": index_settings(settings)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewbench_core::config::Settings;

    #[test]
    fn review_mapping_uses_configured_analyzer_and_shards() {
        let es = Settings::default().elasticsearch;
        let m = review_index(&es);
        assert_eq!(m["mappings"]["properties"]["review_text"]["analyzer"], "spanish");
        assert_eq!(m["mappings"]["properties"]["category"]["type"], "keyword");
        assert_eq!(m["mappings"]["properties"]["product_name"]["fields"]["keyword"]["type"], "keyword");
        assert_eq!(m["settings"]["number_of_shards"], 1);
        assert_eq!(m["settings"]["number_of_replicas"], 0);
    }
}
