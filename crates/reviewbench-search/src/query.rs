//! Query DSL bodies for the review index.

use serde_json::{json, Value};

use reviewbench_core::types::{Category, CategoryFilter};

use crate::mapping::{CATEGORY, HELPFUL_COUNT, PRODUCT_NAME_KEYWORD, RATING, REVIEW_TEXT};

/// Upper bound on ids fetched by [`matching_ids`]; the default index window.
pub const MAX_ID_WINDOW: usize = reviewbench_core::config::MAX_PAGE_SIZE;

fn filter_clauses(filter: &CategoryFilter) -> [Value; 2] {
    [
        json!({ "term": { CATEGORY: filter.category.as_str() } }),
        json!({ "range": { RATING: { "gte": filter.min_rating } } }),
    ]
}

pub fn text_match(text: &str, size: usize) -> Value {
    json!({
        "query": {
            "match": {
                REVIEW_TEXT: { "query": text, "fuzziness": "AUTO" }
            }
        },
        "size": size,
        "track_total_hits": true
    })
}

pub fn category_rating(filter: &CategoryFilter, size: usize) -> Value {
    let [term, range] = filter_clauses(filter);
    json!({
        "query": { "bool": { "must": [term, range] } },
        "sort": [
            { RATING: { "order": "desc" } },
            { HELPFUL_COUNT: { "order": "desc" } }
        ],
        "size": size,
        "track_total_hits": true
    })
}

pub fn compound(text: &str, filter: &CategoryFilter, size: usize) -> Value {
    let [term, range] = filter_clauses(filter);
    json!({
        "query": {
            "bool": {
                "must": [
                    { "match": { REVIEW_TEXT: text } },
                    term,
                    range
                ]
            }
        },
        "highlight": { "fields": { REVIEW_TEXT: {} } },
        "size": size,
        "track_total_hits": true
    })
}

pub fn category_stats(category: Category, top_n: usize) -> Value {
    json!({
        "query": { "term": { CATEGORY: category.as_str() } },
        "size": 0,
        "track_total_hits": true,
        "aggs": {
            "avg_rating": { "avg": { "field": RATING } },
            "rating_distribution": { "terms": { "field": RATING, "size": 5 } },
            "top_products": {
                "terms": {
                    "field": PRODUCT_NAME_KEYWORD,
                    "size": top_n,
                    "order": [{ "_count": "desc" }, { "_key": "asc" }]
                }
            }
        }
    })
}

pub fn category_breakdown() -> Value {
    json!({
        "size": 0,
        "track_total_hits": true,
        "aggs": {
            "by_category": { "terms": { "field": CATEGORY, "size": Category::ALL.len() } }
        }
    })
}

/// Ids only, no source, for the parity check.
pub fn matching_ids(filter: &CategoryFilter) -> Value {
    let [term, range] = filter_clauses(filter);
    json!({
        "query": { "bool": { "filter": [term, range] } },
        "_source": false,
        "size": MAX_ID_WINDOW,
        "track_total_hits": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_match_is_fuzzy() {
        let q = text_match("excelente calidad", 10);
        assert_eq!(q["query"]["match"]["review_text"]["query"], "excelente calidad");
        assert_eq!(q["query"]["match"]["review_text"]["fuzziness"], "AUTO");
        assert_eq!(q["size"], 10);
    }

    #[test]
    fn category_rating_filters_and_sorts() {
        let q = category_rating(&CategoryFilter::new(Category::Electronics, 4), 10);
        let must = q["query"]["bool"]["must"].as_array().expect("must");
        assert_eq!(must[0]["term"]["category"], "Electrónica");
        assert_eq!(must[1]["range"]["rating"]["gte"], 4);
        assert_eq!(q["sort"][0]["rating"]["order"], "desc");
        assert_eq!(q["sort"][1]["helpful_count"]["order"], "desc");
    }

    #[test]
    fn compound_highlights_review_text() {
        let q = compound("buena calidad", &CategoryFilter::new(Category::Clothing, 4), 10);
        assert_eq!(q["query"]["bool"]["must"].as_array().map(Vec::len), Some(3));
        assert_eq!(q["query"]["bool"]["must"][0]["match"]["review_text"], "buena calidad");
        assert!(q["highlight"]["fields"]["review_text"].is_object());
    }

    #[test]
    fn stats_only_aggregates() {
        let q = category_stats(Category::Books, 5);
        assert_eq!(q["size"], 0);
        assert_eq!(q["aggs"]["top_products"]["terms"]["field"], "product_name.keyword");
        assert_eq!(q["aggs"]["top_products"]["terms"]["size"], 5);
        assert_eq!(q["aggs"]["avg_rating"]["avg"]["field"], "rating");
    }

    #[test]
    fn breakdown_covers_every_category() {
        assert_eq!(category_breakdown()["aggs"]["by_category"]["terms"]["size"], 8);
    }

    #[test]
    fn matching_ids_filters_without_source() {
        let q = matching_ids(&CategoryFilter::new(Category::Books, 3));
        assert_eq!(q["_source"], false);
        assert_eq!(q["size"], MAX_ID_WINDOW);
        assert_eq!(q["track_total_hits"], true);
        assert!(q["query"]["bool"].get("must").is_none());
        let filter = q["query"]["bool"]["filter"].as_array().expect("filter");
        assert_eq!(filter[0]["term"]["category"], "Libros");
        assert_eq!(filter[1]["range"]["rating"]["gte"], 3);
    }
}
