use std::fmt;

use reviewbench_core::config::CompareSettings;
use reviewbench_core::types::{Category, CategoryFilter};

/// One query issued in equivalent form against both stores.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryShape {
    FullText { text: String },
    CategoryRating { filter: CategoryFilter },
    Compound { text: String, filter: CategoryFilter },
    CategoryStats { category: Category, top_n: usize },
    CategoryBreakdown,
}

impl QueryShape {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryShape::FullText { .. } => "full text",
            QueryShape::CategoryRating { .. } => "category + rating",
            QueryShape::Compound { .. } => "compound",
            QueryShape::CategoryStats { .. } => "category stats",
            QueryShape::CategoryBreakdown => "category breakdown",
        }
    }
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryShape::FullText { text } => write!(f, "text search: '{text}'"),
            QueryShape::CategoryRating { filter } => {
                write!(f, "category '{}' with rating >= {}", filter.category, filter.min_rating)
            }
            QueryShape::Compound { text, filter } => write!(
                f,
                "compound: text '{text}' + category '{}' + rating >= {}",
                filter.category, filter.min_rating
            ),
            QueryShape::CategoryStats { category, top_n } => {
                write!(f, "aggregations: category '{category}' (top {top_n} products)")
            }
            QueryShape::CategoryBreakdown => f.write_str("aggregations: reviews per category"),
        }
    }
}

/// The fixed comparison run, parameterised by configuration.
pub fn canned_shapes(settings: &CompareSettings) -> Vec<QueryShape> {
    vec![
        QueryShape::FullText { text: settings.text_query.clone() },
        QueryShape::CategoryRating { filter: settings.filter() },
        QueryShape::Compound { text: settings.compound_text.clone(), filter: settings.compound_filter() },
        QueryShape::CategoryStats { category: settings.aggregation_category, top_n: settings.top_products },
        QueryShape::CategoryBreakdown,
    ]
}
