//! Domain types shared by the generator, both stores and the comparison harness.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ReviewId = String;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Product category. Serialized with its display name, which is also the
/// value stored in the `category` keyword field and SQL column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electrónica")]
    Electronics,
    #[serde(rename = "Libros")]
    Books,
    #[serde(rename = "Ropa")]
    Clothing,
    #[serde(rename = "Hogar")]
    Home,
    #[serde(rename = "Deportes")]
    Sports,
    #[serde(rename = "Juguetes")]
    Toys,
    #[serde(rename = "Alimentos")]
    Food,
    #[serde(rename = "Belleza")]
    Beauty,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Books,
        Category::Clothing,
        Category::Home,
        Category::Sports,
        Category::Toys,
        Category::Food,
        Category::Beauty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electronics => "Electrónica",
            Category::Books => "Libros",
            Category::Clothing => "Ropa",
            Category::Home => "Hogar",
            Category::Sports => "Deportes",
            Category::Toys => "Juguetes",
            Category::Food => "Alimentos",
            Category::Beauty => "Belleza",
        }
    }

    /// Products sold under this category.
    pub fn products(self) -> &'static [&'static str] {
        match self {
            Category::Electronics => &["Laptop", "Smartphone", "Auriculares", "Tablet", "Smart TV", "Cámara Digital"],
            Category::Books => &["Novela Fantástica", "Libro de Cocina", "Biografía", "Ciencia Ficción", "Historia"],
            Category::Clothing => &["Camiseta", "Pantalón", "Vestido", "Chaqueta", "Zapatos", "Gorra"],
            Category::Home => &["Sartén", "Lámpara", "Cojín", "Cortinas", "Reloj de Pared", "Florero"],
            Category::Sports => &["Pelota de Fútbol", "Raqueta de Tenis", "Bicicleta", "Pesas", "Yoga Mat"],
            Category::Toys => &["Muñeca", "Coche de Juguete", "Puzzle", "Peluche", "Juego de Mesa"],
            Category::Food => &["Café Orgánico", "Chocolate", "Aceite de Oliva", "Miel", "Té Verde"],
            Category::Beauty => &["Crema Facial", "Shampoo", "Perfume", "Maquillaje", "Protector Solar"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One synthetic product review. Field names match the JSON handoff file,
/// the index mapping and the SQL columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_name: String,
    pub category: Category,
    pub rating: u8,
    pub review_text: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub date: NaiveDateTime,
    pub verified_purchase: bool,
    pub helpful_count: u32,
}

impl Review {
    pub fn has_valid_rating(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

/// A category plus an inclusive minimum rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    pub category: Category,
    pub min_rating: u8,
}

impl CategoryFilter {
    pub fn new(category: Category, min_rating: u8) -> Self {
        Self { category, min_rating }
    }

    pub fn matches(&self, review: &Review) -> bool {
        review.category == self.category && review.rating >= self.min_rating
    }
}

/// The subset of a review returned by search queries.
///
/// `score` is only set by engines that rank (the search engine); `highlights`
/// holds matched fragments when the query asked for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub id: ReviewId,
    pub product_name: String,
    pub category: Category,
    pub rating: u8,
    pub review_text: String,
    pub reviewer_name: String,
    pub date: NaiveDateTime,
    pub helpful_count: u32,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl From<&Review> for ReviewSummary {
    fn from(r: &Review) -> Self {
        Self {
            id: r.id.clone(),
            product_name: r.product_name.clone(),
            category: r.category,
            rating: r.rating,
            review_text: r.review_text.clone(),
            reviewer_name: r.reviewer_name.clone(),
            date: r.date,
            helpful_count: r.helpful_count,
            score: None,
            highlights: Vec::new(),
        }
    }
}

/// First `limit` hits plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub total: u64,
    pub hits: Vec<ReviewSummary>,
}

/// Per-category aggregation: average, distribution and top products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStats {
    pub avg_rating: Option<f64>,
    pub total_reviews: u64,
    /// `(rating, count)` ordered by rating descending.
    pub rating_distribution: Vec<(u8, u64)>,
    /// `(product_name, count)` ordered by count descending, then name.
    pub top_products: Vec<(String, u64)>,
}

/// `(category, count)` for every non-empty category, largest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    pub buckets: Vec<(Category, u64)>,
}

impl CategoryBreakdown {
    pub fn from_counts(mut buckets: Vec<(Category, u64)>) -> Self {
        buckets.retain(|(_, n)| *n > 0);
        buckets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        Self { buckets }
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|(_, n)| n).sum()
    }
}

/// Result of loading a dataset into a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub accepted: u64,
    pub rejected: u64,
}

/// On-disk size of an index or table as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFootprint {
    pub bytes: u64,
    pub pretty: String,
}

impl StoreFootprint {
    /// Builds a footprint whose display form is megabytes with two decimals.
    pub fn from_bytes(bytes: u64) -> Self {
        let mb = bytes as f64 / (1024.0 * 1024.0);
        Self { bytes, pretty: format!("{mb:.2} MB") }
    }
}

/// Render a 1-5 rating as stars.
pub fn stars(rating: u8) -> String {
    "⭐".repeat(rating as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_display_name() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().expect("parse"), c);
            let json = serde_json::to_string(&c).expect("ser");
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
        assert!("Electronica".parse::<Category>().is_err());
    }

    #[test]
    fn breakdown_drops_empty_and_sorts_largest_first() {
        let b = CategoryBreakdown::from_counts(vec![
            (Category::Books, 3),
            (Category::Toys, 0),
            (Category::Beauty, 7),
            (Category::Clothing, 3),
        ]);
        assert_eq!(b.buckets, vec![(Category::Beauty, 7), (Category::Books, 3), (Category::Clothing, 3)]);
        assert_eq!(b.total(), 13);
    }

    #[test]
    fn footprint_formats_megabytes() {
        assert_eq!(StoreFootprint::from_bytes(3 * 1024 * 1024 / 2).pretty, "1.50 MB");
    }
}
