use reviewbench_core::config::Settings;
use reviewbench_core::readiness::RetryPolicy;
use reviewbench_core::traits::{ReviewQueries, ReviewStore};
use reviewbench_core::types::Category;
use reviewbench_core::{dataset, pipeline, Error};
use reviewbench_datagen::ReviewGenerator;
use reviewbench_sql::{PostgresStore, Statements};

fn statements() -> Statements {
    Statements::new("product_reviews", "spanish").expect("statements")
}

#[test]
fn ddl_has_primary_key_and_gin_index() {
    let sql = statements();
    assert_eq!(sql.drop_table(), "DROP TABLE IF EXISTS product_reviews");
    let create = sql.create_table();
    assert!(create.starts_with("CREATE TABLE product_reviews ("));
    assert!(create.contains("id VARCHAR(255) PRIMARY KEY"));
    assert!(create.contains("date TIMESTAMP"));

    let indexes = sql.create_indexes();
    assert_eq!(indexes.len(), 4);
    assert!(indexes[0].ends_with("ON product_reviews(product_name)"));
    assert!(indexes[3].contains("USING gin(to_tsvector('spanish', review_text))"));
}

#[test]
fn queries_bind_every_value() {
    let sql = statements();
    assert_eq!(sql.insert().matches('$').count(), 10);
    assert!(sql
        .text_page()
        .contains("to_tsvector('spanish', review_text) @@ plainto_tsquery('spanish', $1) LIMIT $2"));
    assert!(sql.filter_page().ends_with("ORDER BY rating DESC, helpful_count DESC LIMIT $3"));
    assert!(sql.compound_page().contains("AND category = $2 AND rating >= $3 LIMIT $4"));
    assert!(sql.compound_count().starts_with("SELECT COUNT(*) FROM product_reviews WHERE to_tsvector"));
    assert!(sql.stats_summary().contains("AVG(rating)::float8"));
    assert!(sql.stats_ratings().ends_with("GROUP BY rating ORDER BY rating DESC"));
    assert!(sql.stats_products().ends_with(r#"ORDER BY n DESC, product_name COLLATE "C" LIMIT $2"#));
    assert_eq!(sql.breakdown(), "SELECT category, COUNT(*) FROM product_reviews GROUP BY category");
}

#[test]
fn configured_names_flow_into_sql() {
    let sql = Statements::new("reviews_es", "simple").expect("statements");
    assert!(sql.text_count().contains("plainto_tsquery('simple', $1)"));
    assert!(sql.footprint().contains("pg_total_relation_size('reviews_es')"));
}

#[test]
fn unsafe_names_are_rejected() {
    for (table, cfg) in [("reviews; DROP TABLE x", "spanish"), ("reviews", "spanish')"), ("1reviews", "spanish")] {
        assert!(matches!(Statements::new(table, cfg), Err(Error::Config(_))), "{table} / {cfg}");
    }
}

/// Needs a database reachable with the `postgres` settings (`APP_POSTGRES__*`).
/// Uses its own table so a loaded demo table is left alone.
#[tokio::test]
#[ignore]
async fn loading_twice_yields_the_same_count() {
    let mut settings = Settings::load_for_env("test").expect("settings");
    settings.postgres.table = "reviewbench_it_reviews".to_string();
    let store = PostgresStore::new(&settings.postgres).expect("store");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("reviews.json");
    let reviews = ReviewGenerator::with_seed(5).generate(1000);
    dataset::write_reviews(&path, &reviews).expect("write");

    for _ in 0..2 {
        let report = pipeline::load_into(&store, &path, RetryPolicy::once()).await.expect("load");
        assert_eq!(report.stored, 1000);
        assert!(report.is_complete());
        assert!(report.footprint.bytes > 0);
    }

    let breakdown = store.category_breakdown().await.expect("breakdown");
    assert_eq!(breakdown.total(), 1000);

    let stats = store.category_stats(Category::Books, 5).await.expect("stats");
    let expected = reviews.iter().filter(|r| r.category == Category::Books).count() as u64;
    assert_eq!(stats.total_reviews, expected);
    assert!(stats.top_products.len() <= 5);
    assert_eq!(store.count().await.expect("count"), 1000);
}
