use clap::Parser;
use std::path::PathBuf;

use reviewbench_cli::{exit_with, init_tracing, input_path, load_settings, print_separator};
use reviewbench_search::products::{self, ProductCatalog, ProductPage, PRICE_BAND, SAMPLE_CATEGORY, SAMPLE_NAME};

#[derive(Parser)]
#[command(name = "reviewbench-products")]
#[command(about = "Load the product catalog into Elasticsearch and run sample queries")]
struct Cli {
    /// Products file (defaults to data.products_file)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn print_page(page: &ProductPage, line: impl Fn(&products::ProductHit) -> String) {
    println!("   Results found: {}", page.total);
    for hit in &page.hits {
        println!("   • {}", line(hit));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings()?;
    let path = input_path(cli.file, settings.products_path());
    let catalog = ProductCatalog::new(&settings.elasticsearch)?;

    println!("🚀 PRODUCT CATALOG DEMO");
    println!("{}", "=".repeat(50));

    let info = catalog.connect().await?;
    println!("✅ Connected to Elasticsearch {}", info.version.number);

    let items = products::read_products(&path)?;
    catalog.reset().await?;
    println!("🎯 Index '{}' created", catalog.index());
    println!("📂 Loading {} products...", items.len());
    let loaded = catalog.load(&items).await?;
    println!("✅ {loaded} products loaded");

    match catalog.stats().await {
        Ok(stats) => {
            println!("\n📊 INDEX STATISTICS '{}':", catalog.index());
            println!("   • Documents: {}", stats.documents);
            println!("   • Index size: {} bytes", stats.store_bytes);
            match stats.segments {
                Some(n) => println!("   • Segments: {n}"),
                None => println!("   • Segments: n/a"),
            }
        }
        Err(e) => println!("❌ Could not read index statistics: {e}"),
    }

    print_separator();
    println!("🔍 SAMPLE QUERIES");

    println!("\n🔍 NAME SEARCH: '{SAMPLE_NAME}'");
    match catalog.by_name(SAMPLE_NAME).await {
        Ok(page) => print_page(&page, |h| {
            format!("{} - ${} (score: {:.2})", h.product.nombre, h.product.precio, h.score.unwrap_or(0.0))
        }),
        Err(e) => println!("❌ Name search failed: {e}"),
    }

    let (min, max) = PRICE_BAND;
    println!("\n💰 PRICE RANGE: ${min} - ${max}");
    match catalog.by_price(min, max).await {
        Ok(page) => print_page(&page, |h| {
            format!("{} - ${} ({})", h.product.nombre, h.product.precio, h.product.categoria)
        }),
        Err(e) => println!("❌ Price range search failed: {e}"),
    }

    println!("\n📁 CATEGORY: '{SAMPLE_CATEGORY}'");
    match catalog.by_category(SAMPLE_CATEGORY).await {
        Ok(page) => print_page(&page, |h| format!("{} - ${}", h.product.nombre, h.product.precio)),
        Err(e) => println!("❌ Category search failed: {e}"),
    }

    println!("\n🎯 COMBINED SEARCH:");
    println!("   Filters: price ${min}-${max}, rating >= 4.0, wireless or category '{SAMPLE_CATEGORY}'");
    match catalog.combined().await {
        Ok(page) => print_page(&page, |h| {
            format!("{} - ${} (⭐{})", h.product.nombre, h.product.precio, h.product.calificacion)
        }),
        Err(e) => println!("❌ Combined search failed: {e}"),
    }

    println!("\n📈 ANALYTICS:");
    match catalog.analytics().await {
        Ok(a) => {
            println!("   📁 Products per category:");
            for (name, n) in &a.by_category {
                println!("      • {name}: {n} products");
            }
            println!("   🏷️  Top brands:");
            for (name, n) in &a.top_brands {
                println!("      • {name}: {n} products");
            }
            if let Some(p) = a.price {
                println!("   💰 Price statistics:");
                println!("      • Average: ${:.2}", p.avg);
                println!("      • Minimum: ${:.2}", p.min);
                println!("      • Maximum: ${:.2}", p.max);
            }
            println!("   📊 Price ranges:");
            for range in &a.price_ranges {
                println!("      • {range}: {} products", range.count);
            }
        }
        Err(e) => println!("❌ Analytics failed: {e}"),
    }

    print_separator();
    println!("✅ DEMO COMPLETED");
    println!("🔗 Elasticsearch API: {}", settings.elasticsearch.url);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()).await {
        exit_with(e);
    }
}
