use clap::Parser;
use std::path::PathBuf;

use reviewbench_cli::{exit_with, init_tracing, load_settings};
use reviewbench_core::dataset::{self, DatasetStats};
use reviewbench_core::types::stars;
use reviewbench_datagen::ReviewGenerator;

#[derive(Parser)]
#[command(name = "reviewbench-generate")]
#[command(about = "Generate synthetic product reviews into a JSON file")]
struct Cli {
    /// Number of reviews (defaults to data.review_count)
    #[arg(short, long)]
    count: Option<usize>,

    /// RNG seed for a reproducible dataset (defaults to data.seed)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output file (defaults to data.reviews_file)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings()?;
    let count = cli.count.unwrap_or(settings.data.review_count);
    let output = cli.output.unwrap_or_else(|| settings.reviews_path());

    println!("Generating sample data...");
    let mut generator = match cli.seed.or(settings.data.seed) {
        Some(seed) => ReviewGenerator::with_seed(seed),
        None => ReviewGenerator::from_entropy(),
    };
    let reviews = generator.generate(count);
    dataset::write_reviews(&output, &reviews)?;

    println!("✓ Generated {} reviews", reviews.len());
    println!("✓ Data saved to: {}", output.display());

    let stats = DatasetStats::from_reviews(&reviews);
    println!("\n📊 Statistics:");
    println!("\nReviews per category:");
    for (category, n) in &stats.by_category {
        println!("  {category}: {n}");
    }
    println!("\nReviews per rating:");
    for (rating, n) in &stats.by_rating {
        println!("  {}: {n}", stars(*rating));
    }
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()) {
        exit_with(e);
    }
}
