use clap::Parser;

use reviewbench_cli::{exit_with, init_tracing, load_settings, print_separator};
use reviewbench_compare::{canned_shapes, ComparisonHarness};
use reviewbench_search::ElasticsearchStore;
use reviewbench_sql::PostgresStore;

#[derive(Parser)]
#[command(name = "reviewbench-compare")]
#[command(about = "Run the same queries against Elasticsearch and PostgreSQL and compare timings")]
struct Cli {
    /// Skip the record count and membership check
    #[arg(long)]
    skip_parity: bool,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings()?;
    let es = ElasticsearchStore::new(&settings.elasticsearch)?;
    let pg = PostgresStore::new(&settings.postgres)?;
    let harness = ComparisonHarness::new(es, pg, settings.compare.page_size);

    println!("\n{}", "=".repeat(80));
    println!("🚀 PERFORMANCE COMPARISON: Elasticsearch vs PostgreSQL");
    println!("{}", "=".repeat(80));

    harness.ping().await?;
    println!("\n✓ Both connections established\n");

    if !cli.skip_parity {
        match harness.check_parity(&settings.compare.filter()).await {
            Ok(report) => print!("{report}"),
            Err(e) => println!("⚠️  Parity check failed: {e}"),
        }
    }

    let shapes = canned_shapes(&settings.compare);
    for shape in &shapes {
        println!();
        print!("{}", harness.run_shape(shape).await);
    }

    print_separator();
    println!("✓ Comparison completed");
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()).await {
        exit_with(e);
    }
}
