use clap::Parser;
use std::path::PathBuf;

use reviewbench_cli::{exit_with, init_tracing, input_path, load_settings, print_load_report};
use reviewbench_core::pipeline::load_into;
use reviewbench_core::readiness::RetryPolicy;
use reviewbench_sql::PostgresStore;

#[derive(Parser)]
#[command(name = "reviewbench-load-pg")]
#[command(about = "Recreate the review table and load the dataset into PostgreSQL")]
struct Cli {
    /// Reviews file (defaults to data.reviews_file)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings()?;
    let path = input_path(cli.file, settings.reviews_path());
    let store = PostgresStore::new(&settings.postgres)?;

    println!("=== Loading data into PostgreSQL ===\n");
    println!(
        "Table: {} at {}:{}/{}",
        store.statements().table(),
        settings.postgres.host,
        settings.postgres.port,
        settings.postgres.database
    );
    let report = load_into(&store, &path, RetryPolicy::from(&settings.readiness)).await?;
    print_load_report(&report);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()).await {
        exit_with(e);
    }
}
