//! Shared plumbing for the reviewbench executables: logging setup,
//! configuration loading and the common console output.

use std::path::PathBuf;

use reviewbench_core::config::Settings;
use reviewbench_core::pipeline::LoadReport;
use reviewbench_core::Error;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

pub fn load_settings() -> anyhow::Result<Settings> {
    Settings::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e.into()
    })
}

/// `flag` when given, otherwise the configured path.
pub fn input_path(flag: Option<PathBuf>, configured: PathBuf) -> PathBuf {
    flag.unwrap_or(configured)
}

pub fn print_separator() {
    println!("\n{}\n", "=".repeat(80));
}

pub fn print_load_report(report: &LoadReport) {
    println!("\n📊 {}:", report.store);
    println!("  Records read: {}", report.read);
    println!("  Accepted: {}", report.accepted);
    if report.rejected > 0 {
        println!("  ⚠️  Rejected: {}", report.rejected);
    }
    println!("  Stored: {}", report.stored);
    println!("  Size: {} ({} bytes)", report.footprint.pretty, report.footprint.bytes);
    if report.is_complete() {
        println!("\n✓ Load completed successfully");
    } else {
        println!("\n⚠️  Load incomplete: {} of {} records stored", report.stored, report.read);
    }
}

const SERVICES_HINT: &str = "Make sure that:
  1. the services are running: docker-compose up -d
  2. the data is loaded: reviewbench-load-es and reviewbench-load-pg";

/// What to tell the user after a fatal error, if anything useful applies.
pub fn hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<Error>()? {
        Error::Unavailable { .. } | Error::Backend { .. } => Some(SERVICES_HINT),
        Error::MissingInput(_) => Some("Generate the dataset first: reviewbench-generate"),
        _ => None,
    }
}

/// Print `err` and its hint, then exit with status 1.
pub fn exit_with(err: anyhow::Error) -> ! {
    eprintln!("✗ Error: {err:#}");
    if let Some(h) = hint(&err) {
        for line in h.lines() {
            eprintln!("  {line}");
        }
    }
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_the_error_kind() {
        let down = anyhow::Error::from(Error::Unavailable { service: "PostgreSQL".into(), attempts: 30 });
        assert!(hint(&down).is_some_and(|h| h.contains("docker-compose")));
        let failed = anyhow::Error::from(Error::backend("ElasticSearch", "index_not_found_exception"));
        let h = hint(&failed).unwrap_or_default();
        assert!(h.contains("reviewbench-load-es") && h.contains("reviewbench-load-pg"));
        let missing = anyhow::Error::from(Error::MissingInput(PathBuf::from("sample_reviews.json")));
        assert!(hint(&missing).is_some_and(|h| h.contains("reviewbench-generate")));
        assert_eq!(hint(&anyhow::anyhow!("other")), None);
    }

    #[test]
    fn flag_overrides_configured_path() {
        let configured = PathBuf::from("sample_reviews.json");
        assert_eq!(input_path(None, configured.clone()), configured);
        assert_eq!(input_path(Some("x.json".into()), configured), PathBuf::from("x.json"));
    }
}
