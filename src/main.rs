use anyhow::{Context, Result};
use clap::Parser;
use scholar_sweep::config::{find_config_file, load_config};
use scholar_sweep::runner::{to_json, SearchRunner};
use scholar_sweep::sources::SourceRegistry;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scholar Sweep - Collect recent papers for a fixed keyword list as a JSON feed
#[derive(Parser, Debug)]
#[command(name = "scholar-sweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sweep a scholarly search provider for recent papers and print them as JSON", long_about = None)]
struct Cli {
    /// Minimum publication year (default: 2024)
    year_from: Option<i32>,

    /// Source to search (google_scholar, arxiv)
    #[arg(long, short)]
    source: Option<String>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors (the JSON and the final total are still printed)
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity. Logs go to stderr; stdout carries
    // only the JSON document.
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scholar_sweep={}", env_filter)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    if let Some(year_from) = cli.year_from {
        config.year_from = year_from;
    }
    if let Some(source) = cli.source {
        config.source = source;
    }

    let registry =
        SourceRegistry::from_config(&config.http).context("Failed to initialize sources")?;
    let source = registry.get_required(&config.source)?;

    let report = SearchRunner::from_config(source.as_ref(), &config)
        .run()
        .await;

    let failed = report.failed_keywords().count();
    if failed > 0 {
        tracing::warn!("{} of {} keyword searches failed", failed, report.keywords.len());
    }

    let papers = report.unique_papers();
    let json = to_json(&papers).context("Failed to serialize papers")?;
    println!("{}", json);

    eprintln!("\nTotal unique papers: {}", papers.len());

    Ok(())
}
