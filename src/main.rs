//! md-harvest main entry point
//!
//! This is the command-line interface for harvesting a paginated node listing
//! into Markdown folders.

use anyhow::Context;
use clap::Parser;
use md_harvest::config::{load_config, validate, Config};
use md_harvest::crawler::Coordinator;
use md_harvest::output::print_report;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// md-harvest: archive a paginated node listing as Markdown
///
/// Walks the listing from SEED_URL, saves every node page as Markdown together
/// with its images, and writes a summary index linking all saved nodes.
#[derive(Parser, Debug)]
#[command(name = "md-harvest")]
#[command(version)]
#[command(about = "Archive a paginated node listing as Markdown", long_about = None)]
struct Cli {
    /// URL of the first listing page
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory receiving the summary and the node folders
    #[arg(long, env = "SAVE_PATH", value_name = "DIR")]
    save_path: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and show the effective settings without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(save_path) = cli.save_path {
        config.output.save_path = save_path;
    }
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        print_dry_run(&cli.seed, &config);
        return Ok(());
    }

    tracing::info!("SAVE_PATH: {}", config.output.save_path.display());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling harvest");
            on_signal.cancel();
        }
    });

    let coordinator = Coordinator::new(config).context("failed to set up harvest")?;
    let report = match coordinator.run(&cli.seed, &cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_report(&report);
    }

    report.into_result()?;
    tracing::info!("Harvest completed successfully");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("md_harvest=info,warn"),
            1 => EnvFilter::new("md_harvest=debug,info"),
            2 => EnvFilter::new("md_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows what a harvest would do
fn print_dry_run(seed: &str, config: &Config) {
    println!("=== md-harvest Dry Run ===\n");

    println!("Seed URL: {}", seed);

    println!("\nCrawler:");
    println!("  Max listing pages: {}", config.crawler.max_pages);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    match config.crawler.max_concurrent_nodes {
        0 => println!("  Concurrent nodes: unbounded"),
        n => println!("  Concurrent nodes: {}", n),
    }
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nImages:");
    println!(
        "  Delay before each fetch: {}-{}ms",
        config.images.min_delay_ms, config.images.max_delay_ms
    );

    println!("\nSelectors:");
    println!("  Node link: {}", config.selectors.node_link);
    println!("  Next page: {}", config.selectors.next_page);
    println!("  Title: {}", config.selectors.title);
    println!("  Content: {}", config.selectors.content);

    println!("\nOutput:");
    println!("  Save path: {}", config.output.save_path.display());
    println!("  Summary file: {}", config.output.summary_file);
    println!("  Index file: {}", config.output.index_file);
    println!("  On collision: {:?}", config.output.on_collision);

    println!("\n✓ Configuration is valid");
}
