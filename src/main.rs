//! Ahscrub main entry point
//!
//! Command-line interface for the FFXIAH item-data scrubber.

use ahscrub::config::{load_config, Config};
use ahscrub::scrub::{run_scrub, ScrubOptions};
use ahscrub::site::{CategoryUrl, SitePatterns};
use anyhow::{bail, Context};
use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scrub item data from the FFXIAH auction house
///
/// Discovers browse categories, extracts item ids from their listing
/// tables, and fetches per-item detail pages into a JSON dataset. Both the
/// id set and the dataset are cached on disk; rerunning reuses whatever
/// artifacts exist unless --force is given.
#[derive(Parser, Debug)]
#[command(name = "ahscrub")]
#[command(version)]
#[command(about = "Scrub item data from the FFXIAH auction house", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Ignore existing cache artifacts and redownload everything
    #[arg(long)]
    force: bool,

    /// Worker count for the item-data fan-out
    #[arg(short, long)]
    workers: Option<usize>,

    /// Explicit item ids to fetch, skipping discovery
    #[arg(long, value_delimiter = ',', value_name = "ID")]
    ids: Option<Vec<u32>>,

    /// Explicit category URLs, skipping browse-index discovery
    #[arg(long, value_name = "URL")]
    urls: Option<Vec<String>>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to defaults without a file
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).context("failed to load configuration")?
        }
        None => Config::default(),
    };

    let workers = cli.workers.unwrap_or(config.scrub.workers);
    let urls = parse_urls(cli.urls.as_deref(), &config)?;
    let ids: Option<HashSet<u32>> = cli.ids.map(|ids| ids.into_iter().collect());

    let options = ScrubOptions {
        force: cli.force,
        workers,
        urls,
        ids,
    };

    tracing::info!("Scrubbing {}", config.site.origin);
    let data = run_scrub(config, options)
        .await
        .context("scrub failed")?;

    println!("# items = {}", data.len());
    let named = data.values().filter(|record| record.name().is_some()).count();
    println!("# named = {named}");

    Ok(())
}

/// Parses command-line category URLs against the configured site shape
fn parse_urls(
    urls: Option<&[String]>,
    config: &Config,
) -> anyhow::Result<Option<Vec<CategoryUrl>>> {
    let Some(urls) = urls else {
        return Ok(None);
    };

    let patterns = SitePatterns::new(&config.site)?;
    let mut parsed = Vec::with_capacity(urls.len());
    for url in urls {
        match CategoryUrl::parse(url, &config.site.origin, &patterns) {
            Some(category) => parsed.push(category),
            None => bail!("not a category URL for {}: {url}", config.site.origin),
        }
    }

    Ok(Some(parsed))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ahscrub=info,warn"),
            1 => EnvFilter::new("ahscrub=debug,info"),
            2 => EnvFilter::new("ahscrub=trace,debug"),
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
