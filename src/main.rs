//! EAR inventory main entry point
//!
//! This is the command-line interface for the Artifactory EAR crawler.

use anyhow::Context;
use clap::Parser;
use ear_inventory::config::{load_config_with_hash, validate, Config};
use ear_inventory::crawler::{CrawlResult, Crawler};
use ear_inventory::listing::validate_root_url;
use ear_inventory::output::{print_summary, write_markdown_report, CsvSink, ReportMeta};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code used when the crawl was interrupted
const EXIT_CANCELLED: u8 = 130;

/// EAR inventory: list every artifact below an Artifactory folder
///
/// Walks the storage API listings below BASE_URL, descending into each
/// folder's Development/Dev-1 listing, and writes one CSV row per artifact.
#[derive(Parser, Debug)]
#[command(name = "ear-inventory")]
#[command(version)]
#[command(about = "List Artifactory EAR artifacts into a CSV file", long_about = None)]
struct Cli {
    /// Artifactory API key, sent in the X-JFrog-Art-Api header
    #[arg(value_name = "API_KEY")]
    api_key: String,

    /// Storage API listing URL to start from
    #[arg(value_name = "BASE_URL")]
    base_url: String,

    /// CSV file to write (truncated if it exists)
    #[arg(value_name = "OUTPUT_CSV")]
    output_csv: PathBuf,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the maximum folder depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Also write a markdown report of the run
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let outcome = run(cli).await;
    if let Err(e) = &outcome {
        tracing::error!("{:#}", e);
    }

    ExitCode::from(exit_status(&outcome))
}

/// Maps the outcome of a run to the process exit status
///
/// Diagnostics do not affect the status: a crawl that reached the end is a
/// success even when some branches were lost.
fn exit_status(outcome: &anyhow::Result<CrawlResult>) -> u8 {
    match outcome {
        Ok(result) if result.cancelled => EXIT_CANCELLED,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ear_inventory=info,warn"),
            1 => EnvFilter::new("ear_inventory=debug,info"),
            2 => EnvFilter::new("ear_inventory=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads configuration, runs the crawl and writes the summary
async fn run(cli: Cli) -> anyhow::Result<CrawlResult> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
        validate(&config).context("invalid --max-depth")?;
    }

    // Checked before the output file is truncated
    validate_root_url(&cli.base_url)?;

    let crawler = Crawler::new(&config, &cli.api_key)?;

    let cancel = crawler.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping the crawl (press Ctrl-C again to exit now)");
            cancel.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt received, exiting");
            std::process::exit(i32::from(EXIT_CANCELLED));
        }
    });

    let mut sink = CsvSink::create(&cli.output_csv, &config.output.header)
        .with_context(|| format!("failed to create {}", cli.output_csv.display()))?;

    let result = crawler
        .crawl(&cli.base_url, &mut sink)
        .await
        .with_context(|| format!("crawl aborted while writing {}", cli.output_csv.display()))?;

    print_summary(&result);

    if let Some(report_path) = &cli.report {
        let meta = ReportMeta {
            output_path: cli.output_csv.display().to_string(),
            config_hash,
            max_depth: config.crawler.max_depth,
        };
        write_markdown_report(&result, &meta, report_path)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
        tracing::info!("Report written to {}", report_path.display());
    }

    Ok(result)
}
