//! CLI entry point.
//!
//! A thin wrapper around the `phish_scan` library: parses arguments,
//! initializes the logger and crypto provider, runs one analysis, and prints
//! the result as JSON. A risky URL is a successful analysis; the process
//! exits non-zero only on usage or setup errors.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

use phish_scan::initialization::init_logger_with;
use phish_scan::{validate_and_normalize_url, Config, LogFormat, LogLevel, UrlAnalyzer};

/// Evaluate a URL for phishing and brand-impersonation risk.
#[derive(Parser, Debug)]
#[command(name = "phish_scan", version, about)]
struct Cli {
    /// URL to analyze (https:// is assumed when no scheme is given)
    url: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,

    /// Path to a brand list JSON file (defaults to the bundled list)
    #[arg(long)]
    brands: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let mut config = Config::default();
    if let Some(brands) = cli.brands {
        config.brands_file = brands;
    }

    let Some(normalized) = validate_and_normalize_url(&cli.url) else {
        eprintln!("phish_scan error: not a usable http(s) URL: {}", cli.url);
        process::exit(2);
    };
    let url = Url::parse(&normalized).context("Failed to parse normalized URL")?;

    let analyzer = UrlAnalyzer::new(&config).context("Failed to initialize analyzer")?;
    let result = analyzer.analyze(&url).await;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}
