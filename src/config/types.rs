//! Configuration types shared by the library and the CLI.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{impact, DEFAULT_BRANDS_FILE, DEFAULT_USER_AGENT};
use crate::retry::RetryPolicy;

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Ascending score thresholds mapping a total score to a risk category.
///
/// A total at or above a threshold reaches that category; the highest
/// threshold met wins. Totals below `low` are Minimal. These boundaries are
/// policy, not law: callers may supply their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreThresholds {
    /// Minimum total for the Low category.
    pub low: i64,
    /// Minimum total for the Medium category.
    pub medium: i64,
    /// Minimum total for the High category.
    pub high: i64,
    /// Minimum total for the Critical category.
    pub critical: i64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        ScoreThresholds {
            low: impact::LOW,
            medium: impact::MEDIUM,
            high: impact::HIGH,
            critical: impact::HIGH + impact::SSL_EXPIRED,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// Constructed once at process start; the analyzer shares it read-only across
/// all requests.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP User-Agent header value.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,

    /// Path to the brand list file. A missing file degrades to an empty
    /// brand list rather than failing startup.
    pub brands_file: PathBuf,

    /// Retry policy applied to transient network failures.
    pub retry: RetryPolicy,

    /// Score-to-category thresholds.
    pub thresholds: ScoreThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: crate::config::constants::REQUEST_TIMEOUT_SECS,
            brands_file: PathBuf::from(DEFAULT_BRANDS_FILE),
            retry: RetryPolicy::default(),
            thresholds: ScoreThresholds::default(),
        }
    }
}
