//! phish_scan library: URL phishing-risk analysis.
//!
//! Evaluates a URL for phishing/impersonation risk by resolving its redirect
//! chain, validating the TLS certificate of the final destination, comparing
//! the hostname against a curated brand list, and evaluating the domain's
//! registration age, then reducing the findings to a single score and risk
//! category.
//!
//! # Example
//!
//! ```no_run
//! use phish_scan::{Config, UrlAnalyzer};
//! use url::Url;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = UrlAnalyzer::new(&Config::default())?;
//! let result = analyzer.analyze(&Url::parse("https://paypa1-login.example")?).await;
//! println!("{} ({})", result.score, result.risk_level);
//! # Ok(())
//! # }
//! ```
//!
//! Every analysis is stateless and independent: the analyzer never returns
//! an error for a URL, never persists results, and converts every internal
//! failure into a scored or neutral finding.

#![warn(missing_docs)]

mod analyzer;
pub mod brands;
pub mod checks;
pub mod config;
mod domain;
pub mod errors;
pub mod initialization;
pub mod models;
pub mod retry;
pub mod scoring;
pub mod tls;
mod urls;
pub mod whois;

// Re-export public API
pub use analyzer::UrlAnalyzer;
pub use brands::BrandList;
pub use checks::Check;
pub use config::{Config, LogFormat, LogLevel, ScoreThresholds};
pub use models::{AnalysisResult, CheckFinding, RedirectHop, TraceResult};
pub use retry::RetryPolicy;
pub use scoring::RiskLevel;
pub use urls::validate_and_normalize_url;
