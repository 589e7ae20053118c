//! The check orchestrator.
//!
//! Sequences one analysis request: the redirect trace runs first and is
//! authoritative; every remaining check runs concurrently against the
//! resolved final URL. Finding order is deterministic — the redirect finding
//! first, then the configured check order, never completion order.

use std::sync::Arc;

use futures::future;
use log::{info, warn};
use url::Url;

use crate::brands::BrandList;
use crate::checks::{CertificateCheck, DomainAgeCheck, RedirectCheck, SimilarityCheck};
use crate::config::{Config, ScoreThresholds};
use crate::errors::InitializationError;
use crate::initialization::{init_extractor, init_probe_client};
use crate::models::AnalysisResult;
use crate::scoring::calculate_final_score;
use crate::whois::LiveWhoisProvider;
use crate::Check;

/// Orchestrates all risk checks for URL analysis requests.
///
/// Construct once at process start and reuse: the brand list, retry policy,
/// and HTTP client are shared read-only across requests, and requests share
/// no mutable state with each other.
pub struct UrlAnalyzer {
    redirect: RedirectCheck,
    checks: Vec<Arc<dyn Check>>,
    thresholds: ScoreThresholds,
}

impl UrlAnalyzer {
    /// Builds the default analyzer: redirect tracing plus certificate,
    /// brand-similarity, and domain-age checks.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        let probe_client = init_probe_client(config)?;
        let brands = Arc::new(BrandList::load(&config.brands_file));
        info!("Loaded {} brand entries", brands.len());
        let extractor = init_extractor();

        let checks: Vec<Arc<dyn Check>> = vec![
            Arc::new(CertificateCheck::new(config.retry)),
            Arc::new(SimilarityCheck::new(brands)),
            Arc::new(DomainAgeCheck::new(
                extractor,
                Arc::new(LiveWhoisProvider),
            )),
        ];

        Ok(UrlAnalyzer {
            redirect: RedirectCheck::new(probe_client, config.retry),
            checks,
            thresholds: config.thresholds,
        })
    }

    /// Builds an analyzer from explicit parts. Used by tests to substitute
    /// scripted checks.
    pub fn with_checks(
        redirect: RedirectCheck,
        checks: Vec<Arc<dyn Check>>,
        thresholds: ScoreThresholds,
    ) -> Self {
        UrlAnalyzer {
            redirect,
            checks,
            thresholds,
        }
    }

    /// Analyzes one URL and returns the scored result.
    ///
    /// Never errors: every internal failure mode is captured as a finding
    /// and scored.
    pub async fn analyze(&self, url: &Url) -> AnalysisResult {
        info!("Analyzing {url}");

        let (trace, redirect_finding) = self.redirect.run_trace(url).await;
        let mut findings = vec![redirect_finding];

        if !trace.chain_completed {
            // No trusted final URL; running the remaining checks against
            // unverified data would be misleading.
            warn!("Redirect trace failed, no reliable final URL available");
            let (score, risk_level) = calculate_final_score(&findings, &self.thresholds);
            return AnalysisResult {
                score,
                risk_level,
                details: findings,
            };
        }

        let final_url = match Url::parse(&trace.final_url) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("Final URL {} did not re-parse ({e}); using original", trace.final_url);
                url.clone()
            }
        };
        info!("Final URL: {final_url}");

        // join_all preserves input order, which keeps finding order
        // deterministic regardless of completion order.
        let results = future::join_all(self.checks.iter().map(|check| check.run(&final_url))).await;
        findings.extend(results);
        info!("Collected {} findings", findings.len());

        let (score, risk_level) = calculate_final_score(&findings, &self.thresholds);
        info!("Final score: {score}, risk level: {risk_level}");
        AnalysisResult {
            score,
            risk_level,
            details: findings,
        }
    }
}
