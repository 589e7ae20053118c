//! Core data types shared across the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::scoring::RiskLevel;

/// Immutable result of one check invocation.
///
/// Every check produces exactly one finding, regardless of outcome. The
/// orchestrator owns findings once returned and never drops or merges them.
#[derive(Debug, Clone, Serialize)]
pub struct CheckFinding {
    /// Human-readable check name, e.g. "Redirect Check".
    pub check_name: String,
    /// Whether this check flagged the URL.
    pub is_suspicious: bool,
    /// Contribution to the total risk score.
    pub score_impact: i64,
    /// Free-form text or a structured map describing the outcome.
    pub details: Value,
}

impl CheckFinding {
    /// Creates a finding with a plain-text detail message.
    pub fn text(
        check_name: &str,
        is_suspicious: bool,
        score_impact: i64,
        details: impl Into<String>,
    ) -> Self {
        CheckFinding {
            check_name: check_name.to_string(),
            is_suspicious,
            score_impact,
            details: Value::String(details.into()),
        }
    }

    /// Creates a finding with a structured detail map.
    pub fn structured(
        check_name: &str,
        is_suspicious: bool,
        score_impact: i64,
        details: Value,
    ) -> Self {
        CheckFinding {
            check_name: check_name.to_string(),
            is_suspicious,
            score_impact,
            details,
        }
    }
}

/// One step in a redirect chain.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RedirectHop {
    /// URL that issued the redirect.
    pub source_url: String,
    /// Where the redirect pointed (the `Location` header, or the hop's own
    /// URL when the header was absent).
    pub target_url: String,
    /// HTTP status code of the redirect response.
    pub status_code: u16,
}

/// Outcome of resolving a URL's redirect chain.
///
/// Constructed once per analysis request and consumed immediately by the
/// orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct TraceResult {
    /// True when at least one redirect hop was observed.
    pub was_redirected: bool,
    /// False only when the network operation exhausted retries or failed
    /// terminally. When false, `final_url` is the original input URL and no
    /// downstream check should trust it.
    pub chain_completed: bool,
    /// The resolved URL after following all redirects, or the original URL on
    /// failure.
    pub final_url: String,
    /// Hops in chronological order; empty means no redirection occurred.
    pub redirect_chain: Vec<RedirectHop>,
}

impl TraceResult {
    /// Terminal result for a trace that could not be completed.
    pub fn failed(original_url: &str) -> Self {
        TraceResult {
            was_redirected: false,
            chain_completed: false,
            final_url: original_url.to_string(),
            redirect_chain: Vec::new(),
        }
    }
}

/// Parsed-out view of a live TLS certificate.
///
/// Derived once per request from a TLS handshake and never cached across
/// requests, since certificates can rotate.
#[derive(Debug, Clone, Default)]
pub struct CertificateFacts {
    /// Full subject distinguished name.
    pub subject: String,
    /// Full issuer distinguished name.
    pub issuer: String,
    /// Common names from the subject DN.
    pub subject_common_names: Vec<String>,
    /// DNS names from the Subject Alternative Name extension.
    pub subject_alt_names: Vec<String>,
    /// Start of the validity window; `None` when unparseable.
    pub not_before: Option<DateTime<Utc>>,
    /// End of the validity window; `None` when unparseable.
    pub not_after: Option<DateTime<Utc>>,
}

/// Result of a single certificate sub-validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Score contribution of this sub-validation (zero when it passed).
    pub score_impact: i64,
    /// Explanation when the sub-validation flagged something.
    pub detail: Option<String>,
}

impl ValidationOutcome {
    /// A passing outcome with no score impact.
    pub fn ok() -> Self {
        ValidationOutcome::default()
    }

    /// A flagged outcome with a score impact and explanation.
    pub fn flag(score_impact: i64, detail: impl Into<String>) -> Self {
        ValidationOutcome {
            score_impact,
            detail: Some(detail.into()),
        }
    }
}

/// Final output of one URL analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Sum of all finding score impacts.
    pub score: i64,
    /// Risk category mapped from the score.
    pub risk_level: RiskLevel,
    /// Findings in completion order: the redirect finding first, then the
    /// remaining checks in their configured order.
    pub details: Vec<CheckFinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_serializes_with_expected_field_names() {
        let finding = CheckFinding::text("Redirect Check", true, 10, "redirected twice");
        let json = serde_json::to_value(&finding).unwrap();

        assert_eq!(json["check_name"], "Redirect Check");
        assert_eq!(json["is_suspicious"], true);
        assert_eq!(json["score_impact"], 10);
        assert_eq!(json["details"], "redirected twice");
    }

    #[test]
    fn test_failed_trace_preserves_original_url() {
        let trace = TraceResult::failed("https://example.com/login");
        assert!(!trace.was_redirected);
        assert!(!trace.chain_completed);
        assert_eq!(trace.final_url, "https://example.com/login");
        assert!(trace.redirect_chain.is_empty());
    }

    #[test]
    fn test_validation_outcome_helpers() {
        assert_eq!(ValidationOutcome::ok().score_impact, 0);
        assert!(ValidationOutcome::ok().detail.is_none());

        let flagged = ValidationOutcome::flag(40, "Certificate expired");
        assert_eq!(flagged.score_impact, 40);
        assert_eq!(flagged.detail.as_deref(), Some("Certificate expired"));
    }
}
