//! TLS certificate validation.
//!
//! Assesses whether the resolved URL's TLS posture looks legitimate: validity
//! window, hostname coverage (SANs + common names, with wildcard suffix
//! matching), and self-signature. Each sub-validation degrades gracefully to
//! a scored outcome; nothing in this module propagates an error out of the
//! check.

use anyhow::Error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use url::Url;

use crate::config::constants::impact;
use crate::models::{CertificateFacts, CheckFinding, ValidationOutcome};
use crate::retry::{retry_async, RetryPolicy};
use crate::tls::{fetch_certificate_facts, is_transient_tls_error};
use crate::Check;

const CHECK_NAME: &str = "SSL/TLS Certificate Check";

/// Validates the TLS certificate of the resolved URL.
pub struct CertificateCheck {
    retry: RetryPolicy,
}

impl CertificateCheck {
    /// Creates a certificate check with the given retry policy for transient
    /// connection/handshake failures.
    pub fn new(retry: RetryPolicy) -> Self {
        CertificateCheck { retry }
    }
}

#[async_trait]
impl Check for CertificateCheck {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    async fn run(&self, url: &Url) -> CheckFinding {
        info!("Checking TLS certificate for {url}");

        if url.scheme() != "https" {
            return CheckFinding::text(
                CHECK_NAME,
                true,
                impact::SSL_NO_HTTPS,
                "Site is not served over HTTPS",
            );
        }

        let hostname = match url.host_str() {
            Some(host) => host.to_lowercase(),
            None => {
                return CheckFinding::text(
                    CHECK_NAME,
                    true,
                    impact::NO_HOSTNAME,
                    "Could not extract hostname from URL",
                )
            }
        };

        let facts = match retry_async(&self.retry, is_transient_tls_error, || {
            let host = hostname.clone();
            async move { fetch_certificate_facts(&host).await.map_err(Error::from) }
        })
        .await
        {
            Ok(facts) => facts,
            Err(e) => {
                warn!("Certificate retrieval for {hostname} failed: {e}");
                return CheckFinding::text(
                    CHECK_NAME,
                    true,
                    impact::SSL_FETCH_FAILED,
                    "Failed to retrieve TLS certificate; site may not support HTTPS or is down",
                );
            }
        };

        let outcomes = [
            validate_validity_window(&facts, Utc::now()),
            validate_hostname(&hostname, &facts),
            validate_self_signature(&facts),
        ];

        let total: i64 = outcomes.iter().map(|o| o.score_impact).sum();
        let details: Vec<String> = outcomes.into_iter().filter_map(|o| o.detail).collect();

        CheckFinding::text(
            CHECK_NAME,
            total > 0,
            total,
            if details.is_empty() {
                "Certificate appears valid".to_string()
            } else {
                details.join(" | ")
            },
        )
    }
}

/// Checks that `now` falls inside the certificate's validity window.
///
/// Missing or unparseable validity timestamps are flagged with their own
/// score impact rather than treated as a failure.
fn validate_validity_window(facts: &CertificateFacts, now: DateTime<Utc>) -> ValidationOutcome {
    match (facts.not_before, facts.not_after) {
        (Some(not_before), Some(not_after)) => {
            if now < not_before {
                ValidationOutcome::flag(impact::SSL_NOT_YET_VALID, "Certificate not valid yet")
            } else if now > not_after {
                ValidationOutcome::flag(impact::SSL_EXPIRED, "Certificate expired")
            } else {
                ValidationOutcome::ok()
            }
        }
        _ => ValidationOutcome::flag(
            impact::SSL_FETCH_FAILED,
            "Could not parse certificate validity dates",
        ),
    }
}

/// Checks the hostname against SAN DNS names and subject common names.
fn validate_hostname(hostname: &str, facts: &CertificateFacts) -> ValidationOutcome {
    let matched = facts
        .subject_alt_names
        .iter()
        .chain(facts.subject_common_names.iter())
        .any(|cert_name| matches_cert_name(hostname, &cert_name.to_lowercase()));

    if matched {
        ValidationOutcome::ok()
    } else {
        ValidationOutcome::flag(
            impact::SSL_HOSTNAME_MISMATCH,
            format!("Hostname {hostname} does not match certificate"),
        )
    }
}

/// Flags a certificate whose issuer and subject are structurally identical.
fn validate_self_signature(facts: &CertificateFacts) -> ValidationOutcome {
    if facts.issuer == facts.subject {
        ValidationOutcome::flag(impact::SSL_SELF_SIGNED, "Certificate is self-signed")
    } else {
        ValidationOutcome::ok()
    }
}

/// True when the hostname equals the certificate name, or when the name is a
/// wildcard (`*.suffix`) and the hostname ends with that suffix.
fn matches_cert_name(hostname: &str, cert_name: &str) -> bool {
    if let Some(suffix) = cert_name.strip_prefix('*') {
        suffix.starts_with('.') && hostname.ends_with(suffix)
    } else {
        hostname == cert_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_facts() -> CertificateFacts {
        CertificateFacts {
            subject: "CN=example.com, O=Example Org".to_string(),
            issuer: "CN=Trusted CA, O=CA Org".to_string(),
            subject_common_names: vec!["example.com".to_string()],
            subject_alt_names: vec!["example.com".to_string(), "www.example.com".to_string()],
            not_before: Some(Utc::now() - Duration::days(30)),
            not_after: Some(Utc::now() + Duration::days(30)),
        }
    }

    #[test]
    fn test_expired_certificate_is_flagged() {
        let mut facts = valid_facts();
        facts.not_after = Some(Utc::now() - Duration::days(1));
        let outcome = validate_validity_window(&facts, Utc::now());
        assert_eq!(outcome.score_impact, impact::SSL_EXPIRED);
        assert_eq!(outcome.detail.as_deref(), Some("Certificate expired"));
    }

    #[test]
    fn test_not_yet_valid_certificate_is_flagged() {
        let mut facts = valid_facts();
        facts.not_before = Some(Utc::now() + Duration::days(1));
        facts.not_after = Some(Utc::now() + Duration::days(90));
        let outcome = validate_validity_window(&facts, Utc::now());
        assert_eq!(outcome.score_impact, impact::SSL_NOT_YET_VALID);
    }

    #[test]
    fn test_unparseable_dates_are_flagged_without_panicking() {
        let mut facts = valid_facts();
        facts.not_before = None;
        let outcome = validate_validity_window(&facts, Utc::now());
        assert_eq!(outcome.score_impact, impact::SSL_FETCH_FAILED);
        assert_eq!(
            outcome.detail.as_deref(),
            Some("Could not parse certificate validity dates")
        );
    }

    #[test]
    fn test_window_ok_inside_validity() {
        let outcome = validate_validity_window(&valid_facts(), Utc::now());
        assert_eq!(outcome, ValidationOutcome::ok());
    }

    #[test]
    fn test_hostname_match_via_san() {
        let outcome = validate_hostname("www.example.com", &valid_facts());
        assert_eq!(outcome, ValidationOutcome::ok());
    }

    #[test]
    fn test_hostname_match_via_common_name_only() {
        let mut facts = valid_facts();
        facts.subject_alt_names.clear();
        let outcome = validate_hostname("example.com", &facts);
        assert_eq!(outcome, ValidationOutcome::ok());
    }

    #[test]
    fn test_hostname_mismatch_is_flagged() {
        let outcome = validate_hostname("evil.test", &valid_facts());
        assert_eq!(outcome.score_impact, impact::SSL_HOSTNAME_MISMATCH);
    }

    #[test]
    fn test_wildcard_covers_subdomains() {
        let mut facts = valid_facts();
        facts.subject_alt_names = vec!["*.example.com".to_string()];
        facts.subject_common_names.clear();
        assert_eq!(
            validate_hostname("login.example.com", &facts),
            ValidationOutcome::ok()
        );
        // The bare apex does not end with ".example.com".
        assert_eq!(
            validate_hostname("example.com", &facts).score_impact,
            impact::SSL_HOSTNAME_MISMATCH
        );
    }

    #[test]
    fn test_wildcard_does_not_match_lookalike_suffix() {
        let mut facts = valid_facts();
        facts.subject_alt_names = vec!["*.example.com".to_string()];
        facts.subject_common_names.clear();
        assert_eq!(
            validate_hostname("notexample.com", &facts).score_impact,
            impact::SSL_HOSTNAME_MISMATCH
        );
    }

    #[test]
    fn test_self_signed_is_flagged() {
        let mut facts = valid_facts();
        facts.issuer = facts.subject.clone();
        let outcome = validate_self_signature(&facts);
        assert_eq!(outcome.score_impact, impact::SSL_SELF_SIGNED);
        assert_eq!(outcome.detail.as_deref(), Some("Certificate is self-signed"));
    }

    #[test]
    fn test_third_party_issuer_passes() {
        assert_eq!(validate_self_signature(&valid_facts()), ValidationOutcome::ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_degrades_to_fetch_failed() {
        // Runs with no process-wide TLS setup of any kind, and nothing
        // listens on local port 443: the check must come back as a scored
        // finding, not a panic or an error.
        let check = CertificateCheck::new(RetryPolicy::immediate(1));
        let finding = check.run(&Url::parse("https://127.0.0.1/").unwrap()).await;
        assert!(finding.is_suspicious);
        assert_eq!(finding.score_impact, impact::SSL_FETCH_FAILED);
    }

    #[test]
    fn test_fully_valid_certificate_sums_to_zero() {
        let facts = valid_facts();
        let total: i64 = [
            validate_validity_window(&facts, Utc::now()),
            validate_hostname("example.com", &facts),
            validate_self_signature(&facts),
        ]
        .iter()
        .map(|o| o.score_impact)
        .sum();
        assert_eq!(total, 0);
    }
}
