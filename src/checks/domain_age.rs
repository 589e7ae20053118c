//! Domain registration age and privacy evaluation.
//!
//! Young domains are a strong phishing signal: campaigns typically burn
//! through freshly registered throwaway domains. Registrant details hidden
//! behind a privacy service add a weaker signal on top. A failed lookup is
//! explicitly *not* evidence of phishing and yields a neutral finding.

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use tldextract::TldExtractor;
use url::Url;

use crate::config::constants::{
    impact, DOMAIN_RECENT_DAYS, DOMAIN_VERY_YOUNG_DAYS, PRIVACY_KEYWORDS,
};
use crate::domain::extract_registrable_domain;
use crate::models::CheckFinding;
use crate::whois::WhoisProvider;
use crate::Check;

const CHECK_NAME: &str = "Domain Age Check";

/// Evaluates WHOIS registration data for the resolved URL's domain.
pub struct DomainAgeCheck {
    extractor: Arc<TldExtractor>,
    provider: Arc<dyn WhoisProvider>,
}

impl DomainAgeCheck {
    /// Creates a domain-age check over a shared PSL extractor and a WHOIS
    /// provider.
    pub fn new(extractor: Arc<TldExtractor>, provider: Arc<dyn WhoisProvider>) -> Self {
        DomainAgeCheck {
            extractor,
            provider,
        }
    }
}

#[async_trait]
impl Check for DomainAgeCheck {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    async fn run(&self, url: &Url) -> CheckFinding {
        info!("Checking domain age for {url}");

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

        let domain = match extract_registrable_domain(&self.extractor, &hostname) {
            Ok(domain) => domain,
            Err(e) => {
                warn!("No registrable domain for {hostname}: {e}");
                return CheckFinding::text(
                    CHECK_NAME,
                    false,
                    impact::ZERO,
                    format!("Could not determine a registrable domain for {hostname}"),
                );
            }
        };

        let registration = match self.provider.lookup(&domain).await {
            Ok(registration) => registration,
            Err(e) => {
                warn!("WHOIS lookup for {domain} failed: {e}");
                return CheckFinding::text(
                    CHECK_NAME,
                    false,
                    impact::ZERO,
                    format!("WHOIS lookup for {domain} could not be completed"),
                );
            }
        };

        let mut score = 0;
        let mut details: Vec<String> = Vec::new();

        match registration.creation_date {
            Some(created) => {
                let age_days = (Utc::now() - created).num_days();
                if age_days < DOMAIN_VERY_YOUNG_DAYS {
                    score += impact::HIGH;
                    details.push(format!(
                        "Domain {domain} is very young, registered {age_days} days ago"
                    ));
                } else if age_days < DOMAIN_RECENT_DAYS {
                    score += impact::MEDIUM;
                    details.push(format!(
                        "Domain {domain} is relatively new, registered {age_days} days ago"
                    ));
                }
            }
            None => {
                score += impact::LOW;
                details.push(format!(
                    "Could not determine the creation date of {domain}"
                ));
            }
        }

        let registrant = registration
            .registrant_name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if PRIVACY_KEYWORDS.iter().any(|kw| registrant.contains(kw)) {
            score += impact::MEDIUM;
            details.push("Registrant information is hidden behind a privacy service".to_string());
        }

        CheckFinding::text(
            CHECK_NAME,
            !details.is_empty(),
            score,
            if details.is_empty() {
                "Domain registration appears normal".to_string()
            } else {
                details.join(" | ")
            },
        )
    }
}
