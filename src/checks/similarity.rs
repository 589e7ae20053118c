//! Brand impersonation detection.
//!
//! Compares the resolved hostname against a curated brand list with three
//! escalating heuristics:
//!
//! 1. exact ratio matching catches simple character edits (`paypal1.com`);
//! 2. a trailing-window ratio catches junk prefixes padded onto a near-exact
//!    brand tail (`we-are-scammers-paypal1.com`);
//! 3. best-window matching catches brand names embedded inside longer decoy
//!    hostnames.
//!
//! All ratios here are on a 0 to 100 scale.
//!
//! A hostname that appears verbatim in the brand list is trusted outright,
//! regardless of its similarity to any other brand.

use async_trait::async_trait;
use log::info;
use rapidfuzz::fuzz;
use std::sync::Arc;
use url::Url;

use crate::brands::BrandList;
use crate::config::constants::impact;
use crate::models::CheckFinding;
use crate::Check;

const CHECK_NAME: &str = "Domain Similarity Check";

/// Tunable cutoffs for the similarity heuristics, all on the 0 to 100
/// ratio scale.
///
/// The defaults reproduce long-standing policy; none of these values has a
/// principled derivation, which is exactly why they are fields and not
/// inlined literals.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityPolicy {
    /// Ratios strictly above this (and below `exact_ratio`) flag
    /// typosquatting.
    pub min_ratio: f64,
    /// A ratio at this value is an exact match, handled separately.
    pub exact_ratio: f64,
    /// Extra characters allowed beyond the brand length before the
    /// trailing-window rule applies.
    pub suffix_buffer: usize,
    /// Minimum best-window score for a combosquatting flag.
    pub partial_cutoff: f64,
}

impl Default for SimilarityPolicy {
    fn default() -> Self {
        SimilarityPolicy {
            min_ratio: 90.0,
            exact_ratio: 100.0,
            suffix_buffer: 3,
            partial_cutoff: 95.0,
        }
    }
}

/// Detects typosquatting and combosquatting against a fixed brand list.
pub struct SimilarityCheck {
    brands: Arc<BrandList>,
    policy: SimilarityPolicy,
}

impl SimilarityCheck {
    /// Creates a detector over a shared brand list with default cutoffs.
    pub fn new(brands: Arc<BrandList>) -> Self {
        SimilarityCheck {
            brands,
            policy: SimilarityPolicy::default(),
        }
    }

    /// Overrides the default cutoffs.
    pub fn with_policy(brands: Arc<BrandList>, policy: SimilarityPolicy) -> Self {
        SimilarityCheck { brands, policy }
    }

    fn evaluate(&self, hostname: &str) -> CheckFinding {
        // An exact brand match is trusted no matter what any other brand
        // scores against this hostname.
        if self.brands.contains(hostname) {
            return CheckFinding::text(
                CHECK_NAME,
                false,
                impact::ZERO,
                format!("{hostname} matches a trusted domain"),
            );
        }

        let host_len = hostname.chars().count();

        // First qualifying brand wins; list order is the tie-break.
        for brand in self.brands.iter() {
            let ratio = ratio_percent(hostname, brand);
            if ratio > self.policy.min_ratio && ratio < self.policy.exact_ratio {
                return CheckFinding::text(
                    CHECK_NAME,
                    true,
                    impact::HIGH,
                    format!(
                        "Hostname {hostname} is suspiciously similar to {brand} \
                         (similarity {ratio:.0}%)"
                    ),
                );
            }

            let brand_len = brand.chars().count();
            let window_len = brand_len + self.policy.suffix_buffer;
            if host_len > window_len {
                let tail: String = hostname.chars().skip(host_len - window_len).collect();
                let tail_ratio = ratio_percent(&tail, brand);
                if tail_ratio > self.policy.min_ratio {
                    return CheckFinding::text(
                        CHECK_NAME,
                        true,
                        impact::CRITICAL,
                        format!(
                            "Hostname {hostname} ends in a close variant of {brand} \
                             (similarity {tail_ratio:.0}%)"
                        ),
                    );
                }
            }
        }

        // Combosquatting: best brand fragment embedded in the hostname.
        let mut best: Option<(&str, f64)> = None;
        for brand in self.brands.iter() {
            let partial = partial_ratio_percent(hostname, brand);
            if partial >= self.policy.partial_cutoff
                && best.map_or(true, |(_, score)| partial > score)
            {
                best = Some((brand, partial));
            }
        }
        if let Some((brand, score)) = best {
            return CheckFinding::text(
                CHECK_NAME,
                true,
                impact::HIGH,
                format!(
                    "Hostname {hostname} contains a string highly similar to {brand} \
                     (partial similarity {score:.0}%)"
                ),
            );
        }

        CheckFinding::text(
            CHECK_NAME,
            false,
            impact::ZERO,
            format!("{hostname} does not resemble any known brand"),
        )
    }
}

/// Indel similarity of two strings, scaled from `fuzz::ratio`'s 0..=1 range
/// to the 0..=100 scale the policy cutoffs use.
fn ratio_percent(a: &str, b: &str) -> f64 {
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

/// Best ratio of `brand` against every `brand`-length character window of
/// `hostname`, on the 0..=100 scale.
///
/// When the brand is at least as long as the hostname there is only one
/// alignment, the whole-string ratio.
fn partial_ratio_percent(hostname: &str, brand: &str) -> f64 {
    let host_chars: Vec<char> = hostname.chars().collect();
    let brand_chars: Vec<char> = brand.chars().collect();
    if host_chars.is_empty() || brand_chars.is_empty() {
        return 0.0;
    }
    if brand_chars.len() >= host_chars.len() {
        return ratio_percent(hostname, brand);
    }

    let mut best = 0.0_f64;
    for window in host_chars.windows(brand_chars.len()) {
        let score = fuzz::ratio(window.iter().copied(), brand_chars.iter().copied()) * 100.0;
        if score > best {
            best = score;
        }
    }
    best
}

#[async_trait]
impl Check for SimilarityCheck {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    async fn run(&self, url: &Url) -> CheckFinding {
        info!("Similarity check for {url}");
        match url.host_str() {
            Some(host) => self.evaluate(&host.to_lowercase()),
            None => CheckFinding::text(
                CHECK_NAME,
                true,
                impact::NO_HOSTNAME,
                "Could not extract hostname from URL",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(brands: &[&str]) -> SimilarityCheck {
        SimilarityCheck::new(Arc::new(BrandList::from_entries(
            brands.iter().map(|b| b.to_string()).collect(),
        )))
    }

    #[test]
    fn test_exact_match_is_trusted() {
        let finding = check(&["paypal.com"]).evaluate("paypal.com");
        assert!(!finding.is_suspicious);
        assert_eq!(finding.score_impact, 0);
    }

    #[test]
    fn test_exact_match_wins_over_similarity_to_other_brands() {
        // "paypa1.com" sits in the (90, 100) window against "paypal.com",
        // but it is itself a listed brand and must be trusted.
        let finding = check(&["paypal.com", "paypa1.com"]).evaluate("paypa1.com");
        assert!(!finding.is_suspicious);
        assert_eq!(finding.score_impact, 0);
    }

    #[test]
    fn test_single_character_typo_is_high_impact() {
        let finding = check(&["paypal.com"]).evaluate("paypal1.com");
        assert!(finding.is_suspicious);
        assert_eq!(finding.score_impact, impact::HIGH);
        assert!(finding.details.as_str().unwrap().contains("paypal.com"));
    }

    #[test]
    fn test_first_qualifying_brand_wins() {
        // Both entries are near-identical to the hostname; the first listed
        // brand must be the one reported.
        let finding = check(&["paypall.com", "paypal1.com"]).evaluate("paypal.com");
        assert!(finding.is_suspicious);
        assert!(finding.details.as_str().unwrap().contains("paypall.com"));
    }

    #[test]
    fn test_prefix_padded_typosquat_is_critical() {
        // Trailing window is len(brand)+3 = 20 chars: "rs-bankofamerica.com",
        // three indels away from the brand, ratio ~92%.
        let finding = check(&["bankofamerica.com"]).evaluate("we-are-scammers-bankofamerica.com");
        assert!(finding.is_suspicious);
        assert_eq!(finding.score_impact, impact::CRITICAL);
        assert!(finding
            .details
            .as_str()
            .unwrap()
            .contains("close variant of bankofamerica.com"));
    }

    #[test]
    fn test_long_prefix_padding_still_detected() {
        let hostname = format!("{}bankofamerica.com", "x".repeat(40));
        let finding = check(&["bankofamerica.com"]).evaluate(&hostname);
        assert!(finding.is_suspicious);
        assert_eq!(finding.score_impact, impact::CRITICAL);
    }

    #[test]
    fn test_embedded_brand_is_combosquatting() {
        let finding = check(&["paypal.com"]).evaluate("secure-login.paypal.com.evil-domain.biz");
        assert!(finding.is_suspicious);
        assert_eq!(finding.score_impact, impact::HIGH);
        assert!(finding
            .details
            .as_str()
            .unwrap()
            .contains("highly similar to paypal.com"));
    }

    #[test]
    fn test_unrelated_hostname_is_clean() {
        let finding = check(&["paypal.com", "google.com"]).evaluate("weather-forecast.example");
        assert!(!finding.is_suspicious);
        assert_eq!(finding.score_impact, 0);
    }

    #[test]
    fn test_empty_brand_list_never_flags() {
        let finding = check(&[]).evaluate("paypal1.com");
        assert!(!finding.is_suspicious);
        assert_eq!(finding.score_impact, 0);
    }

    #[test]
    fn test_ratio_percent_uses_percent_scale() {
        // A one-character edit must land inside the (90, 100) policy window,
        // not down at 0.95.
        let ratio = ratio_percent("paypal1.com", "paypal.com");
        assert!(ratio > 90.0 && ratio < 100.0, "got {ratio}");
        assert_eq!(ratio_percent("paypal.com", "paypal.com"), 100.0);
    }

    #[test]
    fn test_partial_ratio_finds_exact_embedded_brand() {
        let score = partial_ratio_percent("secure-login.paypal.com.evil-domain.biz", "paypal.com");
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_partial_ratio_with_longer_brand_compares_whole_strings() {
        let score = partial_ratio_percent("ab.example", "bankofamerica.com");
        assert!(score < 95.0, "got {score}");
    }

    #[test]
    fn test_partial_ratio_of_empty_input_is_zero() {
        assert_eq!(partial_ratio_percent("", "paypal.com"), 0.0);
        assert_eq!(partial_ratio_percent("paypal.com", ""), 0.0);
    }

    #[test]
    fn test_suffix_rule_skipped_for_similar_lengths() {
        // Hostname only 2 chars longer than the brand: trailing-window rule
        // must not apply, and the plain ratio already covers this case.
        let finding = check(&["paypal.com"]).evaluate("xpaypal.com");
        assert!(finding.is_suspicious);
        assert_eq!(finding.score_impact, impact::HIGH);
    }
}
