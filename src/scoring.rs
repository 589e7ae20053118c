//! Score aggregation and risk categorization.

use serde::Serialize;
use strum_macros::Display;

use crate::config::ScoreThresholds;
use crate::models::CheckFinding;

/// Discrete risk categories, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
pub enum RiskLevel {
    /// No meaningful signals.
    Minimal,
    /// Weak signals only.
    Low,
    /// Some combination of signals worth attention.
    Medium,
    /// Strong evidence of impersonation or a broken security posture.
    High,
    /// Multiple strong signals; almost certainly hostile.
    Critical,
}

/// Sums the score impacts of all findings and maps the total to a category.
///
/// Category mapping uses `>=` comparisons against the configured thresholds,
/// highest threshold met wins. The raw score itself is not clamped.
pub fn calculate_final_score(
    findings: &[CheckFinding],
    thresholds: &ScoreThresholds,
) -> (i64, RiskLevel) {
    let total: i64 = findings.iter().map(|f| f.score_impact).sum();
    (total, risk_level_for(total, thresholds))
}

fn risk_level_for(total: i64, thresholds: &ScoreThresholds) -> RiskLevel {
    if total >= thresholds.critical {
        RiskLevel::Critical
    } else if total >= thresholds.high {
        RiskLevel::High
    } else if total >= thresholds.medium {
        RiskLevel::Medium
    } else if total >= thresholds.low {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    }
}
