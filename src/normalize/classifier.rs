//! Risk level classification.
//!
//! An explicit label wins when it names a level; otherwise the level is
//! derived from the score with fixed thresholds.

use crate::models::RiskLevel;

/// Scores at or above this percentage are HIGH.
pub const HIGH_RISK_PERCENT: f64 = 70.0;
/// Scores at or above this percentage (and below HIGH) are MEDIUM.
pub const MEDIUM_RISK_PERCENT: f64 = 35.0;

/// Classify a record from its raw label and its score in `[0, 1]`.
pub fn classify(raw_label: &str, risk_score: f64) -> RiskLevel {
    label_level(raw_label).unwrap_or_else(|| level_from_score(risk_score))
}

/// Level named by a label, if any. CRITICAL folds into HIGH.
fn label_level(raw_label: &str) -> Option<RiskLevel> {
    let label = raw_label.trim().to_uppercase();

    if label.is_empty() {
        None
    } else if label.contains("HIGH") || label.contains("CRITICAL") {
        Some(RiskLevel::High)
    } else if label.contains("MEDIUM") {
        Some(RiskLevel::Medium)
    } else if label.contains("LOW") {
        Some(RiskLevel::Low)
    } else {
        None
    }
}

/// Level implied by a score alone.
pub fn level_from_score(risk_score: f64) -> RiskLevel {
    let percent = risk_score * 100.0;
    if percent >= HIGH_RISK_PERCENT {
        RiskLevel::High
    } else if percent >= MEDIUM_RISK_PERCENT {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
