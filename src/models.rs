//! Data models for the risk dashboard.
//!
//! This module contains the core data structures passed along the
//! pipeline: raw rows, normalized records, and the aggregate result
//! handed to the report layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Placeholder for categorical fields with no usable source value.
pub const UNKNOWN: &str = "Unknown";

/// One input row: source header name to string value.
pub type RawRow = HashMap<String, String>;

/// Canonical risk classification of a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskLevel {
    /// Fixed reporting domain, in display order.
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
        RiskLevel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }

    /// Returns an emoji representation of the level.
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::High => "🔴",
            RiskLevel::Medium => "🟡",
            RiskLevel::Low => "🟢",
            RiskLevel::Unknown => "⚪",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model recommendation attached to check documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Approve,
    Reject,
    Escalate,
    Unknown,
}

impl Recommendation {
    pub const ALL: [Recommendation; 4] = [
        Recommendation::Approve,
        Recommendation::Reject,
        Recommendation::Escalate,
        Recommendation::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Reject => "REJECT",
            Recommendation::Escalate => "ESCALATE",
            Recommendation::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Recommendation {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "APPROVE" => Recommendation::Approve,
            "REJECT" => Recommendation::Reject,
            "ESCALATE" => Recommendation::Escalate,
            _ => Recommendation::Unknown,
        }
    }
}

/// Family of documents a dataset belongs to.
///
/// Selects both the alias table used to read rows and the set of
/// views the aggregation engine builds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Check,
    MoneyOrder,
    Paystub,
    BankStatement,
    /// Mixed upload of every document family.
    #[default]
    All,
}

impl DocumentKind {
    /// Stable identifier used in config keys.
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentKind::Check => "check",
            DocumentKind::MoneyOrder => "money_order",
            DocumentKind::Paystub => "paystub",
            DocumentKind::BankStatement => "bank_statement",
            DocumentKind::All => "all",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_lowercase().replace('-', "_").as_str() {
            "check" | "checks" => Some(DocumentKind::Check),
            "money_order" | "money_orders" => Some(DocumentKind::MoneyOrder),
            "paystub" | "paystubs" => Some(DocumentKind::Paystub),
            "bank_statement" | "bank_statements" => Some(DocumentKind::BankStatement),
            "all" => Some(DocumentKind::All),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Check => write!(f, "Checks"),
            DocumentKind::MoneyOrder => write!(f, "Money Orders"),
            DocumentKind::Paystub => write!(f, "Paystubs"),
            DocumentKind::BankStatement => write!(f, "Bank Statements"),
            DocumentKind::All => write!(f, "All Documents"),
        }
    }
}

/// A row after field resolution and risk classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Fraud risk score in `[0, 1]`.
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub document_type: String,
    /// Only resolved for checks; `Unknown` elsewhere.
    pub recommendation: Recommendation,
    pub bank: String,
    pub payer: String,
    pub payee: String,
    /// ISO date (`YYYY-MM-DD`) or empty.
    pub date: String,
}

impl NormalizedRecord {
    /// Risk score as a percentage.
    pub fn risk_percent(&self) -> f64 {
        self.risk_score * 100.0
    }
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// Occurrences of one categorical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Average risk of one group, as a one-decimal percentage string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAverage {
    pub name: String,
    pub average_risk: String,
    pub count: usize,
}

/// One day of the risk trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub average_risk: String,
    pub count: usize,
}

/// Recommendation tallies for check datasets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCounts {
    pub approve: usize,
    pub reject: usize,
    pub escalate: usize,
    pub unknown: usize,
}

/// Headline metrics for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_records: usize,
    pub average_risk: String,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<RecommendationCounts>,
    /// Distinct payers with more than one record and average risk >= 50%.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_offenders: Option<usize>,
}

/// Chart-ready summary of a dataset.
///
/// Built fresh on every aggregation and never mutated afterwards.
/// Optional views are `None` when the document kind does not select them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub risk_histogram: Vec<Bucket>,
    pub risk_histogram_fine: Vec<Bucket>,
    pub document_types: Vec<CategoryCount>,
    pub risk_levels: Vec<CategoryCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<CategoryCount>>,
    pub risk_by_document_type: Vec<GroupAverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_by_bank: Option<Vec<GroupAverage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_payers: Option<Vec<GroupAverage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_payees: Option<Vec<GroupAverage>>,
    pub trend: Vec<TrendPoint>,
    pub summary: SummaryMetrics,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// File path or API URL the rows came from.
    pub source: String,
    pub document_kind: DocumentKind,
    pub generated_at: DateTime<Utc>,
    pub records_loaded: usize,
    pub records_analyzed: usize,
}

/// The complete risk report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub result: AggregateResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_from_str() {
        assert_eq!(Recommendation::from("approve"), Recommendation::Approve);
        assert_eq!(Recommendation::from(" Reject "), Recommendation::Reject);
        assert_eq!(Recommendation::from("ESCALATE"), Recommendation::Escalate);
        assert_eq!(Recommendation::from("hold"), Recommendation::Unknown);
        assert_eq!(Recommendation::from(""), Recommendation::Unknown);
    }

    #[test]
    fn test_document_kind_slugs() {
        for kind in [
            DocumentKind::Check,
            DocumentKind::MoneyOrder,
            DocumentKind::Paystub,
            DocumentKind::BankStatement,
            DocumentKind::All,
        ] {
            assert_eq!(DocumentKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(
            DocumentKind::from_slug("money-order"),
            Some(DocumentKind::MoneyOrder)
        );
        assert_eq!(DocumentKind::from_slug("receipt"), None);
    }

    #[test]
    fn test_risk_level_serializes_uppercase() {
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
        assert_eq!(RiskLevel::High.to_string(), "HIGH");
    }
}
