//! Record filtering applied between normalization and aggregation.

use crate::models::{NormalizedRecord, RiskLevel};
use chrono::NaiveDate;

/// Inclusive date window plus an optional risk-level whitelist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    /// Empty means every level is kept.
    pub risk_levels: Vec<RiskLevel>,
}

impl RecordFilter {
    /// True when the filter keeps everything.
    pub fn is_empty(&self) -> bool {
        self.since.is_none() && self.until.is_none() && self.risk_levels.is_empty()
    }

    /// Whether a record passes. Undated records fail any date bound.
    pub fn matches(&self, record: &NormalizedRecord) -> bool {
        if !self.risk_levels.is_empty() && !self.risk_levels.contains(&record.risk_level) {
            return false;
        }

        if self.since.is_none() && self.until.is_none() {
            return true;
        }

        let Ok(date) = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") else {
            return false;
        };

        self.since.map_or(true, |since| date >= since)
            && self.until.map_or(true, |until| date <= until)
    }

    pub fn apply(&self, records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Recommendation, UNKNOWN};

    fn record(date: &str, level: RiskLevel) -> NormalizedRecord {
        NormalizedRecord {
            risk_score: 0.5,
            risk_level: level,
            document_type: "check".to_string(),
            recommendation: Recommendation::Unknown,
            bank: UNKNOWN.to_string(),
            payer: UNKNOWN.to_string(),
            payee: UNKNOWN.to_string(),
            date: date.to_string(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = RecordFilter::default();
        let records = vec![record("", RiskLevel::Low), record("bad", RiskLevel::High)];

        assert!(filter.is_empty());
        assert_eq!(filter.apply(records).len(), 2);
    }

    #[test]
    fn test_date_window_is_inclusive() {
        let filter = RecordFilter {
            since: Some(day("2024-01-10")),
            until: Some(day("2024-01-20")),
            ..Default::default()
        };

        assert!(filter.matches(&record("2024-01-10", RiskLevel::Low)));
        assert!(filter.matches(&record("2024-01-20", RiskLevel::Low)));
        assert!(!filter.matches(&record("2024-01-21", RiskLevel::Low)));
        assert!(!filter.matches(&record("2024-01-09", RiskLevel::Low)));
        assert!(!filter.matches(&record("", RiskLevel::Low)));
        assert!(!filter.matches(&record("01/15/2024", RiskLevel::Low)));
    }

    #[test]
    fn test_risk_level_whitelist() {
        let filter = RecordFilter {
            risk_levels: vec![RiskLevel::High, RiskLevel::Medium],
            ..Default::default()
        };

        let kept = filter.apply(vec![
            record("", RiskLevel::High),
            record("", RiskLevel::Low),
            record("", RiskLevel::Medium),
        ]);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.risk_level != RiskLevel::Low));
    }
}
