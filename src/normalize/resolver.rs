//! Field resolution: raw rows to normalized records.

use super::aliases::{Field, FieldAliasTable};
use super::classifier::classify;
use crate::models::{NormalizedRecord, RawRow, Recommendation, UNKNOWN};

/// Reads raw rows through one alias table.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    table: FieldAliasTable,
}

impl FieldResolver {
    pub fn new(table: FieldAliasTable) -> Self {
        Self { table }
    }

    /// Resolve and classify a single row. Never fails.
    pub fn resolve(&self, row: &RawRow) -> NormalizedRecord {
        let risk_score = parse_risk_score(self.table.lookup(row, Field::RiskScore));
        let raw_level = self.table.lookup(row, Field::RiskLevel).unwrap_or("");

        NormalizedRecord {
            risk_score,
            risk_level: classify(raw_level, risk_score),
            document_type: self.text_or_unknown(row, Field::DocumentType),
            recommendation: self
                .table
                .lookup(row, Field::Recommendation)
                .map(Recommendation::from)
                .unwrap_or(Recommendation::Unknown),
            bank: self.text_or_unknown(row, Field::Bank),
            payer: self.text_or_unknown(row, Field::Payer),
            payee: self.text_or_unknown(row, Field::Payee),
            date: parse_date(self.table.lookup(row, Field::Date)),
        }
    }

    /// Resolve every row, preserving order.
    pub fn resolve_all(&self, rows: &[RawRow]) -> Vec<NormalizedRecord> {
        rows.iter().map(|row| self.resolve(row)).collect()
    }

    fn text_or_unknown(&self, row: &RawRow, field: Field) -> String {
        self.table
            .lookup(row, field)
            .unwrap_or(UNKNOWN)
            .to_string()
    }
}

/// Parse a score into `[0, 1]`; anything unparseable or non-finite is 0.
pub fn parse_risk_score(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|score| score.is_finite())
        .map(|score| score.clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Keep the date part of a timestamp (everything before the first `T`).
pub fn parse_date(raw: Option<&str>) -> String {
    match raw {
        Some(value) => value.split('T').next().unwrap_or("").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentKind, RiskLevel};

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn check_resolver() -> FieldResolver {
        FieldResolver::new(FieldAliasTable::for_kind(DocumentKind::Check))
    }

    #[test]
    fn test_parse_risk_score() {
        assert_eq!(parse_risk_score(Some("0.42")), 0.42);
        assert_eq!(parse_risk_score(Some(" 0.9 ")), 0.9);
        assert_eq!(parse_risk_score(Some("abc")), 0.0);
        assert_eq!(parse_risk_score(Some("NaN")), 0.0);
        assert_eq!(parse_risk_score(Some("inf")), 0.0);
        assert_eq!(parse_risk_score(Some("1.7")), 1.0);
        assert_eq!(parse_risk_score(Some("-0.2")), 0.0);
        assert_eq!(parse_risk_score(None), 0.0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(Some("2024-03-09T14:22:01Z")), "2024-03-09");
        assert_eq!(parse_date(Some("2024-03-09")), "2024-03-09");
        assert_eq!(parse_date(None), "");
    }

    #[test]
    fn test_resolve_api_record() {
        let record = check_resolver().resolve(&row(&[
            ("fraud_risk_score", "0.82"),
            ("document_type", "check"),
            ("risk_level", "critical"),
            ("ai_recommendation", "reject"),
            ("bank_name", "First Bank"),
            ("payer_name", "ACME"),
            ("payee_name", "Jane Roe"),
            ("check_date", "2024-05-01T00:00:00"),
        ]));

        assert_eq!(record.risk_score, 0.82);
        assert_eq!(record.risk_level, RiskLevel::High);
        assert_eq!(record.document_type, "check");
        assert_eq!(record.recommendation, Recommendation::Reject);
        assert_eq!(record.bank, "First Bank");
        assert_eq!(record.payer, "ACME");
        assert_eq!(record.payee, "Jane Roe");
        assert_eq!(record.date, "2024-05-01");
    }

    #[test]
    fn test_resolve_defaults() {
        let record = check_resolver().resolve(&row(&[("unrelated", "x")]));

        assert_eq!(record.risk_score, 0.0);
        assert_eq!(record.risk_level, RiskLevel::Low);
        assert_eq!(record.document_type, UNKNOWN);
        assert_eq!(record.recommendation, Recommendation::Unknown);
        assert_eq!(record.bank, UNKNOWN);
        assert_eq!(record.payer, UNKNOWN);
        assert_eq!(record.payee, UNKNOWN);
        assert_eq!(record.date, "");
    }

    #[test]
    fn test_unknown_label_uses_score() {
        let record = check_resolver().resolve(&row(&[
            ("Risk Score", "0.5"),
            ("Risk Level", "UNKNOWN"),
        ]));

        assert_eq!(record.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let resolver = FieldResolver::new(FieldAliasTable::for_kind(DocumentKind::All));
        let records = resolver.resolve_all(&[
            row(&[("doc_type", "Check"), ("score", "0.80")]),
            row(&[("doc_type", "MoneyOrder"), ("score", "0.40")]),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_type, "Check");
        assert_eq!(records[1].risk_score, 0.40);
    }
}
