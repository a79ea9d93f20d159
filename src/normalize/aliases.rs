//! Per-document-kind field alias tables.
//!
//! Each canonical field maps to an ordered list of source header names.
//! Lookup walks the list and takes the first alias whose value is present
//! and non-blank, so list order is the precedence order.

use crate::models::{DocumentKind, RawRow};
use std::collections::HashMap;
use std::fmt;

/// Canonical fields read from a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    RiskScore,
    DocumentType,
    RiskLevel,
    Recommendation,
    Bank,
    Payer,
    Payee,
    Date,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::RiskScore,
        Field::DocumentType,
        Field::RiskLevel,
        Field::Recommendation,
        Field::Bank,
        Field::Payer,
        Field::Payee,
        Field::Date,
    ];

    /// Canonical name, as used in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Field::RiskScore => "riskScore",
            Field::DocumentType => "documentType",
            Field::RiskLevel => "riskLevel",
            Field::Recommendation => "recommendation",
            Field::Bank => "bank",
            Field::Payer => "payer",
            Field::Payee => "payee",
            Field::Date => "date",
        }
    }

    /// Accepts the canonical name or its snake_case spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('_', "").as_str() {
            "riskscore" => Some(Field::RiskScore),
            "documenttype" => Some(Field::DocumentType),
            "risklevel" => Some(Field::RiskLevel),
            "recommendation" => Some(Field::Recommendation),
            "bank" => Some(Field::Bank),
            "payer" => Some(Field::Payer),
            "payee" => Some(Field::Payee),
            "date" => Some(Field::Date),
            _ => None,
        }
    }

    /// Header names shared by every document kind, tried last.
    fn generic_aliases(&self) -> &'static [&'static str] {
        match self {
            Field::RiskScore => &[
                "fraud_risk_score",
                "Fraud Risk Score",
                "risk_score",
                "Risk Score",
                "riskScore",
                "score",
                "Score",
            ],
            Field::DocumentType => &[
                "document_type",
                "Document Type",
                "documentType",
                "doc_type",
                "type",
                "Type",
            ],
            Field::RiskLevel => &["risk_level", "Risk Level", "riskLevel", "level"],
            Field::Recommendation => &[],
            Field::Bank => &["bank_name", "Bank Name", "bank", "Bank"],
            Field::Payer => &["payer_name", "Payer Name", "payer", "Payer"],
            Field::Payee => &["payee_name", "Payee Name", "payee", "Payee"],
            Field::Date => &[
                "upload_date",
                "Upload Date",
                "check_date",
                "created_at",
                "Created At",
                "date",
                "Date",
            ],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header names specific to one document kind, tried before the generic ones.
fn kind_aliases(kind: DocumentKind, field: Field) -> &'static [&'static str] {
    match (kind, field) {
        (DocumentKind::Check, Field::Recommendation) => &[
            "ai_recommendation",
            "AI Recommendation",
            "recommendation",
            "Recommendation",
        ],
        (DocumentKind::Check, Field::Date) => &["check_date", "Check Date"],

        (DocumentKind::MoneyOrder, Field::Bank) => &["issuer_name", "Issuer Name", "issuer"],
        (DocumentKind::MoneyOrder, Field::Payer) => &[
            "purchaser_name",
            "Purchaser Name",
            "purchaser",
            "sender_name",
        ],
        (DocumentKind::MoneyOrder, Field::Payee) => &["recipient_name", "Recipient Name"],
        (DocumentKind::MoneyOrder, Field::Date) => &["money_order_date", "issue_date", "Issue Date"],

        (DocumentKind::Paystub, Field::Payer) => &[
            "employer_name",
            "Employer Name",
            "employer",
            "company_name",
        ],
        (DocumentKind::Paystub, Field::Payee) => &["employee_name", "Employee Name", "employee"],
        (DocumentKind::Paystub, Field::Date) => &["pay_date", "Pay Date", "pay_period_end"],

        (DocumentKind::BankStatement, Field::Bank) => &["institution_name", "Institution"],
        (DocumentKind::BankStatement, Field::Payer) => &[
            "account_holder_name",
            "Account Holder",
            "account_holder",
        ],
        (DocumentKind::BankStatement, Field::Date) => &[
            "statement_date",
            "Statement Date",
            "statement_period_end",
        ],

        _ => &[],
    }
}

/// Ordered header aliases for every canonical field of one document kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAliasTable {
    aliases: HashMap<Field, Vec<String>>,
}

impl FieldAliasTable {
    /// Built-in table for a document kind.
    pub fn for_kind(kind: DocumentKind) -> Self {
        let aliases = Field::ALL
            .iter()
            .map(|&field| {
                let mut names: Vec<String> = Vec::new();
                for name in kind_aliases(kind, field)
                    .iter()
                    .chain(field.generic_aliases())
                {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
                (field, names)
            })
            .collect();

        Self { aliases }
    }

    /// Aliases for a field, in precedence order.
    pub fn aliases(&self, field: Field) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Put extra aliases ahead of the existing ones for a field.
    pub fn prepend(&mut self, field: Field, extra: &[String]) {
        let names = self.aliases.entry(field).or_default();
        let mut merged: Vec<String> = Vec::with_capacity(extra.len() + names.len());
        for name in extra.iter().chain(names.iter()) {
            if !merged.contains(name) {
                merged.push(name.clone());
            }
        }
        *names = merged;
    }

    /// First present, non-blank value for a field, trimmed.
    pub fn lookup<'a>(&self, row: &'a RawRow, field: Field) -> Option<&'a str> {
        self.aliases(field)
            .iter()
            .filter_map(|alias| row.get(alias))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }
}
