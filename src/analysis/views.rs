//! Which optional views each document kind gets.

use crate::models::DocumentKind;

/// Optional views built on top of the always-on histograms,
/// distributions, risk-by-type averages, trend and summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewSet {
    pub risk_by_bank: bool,
    pub top_payers: bool,
    pub top_payees: bool,
    /// Recommendation distribution and summary counts.
    pub recommendations: bool,
    pub repeat_offenders: bool,
}

impl ViewSet {
    pub fn for_kind(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Check => Self::all(),
            DocumentKind::MoneyOrder => Self {
                risk_by_bank: true,
                top_payers: true,
                top_payees: true,
                ..Self::default()
            },
            DocumentKind::Paystub => Self {
                top_payers: true,
                top_payees: true,
                ..Self::default()
            },
            DocumentKind::BankStatement => Self {
                risk_by_bank: true,
                top_payers: true,
                ..Self::default()
            },
            DocumentKind::All => Self {
                risk_by_bank: true,
                ..Self::default()
            },
        }
    }

    pub fn all() -> Self {
        Self {
            risk_by_bank: true,
            top_payers: true,
            top_payees: true,
            recommendations: true,
            repeat_offenders: true,
        }
    }
}
