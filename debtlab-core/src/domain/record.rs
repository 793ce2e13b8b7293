//! DebtRecord: one typed row of the MSPD table 1 dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source amounts are in millions of dollars.
pub const MILLIONS_PER_TRILLION: f64 = 1_000_000.0;

/// Top-level security category.
///
/// The set is owned by the Treasury and may grow; unknown labels are kept
/// verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecurityType {
    Marketable,
    Nonmarketable,
    TotalMarketable,
    TotalNonmarketable,
    TotalPublicDebtOutstanding,
    Other(String),
}

impl SecurityType {
    /// Map a wire label onto a category. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Marketable" => Self::Marketable,
            "Nonmarketable" => Self::Nonmarketable,
            "Total Marketable" => Self::TotalMarketable,
            "Total Nonmarketable" => Self::TotalNonmarketable,
            "Total Public Debt Outstanding" => Self::TotalPublicDebtOutstanding,
            other => Self::Other(other.to_string()),
        }
    }

    /// The label as it appears on the wire.
    pub fn label(&self) -> &str {
        match self {
            Self::Marketable => "Marketable",
            Self::Nonmarketable => "Nonmarketable",
            Self::TotalMarketable => "Total Marketable",
            Self::TotalNonmarketable => "Total Nonmarketable",
            Self::TotalPublicDebtOutstanding => "Total Public Debt Outstanding",
            Self::Other(label) => label,
        }
    }

    /// True for the two marketability subtotal rows.
    pub fn is_marketability_total(&self) -> bool {
        matches!(self, Self::TotalMarketable | Self::TotalNonmarketable)
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Uniqueness key of a record: `(record_date, security_type, security_class)`.
pub type RecordKey = (NaiveDate, SecurityType, Option<String>);

/// A single normalized row. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    pub record_date: NaiveDate,
    pub security_type: SecurityType,
    /// `None` for subtotal/total rows (wire sentinel `_` or `null`).
    pub security_class: Option<String>,
    /// Millions of dollars.
    pub debt_held_public_amt: f64,
    /// Millions of dollars.
    pub intragov_hold_amt: f64,
    /// Millions of dollars.
    pub total_amt: f64,
    pub total_amt_trillions: f64,
}

impl DebtRecord {
    pub fn key(&self) -> RecordKey {
        (
            self.record_date,
            self.security_type.clone(),
            self.security_class.clone(),
        )
    }

    /// True for the grand-total row of a month.
    pub fn is_total(&self) -> bool {
        self.security_type == SecurityType::TotalPublicDebtOutstanding
    }

    /// True for leaf rows carrying a concrete security class.
    pub fn is_leaf(&self) -> bool {
        self.security_class.is_some()
    }

    /// Difference between `total_amt` and the sum of the holder columns.
    ///
    /// Source data is not guaranteed to reconcile exactly; callers decide
    /// what tolerance they care about.
    pub fn holder_residual(&self) -> f64 {
        self.total_amt - (self.debt_held_public_amt + self.intragov_hold_amt)
    }
}

/// Who holds the debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holder {
    Public,
    Intragovernmental,
}

impl Holder {
    pub const ALL: [Holder; 2] = [Holder::Public, Holder::Intragovernmental];

    pub fn label(self) -> &'static str {
        match self {
            Holder::Public => "public",
            Holder::Intragovernmental => "intragovernmental",
        }
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Long-format row of the holder split: one amount per `(date, holder)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolderAmount {
    pub record_date: NaiveDate,
    pub holder: Holder,
    /// Millions of dollars.
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_total() -> DebtRecord {
        DebtRecord {
            record_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            security_type: SecurityType::TotalPublicDebtOutstanding,
            security_class: None,
            debt_held_public_amt: 26_900_000.0,
            intragov_hold_amt: 7_101_490.0,
            total_amt: 34_001_490.0,
            total_amt_trillions: 34.00149,
        }
    }

    #[test]
    fn known_labels_round_trip() {
        for label in [
            "Marketable",
            "Nonmarketable",
            "Total Marketable",
            "Total Nonmarketable",
            "Total Public Debt Outstanding",
        ] {
            let ty = SecurityType::from_label(label);
            assert!(!matches!(ty, SecurityType::Other(_)), "{label} unmapped");
            assert_eq!(ty.label(), label);
        }
    }

    #[test]
    fn unknown_label_is_kept_verbatim() {
        let ty = SecurityType::from_label("Federal Financing Bank");
        assert_eq!(ty, SecurityType::Other("Federal Financing Bank".into()));
        assert_eq!(ty.to_string(), "Federal Financing Bank");
    }

    #[test]
    fn marketability_totals() {
        assert!(SecurityType::TotalMarketable.is_marketability_total());
        assert!(SecurityType::TotalNonmarketable.is_marketability_total());
        assert!(!SecurityType::Marketable.is_marketability_total());
        assert!(!SecurityType::TotalPublicDebtOutstanding.is_marketability_total());
    }

    #[test]
    fn total_row_predicates() {
        let rec = sample_total();
        assert!(rec.is_total());
        assert!(!rec.is_leaf());
        assert!(rec.holder_residual().abs() < 1e-6);
    }

    #[test]
    fn holder_serializes_snake_case() {
        let json = serde_json::to_string(&Holder::Intragovernmental).unwrap();
        assert_eq!(json, "\"intragovernmental\"");
    }
}
