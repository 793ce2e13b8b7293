//! DebtDataset: the normalized records plus every derived view.
//!
//! This is what the reporting layer consumes: it never touches HTTP or JSON.

use serde::Serialize;

use crate::data::{normalize, DataError, RawRecord};
use crate::domain::{DebtRecord, HolderAmount};
use crate::series::{total_series, TotalPoint};
use crate::views::{holder_split, marketability, security_class};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtDataset {
    /// All records, in wire order.
    pub records: Vec<DebtRecord>,
    /// Monthly totals, ascending, with growth rates.
    pub totals: Vec<TotalPoint>,
    pub holder_split: Vec<HolderAmount>,
    pub marketability: Vec<DebtRecord>,
    pub security_class: Vec<DebtRecord>,
}

impl DebtDataset {
    /// Normalize raw rows and derive every view.
    pub fn from_raw(raw: &[RawRecord]) -> Result<Self, DataError> {
        Ok(Self::from_records(normalize(raw)?))
    }

    pub fn from_records(records: Vec<DebtRecord>) -> Self {
        Self {
            totals: total_series(&records),
            holder_split: holder_split(&records),
            marketability: marketability(&records),
            security_class: security_class(&records),
            records,
        }
    }

    /// Number of distinct months present in the records.
    pub fn month_count(&self) -> usize {
        let mut dates: Vec<_> = self.records.iter().map(|r| r.record_date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates.len()
    }

    /// Annualized growth values aligned with `totals`.
    pub fn growth(&self) -> Vec<Option<f64>> {
        self.totals.iter().map(|p| p.annualized_growth_pct).collect()
    }

    /// Most recent month of the total series.
    pub fn latest(&self) -> Option<&TotalPoint> {
        self.totals.last()
    }
}
