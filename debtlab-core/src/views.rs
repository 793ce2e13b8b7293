//! Record views: pure predicate selections over normalized records.
//!
//! Every view returns a fresh vector sorted ascending by `record_date`
//! (stable, so same-date rows keep their input order). The source slice is
//! never mutated.

use crate::domain::{DebtRecord, Holder, HolderAmount};

/// "Total Public Debt Outstanding" rows, one per month.
pub fn total_only(records: &[DebtRecord]) -> Vec<DebtRecord> {
    select(records, DebtRecord::is_total)
}

/// Total rows pivoted from two holder columns into long format.
///
/// Emits exactly two rows per date: public first, then intragovernmental.
pub fn holder_split(records: &[DebtRecord]) -> Vec<HolderAmount> {
    total_only(records)
        .iter()
        .flat_map(|r| {
            Holder::ALL.into_iter().map(move |holder| HolderAmount {
                record_date: r.record_date,
                holder,
                amount: match holder {
                    Holder::Public => r.debt_held_public_amt,
                    Holder::Intragovernmental => r.intragov_hold_amt,
                },
            })
        })
        .collect()
}

/// "Total Marketable" and "Total Nonmarketable" subtotal rows.
pub fn marketability(records: &[DebtRecord]) -> Vec<DebtRecord> {
    select(records, |r| r.security_type.is_marketability_total())
}

/// Leaf rows only: those with a concrete security class.
pub fn security_class(records: &[DebtRecord]) -> Vec<DebtRecord> {
    select(records, DebtRecord::is_leaf)
}

fn select(records: &[DebtRecord], pred: impl Fn(&DebtRecord) -> bool) -> Vec<DebtRecord> {
    let mut out: Vec<DebtRecord> = records.iter().filter(|r| pred(r)).cloned().collect();
    out.sort_by_key(|r| r.record_date);
    out
}
