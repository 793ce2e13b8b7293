//! Normalizer: text records to typed `DebtRecord`s.
//!
//! Every field is validated and converted exactly once here. Nothing is
//! coerced: a malformed date or amount fails the whole batch with
//! `DataError::Format` naming the field and the offending text.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::parse::RawRecord;
use super::provider::DataError;
use crate::domain::{DebtRecord, SecurityType, MILLIONS_PER_TRILLION};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire spellings of "no security class" on subtotal and total rows.
const NOT_APPLICABLE: [&str; 3] = ["_", "null", ""];

/// Normalize a batch of raw records, preserving input order.
///
/// Pure: the same input always yields the same output. Rejects batches
/// where two rows share `(record_date, security_type, security_class)`.
pub fn normalize(raw: &[RawRecord]) -> Result<Vec<DebtRecord>, DataError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());

    for row in raw {
        let record = normalize_record(row)?;
        if !seen.insert(record.key()) {
            return Err(DataError::DuplicateRecord {
                record_date: record.record_date.format(DATE_FORMAT).to_string(),
                security_type: record.security_type.to_string(),
                security_class: record.security_class.clone().unwrap_or_else(|| "_".into()),
            });
        }
        out.push(record);
    }

    Ok(out)
}

/// Normalize a single row.
pub fn normalize_record(raw: &RawRecord) -> Result<DebtRecord, DataError> {
    let record_date = parse_date(&raw.record_date)?;
    let debt_held_public_amt = parse_amount("debt_held_public_amt", &raw.debt_held_public_amt)?;
    let intragov_hold_amt = parse_amount("intragov_hold_amt", &raw.intragov_hold_amt)?;
    let total_amt = parse_amount("total_amt", &raw.total_amt)?;

    if raw.security_type_desc.trim().is_empty() {
        return Err(DataError::format(
            "security_type_desc",
            &raw.security_type_desc,
            "empty category label",
        ));
    }

    Ok(DebtRecord {
        record_date,
        security_type: SecurityType::from_label(&raw.security_type_desc),
        security_class: parse_class(&raw.security_class_desc),
        debt_held_public_amt,
        intragov_hold_amt,
        total_amt,
        total_amt_trillions: to_trillions(total_amt),
    })
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, DataError> {
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| DataError::format("record_date", text, e.to_string()))?;
    // chrono accepts unpadded fields; the wire format never uses them
    if date.format(DATE_FORMAT).to_string() != text {
        return Err(DataError::format(
            "record_date",
            text,
            "expected zero-padded YYYY-MM-DD",
        ));
    }
    Ok(date)
}

/// Parse a non-negative, finite decimal amount.
pub fn parse_amount(field: &str, text: &str) -> Result<f64, DataError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| DataError::format(field, text, "not a decimal number"))?;
    if !value.is_finite() {
        return Err(DataError::format(field, text, "not a finite number"));
    }
    if value < 0.0 {
        return Err(DataError::format(field, text, "negative amount"));
    }
    Ok(value)
}

/// Millions of dollars to trillions.
pub fn to_trillions(millions: f64) -> f64 {
    millions / MILLIONS_PER_TRILLION
}

fn parse_class(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if NOT_APPLICABLE.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}
