//! Criterion benchmarks for the DebtLab hot path.
//!
//! Benchmarks:
//! 1. JSON parse of a full-history payload
//! 2. Normalize + derive every view

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::{Duration, NaiveDate};
use debtlab_core::data::{parse_body, DATE_FORMAT};
use debtlab_core::DebtDataset;

// ── Helpers ──────────────────────────────────────────────────────────

/// Roughly the size of the real series: ~280 months, 12 rows per month.
fn make_payload(months: usize) -> String {
    let start = NaiveDate::from_ymd_opt(2001, 1, 31).unwrap();
    let classes = [
        ("Marketable", "Bills"),
        ("Marketable", "Notes"),
        ("Marketable", "Bonds"),
        ("Marketable", "Treasury Inflation-Protected Securities"),
        ("Marketable", "Floating Rate Notes"),
        ("Total Marketable", "_"),
        ("Nonmarketable", "Government Account Series"),
        ("Nonmarketable", "United States Savings Securities"),
        ("Nonmarketable", "State and Local Government Series"),
        ("Nonmarketable", "Other"),
        ("Total Nonmarketable", "_"),
        ("Total Public Debt Outstanding", "_"),
    ];

    let mut rows = Vec::with_capacity(months * classes.len());
    for m in (0..months).rev() {
        let date = (start + Duration::days(30 * m as i64)).format(DATE_FORMAT);
        let level = 5_700_000.0 * (1.0 + 0.006 * m as f64);
        for (ty, class) in classes {
            rows.push(format!(
                r#"{{"record_date":"{date}","security_type_desc":"{ty}","security_class_desc":"{class}","debt_held_public_amt":"{:.2}","intragov_hold_amt":"{:.2}","total_amt":"{:.2}"}}"#,
                level * 0.75,
                level * 0.25,
                level
            ));
        }
    }
    format!(
        r#"{{"data":[{}],"meta":{{"total-count":{},"total-pages":1}}}}"#,
        rows.join(","),
        rows.len()
    )
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let payload = make_payload(280);
    c.bench_function("parse_body_280_months", |b| {
        b.iter(|| parse_body(black_box(&payload)).unwrap())
    });
}

fn bench_normalize_and_derive(c: &mut Criterion) {
    let payload = make_payload(280);
    let page = parse_body(&payload).unwrap();
    c.bench_function("dataset_from_raw_280_months", |b| {
        b.iter(|| DebtDataset::from_raw(black_box(&page.records)).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_normalize_and_derive);
criterion_main!(benches);
