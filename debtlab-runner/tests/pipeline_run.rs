//! Integration tests for the runner against the frozen three-month fixture.

use std::path::PathBuf;

use debtlab_core::data::StaticFetcher;
use debtlab_runner::export::load_summary;
use debtlab_runner::{run_pipeline, save_artifacts, DebtLabConfig};

fn fixture_body() -> String {
    // The fixture lives in debtlab-core's test directory
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("debtlab-core/tests/fixtures/mspd_3_months.json");
    std::fs::read_to_string(path).unwrap()
}

fn fixture_config(rolling_window: usize) -> DebtLabConfig {
    let mut config = DebtLabConfig::default();
    config.analysis.rolling_window = rolling_window;
    config
}

#[test]
fn runner_summarizes_fixture() {
    let fetcher = StaticFetcher::new(vec![fixture_body()]);
    let run = run_pipeline(&fixture_config(12), &fetcher).unwrap();
    let s = &run.summary;

    assert_eq!(s.source, "static");
    assert_eq!(s.pages_fetched, 1);
    assert_eq!(s.row_count, 21);
    assert_eq!(s.month_count, 3);
    assert_eq!(s.first_month.unwrap().to_string(), "2023-10-31");
    assert_eq!(s.last_month.unwrap().to_string(), "2023-12-31");
    assert!(s.data_quality_warnings.is_empty(), "{:?}", s.data_quality_warnings);

    let growth = s.growth_pct.unwrap();
    assert_eq!(growth.count, 2);
    assert!((growth.min - 4.3421).abs() < 1e-3);
    assert!((growth.max - 6.4525).abs() < 1e-3);

    let latest = s.latest.as_ref().unwrap();
    assert!((latest.total_trillions - 34.00149).abs() < 1e-9);
    assert!(latest.marketable_trillions.is_some());
    assert!(latest.nonmarketable_trillions.is_some());
    let split = latest.marketable_trillions.unwrap() + latest.nonmarketable_trillions.unwrap();
    assert!((split - latest.total_trillions).abs() < 1e-6);
    // Window of 12 never fills on three months
    assert_eq!(latest.rolling_growth_pct, None);
}

#[test]
fn rolling_growth_with_short_window() {
    let fetcher = StaticFetcher::new(vec![fixture_body()]);
    let run = run_pipeline(&fixture_config(2), &fetcher).unwrap();
    assert_eq!(run.rolling_growth.len(), 3);
    assert_eq!(run.rolling_growth[0], None);
    assert_eq!(run.rolling_growth[1], None);
    let expected = (4.342127 + 6.452514) / 2.0;
    assert!((run.rolling_growth[2].unwrap() - expected).abs() < 1e-4);
}

#[test]
fn dataset_hash_is_stable_across_runs() {
    let a = run_pipeline(&fixture_config(12), &StaticFetcher::new(vec![fixture_body()])).unwrap();
    let b = run_pipeline(&fixture_config(12), &StaticFetcher::new(vec![fixture_body()])).unwrap();
    assert_eq!(a.summary.dataset_hash, b.summary.dataset_hash);
    assert_eq!(a.dataset, b.dataset);
}

#[test]
fn artifacts_are_written_and_reloadable() {
    let dir = tempfile::tempdir().unwrap();
    let run = run_pipeline(&fixture_config(12), &StaticFetcher::new(vec![fixture_body()])).unwrap();
    let run_dir = save_artifacts(&run, dir.path()).unwrap();

    for name in [
        "summary.json",
        "report.md",
        "totals.csv",
        "holder_split.csv",
        "marketability.csv",
        "security_class.csv",
    ] {
        assert!(run_dir.join(name).exists(), "missing {name}");
    }

    let totals = std::fs::read_to_string(run_dir.join("totals.csv")).unwrap();
    assert_eq!(totals.lines().count(), 4);
    let split = std::fs::read_to_string(run_dir.join("holder_split.csv")).unwrap();
    assert_eq!(split.lines().count(), 7);

    let summary = load_summary(&run_dir).unwrap();
    assert_eq!(summary.dataset_hash, run.summary.dataset_hash);
    assert_eq!(summary.row_count, 21);
}

#[test]
fn offline_run_records_input_path_instead_of_url() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mspd.json");
    std::fs::write(&input, fixture_body()).unwrap();

    let fetcher = StaticFetcher::from_file(&input).unwrap();
    let run = run_pipeline(&fixture_config(12), &fetcher).unwrap();
    assert_eq!(run.summary.request_url, None);
    assert_eq!(
        run.summary.input_path.as_deref(),
        Some(input.display().to_string().as_str())
    );

    let report = debtlab_runner::generate_report(&run.summary);
    assert!(report.contains("| Input |"));
    assert!(!report.contains("api.fiscaldata.treasury.gov"));
}

#[test]
fn live_style_run_records_request_url() {
    let run = run_pipeline(&fixture_config(12), &StaticFetcher::new(vec![fixture_body()])).unwrap();
    assert_eq!(run.summary.input_path, None);
    let url = run.summary.request_url.as_deref().unwrap();
    assert!(url.starts_with("https://api.fiscaldata.treasury.gov/"));
}
