//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for a pipeline run:
//! - **JSON**: the run summary with schema versioning
//! - **CSV**: the total series and each view, for external charting tools
//! - **Markdown**: a human-readable report
//!
//! Persisted summaries include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use debtlab_core::domain::{DebtRecord, HolderAmount};
use debtlab_core::series::TotalPoint;

use crate::runner::{PipelineRun, RunSummary, SCHEMA_VERSION};
use crate::stats::SummaryStats;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `RunSummary` to pretty JSON.
pub fn export_json(summary: &RunSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize RunSummary to JSON")
}

/// Deserialize a `RunSummary` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RunSummary> {
    let summary: RunSummary =
        serde_json::from_str(json).context("failed to deserialize RunSummary from JSON")?;
    if summary.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            summary.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(summary)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the monthly total series with derived columns.
///
/// Columns: record_date, total_trillions, public_trillions,
/// intragov_trillions, annualized_growth_pct, rolling_growth_pct.
/// Missing values are written as empty cells.
pub fn export_totals_csv(totals: &[TotalPoint], rolling: &[Option<f64>]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "record_date",
        "total_trillions",
        "public_trillions",
        "intragov_trillions",
        "annualized_growth_pct",
        "rolling_growth_pct",
    ])?;

    for (i, p) in totals.iter().enumerate() {
        wtr.write_record([
            p.record_date.to_string(),
            format!("{:.6}", p.total_amt_trillions),
            format!("{:.6}", p.public_trillions),
            format!("{:.6}", p.intragov_trillions),
            opt(p.annualized_growth_pct),
            opt(rolling.get(i).copied().flatten()),
        ])?;
    }

    finish(wtr)
}

/// Export the long-format holder split.
pub fn export_holder_split_csv(rows: &[HolderAmount]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["record_date", "holder", "amount_millions"])?;
    for r in rows {
        wtr.write_record([
            r.record_date.to_string(),
            r.holder.to_string(),
            format!("{:.2}", r.amount),
        ])?;
    }
    finish(wtr)
}

/// Export typed records (used for the marketability and security-class views).
pub fn export_records_csv(records: &[DebtRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "record_date",
        "security_type_desc",
        "security_class_desc",
        "debt_held_public_amt",
        "intragov_hold_amt",
        "total_amt",
        "total_trillions",
    ])?;
    for r in records {
        wtr.write_record([
            r.record_date.to_string(),
            r.security_type.to_string(),
            r.security_class.clone().unwrap_or_default(),
            format!("{:.2}", r.debt_held_public_amt),
            format!("{:.2}", r.intragov_hold_amt),
            format!("{:.2}", r.total_amt),
            format!("{:.6}", r.total_amt_trillions),
        ])?;
    }
    finish(wtr)
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.4}")).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a run.
///
/// Creates a directory named `mspd_{timestamp}/` under `output_dir`
/// containing:
/// - `summary.json`: the `RunSummary`
/// - `report.md`: Markdown report
/// - `totals.csv`, `holder_split.csv`, `marketability.csv`,
///   `security_class.csv`: one file per view
///
/// Returns the path to the created directory.
pub fn save_artifacts(run: &PipelineRun, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("mspd_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let ds = &run.dataset;
    let files = [
        ("summary.json", export_json(&run.summary)?),
        ("report.md", generate_report(&run.summary)),
        ("totals.csv", export_totals_csv(&ds.totals, &run.rolling_growth)?),
        ("holder_split.csv", export_holder_split_csv(&ds.holder_split)?),
        ("marketability.csv", export_records_csv(&ds.marketability)?),
        ("security_class.csv", export_records_csv(&ds.security_class)?),
    ];
    for (name, content) in &files {
        let path = run_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(run_dir)
}

/// Load a `RunSummary` from an artifact directory's summary.json.
pub fn load_summary(dir: &Path) -> Result<RunSummary> {
    let path = dir.join("summary.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a run.
pub fn generate_report(summary: &RunSummary) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Public Debt Report\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Source | {} |\n", summary.source));
    match (&summary.request_url, &summary.input_path) {
        (_, Some(path)) => md.push_str(&format!("| Input | {path} |\n")),
        (Some(url), None) => md.push_str(&format!("| Request | {url} |\n")),
        (None, None) => {}
    }
    md.push_str(&format!(
        "| Period | {} to {} |\n",
        date_or_dash(summary.first_month),
        date_or_dash(summary.last_month)
    ));
    md.push_str(&format!(
        "| Rows | {} ({} months, {} page(s)) |\n",
        summary.row_count, summary.month_count, summary.pages_fetched
    ));
    md.push_str(&format!("| Dataset Hash | {} |\n", summary.dataset_hash));
    md.push('\n');

    if let Some(latest) = &summary.latest {
        md.push_str(&format!("## Latest Month ({})\n\n", latest.record_date));
        md.push_str("| Measure | Value |\n");
        md.push_str("| --- | --- |\n");
        md.push_str(&format!("| Total | ${:.2}T |\n", latest.total_trillions));
        md.push_str(&format!(
            "| Held by the public | ${:.2}T ({:.1}%) |\n",
            latest.public_trillions, latest.public_share_pct
        ));
        md.push_str(&format!(
            "| Intragovernmental | ${:.2}T |\n",
            latest.intragov_trillions
        ));
        if let Some(m) = latest.marketable_trillions {
            md.push_str(&format!("| Marketable | ${m:.2}T |\n"));
        }
        if let Some(n) = latest.nonmarketable_trillions {
            md.push_str(&format!("| Nonmarketable | ${n:.2}T |\n"));
        }
        md.push_str(&format!(
            "| Annualized growth | {} |\n",
            pct_or_dash(latest.annualized_growth_pct)
        ));
        md.push_str(&format!(
            "| {}-month rolling growth | {} |\n",
            summary.rolling_window,
            pct_or_dash(latest.rolling_growth_pct)
        ));
        md.push('\n');
    }

    md.push_str("## Summary Statistics\n\n");
    md.push_str("| Series | Count | Mean | Std | Min | 25% | 50% | 75% | Max |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- | --- | --- | --- |\n");
    md.push_str(&stats_row("Total ($T)", summary.total_trillions.as_ref()));
    md.push_str(&stats_row("Annualized growth (%)", summary.growth_pct.as_ref()));
    md.push('\n');

    if !summary.data_quality_warnings.is_empty() {
        md.push_str("## Data Quality\n\n");
        for w in &summary.data_quality_warnings {
            md.push_str(&format!("- {w}\n"));
        }
        md.push('\n');
    }

    md
}

fn stats_row(label: &str, stats: Option<&SummaryStats>) -> String {
    match stats {
        Some(s) => format!(
            "| {label} | {} | {:.2} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            s.count,
            s.mean,
            s.std.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into()),
            s.min,
            s.p25,
            s.median,
            s.p75,
            s.max
        ),
        None => format!("| {label} | 0 | - | - | - | - | - | - | - |\n"),
    }
}

fn date_or_dash(d: Option<chrono::NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn pct_or_dash(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}%")).unwrap_or_else(|| "-".into())
}
