//! Pipeline runner: wires together download, normalization, views and stats.
//!
//! One call to `run_pipeline()` is one complete run: fetch every page,
//! normalize, derive, summarize. Nothing is cached between runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use debtlab_core::data::{download, DataError, Fetcher};
use debtlab_core::domain::{DebtRecord, SecurityType};
use debtlab_core::series::rolling_mean;
use debtlab_core::DebtDataset;

use crate::config::{ConfigError, DebtLabConfig};
use crate::stats::SummaryStats;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Current schema version for persisted summaries.
pub const SCHEMA_VERSION: u32 = 1;

/// Holder residuals above this many millions are reported as warnings.
const RESIDUAL_WARN_MILLIONS: f64 = 1.0;

/// Most recent month at a glance, in trillions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub record_date: NaiveDate,
    pub total_trillions: f64,
    pub public_trillions: f64,
    pub intragov_trillions: f64,
    pub public_share_pct: f64,
    pub marketable_trillions: Option<f64>,
    pub nonmarketable_trillions: Option<f64>,
    pub annualized_growth_pct: Option<f64>,
    pub rolling_growth_pct: Option<f64>,
}

/// Serializable outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub source: String,
    /// URL the bodies were fetched from; `None` when replayed from a file.
    pub request_url: Option<String>,
    /// File the bodies were replayed from, for offline runs.
    #[serde(default)]
    pub input_path: Option<String>,
    pub pages_fetched: usize,
    pub row_count: usize,
    pub month_count: usize,
    pub first_month: Option<NaiveDate>,
    pub last_month: Option<NaiveDate>,
    /// BLAKE3 over the raw response bodies, in fetch order.
    pub dataset_hash: String,
    pub rolling_window: usize,
    pub latest: Option<LatestSnapshot>,
    pub total_trillions: Option<SummaryStats>,
    pub growth_pct: Option<SummaryStats>,
    pub data_quality_warnings: Vec<String>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub dataset: DebtDataset,
    /// Rolling mean of growth, aligned with `dataset.totals`.
    pub rolling_growth: Vec<Option<f64>>,
    pub summary: RunSummary,
    pub raw_bodies: Vec<String>,
}

/// Run the full pipeline once against `fetcher`.
pub fn run_pipeline(config: &DebtLabConfig, fetcher: &dyn Fetcher) -> Result<PipelineRun, RunError> {
    config.validate()?;
    let builder = config.request_builder();
    let request_url = builder.build()?;
    info!(url = %request_url, "starting pipeline");

    let input_path = fetcher.input_path().map(|p| p.display().to_string());
    let dl = download(fetcher, &builder, config.request.page_mode)?;
    let dataset = DebtDataset::from_raw(&dl.records)?;
    info!(
        records = dataset.records.len(),
        months = dataset.totals.len(),
        "normalized"
    );

    let rolling_window = config.analysis.rolling_window;
    let rolling_growth = rolling_mean(&dataset.growth(), rolling_window);

    let warnings = data_quality_warnings(&dataset);
    for w in &warnings {
        warn!("{w}");
    }

    let summary = RunSummary {
        schema_version: SCHEMA_VERSION,
        source: fetcher.name().to_string(),
        request_url: input_path.is_none().then_some(request_url),
        input_path,
        pages_fetched: dl.pages_fetched(),
        row_count: dataset.records.len(),
        month_count: dataset.month_count(),
        first_month: dataset.totals.first().map(|p| p.record_date),
        last_month: dataset.latest().map(|p| p.record_date),
        dataset_hash: dataset_hash(&dl.bodies),
        rolling_window,
        latest: latest_snapshot(&dataset, &rolling_growth),
        total_trillions: SummaryStats::describe_defined(
            &dataset
                .totals
                .iter()
                .map(|p| p.total_amt_trillions)
                .collect::<Vec<_>>(),
        ),
        growth_pct: SummaryStats::describe(&dataset.growth()),
        data_quality_warnings: warnings,
    };

    Ok(PipelineRun {
        dataset,
        rolling_growth,
        summary,
        raw_bodies: dl.bodies,
    })
}

/// BLAKE3 hash of the raw bodies, hex encoded.
pub fn dataset_hash(bodies: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    for body in bodies {
        hasher.update(&(body.len() as u64).to_le_bytes());
        hasher.update(body.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

fn latest_snapshot(dataset: &DebtDataset, rolling: &[Option<f64>]) -> Option<LatestSnapshot> {
    let latest = dataset.latest()?;
    let subtotal = |ty: SecurityType| {
        dataset
            .marketability
            .iter()
            .find(|r| r.record_date == latest.record_date && r.security_type == ty)
            .map(|r| r.total_amt_trillions)
    };
    let public_share_pct = if latest.total_amt_trillions > 0.0 {
        latest.public_trillions / latest.total_amt_trillions * 100.0
    } else {
        0.0
    };

    Some(LatestSnapshot {
        record_date: latest.record_date,
        total_trillions: latest.total_amt_trillions,
        public_trillions: latest.public_trillions,
        intragov_trillions: latest.intragov_trillions,
        public_share_pct,
        marketable_trillions: subtotal(SecurityType::TotalMarketable),
        nonmarketable_trillions: subtotal(SecurityType::TotalNonmarketable),
        annualized_growth_pct: latest.annualized_growth_pct,
        rolling_growth_pct: rolling.last().copied().flatten(),
    })
}

/// Soft checks that never fail the run.
fn data_quality_warnings(dataset: &DebtDataset) -> Vec<String> {
    let mut warnings = Vec::new();

    if dataset.records.is_empty() {
        warnings.push("response contained no records".to_string());
        return warnings;
    }
    if dataset.totals.is_empty() {
        warnings.push("no 'Total Public Debt Outstanding' rows in response".to_string());
    } else if dataset.totals.len() != dataset.month_count() {
        warnings.push(format!(
            "{} months present but only {} have a total row",
            dataset.month_count(),
            dataset.totals.len()
        ));
    }

    let unreconciled: Vec<&DebtRecord> = dataset
        .records
        .iter()
        .filter(|r| r.holder_residual().abs() > RESIDUAL_WARN_MILLIONS)
        .collect();
    if let Some(worst) = unreconciled
        .iter()
        .max_by(|a, b| a.holder_residual().abs().total_cmp(&b.holder_residual().abs()))
    {
        warnings.push(format!(
            "{} rows where total != public + intragovernmental (largest: {:.2}M on {} {})",
            unreconciled.len(),
            worst.holder_residual(),
            worst.record_date,
            worst.security_type
        ));
    }

    warnings
}
