//! DebtLab Runner: pipeline orchestration, configuration, statistics, export.
//!
//! This crate builds on `debtlab-core` to provide:
//! - TOML configuration with reference defaults
//! - Single-run pipeline: download, normalize, derive, summarize
//! - Summary statistics (count, mean, std, quartiles)
//! - JSON, CSV and Markdown artifacts

pub mod config;
pub mod export;
pub mod runner;
pub mod stats;

pub use config::{AnalysisConfig, ConfigError, DebtLabConfig, HttpConfig, RequestConfig};
pub use export::{generate_report, load_summary, save_artifacts};
pub use runner::{run_pipeline, LatestSnapshot, PipelineRun, RunError, RunSummary};
pub use stats::SummaryStats;
