//! DebtLab CLI: fetch, summarize and export U.S. public debt statistics.
//!
//! Commands:
//! - `fetch`: run the pipeline against the Fiscal Data API (or a saved
//!   payload) and print a summary; optionally write CSV/JSON/Markdown artifacts
//! - `url`: print the request URL the configuration produces

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use debtlab_core::data::{Fetcher, HttpFetcher, PageMode, StaticFetcher};
use debtlab_runner::{run_pipeline, save_artifacts, DebtLabConfig, RunSummary, SummaryStats};

#[derive(Parser)]
#[command(
    name = "debtlab",
    about = "DebtLab CLI: U.S. national debt statistics from the Fiscal Data API"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch MSPD table 1, derive series and print a summary.
    Fetch {
        #[command(flatten)]
        common: CommonArgs,

        /// Read the response body from this file instead of the network.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write the raw body of the first page to this file.
        #[arg(long)]
        save_raw: Option<PathBuf>,

        /// Directory for CSV/JSON/Markdown artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the request URL without fetching.
    Url {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows per page requested from the API.
    #[arg(long)]
    page_size: Option<i64>,

    /// Request only the configured page (still fails if it was truncated).
    #[arg(long, default_value_t = false)]
    single_page: bool,

    /// Months in the rolling mean of the growth series.
    #[arg(long)]
    rolling_window: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Fetch {
            common,
            input,
            save_raw,
            output_dir,
        } => run_fetch(&common, input, save_raw, output_dir),
        Commands::Url { common } => run_url(&common),
    }
}

/// Logs go to stderr; stdout is reserved for the report.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(common: &CommonArgs) -> Result<DebtLabConfig> {
    let mut config = match &common.config {
        Some(path) => DebtLabConfig::from_file(path)?,
        None => DebtLabConfig::default(),
    };
    if let Some(size) = common.page_size {
        config.request.page_size = size;
    }
    if common.single_page {
        config.request.page_mode = PageMode::SinglePage;
    }
    if let Some(window) = common.rolling_window {
        config.analysis.rolling_window = window;
    }
    config.validate()?;
    Ok(config)
}

fn run_fetch(
    common: &CommonArgs,
    input: Option<PathBuf>,
    save_raw: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(common)?;

    let fetcher: Box<dyn Fetcher> = match &input {
        Some(path) => {
            info!(path = %path.display(), "reading saved payload");
            // A saved payload is a single body
            config.request.page_mode = PageMode::SinglePage;
            Box::new(StaticFetcher::from_file(path)?)
        }
        None => Box::new(HttpFetcher::new(
            config.http.timeout(),
            &config.http.user_agent,
        )?),
    };

    let run = run_pipeline(&config, fetcher.as_ref())?;

    if let Some(path) = save_raw {
        save_first_body(&run.raw_bodies, &path)?;
    }

    print_summary(&run.summary);

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&run, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn run_url(common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    println!("{}", config.request_builder().build()?);
    Ok(())
}

fn save_first_body(bodies: &[String], path: &Path) -> Result<()> {
    let Some(body) = bodies.first() else {
        return Ok(());
    };
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    if bodies.len() > 1 {
        warn!(
            pages = bodies.len(),
            path = %path.display(),
            "only page 1 saved"
        );
    }
    info!(path = %path.display(), "raw payload saved");
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("=== Public Debt Outstanding ===");
    println!("Source:         {}", summary.source);
    if let Some(path) = &summary.input_path {
        println!("Input:          {path}");
    } else if let Some(url) = &summary.request_url {
        println!("Request:        {url}");
    }
    match (summary.first_month, summary.last_month) {
        (Some(first), Some(last)) => println!("Period:         {first} to {last}"),
        _ => println!("Period:         (no total rows)"),
    }
    println!(
        "Rows:           {} ({} months, {} page(s))",
        summary.row_count, summary.month_count, summary.pages_fetched
    );
    println!("Dataset hash:   {}", summary.dataset_hash);

    if let Some(latest) = &summary.latest {
        println!();
        println!("--- Latest ({}) ---", latest.record_date);
        println!("Total:          ${:.2}T", latest.total_trillions);
        println!(
            "Public:         ${:.2}T ({:.1}%)",
            latest.public_trillions, latest.public_share_pct
        );
        println!("Intragov:       ${:.2}T", latest.intragov_trillions);
        if let Some(m) = latest.marketable_trillions {
            println!("Marketable:     ${m:.2}T");
        }
        if let Some(n) = latest.nonmarketable_trillions {
            println!("Nonmarketable:  ${n:.2}T");
        }
        if let Some(g) = latest.annualized_growth_pct {
            println!("Growth (ann.):  {g:.2}%");
        }
        if let Some(r) = latest.rolling_growth_pct {
            println!("Growth ({}m avg): {r:.2}%", summary.rolling_window);
        }
    }

    println!();
    println!("--- Annualized growth (%) ---");
    print_stats(summary.growth_pct.as_ref());
    println!();
    println!("--- Total ($T) ---");
    print_stats(summary.total_trillions.as_ref());

    for warn in &summary.data_quality_warnings {
        println!("WARNING: {warn}");
    }
    println!();
}

fn print_stats(stats: Option<&SummaryStats>) {
    let Some(s) = stats else {
        println!("(no values)");
        return;
    };
    println!("count  {}", s.count);
    println!("mean   {:.2}", s.mean);
    match s.std {
        Some(std) => println!("std    {std:.2}"),
        None => println!("std    -"),
    }
    println!("min    {:.2}", s.min);
    println!("25%    {:.2}", s.p25);
    println!("50%    {:.2}", s.median);
    println!("75%    {:.2}", s.p75);
    println!("max    {:.2}", s.max);
}
