//! Brand assets CLI
//!
//! Runs the built-in asset table to completion. Every flag is optional; with
//! none the fixed configuration is used unchanged.

use super::config::CliConfigBuilder;
use crate::job::{AssetJob, JobReport, LogoOutcome};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// Fetch product page images and build a transparent logo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "brand-assets")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// JSON configuration file overlaying the built-in table
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory [default: assets, or $BRAND_ASSETS_DIR]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Channel value (0-255) at or above which a logo pixel becomes transparent
    #[arg(short, long)]
    pub threshold: Option<u8>,

    /// Download the logo from this URL
    #[arg(long, value_name = "URL", conflicts_with = "no_logo")]
    pub logo_url: Option<String>,

    /// Build the logo from the image saved for this target
    #[arg(long, value_name = "TARGET", conflicts_with = "no_logo")]
    pub reuse_logo_from: Option<String>,

    /// Skip the logo stage
    #[arg(long)]
    pub no_logo: bool,

    /// Disable the image-host substring fallback during extraction
    #[arg(long)]
    pub no_host_fallback: bool,

    /// HTTP request timeout in seconds [default: client default]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Show download progress bars
    #[arg(long)]
    pub progress: bool,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Plain log lines without colors
    #[arg(long)]
    pub compact_logs: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.compact_logs).context("Failed to initialize tracing")?;

    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    if cli.print_config {
        let json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize configuration")?;
        println!("{}", json);
        return Ok(());
    }

    info!(
        targets = config.targets.len(),
        output_dir = %config.output_dir.display(),
        "Starting brand-assets"
    );

    let job = AssetJob::new(config).context("Failed to set up asset job")?;
    let report = job.run().await.context("Asset run aborted")?;

    print_summary(&report);
    Ok(())
}

/// Initialize tracing; `RUST_LOG` takes precedence over `-v`
fn init_tracing(verbose_count: u8, compact: bool) -> Result<()> {
    use crate::tracing_config::{TracingConfig, TracingFormat};

    let format = if compact {
        TracingFormat::Compact
    } else {
        TracingFormat::Console
    };

    let mut config = TracingConfig::new()
        .with_verbosity(verbose_count)
        .with_format(format);
    if let Ok(filter) = std::env::var("RUST_LOG") {
        if !filter.is_empty() {
            config = config.with_env_filter(filter);
        }
    }

    config.init().context("Failed to initialize tracing subscriber")?;
    debug!(verbosity = verbose_count, "Tracing initialized");
    Ok(())
}

fn print_summary(report: &JobReport) {
    for asset in &report.assets {
        println!("✅ {} -> {}", asset.target, asset.path.display());
    }
    for skipped in &report.skipped {
        println!("⚠️  {} skipped: {}", skipped.target, skipped.reason);
    }

    match &report.logo {
        LogoOutcome::NotConfigured => {},
        LogoOutcome::Unresolved { reason } | LogoOutcome::Failed { reason } => {
            println!("⚠️  logo skipped: {}", reason);
        },
        LogoOutcome::Saved {
            path,
            cropped,
            width,
            height,
            ..
        } => {
            let note = if *cropped { "cropped" } else { "uncropped" };
            println!("✅ logo -> {} ({}x{}, {})", path.display(), width, height, note);
        },
    }

    println!(
        "Done: {} saved, {} skipped",
        report.assets.len(),
        report.skipped.len()
    );
}
