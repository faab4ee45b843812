//! Configuration conversion utilities for CLI arguments

use super::main_impl::Cli;
use crate::config::{JobConfig, JobConfigBuilder, LogoSource, OUTPUT_DIR_ENV};
use anyhow::{Context, Result};

/// Convert CLI arguments to a validated [`JobConfig`]
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build the configuration, reading `BRAND_ASSETS_DIR` from the environment
    pub(crate) fn from_cli(cli: &Cli) -> Result<JobConfig> {
        let env_dir = std::env::var(OUTPUT_DIR_ENV).ok();
        Self::from_cli_with_env(cli, env_dir.as_deref())
    }

    /// Overlay order: built-in table or config file, environment, then flags
    pub(crate) fn from_cli_with_env(cli: &Cli, env_dir: Option<&str>) -> Result<JobConfig> {
        let base = match &cli.config {
            Some(path) => JobConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => JobConfig::default(),
        };

        let mut builder = JobConfigBuilder::from_config(base)
            .show_progress(cli.progress);

        if let Some(dir) = env_dir.filter(|d| !d.is_empty()) {
            builder = builder.output_dir(dir);
        }
        if let Some(dir) = &cli.output_dir {
            builder = builder.output_dir(dir.clone());
        }
        if let Some(threshold) = cli.threshold {
            builder = builder.white_threshold(threshold);
        }
        if cli.no_host_fallback {
            builder = builder.fallback_host(None);
        }
        if let Some(secs) = cli.timeout {
            builder = builder.timeout_secs(Some(secs));
        }

        if cli.no_logo {
            builder = builder.logo(LogoSource::default());
        } else if cli.logo_url.is_some() || cli.reuse_logo_from.is_some() {
            builder = builder.logo(LogoSource {
                url: cli.logo_url.clone(),
                reuse_target: cli.reuse_logo_from.clone(),
            });
        }

        builder.build().context("Invalid configuration")
    }
}
