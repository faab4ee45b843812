//! Batch orchestration of the fetch, download and filter stages
//!
//! Targets run strictly one after another. A failure on one target is logged
//! and recorded in the [`JobReport`]; only filesystem errors abort the run.

use crate::config::{JobConfig, LogoSource, PageTarget};
use crate::download::{extension_from_url, http_client, Downloader};
use crate::error::{AssetError, Result};
use crate::extract::ImageUrlExtractor;
use crate::fetch::PageFetcher;
use crate::filter::{BackgroundFilter, ThresholdFilter};
use crate::services::ImageIOService;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Stem of the unfiltered logo download
pub const LOGO_ORIGINAL_STEM: &str = "logo-original";

/// File name of the filtered logo
pub const LOGO_FILE_NAME: &str = "logo.png";

/// A page image saved to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    pub target: String,
    pub image_url: String,
    pub path: PathBuf,
}

/// A target that produced no file, with the logged reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTarget {
    pub target: String,
    pub reason: String,
}

/// Resolved input of the logo stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoInput {
    /// Download from this URL first
    Remote(String),
    /// Filter an asset already on disk
    Local(PathBuf),
}

/// What happened in the logo stage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogoOutcome {
    /// No logo source configured
    #[default]
    NotConfigured,
    /// The reuse target produced no asset this run
    Unresolved { reason: String },
    /// Download or decoding failed; the filter was not attempted
    Failed { reason: String },
    Saved {
        /// Unfiltered download, absent when a saved asset was reused
        original: Option<PathBuf>,
        path: PathBuf,
        /// False when nothing opaque remained and the image was kept whole
        cropped: bool,
        width: u32,
        height: u32,
    },
}

/// Per-run summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub assets: Vec<SavedAsset>,
    pub skipped: Vec<SkippedTarget>,
    pub logo: LogoOutcome,
}

impl JobReport {
    /// Saved asset for a target, if it succeeded
    #[must_use]
    pub fn asset_for(&self, target: &str) -> Option<&SavedAsset> {
        self.assets.iter().find(|a| a.target == target)
    }
}

/// Pick the logo input from the configuration and this run's saved assets
///
/// A configured URL wins; otherwise the reuse target's saved file is used.
#[must_use]
pub fn resolve_logo_input(source: &LogoSource, assets: &[SavedAsset]) -> Option<LogoInput> {
    if let Some(url) = &source.url {
        return Some(LogoInput::Remote(url.clone()));
    }

    let reuse = source.reuse_target.as_deref()?;
    assets
        .iter()
        .find(|asset| asset.target == reuse)
        .map(|asset| LogoInput::Local(asset.path.clone()))
}

/// Create the output directory if it does not exist
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AssetError::file_io_error("create output directory", dir, &e))
}

/// One configured run of the asset utility
pub struct AssetJob {
    config: JobConfig,
    fetcher: PageFetcher,
    downloader: Downloader,
    filter: Box<dyn BackgroundFilter + Send + Sync>,
}

impl AssetJob {
    /// Validate the configuration and build the HTTP stages
    pub fn new(config: JobConfig) -> Result<Self> {
        config.validate()?;

        let client = http_client(config.timeout_secs)?;
        let extractor = ImageUrlExtractor::new(config.fallback_host.as_deref())?;
        let fetcher = PageFetcher::new(client.clone(), extractor);
        let downloader = Downloader::new(client, config.show_progress);
        let filter = Box::new(ThresholdFilter::new(config.white_threshold));

        Ok(Self {
            config,
            fetcher,
            downloader,
            filter,
        })
    }

    /// Replace the background filter used for the logo
    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn BackgroundFilter + Send + Sync>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Process every target, then the logo
    ///
    /// # Errors
    /// Only [`AssetError::Filesystem`] is returned; everything else is logged
    /// and recorded in the report.
    pub async fn run(&self) -> Result<JobReport> {
        let start_time = Instant::now();
        let out_dir = self.config.output_dir.as_path();
        ensure_output_dir(out_dir)?;

        tracing::info!(
            output_dir = %out_dir.display(),
            targets = self.config.targets.len(),
            "Starting asset run"
        );

        let mut report = JobReport::default();

        for target in &self.config.targets {
            match self.process_target(target, out_dir).await {
                Ok(asset) => {
                    tracing::info!(
                        page = %target.name,
                        path = %asset.path.display(),
                        "Saved page image"
                    );
                    report.assets.push(asset);
                },
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(page = %target.name, error = %e, "Skipping target");
                    report.skipped.push(SkippedTarget {
                        target: target.name.clone(),
                        reason: e.to_string(),
                    });
                },
            }
        }

        report.logo = match resolve_logo_input(&self.config.logo, &report.assets) {
            Some(input) => self.process_logo(input, out_dir).await?,
            None => match &self.config.logo.reuse_target {
                Some(reuse) => {
                    let reason = format!("target '{}' produced no asset", reuse);
                    tracing::warn!(reason = %reason, "Logo source unresolved");
                    LogoOutcome::Unresolved { reason }
                },
                None => LogoOutcome::NotConfigured,
            },
        };

        tracing::info!(
            saved = report.assets.len(),
            skipped = report.skipped.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Asset run finished"
        );

        Ok(report)
    }

    /// Fetch one page, find its image and save it as `<name><ext>`
    async fn process_target(&self, target: &PageTarget, out_dir: &Path) -> Result<SavedAsset> {
        let image_url = self.fetcher.try_fetch_image_url(&target.url).await?;
        let file_name = format!("{}{}", target.name, extension_from_url(&image_url));
        let path = self
            .downloader
            .download(&image_url, &out_dir.join(file_name))
            .await?;

        Ok(SavedAsset {
            target: target.name.clone(),
            image_url,
            path,
        })
    }

    /// Obtain the logo, filter it and save `logo.png`
    async fn process_logo(&self, input: LogoInput, out_dir: &Path) -> Result<LogoOutcome> {
        let (source_path, original) = match input {
            LogoInput::Remote(url) => {
                let destination =
                    out_dir.join(format!("{}{}", LOGO_ORIGINAL_STEM, extension_from_url(&url)));
                match self.downloader.download(&url, &destination).await {
                    Ok(path) => (path.clone(), Some(path)),
                    Err(e) => return recover_logo_failure(e),
                }
            },
            LogoInput::Local(path) => {
                tracing::debug!(path = %path.display(), "Reusing saved asset as logo source");
                (path, None)
            },
        };

        let image = match ImageIOService::load_rgba(&source_path) {
            Ok(image) => image,
            Err(e) => return recover_logo_failure(e),
        };

        let outcome = self.filter.apply(image);
        tracing::debug!(
            filter = self.filter.name(),
            cleared = outcome.cleared,
            bounds = ?outcome.bounds,
            "Filtered logo"
        );
        if !outcome.was_cropped() {
            tracing::warn!("No opaque pixels left after filtering, keeping full image");
        }

        let path = out_dir.join(LOGO_FILE_NAME);
        if let Err(e) = ImageIOService::save_png(&outcome.image, &path) {
            return recover_logo_failure(e);
        }

        let (width, height) = outcome.image.dimensions();
        tracing::info!(path = %path.display(), width, height, "Saved transparent logo");

        Ok(LogoOutcome::Saved {
            original,
            path,
            cropped: outcome.was_cropped(),
            width,
            height,
        })
    }
}

/// Propagate fatal errors, record the rest
fn recover_logo_failure(error: AssetError) -> Result<LogoOutcome> {
    if error.is_fatal() {
        return Err(error);
    }
    tracing::warn!(error = %error, "Logo step skipped");
    Ok(LogoOutcome::Failed {
        reason: error.to_string(),
    })
}
