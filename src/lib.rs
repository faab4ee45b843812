#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Brand Assets
//!
//! A single-pass batch utility that collects the images a small landing page
//! needs: the representative image of each configured product page, and a
//! logo with its near-white background made transparent and cropped to
//! content.
//!
//! ## Stages
//!
//! 1. **Page fetch**: GET each page and take the first `og:image`,
//!    `twitter:image`, or image-host URL found in the HTML ([`fetch`], [`extract`]).
//! 2. **Download**: save the image verbatim as `<target><ext>` ([`download`]).
//! 3. **Background filter**: clear near-white pixels, crop to the remaining
//!    opaque content, write `logo.png` ([`filter`]).
//!
//! Targets run sequentially. Per-target failures are logged and skipped;
//! only filesystem errors abort the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brand_assets::{AssetJob, JobConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = JobConfig::builder()
//!     .target("premium-course", "https://shop.example/l/premium")
//!     .logo_url("https://cdn.example/profile.jpg")
//!     .output_dir("assets")
//!     .build()?;
//!
//! let report = AssetJob::new(config)?.run().await?;
//! println!("{} saved, {} skipped", report.assets.len(), report.skipped.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Filtering without I/O
//!
//! ```rust
//! use brand_assets::filter::{BackgroundFilter, ThresholdFilter};
//! use image::{Rgba, RgbaImage};
//!
//! let mut logo = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
//! logo.put_pixel(3, 4, Rgba([0, 0, 0, 255]));
//!
//! let outcome = ThresholdFilter::new(240).apply(logo);
//! assert_eq!(outcome.image.dimensions(), (1, 1));
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): command-line binary, tracing subscriber, progress bars
//! - `webp-support` (default): WebP decoding
//! - `tracing-json`: JSON log output

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod job;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use config::{JobConfig, JobConfigBuilder, LogoSource, PageTarget};
pub use download::{extension_from_url, Downloader, ImageAsset};
pub use error::{AssetError, Result};
pub use extract::{ImageUrlExtractor, MatchKind};
pub use fetch::PageFetcher;
pub use filter::{BackgroundFilter, BoundingBox, FilterOutcome, ThresholdFilter};
pub use job::{AssetJob, JobReport, LogoInput, LogoOutcome, SavedAsset, SkippedTarget};
pub use services::ImageIOService;

/// Filter a logo file on disk and write the result as PNG
///
/// Convenience wrapper over [`ImageIOService`] and [`ThresholdFilter`] for
/// one-off use outside a job.
///
/// ```rust,no_run
/// let outcome = brand_assets::remove_background_from_file("logo.jpg", "logo.png", 240)?;
/// println!("cropped: {}", outcome.was_cropped());
/// # Ok::<(), brand_assets::AssetError>(())
/// ```
pub fn remove_background_from_file<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
    input: P,
    output: Q,
    threshold: u8,
) -> Result<FilterOutcome> {
    let image = ImageIOService::load_rgba(input)?;
    let outcome = ThresholdFilter::new(threshold).apply(image);
    ImageIOService::save_png(&outcome.image, output)?;
    Ok(outcome)
}
