//! Brand assets CLI tool
//!
//! Fetches product page images and builds a transparent logo using the
//! brand-assets library.

#[cfg(feature = "cli")]
use brand_assets::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
