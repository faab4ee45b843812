//! Binary asset downloading
//!
//! Assets are streamed into memory, then written with
//! [`write_atomic`](crate::services::write_atomic): a failed request or an
//! interrupted body never creates or modifies the destination file.

use crate::error::{AssetError, Result};
use crate::services::write_atomic;
use futures_util::stream::TryStreamExt;
#[cfg(feature = "cli")]
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extension used when a URL path carries none
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Build the HTTP client shared by the fetch and download stages
///
/// Without `timeout_secs` the client's own default applies.
pub fn http_client(timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| AssetError::invalid_config(format!("Failed to create HTTP client: {}", e)))
}

/// A downloaded resource held in memory until it is persisted
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub source_url: String,
    pub destination_path: PathBuf,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    /// Write the bytes to the destination, releasing the buffer
    pub fn persist(self) -> Result<PathBuf> {
        write_atomic(&self.destination_path, &self.bytes)?;
        log::info!(
            "Saved {} ({} bytes) to {}",
            self.source_url,
            self.bytes.len(),
            self.destination_path.display()
        );
        Ok(self.destination_path)
    }
}

/// Progress bar abstraction that works with and without CLI features
#[derive(Debug)]
pub enum ProgressIndicator {
    #[cfg(feature = "cli")]
    Indicatif(ProgressBar),
    NoOp,
}

impl ProgressIndicator {
    /// Progress bar when the `cli` feature is enabled and `show` is set
    fn create(show: bool) -> Self {
        #[cfg(feature = "cli")]
        {
            if show {
                let style = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                    .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-"));
                let pb = ProgressBar::new(0);
                pb.set_style(style);
                return Self::Indicatif(pb);
            }
        }
        let _ = show;
        Self::NoOp
    }

    /// Set message for progress indicator
    pub fn set_message(&self, msg: String) {
        match self {
            #[cfg(feature = "cli")]
            Self::Indicatif(pb) => pb.set_message(msg),
            Self::NoOp => {
                let _ = msg;
            },
        }
    }

    /// Set length for progress indicator
    pub fn set_length(&self, len: u64) {
        match self {
            #[cfg(feature = "cli")]
            Self::Indicatif(pb) => pb.set_length(len),
            Self::NoOp => {
                let _ = len;
            },
        }
    }

    /// Set position for progress indicator
    pub fn set_position(&self, pos: u64) {
        match self {
            #[cfg(feature = "cli")]
            Self::Indicatif(pb) => pb.set_position(pos),
            Self::NoOp => {
                let _ = pos;
            },
        }
    }

    /// Finish progress indicator with message
    pub fn finish_with_message(&self, msg: String) {
        match self {
            #[cfg(feature = "cli")]
            Self::Indicatif(pb) => pb.finish_with_message(msg),
            Self::NoOp => {
                let _ = msg;
            },
        }
    }
}

/// Fetches binary resources and saves them verbatim
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    show_progress: bool,
}

impl Downloader {
    pub fn new(client: Client, show_progress: bool) -> Self {
        Self {
            client,
            show_progress,
        }
    }

    /// GET `url` and hold the full body in memory
    ///
    /// # Errors
    /// - [`AssetError::Download`] with the status code for a non-success response
    /// - [`AssetError::Download`] without a status for transport or body failures
    pub async fn fetch_asset(&self, url: &str, destination: &Path) -> Result<ImageAsset> {
        log::info!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::download_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::download_status(url, status));
        }

        let progress = ProgressIndicator::create(self.show_progress);
        if let Some(total) = response.content_length() {
            progress.set_length(total);
        }
        progress.set_message(file_name_for_display(destination));

        let mut bytes = Vec::new();
        let mut stream = Box::pin(response.bytes_stream());
        loop {
            let chunk = match stream.try_next().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    progress.finish_with_message("❌ Download failed".to_string());
                    return Err(AssetError::download_transport(url, e));
                },
            };
            bytes.extend_from_slice(&chunk);
            progress.set_position(bytes.len() as u64);
        }

        progress.finish_with_message(format!("✅ {}", file_name_for_display(destination)));
        log::debug!("Received {} bytes from {}", bytes.len(), url);

        Ok(ImageAsset {
            source_url: url.to_string(),
            destination_path: destination.to_path_buf(),
            bytes,
        })
    }

    /// Download `url` to `destination`, overwriting any existing file
    pub async fn download(&self, url: &str, destination: &Path) -> Result<PathBuf> {
        self.fetch_asset(url, destination).await?.persist()
    }
}

fn file_name_for_display(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// File extension (with leading dot) of the last URL path segment
///
/// Query string and fragment are ignored; [`DEFAULT_EXTENSION`] is returned
/// when the segment has no extension.
#[must_use]
pub fn extension_from_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or_default();

    Path::new(segment)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map_or_else(|| DEFAULT_EXTENSION.to_string(), |ext| format!(".{}", ext))
}
