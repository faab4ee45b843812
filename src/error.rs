//! Error types for asset acquisition and filtering

use thiserror::Error;

/// Result type alias for asset operations
pub type Result<T> = std::result::Result<T, AssetError>;

/// Error taxonomy for the fetch, download and filter stages
///
/// Only [`AssetError::Filesystem`] is fatal for a job; every other variant is
/// recovered by logging and skipping the affected item.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Page HTML could not be retrieved
    #[error("Failed to fetch page {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// No recognizable image URL in the fetched HTML
    #[error("No image URL found on page {url}")]
    NotFound { url: String },

    /// Binary asset GET failed (non-success status or transport error)
    #[error("Failed to download {url}: {reason}")]
    Download {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// Output directory or file could not be created or written
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AssetError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a page fetch error
    pub fn fetch<U: Into<String>, R: std::fmt::Display>(url: U, reason: R) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a "no image on page" error
    pub fn not_found<U: Into<String>>(url: U) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Create a download error from a non-success HTTP status
    pub fn download_status<U: Into<String>>(url: U, status: reqwest::StatusCode) -> Self {
        let reason = match status.canonical_reason() {
            Some(text) => format!("HTTP {} {}", status.as_u16(), text),
            None => format!("HTTP {}", status.as_u16()),
        };
        Self::Download {
            url: url.into(),
            status: Some(status.as_u16()),
            reason,
        }
    }

    /// Create a download error for a transport-level failure
    pub fn download_transport<U: Into<String>, R: std::fmt::Display>(url: U, reason: R) -> Self {
        Self::Download {
            url: url.into(),
            status: None,
            reason: reason.to_string(),
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Filesystem(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create image loading error with format context
    pub fn image_load_error<P: AsRef<std::path::Path>>(
        path: P,
        error: &image::ImageError,
    ) -> Self {
        let path_display = path.as_ref().display();
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        Self::Image(image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Failed to load image '{}' (format: {}): {}. Supported formats: PNG, JPEG, WebP",
                path_display, extension, error
            ),
        )))
    }

    /// Whether the error must abort the whole job
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Filesystem(_))
    }

    /// HTTP status carried by a download error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Download { status, .. } => *status,
            _ => None,
        }
    }
}
