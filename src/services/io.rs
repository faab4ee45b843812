//! Image and file I/O operations service
//!
//! This module separates filesystem access from the filter and orchestration
//! logic, so the pure parts stay testable without touching disk.

use crate::error::{AssetError, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::{Cursor, Write};
use std::path::Path;

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// Extension-based format detection is tried first, then content-based
    /// detection, so a PNG saved under a `.jpg` name still loads.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use brand_assets::services::ImageIOService;
    ///
    /// let image = ImageIOService::load_image("assets/logo-original.jpg")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(AssetError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                log::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    AssetError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data)
                    .map_err(|content_err| AssetError::image_load_error(path_ref, &content_err))
            },
        }
    }

    /// Load an image and convert it to 8-bit RGBA
    pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
        Self::load_image(path).map(|img| img.to_rgba8())
    }

    /// Encode an RGBA image as PNG and write it atomically
    ///
    /// Encoding failures surface as [`AssetError::Image`]; write failures as
    /// [`AssetError::Filesystem`].
    pub fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;
        write_atomic(path, buffer.get_ref())
    }
}

/// Write `bytes` to `path`, replacing any existing file
///
/// The data goes to a temporary file in the destination directory which is
/// then renamed over the target, so the destination either holds the full
/// buffer or is left as it was.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path_ref = path.as_ref();
    let parent = path_ref
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    if !parent.exists() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AssetError::file_io_error("create output directory", parent, &e))?;
    }

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| AssetError::file_io_error("create temporary file in", parent, &e))?;

    temp.write_all(bytes)
        .and_then(|()| temp.flush())
        .map_err(|e| AssetError::file_io_error("write", path_ref, &e))?;

    temp.persist(path_ref)
        .map_err(|e| AssetError::file_io_error("replace", path_ref, &e.error))?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path_ref.display());
    Ok(())
}
