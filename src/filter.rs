//! Near-white background removal and content cropping
//!
//! This is a value heuristic, not segmentation: genuinely near-white
//! foreground is cleared too, and a coloured background is left alone.
//! Everything here is pure so a stronger [`BackgroundFilter`] can replace
//! [`ThresholdFilter`] without touching any I/O code.

use image::{imageops, RgbaImage};

/// Channel value at or above which a pixel counts as background
pub const DEFAULT_WHITE_THRESHOLD: u8 = 240;

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Result of running a filter over one image
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Cropped image, or the transparency-pass output when nothing is opaque
    pub image: RgbaImage,
    /// Content rectangle in source coordinates, `None` for an empty image
    pub bounds: Option<BoundingBox>,
    /// Pixels whose alpha was zeroed
    pub cleared: usize,
}

impl FilterOutcome {
    #[must_use]
    pub fn was_cropped(&self) -> bool {
        self.bounds.is_some()
    }
}

/// Replaceable background removal strategy
pub trait BackgroundFilter {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Remove the background and crop to the remaining content
    fn apply(&self, image: RgbaImage) -> FilterOutcome;
}

/// Fixed-threshold near-white filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdFilter {
    pub threshold: u8,
}

impl ThresholdFilter {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl Default for ThresholdFilter {
    fn default() -> Self {
        Self::new(DEFAULT_WHITE_THRESHOLD)
    }
}

impl BackgroundFilter for ThresholdFilter {
    fn name(&self) -> &str {
        "threshold"
    }

    fn apply(&self, mut image: RgbaImage) -> FilterOutcome {
        let cleared = clear_near_white(&mut image, self.threshold);
        match opaque_bounds(&image) {
            Some(bounds) => FilterOutcome {
                image: crop_to_bounds(&image, bounds),
                bounds: Some(bounds),
                cleared,
            },
            None => FilterOutcome {
                image,
                bounds: None,
                cleared,
            },
        }
    }
}

/// Whether all three colour channels reach the threshold
#[inline]
#[must_use]
pub fn is_near_white(pixel: &image::Rgba<u8>, threshold: u8) -> bool {
    let [r, g, b, _] = pixel.0;
    r >= threshold && g >= threshold && b >= threshold
}

/// Zero the alpha of every near-white pixel, leaving all others untouched
///
/// Only colour channels are inspected, so running the pass twice is the same
/// as running it once. Returns the number of pixels that matched.
pub fn clear_near_white(image: &mut RgbaImage, threshold: u8) -> usize {
    let mut cleared = 0;
    for pixel in image.pixels_mut() {
        if is_near_white(pixel, threshold) {
            pixel.0[3] = 0;
            cleared += 1;
        }
    }
    cleared
}

/// Smallest rectangle enclosing every pixel with non-zero alpha
///
/// Single scan tracking running extrema; `None` when no pixel is opaque.
#[must_use]
pub fn opaque_bounds(image: &RgbaImage) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => BoundingBox {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => BoundingBox {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }

    bounds
}

/// Copy the given rectangle into a new image
#[must_use]
pub fn crop_to_bounds(image: &RgbaImage, bounds: BoundingBox) -> RgbaImage {
    imageops::crop_imm(image, bounds.min_x, bounds.min_y, bounds.width(), bounds.height())
        .to_image()
}
