//! Core types for bounded image decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for probing and decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The path does not exist, cannot be read, or is not a supported image.
    #[error("Unreadable image path: {0}")]
    UnreadablePath(String),

    /// Bounds were probed but the full pixel decode failed.
    #[error("Failed to decode image data: {0}")]
    DecodeFailure(String),

    /// The requested bounding box has a zero dimension.
    #[error("Requested size must be non-zero, got {width}x{height}")]
    InvalidRequest { width: u32, height: u32 },
}

impl DecodeError {
    pub(crate) fn failure(reason: impl fmt::Display) -> Self {
        DecodeError::DecodeFailure(reason.to_string())
    }
}

/// Filter type used when reducing a decoded image by its sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Sensor orientation read from EXIF metadata.
///
/// Only pure rotations are represented. Mirrored EXIF codes (2, 4, 5, 7),
/// a missing tag and out-of-range values all map to `Undefined`, which is
/// handled exactly like `Normal`.
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// No usable orientation metadata.
    #[default]
    Undefined,
    /// Stored upright.
    Normal,
    /// Needs a 90 degree clockwise rotation to display upright.
    Rotate90,
    /// Needs a 180 degree rotation.
    Rotate180,
    /// Needs a 270 degree clockwise rotation (90 counter-clockwise).
    Rotate270,
}

impl Orientation {
    /// Returns true if correcting this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }

    /// Clockwise rotation in degrees that makes the stored grid upright.
    pub fn rotation_degrees(self) -> u32 {
        match self {
            Orientation::Undefined | Orientation::Normal => 0,
            Orientation::Rotate90 => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270 => 270,
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Undefined,
        }
    }
}

/// True pixel dimensions of an image as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NaturalDimensions {
    pub width: u32,
    pub height: u32,
}

impl NaturalDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Fail when a decoder reports a different grid than the header promised.
    pub(crate) fn ensure_unchanged(self, width: u32, height: u32) -> Result<(), DecodeError> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        Err(DecodeError::DecodeFailure(format!(
            "Image dimensions have changed: {}x{} != {}x{}",
            width, height, self.width, self.height
        )))
    }

    /// The same dimensions with width and height exchanged.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Result of probing an image without decoding its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageBounds {
    /// Dimensions of the stored (un-rotated) pixel grid.
    pub dimensions: NaturalDimensions,
    /// EXIF orientation, `Undefined` when absent.
    pub orientation: Orientation,
}

impl ImageBounds {
    /// Dimensions as they should be fed to the sample-size calculation.
    ///
    /// For 90/270 degree orientations the stored grid is rotated relative
    /// to the display, so width and height are exchanged.
    pub fn oriented_dimensions(&self) -> NaturalDimensions {
        if self.orientation.swaps_dimensions() {
            self.dimensions.swapped()
        } else {
            self.dimensions
        }
    }
}

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl DecodedBitmap {
    /// Bytes per pixel of the RGBA layout.
    pub const CHANNELS: usize = 4;

    /// Create a new DecodedBitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * Self::CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Allocate a fully transparent bitmap.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * Self::CHANNELS],
        }
    }

    /// Create a DecodedBitmap from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert into an image::RgbaImage, consuming the bitmap.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA value at (x, y). Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid bitmap.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
