//! Bounded, orientation-aware bitmap decoding.
//!
//! The decoder probes an image's stored dimensions and EXIF orientation,
//! picks a power-of-two sample size so the result still covers the
//! requested surface, decodes and reduces the pixel grid, and finally rotates
//! it upright.
//!
//! JPEG data is decoded with a scaled inverse DCT, so at most 1/8 of the
//! sample size is left for resizing. Other formats are decoded at full size
//! and reduced in their own pixel format before the RGBA conversion.
//!
//! # Examples
//!
//! ```ignore
//! use photoalbum_core::decode::{BitmapDecoder, DecoderConfig};
//!
//! let decoder = BitmapDecoder::new(DecoderConfig::default());
//! if let Some(bitmap) = decoder.decode_sampled_bitmap("photo.jpg".as_ref(), 1080, 1920) {
//!     println!("Loaded {}x{}", bitmap.width, bitmap.height);
//! }
//! ```

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};

use super::probe::{probe_bounds, probe_bounds_from_bytes};
use super::jpeg;
use super::sample::{calculate_in_sample_size, downsample, SampleSize};
use super::{DecodeError, DecodedBitmap, FilterType, ImageBounds, NaturalDimensions};
use crate::transform::rotate_bitmap;

/// Settings for a [`BitmapDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Most verbose level the decoder emits diagnostics at.
    pub log_level: LevelFilter,
    /// Filter used to reduce the decoded grid by the sample size.
    pub resize_filter: FilterType,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Warn,
            resize_filter: FilterType::default(),
        }
    }
}

/// Decodes image files into upright bitmaps no larger than needed.
#[derive(Debug, Clone, Default)]
pub struct BitmapDecoder {
    config: DecoderConfig,
}

impl BitmapDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode `path` for a `req_width x req_height` surface.
    ///
    /// Returns `None` when the file cannot be probed or decoded; the reason
    /// is logged at warn level. Never panics on bad input.
    pub fn decode_sampled_bitmap(
        &self,
        path: &Path,
        req_width: u32,
        req_height: u32,
    ) -> Option<DecodedBitmap> {
        self.absorb(path.display(), self.try_decode_sampled_bitmap(path, req_width, req_height))
    }

    /// Like [`decode_sampled_bitmap`](Self::decode_sampled_bitmap), reporting why decoding failed.
    ///
    /// # Errors
    ///
    /// - `DecodeError::InvalidRequest` if either requested dimension is zero.
    /// - `DecodeError::UnreadablePath` if the file cannot be probed.
    /// - `DecodeError::DecodeFailure` if the pixel data cannot be decoded.
    pub fn try_decode_sampled_bitmap(
        &self,
        path: &Path,
        req_width: u32,
        req_height: u32,
    ) -> Result<DecodedBitmap, DecodeError> {
        check_request(req_width, req_height)?;
        self.log(Level::Debug, format_args!("decoding {}", path.display()));

        let bounds = probe_bounds(path)?;
        let bytes = std::fs::read(path).map_err(DecodeError::failure)?;
        self.decode_with_bounds(bounds, req_width, req_height, &bytes)
    }

    /// Decode an in-memory image for a `req_width x req_height` surface.
    pub fn decode_sampled_bitmap_from_bytes(
        &self,
        bytes: &[u8],
        req_width: u32,
        req_height: u32,
    ) -> Option<DecodedBitmap> {
        self.absorb(
            format_args!("{} byte buffer", bytes.len()),
            self.try_decode_sampled_bitmap_from_bytes(bytes, req_width, req_height),
        )
    }

    /// Fallible form of [`decode_sampled_bitmap_from_bytes`](Self::decode_sampled_bitmap_from_bytes).
    pub fn try_decode_sampled_bitmap_from_bytes(
        &self,
        bytes: &[u8],
        req_width: u32,
        req_height: u32,
    ) -> Result<DecodedBitmap, DecodeError> {
        check_request(req_width, req_height)?;

        let bounds = probe_bounds_from_bytes(bytes)?;
        self.decode_with_bounds(bounds, req_width, req_height, bytes)
    }

    fn decode_with_bounds(
        &self,
        bounds: ImageBounds,
        req_width: u32,
        req_height: u32,
        bytes: &[u8],
    ) -> Result<DecodedBitmap, DecodeError> {
        let natural = bounds.dimensions;
        let measured = bounds.oriented_dimensions();
        let sample = calculate_in_sample_size(measured.width, measured.height, req_width, req_height);

        self.log(
            Level::Debug,
            format_args!(
                "natural {}x{}, orientation {:?}, sample size {}",
                natural.width,
                natural.height,
                bounds.orientation,
                sample.get()
            ),
        );

        let reduced = self.load_reduced(bytes, natural, sample)?;
        let bitmap = DecodedBitmap::from_rgba_image(reduced.into_rgba8());

        // The un-rotated bitmap is moved into the rotation and dropped there
        let upright = rotate_bitmap(bitmap, f64::from(bounds.orientation.rotation_degrees()));

        self.log(
            Level::Debug,
            format_args!("decoded bitmap {}x{}", upright.width, upright.height),
        );
        Ok(upright)
    }

    /// Decode `bytes` already reduced to `floor(natural / sample)`.
    fn load_reduced(
        &self,
        bytes: &[u8],
        natural: NaturalDimensions,
        sample: SampleSize,
    ) -> Result<DynamicImage, DecodeError> {
        let format = image::guess_format(bytes).map_err(DecodeError::failure)?;

        if format == ImageFormat::Jpeg {
            if let Some(scaled) = jpeg::decode_scaled(bytes, natural, sample)? {
                self.log(
                    Level::Debug,
                    format_args!("DCT-scaled JPEG to {}x{}", scaled.width(), scaled.height()),
                );
                return Ok(downsample(scaled, natural, sample, self.config.resize_filter));
            }
        }

        let image = ImageReader::with_format(Cursor::new(bytes), format)
            .decode()
            .map_err(DecodeError::failure)?;
        natural.ensure_unchanged(image.width(), image.height())?;
        Ok(downsample(image, natural, sample, self.config.resize_filter))
    }

    fn absorb(
        &self,
        source: impl fmt::Display,
        result: Result<DecodedBitmap, DecodeError>,
    ) -> Option<DecodedBitmap> {
        match result {
            Ok(bitmap) => Some(bitmap),
            Err(e) => {
                self.log(Level::Warn, format_args!("no image loaded from {source}: {e}"));
                None
            }
        }
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if level <= self.config.log_level {
            log::log!(level, "{}", args);
        }
    }
}

/// Decode `path` for a `req_width x req_height` surface with default settings.
pub fn decode_sampled_bitmap(path: &Path, req_width: u32, req_height: u32) -> Option<DecodedBitmap> {
    BitmapDecoder::default().decode_sampled_bitmap(path, req_width, req_height)
}

fn check_request(req_width: u32, req_height: u32) -> Result<(), DecodeError> {
    if req_width == 0 || req_height == 0 {
        return Err(DecodeError::InvalidRequest {
            width: req_width,
            height: req_height,
        });
    }
    Ok(())
}
