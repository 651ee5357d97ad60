//! Image decoding pipeline for Photoalbum.
//!
//! This module provides functionality for:
//! - Probing an image's dimensions and EXIF orientation without decoding pixels
//! - Choosing a power-of-two sample size for a target display surface
//! - Decoding at the reduced resolution (DCT-scaled for JPEG) and rotating
//!   the result upright
//!
//! # Architecture
//!
//! All operations are synchronous and blocking. Callers that need to keep a
//! UI responsive run them on a worker thread and hand the resulting bitmap
//! back; the bitmap is exclusively owned by the caller.
//!
//! # Examples
//!
//! ```ignore
//! use photoalbum_core::decode::{decode_sampled_bitmap, probe_bounds};
//!
//! let bounds = probe_bounds("photo.jpg".as_ref())?;
//! println!("{}x{} {:?}", bounds.dimensions.width, bounds.dimensions.height, bounds.orientation);
//!
//! let bitmap = decode_sampled_bitmap("photo.jpg".as_ref(), 1080, 1920);
//! ```

mod decoder;
mod jpeg;
mod probe;
mod sample;
#[cfg(test)]
mod test_support;
mod types;

pub use decoder::{decode_sampled_bitmap, BitmapDecoder, DecoderConfig};
pub use probe::{probe_bounds, probe_bounds_from_bytes, read_orientation};
pub use sample::{calculate_in_sample_size, downsample, SampleSize};
pub use types::{
    DecodeError, DecodedBitmap, FilterType, ImageBounds, NaturalDimensions, Orientation,
};
