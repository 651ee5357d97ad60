//! Photoalbum Core - photo loading library
//!
//! This crate turns arbitrary on-disk photos into upright, memory-bounded
//! RGBA bitmaps for the collage editor, and provides the contrast/brightness
//! color filter applied to bitmaps before compositing.

pub mod decode;
pub mod filter;
pub mod transform;

pub use decode::{
    calculate_in_sample_size, decode_sampled_bitmap, probe_bounds, BitmapDecoder, DecodeError,
    DecodedBitmap, DecoderConfig, ImageBounds, NaturalDimensions, Orientation, SampleSize,
};
pub use filter::{apply_contrast_brightness, ColorMatrix, FilterError};
pub use transform::{compute_rotated_bounds, rotate_bitmap};
