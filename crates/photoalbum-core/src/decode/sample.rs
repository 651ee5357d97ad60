//! Sample-size calculation and the matching resolution reduction.
//!
//! The sample size is a power-of-two factor by which both dimensions of a
//! stored image are divided during decode, bounding memory use for very
//! large photos while keeping the result at least as large as the display
//! surface it is destined for.

use image::DynamicImage;

use super::{FilterType, NaturalDimensions};

/// Power-of-two downsample factor, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SampleSize(u32);

impl SampleSize {
    /// No downsampling.
    pub const ONE: SampleSize = SampleSize(1);

    /// Get the raw factor.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Divide a stored dimension by this factor (truncating, at least 1).
    pub fn apply(self, dimension: u32) -> u32 {
        (dimension / self.0).max(1)
    }

    fn doubled(self) -> SampleSize {
        SampleSize(self.0 * 2)
    }
}

impl Default for SampleSize {
    fn default() -> Self {
        Self::ONE
    }
}

/// Compute the downsample factor for decoding a `width x height` image
/// destined for a `req_width x req_height` surface.
///
/// Returns 1 when the image already fits. Otherwise the factor starts at 1
/// and doubles while both halved dimensions, divided by the current factor,
/// still cover the request. Divisions truncate.
///
/// A zero requested dimension is treated as 1.
///
/// # Example
///
/// ```ignore
/// // 1500 / 1 >= 1000 and 2000 / 1 >= 1000, then 1500 / 2 < 1000 stops the loop
/// assert_eq!(calculate_in_sample_size(4000, 3000, 1000, 1000).get(), 2);
/// ```
pub fn calculate_in_sample_size(
    width: u32,
    height: u32,
    req_width: u32,
    req_height: u32,
) -> SampleSize {
    let req_width = req_width.max(1);
    let req_height = req_height.max(1);

    let mut sample = SampleSize::ONE;
    if req_height < height || req_width < width {
        let half_height = height / 2;
        let half_width = width / 2;
        while half_height / sample.get() >= req_height && half_width / sample.get() >= req_width {
            sample = sample.doubled();
        }
    }
    sample
}

/// Reduce a decoded image to `floor(dim / sample)` of its stored `natural`
/// size, at least 1 per axis.
///
/// The input may already be partly reduced by a scaled decode. It is resized
/// in its own pixel format and consumed, so the larger buffer is released as
/// soon as the reduced copy exists.
pub fn downsample(
    image: DynamicImage,
    natural: NaturalDimensions,
    sample: SampleSize,
    filter: FilterType,
) -> DynamicImage {
    let width = sample.apply(natural.width);
    let height = sample.apply(natural.height);
    if image.width() == width && image.height() == height {
        return image;
    }
    image.resize_exact(width, height, filter.to_image_filter())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
