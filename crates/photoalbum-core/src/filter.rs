//! Color-matrix filtering for bitmaps before compositing.
//!
//! A [`ColorMatrix`] is a 4x5 linear transform over unpremultiplied RGBA
//! values in 0-255 units:
//!
//! ```text
//! R' = m[0]*R  + m[1]*G  + m[2]*B  + m[3]*A  + m[4]
//! G' = m[5]*R  + m[6]*G  + m[7]*B  + m[8]*A  + m[9]
//! B' = m[10]*R + m[11]*G + m[12]*B + m[13]*A + m[14]
//! A' = m[15]*R + m[16]*G + m[17]*B + m[18]*A + m[19]
//! ```
//!
//! Each result is clamped to 0-255.

use thiserror::Error;

use crate::decode::DecodedBitmap;

const CHANNELS: usize = DecodedBitmap::CHANNELS;

/// Errors raised by color filtering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The destination buffer does not have the source's dimensions.
    #[error(
        "Destination is {}x{} but source is {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// A 4x5 color transform in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [f32; 20]);

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    pub fn identity() -> Self {
        Self::contrast_brightness(1.0, 0.0)
    }

    /// Scale R, G and B by `contrast` and add `brightness`; alpha passes through.
    pub fn contrast_brightness(contrast: f32, brightness: f32) -> Self {
        #[rustfmt::skip]
        let m = [
            contrast, 0.0, 0.0, 0.0, brightness,
            0.0, contrast, 0.0, 0.0, brightness,
            0.0, 0.0, contrast, 0.0, brightness,
            0.0, 0.0, 0.0, 1.0, 0.0,
        ];
        Self(m)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Transform one RGBA pixel, returning unclamped channel values.
    #[inline]
    fn transform(&self, px: [u8; 4]) -> [f32; 4] {
        let m = &self.0;
        let [r, g, b, a] = px.map(f32::from);
        let mut out = [0.0f32; 4];
        for (row, value) in out.iter_mut().enumerate() {
            let k = row * 5;
            *value = m[k] * r + m[k + 1] * g + m[k + 2] * b + m[k + 3] * a + m[k + 4];
        }
        out
    }

    /// Transform one RGBA pixel.
    pub fn apply_to_pixel(&self, px: [u8; 4]) -> [u8; 4] {
        self.transform(px).map(to_channel)
    }
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// Source-over blend of an already filtered pixel onto a destination pixel.
#[inline]
fn blend_over(src: [u8; 4], dst: &mut [u8]) {
    let sa = src[3];
    if sa == 255 || dst[3] == 0 {
        dst.copy_from_slice(&src);
        return;
    }
    if sa == 0 {
        return;
    }

    let sa = f32::from(sa) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);

    for i in 0..3 {
        let sc = f32::from(src[i]);
        let dc = f32::from(dst[i]);
        dst[i] = to_channel((sc * sa + dc * da * (1.0 - sa)) / out_a);
    }
    dst[3] = to_channel(out_a * 255.0);
}

/// Render `source` onto `destination` through `matrix`.
///
/// # Errors
///
/// Returns `FilterError::DimensionMismatch` before touching `destination`
/// if the two bitmaps differ in size.
pub fn apply_color_matrix<'a>(
    source: &DecodedBitmap,
    destination: &'a mut DecodedBitmap,
    matrix: &ColorMatrix,
) -> Result<&'a mut DecodedBitmap, FilterError> {
    if source.dimensions() != destination.dimensions()
        || source.pixels.len() != destination.pixels.len()
    {
        return Err(FilterError::DimensionMismatch {
            expected: source.dimensions(),
            actual: destination.dimensions(),
        });
    }

    render(source, destination, matrix);
    Ok(destination)
}

/// Single pass over equally sized bitmaps.
fn render(source: &DecodedBitmap, destination: &mut DecodedBitmap, matrix: &ColorMatrix) {
    for (src, dst) in source
        .pixels
        .chunks_exact(CHANNELS)
        .zip(destination.pixels.chunks_exact_mut(CHANNELS))
    {
        let filtered = matrix.apply_to_pixel([src[0], src[1], src[2], src[3]]);
        blend_over(filtered, dst);
    }
}

/// Render `source` onto `destination` with a contrast/brightness adjustment.
///
/// `contrast` multiplies R, G and B; `brightness` is then added to them in
/// 0-255 units. Alpha is unchanged. A freshly allocated (transparent)
/// destination receives exactly the filtered pixels.
///
/// # Example
///
/// ```ignore
/// let mut target = DecodedBitmap::blank(photo.width, photo.height);
/// apply_contrast_brightness(&photo, &mut target, 1.2, -10.0)?;
/// ```
pub fn apply_contrast_brightness<'a>(
    source: &DecodedBitmap,
    destination: &'a mut DecodedBitmap,
    contrast: f32,
    brightness: f32,
) -> Result<&'a mut DecodedBitmap, FilterError> {
    apply_color_matrix(
        source,
        destination,
        &ColorMatrix::contrast_brightness(contrast, brightness),
    )
}

/// Allocate a blank destination and render the adjusted `source` into it.
pub fn filtered_copy(source: &DecodedBitmap, contrast: f32, brightness: f32) -> DecodedBitmap {
    let mut target = DecodedBitmap::blank(source.width, source.height);
    render(
        source,
        &mut target,
        &ColorMatrix::contrast_brightness(contrast, brightness),
    );
    target
}


// ============================================================================
// Property-Based Tests
// ============================================================================
