//! Reduced-resolution JPEG decoding.
//!
//! Scaling the inverse DCT decodes each 8x8 block straight to 4x4, 2x2 or
//! 1x1 pixels, so a sampled decode of a large JPEG never allocates its
//! full-resolution grid.

use image::{DynamicImage, GrayImage, RgbImage};
use jpeg_decoder::{Decoder, PixelFormat};

use super::{DecodeError, NaturalDimensions, SampleSize};

/// Largest reduction the DCT can apply on its own.
const MAX_DCT_DIVISOR: u16 = 8;

/// Part of `sample` absorbed by DCT scaling: 1, 2, 4 or 8.
pub fn dct_divisor(sample: SampleSize) -> u16 {
    u16::try_from(sample.get()).map_or(MAX_DCT_DIVISOR, |s| s.min(MAX_DCT_DIVISOR))
}

/// Decode JPEG `bytes` with the DCT scaled down by up to `sample`.
///
/// The result is `ceil(dim / divisor)` per axis and still needs the rest of
/// the sample size applied. Returns `Ok(None)` when no reduction applies or
/// the stream cannot be scaled (CMYK or 16-bit data, lossless coding); the
/// caller then decodes at full size.
///
/// # Errors
///
/// Returns `DecodeError::DecodeFailure` if the stream is corrupt or its
/// frame does not match `natural`.
pub fn decode_scaled(
    bytes: &[u8],
    natural: NaturalDimensions,
    sample: SampleSize,
) -> Result<Option<DynamicImage>, DecodeError> {
    let divisor = dct_divisor(sample);
    if divisor == 1 {
        return Ok(None);
    }

    let mut decoder = Decoder::new(bytes);
    decoder.read_info().map_err(DecodeError::failure)?;
    let Some(info) = decoder.info() else {
        return Ok(None);
    };
    natural.ensure_unchanged(u32::from(info.width), u32::from(info.height))?;

    if !matches!(info.pixel_format, PixelFormat::L8 | PixelFormat::RGB24) {
        return Ok(None);
    }

    let Ok((width, height)) = decoder.scale(
        info.width.div_ceil(divisor),
        info.height.div_ceil(divisor),
    ) else {
        return Ok(None);
    };

    let pixels = decoder.decode().map_err(DecodeError::failure)?;
    let (width, height) = (u32::from(width), u32::from(height));
    let image = match info.pixel_format {
        PixelFormat::L8 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        _ => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
    };

    image.map(Some).ok_or_else(|| {
        DecodeError::failure(format!("scaled JPEG buffer does not fill {width}x{height}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::calculate_in_sample_size;
    use crate::decode::test_support::{encode, encode_dynamic, is_bluish, is_reddish, split_image};
    use image::ImageFormat;

    fn sample_for(width: u32, height: u32, req_width: u32, req_height: u32) -> SampleSize {
        calculate_in_sample_size(width, height, req_width, req_height)
    }

    #[test]
    fn test_dct_divisor_caps_at_eight() {
        assert_eq!(dct_divisor(SampleSize::ONE), 1);
        assert_eq!(dct_divisor(sample_for(64, 64, 64, 64)), 1);
        assert_eq!(dct_divisor(sample_for(64, 64, 32, 32)), 2);
        assert_eq!(dct_divisor(sample_for(64, 64, 16, 16)), 4);
        assert_eq!(dct_divisor(sample_for(64, 64, 4, 4)), 8);
        // factor 64 is split into 8 by the DCT and 8 by resizing
        assert_eq!(sample_for(256, 256, 4, 4).get(), 64);
        assert_eq!(dct_divisor(sample_for(256, 256, 4, 4)), 8);
    }

    #[test]
    fn test_no_reduction_is_not_scaled() {
        let jpeg = encode(split_image(32, 32), ImageFormat::Jpeg);
        let natural = NaturalDimensions::new(32, 32);
        assert!(decode_scaled(&jpeg, natural, SampleSize::ONE).unwrap().is_none());
    }

    #[test]
    fn test_scaled_decode_allocates_reduced_grid() {
        let jpeg = encode(split_image(64, 48), ImageFormat::Jpeg);
        let natural = NaturalDimensions::new(64, 48);
        let sample = sample_for(64, 48, 16, 12);
        assert_eq!(sample.get(), 4);

        let image = decode_scaled(&jpeg, natural, sample).unwrap().unwrap();
        assert_eq!((image.width(), image.height()), (16, 12));
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));

        let rgba = image.to_rgba8();
        assert!(is_reddish(rgba.get_pixel(2, 6).0), "{:?}", rgba.get_pixel(2, 6));
        assert!(is_bluish(rgba.get_pixel(13, 6).0), "{:?}", rgba.get_pixel(13, 6));
    }

    #[test]
    fn test_scaled_decode_stops_at_one_eighth() {
        let jpeg = encode(split_image(128, 96), ImageFormat::Jpeg);
        let natural = NaturalDimensions::new(128, 96);
        let sample = sample_for(128, 96, 8, 6);
        assert_eq!(sample.get(), 16);

        let image = decode_scaled(&jpeg, natural, sample).unwrap().unwrap();
        assert_eq!((image.width(), image.height()), (16, 12));
    }

    #[test]
    fn test_scaled_decode_rounds_up_partial_blocks() {
        let jpeg = encode(split_image(30, 40), ImageFormat::Jpeg);
        let natural = NaturalDimensions::new(30, 40);
        let sample = sample_for(30, 40, 7, 10);
        assert_eq!(sample.get(), 4);

        // 30 / 4 rounds up to 8
        let image = decode_scaled(&jpeg, natural, sample).unwrap().unwrap();
        assert_eq!((image.width(), image.height()), (8, 10));
    }

    #[test]
    fn test_grayscale_stays_single_channel() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, image::Luma([200])));
        let jpeg = encode_dynamic(gray, ImageFormat::Jpeg);
        let natural = NaturalDimensions::new(64, 64);

        let image = decode_scaled(&jpeg, natural, sample_for(64, 64, 32, 32)).unwrap().unwrap();
        assert_eq!((image.width(), image.height()), (32, 32));
        match image {
            DynamicImage::ImageLuma8(buf) => {
                let value = buf.get_pixel(16, 16).0[0];
                assert!((190..=210).contains(&value), "{value}");
            }
            other => panic!("expected luma output, got {:?}", other.color()),
        }
    }

    #[test]
    fn test_frame_size_mismatch_is_decode_failure() {
        let jpeg = encode(split_image(64, 48), ImageFormat::Jpeg);
        let wrong = NaturalDimensions::new(48, 64);
        assert!(matches!(
            decode_scaled(&jpeg, wrong, sample_for(48, 64, 12, 16)),
            Err(DecodeError::DecodeFailure(_))
        ));
    }

    #[test]
    fn test_corrupt_stream_is_decode_failure() {
        let natural = NaturalDimensions::new(64, 48);
        assert!(matches!(
            decode_scaled(&[0xFF, 0xD8, 0xFF, 0x00], natural, sample_for(64, 48, 16, 12)),
            Err(DecodeError::DecodeFailure(_))
        ));
    }
}
