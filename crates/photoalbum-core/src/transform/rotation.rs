//! Image rotation with bilinear interpolation.
//!
//! # Algorithm
//!
//! The rotation is an affine transform about the origin, in y-down image
//! coordinates, so a positive angle turns the picture clockwise on screen.
//! The output canvas is the bounding box of the rotated source, and the
//! result is produced by inverse mapping: for each destination pixel center
//! we find the source position and interpolate its value.
//!
//! For rotation by angle θ, the inverse transform is:
//! ```text
//! src_x =  (dst_x - dst_cx) * cos(θ) + (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = -(dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//!
//! Sampling is clamped to the source edges, so right-angle rotations map
//! every pixel exactly.

use crate::decode::DecodedBitmap;

const CHANNELS: usize = DecodedBitmap::CHANNELS;

/// Compute the dimensions of the bounding box for a rotated image.
///
/// When an image is rotated, the corners extend beyond the original bounds.
/// This function calculates the minimum bounding box that contains the
/// entire rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (sign does not matter)
///
/// # Returns
///
/// Tuple of (new_width, new_height) for the rotated bounding box.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    // Normalize angle to handle 360, 720, etc.
    let angle_normalized = angle_degrees % 360.0;
    let abs_angle = angle_normalized.abs();

    // Fast path: no rotation needed (including near-zero and multiples of 360)
    if abs_angle < 0.001 || (360.0 - abs_angle).abs() < 0.001 {
        return (width, height);
    }

    // Fast path: exact 90/270 degree rotations (swap dimensions)
    if (abs_angle - 90.0).abs() < 0.001 || (abs_angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    // Fast path: exact 180 degree rotation (same dimensions)
    if (abs_angle - 180.0).abs() < 0.001 {
        return (width, height);
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // The bounding box of a rotated rectangle is:
    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate a bitmap clockwise by `angle_degrees`.
///
/// The source is consumed: once the rotated buffer has been produced the
/// pre-rotation pixels are dropped, so two full copies never outlive this
/// call. A zero angle returns the input unchanged.
pub fn rotate_bitmap(bitmap: DecodedBitmap, angle_degrees: f64) -> DecodedBitmap {
    if (angle_degrees % 360.0).abs() < 0.001 {
        return bitmap;
    }
    rotate(&bitmap, angle_degrees)
}

/// Rotate a borrowed bitmap clockwise by `angle_degrees` into a new buffer.
pub fn rotate(image: &DecodedBitmap, angle_degrees: f64) -> DecodedBitmap {
    if image.is_empty() {
        return image.clone();
    }

    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    // Center of source and destination images
    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * CHANNELS];

    for (dst_y, row) in output
        .chunks_exact_mut(dst_w as usize * CHANNELS)
        .enumerate()
    {
        for (dst_x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
            // Destination pixel center relative to the canvas center
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Inverse rotation, back to source pixel-index space
            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            out.copy_from_slice(&sample_bilinear(image, src_x, src_y));
        }
    }

    DecodedBitmap {
        width: dst_w,
        height: dst_h,
        pixels: output,
    }
}

/// Get a pixel as [f64; 4] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &DecodedBitmap, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * CHANNELS;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
        image.pixels[idx + 3] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance. Positions within half a pixel of
/// the border are clamped to the edge; anything further out is transparent.
fn sample_bilinear(image: &DecodedBitmap, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);

    if x < -0.5 || x > w - 0.5 || y < -0.5 || y > h - 0.5 {
        return [0, 0, 0, 0];
    }

    let x = x.clamp(0.0, w - 1.0);
    let y = y.clamp(0.0, h - 1.0);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..CHANNELS {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a simple test image with a gradient pattern.
    fn test_image(width: u32, height: u32) -> DecodedBitmap {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        DecodedBitmap::new(width, height, pixels)
    }

    /// A 3x2 bitmap with a distinct value in every pixel.
    ///
    /// ```text
    /// 1 2 3
    /// 4 5 6
    /// ```
    fn labelled() -> DecodedBitmap {
        let mut pixels = Vec::new();
        for v in 1..=6u8 {
            pixels.extend_from_slice(&[v, v * 10, v * 20, 255]);
        }
        DecodedBitmap::new(3, 2, pixels)
    }

    fn labels(bmp: &DecodedBitmap) -> Vec<u8> {
        bmp.pixels.chunks_exact(CHANNELS).map(|p| p[0]).collect()
    }

    #[test]
    fn test_no_rotation() {
        let img = test_image(100, 50);
        let expected = img.clone();
        let result = rotate_bitmap(img, 0.0);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let img = test_image(50, 30);
        let expected = img.clone();
        assert_eq!(rotate_bitmap(img, 360.0), expected);
    }

    #[test]
    fn test_rotate_90_is_clockwise_and_exact() {
        let result = rotate(&labelled(), 90.0);
        assert_eq!(result.dimensions(), (2, 3));
        // 4 1
        // 5 2
        // 6 3
        assert_eq!(labels(&result), vec![4, 1, 5, 2, 6, 3]);
        assert_eq!(result.pixel(1, 0), [1, 10, 20, 255]);
    }

    #[test]
    fn test_rotate_180_is_exact() {
        let result = rotate(&labelled(), 180.0);
        assert_eq!(result.dimensions(), (3, 2));
        assert_eq!(labels(&result), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_rotate_270_is_exact() {
        let result = rotate(&labelled(), 270.0);
        assert_eq!(result.dimensions(), (2, 3));
        // 3 6
        // 2 5
        // 1 4
        assert_eq!(labels(&result), vec![3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn test_right_angle_rotation_keeps_alpha() {
        let result = rotate(&test_image(7, 5), 90.0);
        assert!(result.pixels.chunks_exact(CHANNELS).all(|p| p[3] == 255));
    }

    #[test]
    fn test_90_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 50, 90.0);
        assert_eq!(w, 50);
        assert_eq!(h, 100);
    }

    #[test]
    fn test_180_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 50, 180.0);
        assert_eq!(w, 100);
        assert_eq!(h, 50);
    }

    #[test]
    fn test_270_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 50, 270.0);
        assert_eq!(w, 50);
        assert_eq!(h, 100);
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4
        assert!(w > 140 && w < 143, "width was {}", w);
        assert!(h > 140 && h < 143, "height was {}", h);
    }

    #[test]
    fn test_large_rotation_angles() {
        // 720 degrees = 2 full rotations
        assert_eq!(compute_rotated_bounds(100, 50, 720.0), (100, 50));
        // 450 degrees = 360 + 90
        assert_eq!(compute_rotated_bounds(100, 50, 450.0), (50, 100));
    }

    #[test]
    fn test_negative_rotation_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 30.0),
            compute_rotated_bounds(100, 80, -30.0)
        );
    }

    #[test]
    fn test_rotation_expands_canvas_with_transparent_corners() {
        let img = test_image(40, 40);
        let result = rotate(&img, 45.0);

        assert!(result.width > img.width);
        assert!(result.height > img.height);
        assert_eq!(result.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_1x1_image_rotation() {
        let img = DecodedBitmap::new(1, 1, vec![128, 128, 128, 255]);
        let result = rotate(&img, 90.0);
        assert_eq!(result.dimensions(), (1, 1));
        assert_eq!(result.pixel(0, 0), [128, 128, 128, 255]);
    }

    #[test]
    fn test_very_thin_image_rotation() {
        let result = rotate(&test_image(100, 1), 90.0);
        assert_eq!(result.dimensions(), (1, 100));
    }

    #[test]
    fn test_empty_bitmap_passes_through() {
        let result = rotate(&DecodedBitmap::new(0, 0, vec![]), 90.0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 90.0, 135.0, 179.0, 180.0, 270.0, 359.0] {
            let (w, h) = compute_rotated_bounds(10, 10, angle);
            assert!(w > 0, "Width should be > 0 for angle {}", angle);
            assert!(h > 0, "Height should be > 0 for angle {}", angle);
        }
    }
}
