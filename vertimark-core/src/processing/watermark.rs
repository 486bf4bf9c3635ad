// ============================================================================
// vertimark-core/src/processing/watermark.rs
// ============================================================================
//
// WATERMARK TRANSFORM: Randomized Scale, Opacity and Rotation
//
// Produces the per-video watermark image handed to the renderer. Each call
// draws a fresh scale variation and rotation angle from the supplied random
// source, so a seeded generator reproduces the same sequence of watermarks.
//
// PIPELINE:
// 1. Draw scale variation, compute target width (floor of 8px)
// 2. Lanczos3 resize preserving aspect ratio
// 3. Scale the alpha channel by the opacity (RGB untouched)
// 4. Draw rotation angle, rotate about the centre into an expanded,
//    transparent canvas with bicubic interpolation
// 5. Report the post-rotation size
//
// The renderer composites by alpha alone, so opacity is baked into the
// image here rather than passed as a parameter.

// ---- External crate imports ----
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use log::debug;
use rand::Rng;

// ---- Internal crate imports ----
use crate::config::WatermarkSettings;
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::path::Path;

/// Smallest watermark width in pixels, regardless of video size or jitter.
pub const MIN_WATERMARK_WIDTH: u32 = 8;

/// Angles closer to zero than this are treated as no rotation.
const ANGLE_EPSILON_DEGREES: f64 = 1e-9;

/// Tolerance applied before rounding the rotated extent up.
const EXTENT_EPSILON: f64 = 1e-6;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The watermark prepared for one video.
#[derive(Debug, Clone)]
pub struct TransformedWatermark {
    /// Width of the post-rotation bounding box
    pub pixel_width: u32,
    /// Height of the post-rotation bounding box
    pub pixel_height: u32,
    /// Width after scaling, before rotation
    pub scaled_width: u32,
    /// Height after scaling, before rotation
    pub scaled_height: u32,
    /// Rotation that was applied, counter-clockwise in degrees
    pub angle_degrees: f64,
    /// RGBA pixels with opacity already applied to the alpha channel
    pub image: RgbaImage,
}

/// Decodes the watermark file into an RGBA buffer.
///
/// # Errors
///
/// `CoreError::AssetLoad` if the file cannot be read or decoded, or decodes
/// to an empty image.
pub fn load_watermark(path: &Path) -> CoreResult<RgbaImage> {
    let decoded = image::open(path).map_err(|e| {
        CoreError::AssetLoad(format!("failed to decode watermark {}: {e}", path.display()))
    })?;
    let rgba = decoded.to_rgba8();

    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CoreError::AssetLoad(format!(
            "watermark {} has empty dimensions {}x{}",
            path.display(),
            rgba.width(),
            rgba.height()
        )));
    }

    debug!(
        "Loaded watermark {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

/// Draws uniformly from `[-bound, bound]`; a zero bound draws nothing.
fn draw_symmetric<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

/// Watermark width for a video: `max(8, round(video_width * fraction * (1 + variation)))`.
pub fn target_width(video_width: u32, width_fraction: f64, variation: f64) -> CoreResult<u32> {
    let raw = (f64::from(video_width) * width_fraction * (1.0 + variation)).round();
    if !raw.is_finite() || raw > f64::from(u32::MAX) {
        return Err(CoreError::Dimension(format!(
            "watermark width is out of range for video width {video_width}"
        )));
    }

    let width = (raw.max(0.0) as u32).max(MIN_WATERMARK_WIDTH);
    if width == 0 {
        return Err(CoreError::Dimension("watermark width rounded to zero".to_string()));
    }
    Ok(width)
}

/// Height that keeps the source aspect ratio at `target_width`, rounded, at least 1px.
#[must_use]
pub fn scaled_height(source_width: u32, source_height: u32, target_width: u32) -> u32 {
    let source_width = u64::from(source_width.max(1));
    let numerator = u64::from(source_height) * u64::from(target_width) + source_width / 2;
    u32::try_from(numerator / source_width).unwrap_or(u32::MAX).max(1)
}

/// Multiplies every alpha value by `opacity`, rounding down. RGB is untouched.
pub fn apply_opacity(image: &mut RgbaImage, opacity: f64) {
    if opacity >= 1.0 {
        return;
    }
    let opacity = opacity.max(0.0);
    for pixel in image.pixels_mut() {
        pixel[3] = (f64::from(pixel[3]) * opacity).floor() as u8;
    }
}

/// Size of the axis-aligned box holding a `width` x `height` rectangle rotated by `angle_degrees`.
///
/// Never smaller than the unrotated size.
#[must_use]
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if angle_degrees.abs() < ANGLE_EPSILON_DEGREES {
        return (width, height);
    }

    let theta = angle_degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (f64::from(width), f64::from(height));

    let extent = |value: f64| (value - EXTENT_EPSILON).ceil().max(1.0) as u32;
    let rotated_w = extent(w * cos + h * sin);
    let rotated_h = extent(w * sin + h * cos);

    (rotated_w.max(width), rotated_h.max(height))
}

/// Rotates counter-clockwise about the centre into a canvas that fits the
/// whole rotated image. Exposed pixels are fully transparent.
#[must_use]
pub fn rotate_expanded(image: &RgbaImage, angle_degrees: f64) -> RgbaImage {
    if angle_degrees.abs() < ANGLE_EPSILON_DEGREES {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let (out_w, out_h) = rotated_bounds(width, height, angle_degrees);

    // Projection::rotate is clockwise in image coordinates (y down).
    let theta = -(angle_degrees.to_radians() as f32);
    let projection = Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-(width as f32) / 2.0, -(height as f32) / 2.0);

    let mut out = RgbaImage::from_pixel(out_w, out_h, TRANSPARENT);
    warp_into(image, &projection, Interpolation::Bicubic, TRANSPARENT, &mut out);
    out
}

/// Produces a freshly randomized watermark for a video `video_width` pixels wide.
///
/// Draws the scale variation first and the rotation second from `rng`.
/// `source` is never modified.
///
/// # Errors
///
/// `CoreError::AssetLoad` for an empty source image, `CoreError::Dimension`
/// if a computed size is not positive.
pub fn transform<R: Rng + ?Sized>(
    source: &RgbaImage,
    video_width: u32,
    settings: &WatermarkSettings,
    rng: &mut R,
) -> CoreResult<TransformedWatermark> {
    let (source_w, source_h) = source.dimensions();
    if source_w == 0 || source_h == 0 {
        return Err(CoreError::AssetLoad(format!(
            "watermark has empty dimensions {source_w}x{source_h}"
        )));
    }

    let variation = draw_symmetric(rng, settings.scale_jitter);
    let scaled_w = target_width(video_width, settings.width_fraction, variation)?;
    let scaled_h = scaled_height(source_w, source_h, scaled_w);

    let mut scaled = imageops::resize(source, scaled_w, scaled_h, FilterType::Lanczos3);
    apply_opacity(&mut scaled, settings.opacity);

    let angle_degrees = draw_symmetric(rng, settings.rotation_degrees);
    let rotated = rotate_expanded(&scaled, angle_degrees);
    let (pixel_width, pixel_height) = rotated.dimensions();

    if pixel_width == 0 || pixel_height == 0 {
        return Err(CoreError::Dimension(format!(
            "transformed watermark has empty dimensions {pixel_width}x{pixel_height}"
        )));
    }

    debug!(
        "Watermark transform: variation={variation:+.3}, scaled={scaled_w}x{scaled_h}, angle={angle_degrees:+.2}deg, final={pixel_width}x{pixel_height}"
    );

    Ok(TransformedWatermark {
        pixel_width,
        pixel_height,
        scaled_width: scaled_w,
        scaled_height: scaled_h,
        angle_degrees,
        image: rotated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn settings(width_fraction: f64, opacity: f64, rotation: f64, jitter: f64) -> WatermarkSettings {
        WatermarkSettings {
            width_fraction,
            opacity,
            rotation_degrees: rotation,
            scale_jitter: jitter,
        }
    }

    fn opaque_source(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn unrotated_watermark_matches_reference_scenario() {
        let source = opaque_source(400, 100);
        let mut rng = StdRng::seed_from_u64(1);
        let wm = transform(&source, 1080, &settings(0.25, 1.0, 0.0, 0.0), &mut rng).unwrap();

        assert_eq!((wm.scaled_width, wm.scaled_height), (270, 68));
        assert_eq!((wm.pixel_width, wm.pixel_height), (270, 68));
        assert_eq!(wm.angle_degrees, 0.0);
        assert_eq!(wm.image.dimensions(), (270, 68));
    }

    #[test]
    fn width_has_a_floor_of_eight_pixels() {
        assert_eq!(target_width(20, 0.01, 0.0).unwrap(), MIN_WATERMARK_WIDTH);
        assert_eq!(target_width(1080, 0.25, 0.0).unwrap(), 270);
        assert_eq!(target_width(1000, 0.25, 0.1).unwrap(), 275);
    }

    #[test]
    fn width_grows_with_fraction() {
        let mut previous = 0;
        for fraction in [0.05, 0.1, 0.2, 0.4, 0.8, 1.0] {
            let width = target_width(1080, fraction, 0.0).unwrap();
            assert!(width > previous, "{fraction} -> {width}");
            previous = width;
        }

        let source = opaque_source(400, 100);
        let mut rng = StdRng::seed_from_u64(3);
        let small = transform(&source, 1080, &settings(0.2, 1.0, 0.0, 0.0), &mut rng).unwrap();
        let large = transform(&source, 1080, &settings(0.3, 1.0, 0.0, 0.0), &mut rng).unwrap();
        assert!(large.pixel_width > small.pixel_width);
    }

    #[test]
    fn scaled_height_keeps_aspect_and_minimum() {
        assert_eq!(scaled_height(400, 100, 270), 68);
        assert_eq!(scaled_height(400, 100, 400), 100);
        assert_eq!(scaled_height(1000, 1, 8), 1);
    }

    #[test]
    fn full_opacity_leaves_pixels_untouched() {
        let mut image = RgbaImage::from_fn(16, 16, |x, y| Rgba([x as u8, y as u8, 7, (x * 16 + y) as u8]));
        let original = image.clone();
        apply_opacity(&mut image, 1.0);
        assert_eq!(image, original);
    }

    #[test]
    fn partial_opacity_only_lowers_alpha() {
        let mut image = RgbaImage::from_fn(16, 16, |x, y| Rgba([x as u8, y as u8, 7, (x * 16 + y) as u8]));
        let original = image.clone();
        apply_opacity(&mut image, 0.1);

        for (after, before) in image.pixels().zip(original.pixels()) {
            assert_eq!(after.0[..3], before.0[..3]);
            assert!(after[3] <= before[3]);
            assert_eq!(after[3], (f64::from(before[3]) * 0.1).floor() as u8);
        }
    }

    #[test]
    fn rotation_never_shrinks_the_bounding_box() {
        for (w, h) in [(270, 68), (1000, 10), (50, 50), (8, 300)] {
            for angle in [-8.0, -3.5, -0.01, 0.01, 1.0, 8.0] {
                let (rw, rh) = rotated_bounds(w, h, angle);
                assert!(rw >= w && rh >= h, "{w}x{h} @ {angle} -> {rw}x{rh}");
            }
        }
        assert_eq!(rotated_bounds(270, 68, 0.0), (270, 68));
    }

    #[test]
    fn rotated_image_grows_and_has_transparent_corners() {
        let source = opaque_source(270, 68);
        let rotated = rotate_expanded(&source, 8.0);

        assert_eq!(rotated.dimensions(), (277, 105));
        assert_eq!(rotated.get_pixel(0, 0)[3], 0);
        assert_eq!(rotated.get_pixel(276, 104)[3], 0);
        let centre = rotated.get_pixel(138, 52);
        assert!(centre[3] > 200, "centre alpha {}", centre[3]);
    }

    #[test]
    fn source_is_not_mutated() {
        let source = opaque_source(64, 32);
        let original = source.clone();
        let mut rng = StdRng::seed_from_u64(9);
        let _ = transform(&source, 720, &settings(0.25, 0.3, 8.0, 0.15), &mut rng).unwrap();
        assert_eq!(source, original);
    }

    #[test]
    fn seeded_rng_reproduces_the_transform() {
        let source = opaque_source(400, 100);
        let wm = settings(0.25, 0.1, 8.0, 0.15);

        let a = transform(&source, 1080, &wm, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = transform(&source, 1080, &wm, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(a.angle_degrees, b.angle_degrees);
        assert_eq!((a.pixel_width, a.pixel_height), (b.pixel_width, b.pixel_height));
        assert!(a.angle_degrees.abs() <= 8.0);
        assert!((230..=311).contains(&a.scaled_width));
    }

    #[test]
    fn consecutive_draws_are_independent() {
        let source = opaque_source(400, 100);
        let wm = settings(0.25, 0.1, 8.0, 0.15);
        let mut rng = StdRng::seed_from_u64(5);

        let angles: Vec<f64> = (0..8)
            .map(|_| transform(&source, 1080, &wm, &mut rng).unwrap().angle_degrees)
            .collect();
        assert!(angles.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn undecodable_file_is_an_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_watermark(&path), Err(CoreError::AssetLoad(_))));
        assert!(matches!(
            load_watermark(&dir.path().join("missing.png")),
            Err(CoreError::AssetLoad(_))
        ));
    }

    #[test]
    fn empty_source_is_an_asset_error() {
        let source = RgbaImage::new(0, 0);
        let mut rng = StdRng::seed_from_u64(0);
        let result = transform(&source, 1080, &settings(0.25, 1.0, 0.0, 0.0), &mut rng);
        assert!(matches!(result, Err(CoreError::AssetLoad(_))));
    }
}
