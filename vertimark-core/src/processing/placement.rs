//! Overlay placement.
//!
//! Picks a corner at random and converts the margins into the overlay's
//! top-left pixel coordinates on the final (padded) canvas.

use log::debug;
use rand::Rng;

use crate::config::PlacementSettings;
use crate::processing::watermark::TransformedWatermark;

/// Horizontal side the watermark is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Left,
    Right,
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corner::Left => write!(f, "left"),
            Corner::Right => write!(f, "right"),
        }
    }
}

/// Top-left corner of the overlay on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct OverlayPosition {
    pub x: u32,
    pub y: u32,
    pub corner: Corner,
}

fn clamp_to_pixel(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Computes the position for a known corner.
///
/// Right-anchored watermarks wider than the canvas are pinned to x = 0; the
/// right edge is not otherwise checked.
#[must_use]
pub fn resolve_for_corner(
    corner: Corner,
    watermark_width: u32,
    watermark_height: u32,
    canvas_width: u32,
    canvas_height: u32,
    placement: &PlacementSettings,
) -> OverlayPosition {
    let canvas_w = f64::from(canvas_width);
    let canvas_h = f64::from(canvas_height);

    let x = match corner {
        Corner::Left => canvas_w * placement.margin_x,
        Corner::Right => canvas_w - f64::from(watermark_width) - canvas_w * placement.margin_x,
    };
    let y = canvas_h - f64::from(watermark_height) - canvas_h * placement.margin_y;

    OverlayPosition {
        x: clamp_to_pixel(x),
        y: clamp_to_pixel(y),
        corner,
    }
}

/// Chooses a corner with the supplied rng and resolves the overlay position.
///
/// `canvas_height` must be the final height, after any padding.
pub fn resolve<R: Rng + ?Sized>(
    watermark: &TransformedWatermark,
    canvas_width: u32,
    canvas_height: u32,
    placement: &PlacementSettings,
    rng: &mut R,
) -> OverlayPosition {
    let corner = if rng.gen_bool(0.5) {
        Corner::Left
    } else {
        Corner::Right
    };

    let position = resolve_for_corner(
        corner,
        watermark.pixel_width,
        watermark.pixel_height,
        canvas_width,
        canvas_height,
        placement,
    );
    debug!(
        "Placement: corner={}, x={}, y={} on {}x{}",
        position.corner, position.x, position.y, canvas_width, canvas_height
    );
    position
}
