//! Canvas planning for 9:16 output.
//!
//! Given the source dimensions, computes the canvas the overlay is placed
//! on. Videos shorter than 9:16 get black bars split between top and
//! bottom; taller videos are left alone (never cropped).

use crate::error::{CoreError, CoreResult};

/// Width and height of the first video stream, as reported by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct VideoDimensions {
    pub width: i64,
    pub height: i64,
}

impl VideoDimensions {
    #[must_use]
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

/// Target canvas for one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CanvasPlan {
    /// Canvas width, always the source width
    pub width: u32,
    /// Source height before padding
    pub source_height: u32,
    /// Final canvas height (source height when no padding is needed)
    pub target_height: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
}

impl CanvasPlan {
    /// True when the source has to be letterboxed.
    #[must_use]
    pub fn is_padded(&self) -> bool {
        self.pad_top + self.pad_bottom > 0
    }
}

/// Height a `width`-wide frame needs for 9:16, rounded up.
#[must_use]
pub fn nine_sixteen_height(width: i64) -> i64 {
    (width * 16 + 8) / 9
}

/// Computes the 9:16 canvas and the padding for a source of `width` x `height`.
///
/// # Errors
///
/// `CoreError::Dimension` if either dimension is not positive or does not
/// fit the canvas range.
pub fn plan(width: i64, height: i64) -> CoreResult<CanvasPlan> {
    if width <= 0 || height <= 0 {
        return Err(CoreError::Dimension(format!(
            "video dimensions must be positive, got {width}x{height}"
        )));
    }
    if width > i64::from(u32::MAX) || height > i64::from(u32::MAX) {
        return Err(CoreError::Dimension(format!(
            "video dimensions out of range, got {width}x{height}"
        )));
    }

    let required = nine_sixteen_height(width);
    let (target_height, pad_top, pad_bottom) = if height >= required {
        (height, 0, 0)
    } else {
        let extra = required - height;
        let top = extra / 2;
        (required, top, extra - top)
    };

    let to_u32 = |value: i64| {
        u32::try_from(value).map_err(|_| {
            CoreError::Dimension(format!("canvas size out of range for {width}x{height}"))
        })
    };

    Ok(CanvasPlan {
        width: to_u32(width)?,
        source_height: to_u32(height)?,
        target_height: to_u32(target_height)?,
        pad_top: to_u32(pad_top)?,
        pad_bottom: to_u32(pad_bottom)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_vertical_is_untouched() {
        let plan = plan(1080, 1920).unwrap();
        assert_eq!(plan.target_height, 1920);
        assert_eq!((plan.pad_top, plan.pad_bottom), (0, 0));
        assert!(!plan.is_padded());
    }

    #[test]
    fn taller_than_vertical_is_never_cropped() {
        let plan = plan(720, 2000).unwrap();
        assert_eq!(plan.target_height, 2000);
        assert_eq!((plan.pad_top, plan.pad_bottom), (0, 0));
    }

    #[test]
    fn short_source_is_padded_evenly() {
        let plan = plan(1080, 1350).unwrap();
        assert_eq!(plan.target_height, 1920);
        assert_eq!(plan.pad_top, 285);
        assert_eq!(plan.pad_bottom, 285);
        assert!(plan.is_padded());
    }

    #[test]
    fn odd_padding_puts_the_extra_row_at_the_bottom() {
        // 1920 * 16 / 9 = 3413.33 -> 3414; 3414 - 1080 = 2334 (even)
        // 1921 * 16 / 9 = 3415.11 -> 3416; 3416 - 1081 = 2335 (odd)
        let plan = plan(1921, 1081).unwrap();
        assert_eq!(plan.target_height, 3416);
        assert_eq!(plan.pad_top, 1167);
        assert_eq!(plan.pad_bottom, 1168);
    }

    #[test]
    fn height_is_rounded_up() {
        assert_eq!(nine_sixteen_height(1080), 1920);
        assert_eq!(nine_sixteen_height(1920), 3414);
        assert_eq!(nine_sixteen_height(1), 2);
        assert_eq!(nine_sixteen_height(9), 16);
    }

    #[test]
    fn padding_invariants_hold_across_sizes() {
        for width in (1..=4000).step_by(37) {
            for height in (1..=5000).step_by(53) {
                let plan = plan(width, height).unwrap();
                let required = nine_sixteen_height(width);
                if height >= required {
                    assert_eq!(plan.target_height as i64, height);
                    assert_eq!((plan.pad_top, plan.pad_bottom), (0, 0));
                } else {
                    assert_eq!(plan.target_height as i64, required);
                    assert_eq!(
                        (plan.pad_top + plan.pad_bottom) as i64,
                        plan.target_height as i64 - height
                    );
                    assert!(plan.pad_bottom == plan.pad_top || plan.pad_bottom == plan.pad_top + 1);
                }
            }
        }
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        for (w, h) in [(0, 1080), (1080, 0), (-1, 1080), (1080, -5), (0, 0)] {
            assert!(matches!(plan(w, h), Err(CoreError::Dimension(_))), "{w}x{h}");
        }
        assert!(matches!(plan(i64::MAX, 1080), Err(CoreError::Dimension(_))));
    }
}
