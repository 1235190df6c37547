//! Operator-facing images. Nothing here feeds back into detection.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::blob::Keypoint;
use crate::region::RegionPx;

pub const KEYPOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const REGION_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Border thickness of the search window outline, in pixels.
pub const REGION_LINE: i32 = 5;

/// The annotated source frame and the annotated mask view.
#[derive(Debug, Clone)]
pub struct DiagnosticImages {
    pub annotated: RgbImage,
    /// Source pixels kept by the cleaned mask, black elsewhere.
    pub tuning: RgbImage,
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error("mask is {mask_width}x{mask_height} but frame is {frame_width}x{frame_height}")]
    DimensionMismatch {
        frame_width: u32,
        frame_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
}

pub fn compose(
    frame: &RgbImage,
    mask: &GrayImage,
    keypoints: &[Keypoint],
    region: &RegionPx,
) -> Result<DiagnosticImages, DiagnosticError> {
    if frame.dimensions() != mask.dimensions() {
        return Err(DiagnosticError::DimensionMismatch {
            frame_width: frame.width(),
            frame_height: frame.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }

    let mut annotated = frame.clone();
    let mut tuning = RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        if mask.get_pixel(x, y)[0] > 0 {
            *frame.get_pixel(x, y)
        } else {
            Rgb([0, 0, 0])
        }
    });

    for canvas in [&mut annotated, &mut tuning] {
        for kp in keypoints {
            draw_keypoint(canvas, kp);
        }
        draw_region(canvas, region);
    }

    Ok(DiagnosticImages { annotated, tuning })
}

/// Centre cross plus a circle of the keypoint's diameter.
fn draw_keypoint(canvas: &mut RgbImage, kp: &Keypoint) {
    let center = (kp.x.round() as i32, kp.y.round() as i32);
    let radius = (kp.diameter / 2.0).round().max(1.0) as i32;
    draw_hollow_circle_mut(canvas, center, radius, KEYPOINT_COLOR);
    draw_cross_mut(canvas, KEYPOINT_COLOR, center.0, center.1);
}

fn draw_region(canvas: &mut RgbImage, region: &RegionPx) {
    if region.is_empty() {
        return;
    }
    let half = REGION_LINE / 2;
    for offset in -half..=half {
        let width = region.width as i32 + 2 * offset;
        let height = region.height as i32 + 2 * offset;
        if width <= 0 || height <= 0 {
            continue;
        }
        let rect = Rect::at(region.x as i32 - offset, region.y as i32 - offset)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(canvas, rect, REGION_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn full_region(w: u32, h: u32) -> RegionPx {
        RegionPx {
            x: 0,
            y: 0,
            width: w,
            height: h,
        }
    }

    #[test]
    fn images_match_frame_dimensions() {
        let frame = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
        let mask = GrayImage::new(64, 48);
        let out = compose(&frame, &mask, &[], &full_region(64, 48)).unwrap();
        assert_eq!(out.annotated.dimensions(), (64, 48));
        assert_eq!(out.tuning.dimensions(), (64, 48));
    }

    #[test]
    fn tuning_view_keeps_only_masked_pixels() {
        let frame = RgbImage::from_pixel(40, 40, Rgb([10, 200, 30]));
        let mut mask = GrayImage::new(40, 40);
        mask.put_pixel(20, 20, Luma([255]));
        let region = RegionPx {
            x: 30,
            y: 30,
            width: 5,
            height: 5,
        };
        let out = compose(&frame, &mask, &[], &region).unwrap();
        assert_eq!(out.tuning.get_pixel(20, 20), &Rgb([10, 200, 30]));
        assert_eq!(out.tuning.get_pixel(5, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn draws_keypoint_and_region_on_both_images() {
        let frame = RgbImage::new(100, 100);
        let mask = GrayImage::new(100, 100);
        let kp = Keypoint {
            x: 50.0,
            y: 50.0,
            diameter: 20.0,
        };
        let region = RegionPx {
            x: 10,
            y: 10,
            width: 80,
            height: 80,
        };
        let out = compose(&frame, &mask, &[kp], &region).unwrap();
        for img in [&out.annotated, &out.tuning] {
            assert_eq!(img.get_pixel(60, 50), &KEYPOINT_COLOR);
            assert_eq!(img.get_pixel(50, 50), &KEYPOINT_COLOR);
            assert_eq!(img.get_pixel(10, 40), &REGION_COLOR);
            assert_eq!(img.get_pixel(12, 40), &REGION_COLOR);
            assert_eq!(img.get_pixel(30, 30), &Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn degenerate_region_is_not_drawn() {
        let frame = RgbImage::new(20, 20);
        let mask = GrayImage::new(20, 20);
        let region = RegionPx {
            x: 5,
            y: 5,
            width: 0,
            height: 10,
        };
        let out = compose(&frame, &mask, &[], &region).unwrap();
        assert!(out.annotated.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn mismatched_mask_is_an_error() {
        let frame = RgbImage::new(20, 20);
        let mask = GrayImage::new(10, 20);
        let result = compose(&frame, &mask, &[], &full_region(20, 20));
        assert!(matches!(result, Err(DiagnosticError::DimensionMismatch { .. })));
    }
}
