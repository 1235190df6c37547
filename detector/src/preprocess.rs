//! Blur, HSV conversion and range thresholding: colour frame in, binary mask out.

use ball_tracker_common::params::ParameterSet;
use image::{GrayImage, Luma, Rgb, RgbImage};

/// Side of the square averaging window applied before thresholding.
pub const BLUR_KERNEL: u32 = 5;

/// Mask value for pixels inside the HSV range. Everything else is 0.
pub const MASK_ON: u8 = 255;

/// Blur the frame, convert to HSV and keep the pixels inside the configured
/// hue/saturation/value box. The mask always has the frame's dimensions.
pub fn threshold_hsv(frame: &RgbImage, params: &ParameterSet) -> GrayImage {
    let blurred = box_blur(frame, BLUR_KERNEL);
    let lo = [params.hue_min, params.sat_min, params.val_min];
    let hi = [params.hue_max, params.sat_max, params.val_max];

    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let hsv = rgb_to_hsv(*blurred.get_pixel(x, y));
        let inside = (0..3).all(|c| {
            let v = u32::from(hsv[c]);
            v >= lo[c] && v <= hi[c]
        });
        Luma([if inside { MASK_ON } else { 0 }])
    })
}

/// Normalised box filter over a `kernel`x`kernel` window, borders reflected
/// without repeating the edge pixel.
pub fn box_blur(image: &RgbImage, kernel: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || kernel <= 1 {
        return image.clone();
    }
    let radius = (kernel / 2) as i64;
    let area = kernel * kernel;

    // Horizontal pass into per-channel sums.
    let mut rows = vec![[0u32; 3]; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u32; 3];
            for dx in -radius..=radius {
                let sx = reflect_101(x as i64 + dx, w as i64);
                let p = image.get_pixel(sx, y);
                for c in 0..3 {
                    acc[c] += u32::from(p[c]);
                }
            }
            rows[(y * w + x) as usize] = acc;
        }
    }

    // Vertical pass and normalisation.
    RgbImage::from_fn(w, h, |x, y| {
        let mut acc = [0u32; 3];
        for dy in -radius..=radius {
            let sy = reflect_101(y as i64 + dy, h as i64);
            let s = rows[(sy * w + x) as usize];
            for c in 0..3 {
                acc[c] += s[c];
            }
        }
        Rgb(acc.map(|v| ((v + area / 2) / area) as u8))
    })
}

fn reflect_101(mut i: i64, n: i64) -> u32 {
    if n == 1 {
        return 0;
    }
    while i < 0 || i >= n {
        i = if i < 0 { -i } else { 2 * n - 2 - i };
    }
    i as u32
}

/// 8-bit HSV: hue in 0..180 (degrees halved), saturation and value in 0..=255.
pub fn rgb_to_hsv(px: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = px.0.map(f32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let sat = if max > 0.0 { 255.0 * chroma / max } else { 0.0 };
    let mut hue = if chroma <= 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / chroma
    } else if max == g {
        120.0 + 60.0 * (b - r) / chroma
    } else {
        240.0 + 60.0 * (r - g) / chroma
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let mut h = (hue / 2.0).round() as u32;
    if h >= 180 {
        h -= 180;
    }
    [h as u8, sat.round() as u8, max as u8]
}
