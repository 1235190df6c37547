//! Blob extraction over a threshold sweep.
//!
//! The input is the inverted mask, so candidates are the dark class. At every
//! sweep level the image is binarised (`pixel > level` is background), dark
//! regions enclosed by background are traced as hole borders and filtered by
//! shape. Centres that reappear across levels are merged; only those seen at
//! least `MIN_REPEATABILITY` times become keypoints.

pub mod shape;

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use tracing::trace;

use shape::Shape;

pub const MIN_THRESHOLD: u8 = 0;
pub const MAX_THRESHOLD: u8 = 100;
pub const THRESHOLD_STEP: usize = 10;
pub const MIN_REPEATABILITY: usize = 2;
pub const MIN_DIST_BETWEEN_BLOBS: f64 = 10.0;

pub const MIN_AREA: f64 = 30.0;
pub const MAX_AREA: f64 = 20000.0;
pub const MIN_CIRCULARITY: f64 = 0.1;
pub const MIN_CONVEXITY: f64 = 0.5;
pub const MIN_INERTIA_RATIO: f64 = 0.5;

/// A detected blob in pixel space. Keypoints carry no identity across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
}

/// One blob seen at one sweep level.
#[derive(Debug, Clone, Copy)]
struct Center {
    x: f64,
    y: f64,
    radius: f64,
    confidence: f64,
}

/// Run the sweep over an inverted mask and return the stable blobs.
pub fn extract(inverted: &GrayImage) -> Vec<Keypoint> {
    let mut groups: Vec<Vec<Center>> = Vec::new();

    for level in (MIN_THRESHOLD..MAX_THRESHOLD).step_by(THRESHOLD_STEP) {
        let centers = find_centers(inverted, level);
        trace!(level, found = centers.len(), "blob sweep level");

        let mut fresh: Vec<Vec<Center>> = Vec::new();
        for center in centers {
            let group = groups.iter_mut().find(|g| {
                let anchor = g[g.len() / 2];
                let dist = (anchor.x - center.x).hypot(anchor.y - center.y);
                dist < MIN_DIST_BETWEEN_BLOBS || dist < anchor.radius || dist < center.radius
            });
            match group {
                Some(g) => {
                    // Groups stay sorted by radius so the middle entry is the median.
                    let at = g.partition_point(|c| c.radius <= center.radius);
                    g.insert(at, center);
                }
                None => fresh.push(vec![center]),
            }
        }
        groups.extend(fresh);
    }

    groups
        .into_iter()
        .filter(|g| g.len() >= MIN_REPEATABILITY)
        .filter_map(|g| {
            let weight: f64 = g.iter().map(|c| c.confidence).sum();
            if weight <= 0.0 {
                return None;
            }
            let x = g.iter().map(|c| c.x * c.confidence).sum::<f64>() / weight;
            let y = g.iter().map(|c| c.y * c.confidence).sum::<f64>() / weight;
            Some(Keypoint {
                x,
                y,
                diameter: g[g.len() / 2].radius * 2.0,
            })
        })
        .collect()
}

/// Blobs present at a single binarisation level.
fn find_centers(inverted: &GrayImage, level: u8) -> Vec<Center> {
    let binary = GrayImage::from_fn(inverted.width(), inverted.height(), |x, y| {
        Luma([if inverted.get_pixel(x, y)[0] > level { 255 } else { 0 }])
    });

    find_contours::<i32>(&binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Hole)
        .filter_map(|contour| {
            let shape = shape::describe(&contour.points)?;
            if !passes_filters(&shape) || !is_dark_at(&binary, shape.centroid) {
                return None;
            }
            Some(Center {
                x: shape.centroid.0,
                y: shape.centroid.1,
                radius: median_radius(&contour.points, shape.centroid),
                confidence: shape.inertia_ratio * shape.inertia_ratio,
            })
        })
        .collect()
}

fn passes_filters(shape: &Shape) -> bool {
    (MIN_AREA..MAX_AREA).contains(&shape.area)
        && shape.circularity >= MIN_CIRCULARITY
        && shape.convexity >= MIN_CONVEXITY
        && shape.inertia_ratio >= MIN_INERTIA_RATIO
}

/// The centroid pixel must belong to the blob class, which rules out rings.
fn is_dark_at(binary: &GrayImage, (cx, cy): (f64, f64)) -> bool {
    let (x, y) = (cx.round(), cy.round());
    if x < 0.0 || y < 0.0 || x >= f64::from(binary.width()) || y >= f64::from(binary.height()) {
        return false;
    }
    binary.get_pixel(x as u32, y as u32)[0] == 0
}

fn median_radius(points: &[Point<i32>], (cx, cy): (f64, f64)) -> f64 {
    let mut dists: Vec<f64> = points
        .iter()
        .map(|p| (f64::from(p.x) - cx).hypot(f64::from(p.y) - cy))
        .collect();
    dists.sort_by(f64::total_cmp);
    let n = dists.len();
    (dists[(n - 1) / 2] + dists[n / 2]) / 2.0
}
