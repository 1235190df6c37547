use ball_tracker_common::params::ParameterSet;
use image::imageops::invert;
use image::{GrayImage, RgbImage};
use tracing::{debug, warn};

use crate::blob::{self, Keypoint};
use crate::diagnostics::{self, DiagnosticImages};
use crate::morphology;
use crate::normalize::{normalize_all, Candidate};
use crate::preprocess;
use crate::region::{self, RegionPx};
use crate::select;
use crate::size::{self, SizeBounds};
use crate::source::ParameterSource;

/// Everything one pipeline pass produces.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Largest surviving blob, or [`Candidate::NONE`].
    pub candidate: Candidate,
    /// Size-filtered keypoints in pixel space, detector order.
    pub keypoints: Vec<Keypoint>,
    /// `keypoints` in normalised units, same order.
    pub candidates: Vec<Candidate>,
    /// Absent when rendering failed; the candidate is unaffected.
    pub diagnostics: Option<DiagnosticImages>,
}

/// Take one snapshot from `source` and run the pipeline with it.
pub fn run_with<S: ParameterSource + ?Sized>(source: &S, frame: &RgbImage) -> Detection {
    let params = source.snapshot();
    run(frame, &params)
}

/// Frame in, candidate out. Pure: the same frame and parameters always give
/// the same result.
pub fn run(frame: &RgbImage, params: &ParameterSet) -> Detection {
    let (width, height) = frame.dimensions();

    let mask = preprocess::threshold_hsv(frame, params);
    let cleaned = morphology::clean(&mask);

    let region = RegionPx::from_params(params, width, height);
    let mut searched = cleaned.clone();
    region::apply(&mut searched, &region);

    invert(&mut searched);
    let raw = blob::extract(&searched);

    let bounds = SizeBounds::from_params(params, width);
    let keypoints = size::filter(raw.clone(), &bounds);
    debug!(
        raw = raw.len(),
        kept = keypoints.len(),
        min_px = bounds.min_px,
        max_px = bounds.max_px,
        "blob size filter"
    );

    let candidates = normalize_all(&keypoints, width, height);
    for (i, c) in candidates.iter().enumerate() {
        debug!("Pt {i}: ({:.4},{:.4},{:.4})", c.x, c.y, c.size);
    }
    let candidate = select::biggest(&candidates);

    let diagnostics = render_diagnostics(frame, &cleaned, &keypoints, &region);

    Detection {
        candidate,
        keypoints,
        candidates,
        diagnostics,
    }
}

/// Rendering errors stop here; the caller's candidate is already final.
fn render_diagnostics(
    frame: &RgbImage,
    mask: &GrayImage,
    keypoints: &[Keypoint],
    region: &RegionPx,
) -> Option<DiagnosticImages> {
    match diagnostics::compose(frame, mask, keypoints, region) {
        Ok(images) => Some(images),
        Err(e) => {
            warn!(error = %e, "failed to render diagnostics, candidate still emitted");
            None
        }
    }
}
