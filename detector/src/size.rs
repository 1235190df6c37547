use ball_tracker_common::params::ParameterSet;

use crate::blob::Keypoint;

/// Pixel bounds derived from the percent-of-width size limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBounds {
    pub min_px: f64,
    pub max_px: f64,
}

impl SizeBounds {
    pub fn from_params(params: &ParameterSet, frame_width: u32) -> Self {
        let width = f64::from(frame_width);
        Self {
            min_px: f64::from(params.size_min) * width / 100.0,
            max_px: f64::from(params.size_max) * width / 100.0,
        }
    }

    /// Both bounds are exclusive.
    pub fn admits(&self, diameter: f64) -> bool {
        diameter > self.min_px && diameter < self.max_px
    }
}

/// Keep keypoints whose diameter lies strictly between the bounds, preserving order.
pub fn filter(keypoints: Vec<Keypoint>, bounds: &SizeBounds) -> Vec<Keypoint> {
    keypoints
        .into_iter()
        .filter(|kp| bounds.admits(kp.diameter))
        .collect()
}
