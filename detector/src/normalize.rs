use crate::blob::Keypoint;

/// A blob in frame-normalised units.
///
/// `x` and `y` are relative to the frame centre and scaled by the half extent
/// of their own axis, so the frame spans [-1, 1] on both. `size` is the
/// diameter over the frame *width* for either orientation. A `size` of 0 means
/// nothing was detected; consumers must treat `size <= 0` as absence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Candidate {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Candidate {
    /// The "nothing detected" sentinel.
    pub const NONE: Candidate = Candidate {
        x: 0.0,
        y: 0.0,
        size: 0.0,
    };

    pub fn is_detection(&self) -> bool {
        self.size > 0.0
    }
}

pub fn normalize(kp: &Keypoint, frame_width: u32, frame_height: u32) -> Candidate {
    let half_w = 0.5 * f64::from(frame_width);
    let half_h = 0.5 * f64::from(frame_height);
    Candidate {
        x: (kp.x - half_w) / half_w,
        y: (kp.y - half_h) / half_h,
        size: kp.diameter / f64::from(frame_width),
    }
}

pub fn normalize_all(
    keypoints: &[Keypoint],
    frame_width: u32,
    frame_height: u32,
) -> Vec<Candidate> {
    keypoints
        .iter()
        .map(|kp| normalize(kp, frame_width, frame_height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kp(x: f64, y: f64, diameter: f64) -> Keypoint {
        Keypoint { x, y, diameter }
    }

    #[test]
    fn centre_maps_to_origin() {
        let c = normalize(&kp(320.0, 240.0, 64.0), 640, 480);
        assert_eq!((c.x, c.y), (0.0, 0.0));
        assert_eq!(c.size, 0.1);
    }

    #[test]
    fn corners_map_to_unit_extremes() {
        let tl = normalize(&kp(0.0, 0.0, 1.0), 640, 480);
        assert_eq!((tl.x, tl.y), (-1.0, -1.0));
        let br = normalize(&kp(640.0, 480.0, 1.0), 640, 480);
        assert_eq!((br.x, br.y), (1.0, 1.0));
    }

    #[test]
    fn size_uses_width_on_portrait_frames() {
        let c = normalize(&kp(50.0, 100.0, 25.0), 100, 200);
        assert_eq!(c.size, 0.25);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn sentinel_is_not_a_detection() {
        assert!(!Candidate::NONE.is_detection());
        assert_eq!(Candidate::default(), Candidate::NONE);
    }
}
