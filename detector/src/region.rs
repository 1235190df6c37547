use ball_tracker_common::params::ParameterSet;
use image::GrayImage;

/// Search window in pixels, clipped to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionPx {
    /// Convert the percent rectangle of `params` with `pixel = percent * dim / 100`.
    pub fn from_params(params: &ParameterSet, frame_width: u32, frame_height: u32) -> Self {
        let to_px = |percent: u32, dim: u32| (u64::from(percent) * u64::from(dim) / 100) as u32;
        let x = to_px(params.region_x, frame_width).min(frame_width);
        let y = to_px(params.region_y, frame_height).min(frame_height);
        let width = to_px(params.region_width, frame_width).min(frame_width - x);
        let height = to_px(params.region_height, frame_height).min(frame_height - y);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Zero every mask pixel outside `region`. An empty region clears the whole mask.
pub fn apply(mask: &mut GrayImage, region: &RegionPx) {
    for (x, y, px) in mask.enumerate_pixels_mut() {
        if !region.contains(x, y) {
            px.0[0] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ball_tracker_common::params::Control;
    use image::Luma;

    #[test]
    fn default_region_is_full_frame() {
        let r = RegionPx::from_params(&ParameterSet::default(), 640, 480);
        assert_eq!(
            r,
            RegionPx {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn percent_conversion_truncates() {
        let params = ParameterSet::default()
            .with(Control::RegionX, 25)
            .with(Control::RegionY, 10)
            .with(Control::RegionWidth, 50)
            .with(Control::RegionHeight, 33);
        let r = RegionPx::from_params(&params, 199, 100);
        assert_eq!((r.x, r.y, r.width, r.height), (49, 10, 99, 33));
    }

    #[test]
    fn extent_is_clipped_to_frame() {
        let params = ParameterSet::default()
            .with(Control::RegionX, 80)
            .with(Control::RegionWidth, 50);
        let r = RegionPx::from_params(&params, 100, 100);
        assert_eq!((r.x, r.width), (80, 20));
    }

    #[test]
    fn zeroes_outside_region() {
        let mut mask = GrayImage::from_pixel(10, 10, Luma([255]));
        let region = RegionPx {
            x: 2,
            y: 3,
            width: 4,
            height: 5,
        };
        apply(&mut mask, &region);
        assert_eq!(mask.get_pixel(2, 3)[0], 255);
        assert_eq!(mask.get_pixel(5, 7)[0], 255);
        assert_eq!(mask.get_pixel(6, 7)[0], 0);
        assert_eq!(mask.get_pixel(1, 3)[0], 0);
        assert_eq!(mask.pixels().filter(|p| p[0] == 255).count(), 20);
    }

    #[test]
    fn degenerate_region_clears_mask() {
        let params = ParameterSet::default().with(Control::RegionHeight, 0);
        let region = RegionPx::from_params(&params, 10, 10);
        assert!(region.is_empty());
        let mut mask = GrayImage::from_pixel(10, 10, Luma([255]));
        apply(&mut mask, &region);
        assert!(mask.pixels().all(|p| p[0] == 0));
    }
}
