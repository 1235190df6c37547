use image::{ImageReader, RgbImage};
use std::io::Cursor;

/// A decoded camera frame with timestamp metadata.
///
/// Pixels are 8-bit RGB. The buffer is never mutated once decoded; pipeline
/// stages allocate their own working images.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
    pub captured_at_ms: i64,
    pub seq: u64,
}

impl Frame {
    pub fn new(image: RgbImage, captured_at_ms: i64, seq: u64) -> Self {
        Self {
            image,
            captured_at_ms,
            seq,
        }
    }

    /// Decode an encoded still image (JPEG, PNG, BMP, ...). The container
    /// format is guessed from the leading bytes.
    pub fn decode(data: &[u8], captured_at_ms: i64, seq: u64) -> Result<Self, FrameError> {
        if data.is_empty() {
            return Err(FrameError::Empty);
        }
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| FrameError::Decode(image::ImageError::IoError(e)))?
            .decode()
            .map_err(FrameError::Decode)?;
        Ok(Self::new(img.to_rgb8(), captured_at_ms, seq))
    }

    /// Generate a storage key for one of this frame's diagnostic images.
    pub fn diagnostic_key(&self, prefix: &str, kind: &str) -> String {
        let dt = chrono::DateTime::from_timestamp_millis(self.captured_at_ms)
            .unwrap_or_else(chrono::Utc::now);
        let date = dt.format("%Y-%m-%d");
        let ts = dt.format("%Y%m%dT%H%M%S%3fZ");
        format!("{prefix}{date}/{ts}_{seq:06}_{kind}.png", seq = self.seq)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame payload is empty")]
    Empty,
    #[error("failed to decode frame: {0}")]
    Decode(image::ImageError),
}
