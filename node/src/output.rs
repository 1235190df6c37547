use ball_tracker_common::frame::Frame;
use ball_tracker_detector::DiagnosticImages;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create directory {0}: {1}")]
    CreateDir(String, std::io::Error),
    #[error("failed to write {0}: {1}")]
    Save(String, image::ImageError),
}

/// Writes the two diagnostic images of each frame as PNG files.
pub struct DiagnosticsWriter {
    root: PathBuf,
    prefix: String,
}

impl DiagnosticsWriter {
    pub fn new(root: PathBuf, prefix: String) -> Self {
        Self { root, prefix }
    }

    /// Returns the paths written, annotated frame first.
    pub fn write(
        &self,
        frame: &Frame,
        images: &DiagnosticImages,
    ) -> Result<[PathBuf; 2], OutputError> {
        let out = self.root.join(frame.diagnostic_key(&self.prefix, "out"));
        let tuning = self.root.join(frame.diagnostic_key(&self.prefix, "tuning"));

        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::CreateDir(parent.display().to_string(), e))?;
        }
        images
            .annotated
            .save(&out)
            .map_err(|e| OutputError::Save(out.display().to_string(), e))?;
        images
            .tuning
            .save(&tuning)
            .map_err(|e| OutputError::Save(tuning.display().to_string(), e))?;

        debug!(out = %out.display(), tuning = %tuning.display(), "diagnostics written");
        Ok([out, tuning])
    }
}
