use std::path::{Path, PathBuf};
use tracing::{debug, info};

const EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Encoded frame bytes as read from disk, not yet decoded.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub captured_at_ms: i64,
    pub seq: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to list frame directory {0}: {1}")]
    List(String, std::io::Error),
    #[error("failed to read frame {0}: {1}")]
    Read(String, std::io::Error),
}

/// Replays the still images of a directory in file-name order.
pub struct DirectorySource {
    dir: PathBuf,
    repeat: bool,
    files: Vec<PathBuf>,
    next: usize,
    seq: u64,
}

impl DirectorySource {
    pub async fn open(dir: &Path, repeat: bool) -> Result<Self, SourceError> {
        let files = list_frames(dir).await?;
        info!(dir = %dir.display(), frames = files.len(), repeat, "opened frame directory");
        Ok(Self {
            dir: dir.to_path_buf(),
            repeat,
            files,
            next: 0,
            seq: 0,
        })
    }

    /// Next frame, or `None` once the directory is exhausted. With `repeat`
    /// the directory is listed again at the end, picking up new files.
    pub async fn next_frame(&mut self) -> Option<Result<RawFrame, SourceError>> {
        if self.next >= self.files.len() {
            if !self.repeat {
                return None;
            }
            match list_frames(&self.dir).await {
                Ok(files) if !files.is_empty() => {
                    debug!(frames = files.len(), "restarting frame directory");
                    self.files = files;
                    self.next = 0;
                }
                Ok(_) => return None,
                Err(e) => return Some(Err(e)),
            }
        }

        let path = self.files[self.next].clone();
        self.next += 1;
        self.seq += 1;

        Some(match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(RawFrame {
                path,
                bytes,
                captured_at_ms: chrono::Utc::now().timestamp_millis(),
                seq: self.seq,
            }),
            Err(e) => Err(SourceError::Read(path.display().to_string(), e)),
        })
    }
}

async fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let list_err = |e| SourceError::List(dir.display().to_string(), e);
    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let path = entry.path();
        if path.is_file() && has_frame_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
