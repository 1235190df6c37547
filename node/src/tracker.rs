use ball_tracker_common::frame::{Frame, FrameError};
use ball_tracker_detector::{run_with, Candidate, ParameterSource};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::output::DiagnosticsWriter;
use crate::source::{DirectorySource, RawFrame};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub frames: u64,
    pub detections: u64,
    pub skipped: u64,
}

/// Decode one frame, run the detector and write diagnostics if enabled.
pub fn process_frame<S: ParameterSource + ?Sized>(
    params: &S,
    raw: &RawFrame,
    writer: Option<&DiagnosticsWriter>,
) -> Result<Candidate, FrameError> {
    let frame = Frame::decode(&raw.bytes, raw.captured_at_ms, raw.seq)?;
    let detection = run_with(params, &frame.image);

    if let (Some(writer), Some(images)) = (writer, detection.diagnostics.as_ref()) {
        if let Err(e) = writer.write(&frame, images) {
            warn!(error = %e, seq = frame.seq, "failed to write diagnostics");
        }
    }
    Ok(detection.candidate)
}

/// Pull frames until the source is exhausted, pacing to one per `period`.
pub async fn run_loop<S: ParameterSource + ?Sized>(
    params: &S,
    frames: &mut DirectorySource,
    writer: Option<&DiagnosticsWriter>,
    period: Duration,
) -> Stats {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stats = Stats::default();

    while let Some(next) = frames.next_frame().await {
        ticker.tick().await;

        let raw = match next {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to read frame, skipping");
                stats.skipped += 1;
                continue;
            }
        };
        stats.frames += 1;

        match process_frame(params, &raw, writer) {
            Ok(c) if c.is_detection() => {
                stats.detections += 1;
                info!(seq = raw.seq, x = c.x, y = c.y, size = c.size, "ball detected");
            }
            Ok(_) => debug!(seq = raw.seq, "no ball"),
            Err(e) => {
                stats.skipped += 1;
                warn!(error = %e, path = %raw.path.display(), "failed to decode frame, skipping");
            }
        }

        if stats.frames % 100 == 0 {
            debug!(
                frames = stats.frames,
                detections = stats.detections,
                source = params.name(),
                "frames processed"
            );
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use ball_tracker_common::params::{Control, ParameterSet};
    use ball_tracker_detector::StaticParameters;
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_filled_circle_mut;

    fn orange_params() -> ParameterSet {
        ParameterSet::default()
            .with(Control::HueMin, 5)
            .with(Control::HueMax, 25)
            .with(Control::SatMin, 150)
            .with(Control::ValMin, 150)
    }

    fn write_frame(path: &std::path::Path, with_ball: bool) {
        let mut img = RgbImage::from_pixel(160, 120, Rgb([90, 90, 90]));
        if with_ball {
            draw_filled_circle_mut(&mut img, (80, 60), 15, Rgb([255, 120, 0]));
        }
        img.save(path).unwrap();
    }

    #[tokio::test]
    async fn counts_detections_and_skips_bad_frames() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(&dir.path().join("001.png"), true);
        write_frame(&dir.path().join("002.png"), false);
        std::fs::write(dir.path().join("003.png"), b"not an image").unwrap();

        let mut frames = DirectorySource::open(dir.path(), false).await.unwrap();
        let params = StaticParameters::new(orange_params());
        let stats = run_loop(&params, &mut frames, None, Duration::from_millis(1)).await;

        assert_eq!(
            stats,
            Stats {
                frames: 3,
                detections: 1,
                skipped: 1
            }
        );
    }

    #[tokio::test]
    async fn writes_diagnostics_when_enabled() {
        let frames_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        write_frame(&frames_dir.path().join("a.png"), true);

        let mut frames = DirectorySource::open(frames_dir.path(), false).await.unwrap();
        let writer = DiagnosticsWriter::new(out_dir.path().to_path_buf(), "ball/".into());
        let params = StaticParameters::new(orange_params());
        run_loop(&params, &mut frames, Some(&writer), Duration::from_millis(1)).await;

        let day_dir = std::fs::read_dir(out_dir.path().join("ball"))
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        let mut names: Vec<String> = std::fs::read_dir(day_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("_000001_out.png"));
        assert!(names[1].ends_with("_000001_tuning.png"));
    }

    #[test]
    fn process_frame_rejects_undecodable_bytes() {
        let raw = RawFrame {
            path: "x.png".into(),
            bytes: Vec::new(),
            captured_at_ms: 0,
            seq: 1,
        };
        let params = StaticParameters::new(ParameterSet::default());
        assert!(matches!(
            process_frame(&params, &raw, None),
            Err(FrameError::Empty)
        ));
    }
}
