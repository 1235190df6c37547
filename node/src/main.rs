mod output;
mod source;
mod tracker;
mod tuning_input;

use ball_tracker_common::config::Config;
use ball_tracker_detector::{LiveTuning, StaticParameters};
use output::DiagnosticsWriter;
use source::DirectorySource;
use std::path::PathBuf;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.parse().unwrap_or_default()),
        )
        .init();

    let params = config.tracker.params;
    info!(
        input_dir = %config.source.input_dir.display(),
        fps = config.source.fps,
        repeat = config.source.repeat,
        tuning_mode = config.tracker.tuning_mode,
        hue = format!("{}..={}", params.hue_min, params.hue_max),
        sat = format!("{}..={}", params.sat_min, params.sat_max),
        val = format!("{}..={}", params.val_min, params.val_max),
        size = format!("{}..{}", params.size_min, params.size_max),
        diagnostics = config.diagnostics.output_dir.is_some(),
        "starting ball tracker"
    );

    let opened = DirectorySource::open(&config.source.input_dir, config.source.repeat).await;
    let mut frames = match opened {
        Ok(f) => f,
        Err(e) => {
            error!(error = %e, "failed to open frame source");
            std::process::exit(1);
        }
    };

    let writer = config
        .diagnostics
        .output_dir
        .clone()
        .map(|dir| DiagnosticsWriter::new(dir, config.diagnostics.prefix.clone()));
    let period = match config.source.frame_period() {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "invalid frame rate");
            std::process::exit(1);
        }
    };

    let tuning_mode = config.tracker.tuning_mode;
    let stats = if tuning_mode {
        let live = LiveTuning::new(params);
        tokio::spawn(tuning_input::run(live.handle(), params));
        tracker::run_loop(&live, &mut frames, writer.as_ref(), period).await
    } else {
        let fixed = StaticParameters::new(params);
        tracker::run_loop(&fixed, &mut frames, writer.as_ref(), period).await
    };

    info!(
        frames = stats.frames,
        detections = stats.detections,
        skipped = stats.skipped,
        "frame source exhausted, shutting down"
    );

    // A pending stdin read would keep the runtime from shutting down.
    if tuning_mode {
        std::process::exit(0);
    }
}
