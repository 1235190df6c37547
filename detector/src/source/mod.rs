pub mod tuning;

use ball_tracker_common::params::ParameterSet;

pub use tuning::{LiveTuning, TuningHandle};

/// Read side of a parameter provider.
///
/// Implementations hand out an immutable snapshot; the pipeline reads it once
/// per frame and never validates it again.
pub trait ParameterSource: Send + Sync {
    fn snapshot(&self) -> ParameterSet;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Parameters fixed at startup, typically from the configuration file.
#[derive(Debug, Clone, Copy)]
pub struct StaticParameters {
    params: ParameterSet,
}

impl StaticParameters {
    pub fn new(params: ParameterSet) -> Self {
        Self { params }
    }
}

impl ParameterSource for StaticParameters {
    fn snapshot(&self) -> ParameterSet {
        self.params
    }

    fn name(&self) -> &str {
        "static"
    }
}
