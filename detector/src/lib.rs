//! Single-ball detection: colour threshold, clean-up, search window, blob
//! sweep, size filter, normalisation and selection, plus operator diagnostics.

pub mod blob;
pub mod diagnostics;
pub mod morphology;
pub mod normalize;
pub mod pipeline;
pub mod preprocess;
pub mod region;
pub mod select;
pub mod size;
pub mod source;

pub use blob::Keypoint;
pub use diagnostics::DiagnosticImages;
pub use normalize::Candidate;
pub use pipeline::{run, run_with, Detection};
pub use source::{LiveTuning, ParameterSource, StaticParameters, TuningHandle};
