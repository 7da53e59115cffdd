//! BPM Analyzer - tempo estimation for audio files
//!
//! Decodes an audio file, tracks its tempo under several window/hop
//! configurations, and votes the per-pass results into a single
//! octave-corrected BPM.

pub mod analysis;
pub mod config;
pub mod detector;
pub mod error;
pub mod io;

pub use analysis::{estimate_file, Estimate, MultiPassEstimator, PassReport};
pub use config::{AnalysisConfig, EstimatorConfig, EstimatorMode};
pub use error::{AnalysisError, Result};
