//! Beat detector boundary
//!
//! The estimator drives an onset/tempo primitive frame by frame and only
//! looks at what it reports after each frame. The command-line tool uses
//! aubio's tempo tracker; tests substitute scripted detectors.

mod aubio;

pub use aubio::{AubioFactory, AubioTempo};

use crate::config::AnalysisConfig;
use crate::error::Result;

/// Factory used by the command-line tool
pub type DefaultFactory = AubioFactory;

/// What the detector reports after consuming one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutput {
    /// Instantaneous tempo, 0.0 while undefined
    pub bpm: f32,

    /// Reliability of `bpm` in [0, 1]
    pub confidence: f32,

    /// A beat was triggered on this frame
    pub is_beat: bool,
}

/// A stateful tempo tracker fed one hop-sized block at a time
pub trait TempoDetector {
    /// Frames quieter than this (dB) must not trigger detections
    fn set_silence_threshold(&mut self, db: f32);

    /// Consume one block and report the current estimate
    fn process(&mut self, block: &[f32]) -> Result<FrameOutput>;
}

/// Builds a fresh detector for each analysis pass
pub trait DetectorFactory {
    type Detector: TempoDetector;

    /// `config.sample_rate` is always the resolved stream rate here
    fn create(&self, config: &AnalysisConfig) -> Result<Self::Detector>;

    /// Name of this backend (for logging)
    fn name(&self) -> &'static str;
}
