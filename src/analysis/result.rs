//! Estimate and per-pass report types

use crate::config::{AnalysisConfig, EstimatorMode};

/// What one analysis pass produced
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    /// Pass parameters with the stream's actual sample rate
    pub config: AnalysisConfig,

    /// Frames fed to the detector
    pub frames: usize,

    /// Readings that survived warm-up and filtering
    pub readings: usize,

    /// Aggregated BPM (None if no reading survived)
    pub result: Option<f32>,
}

/// Final tempo estimate for one file
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Reported tempo
    pub bpm: f32,

    /// Most common raw pass result before octave correction (weighted mode)
    pub raw_bpm: Option<i32>,

    pub mode: EstimatorMode,

    /// Passes that ran to completion, in configuration order
    pub passes: Vec<PassReport>,

    /// Passes skipped because the stream or detector could not be set up
    pub failed_passes: usize,
}

impl Estimate {
    /// The line printed by the command-line tool
    pub fn display_line(&self) -> String {
        match self.mode {
            EstimatorMode::Weighted => format!("BPM: {:.0}", self.bpm),
            EstimatorMode::Median => format!("Estimated BPM: {:.2}", self.bpm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(bpm: f32, mode: EstimatorMode) -> Estimate {
        Estimate {
            bpm,
            raw_bpm: None,
            mode,
            passes: Vec::new(),
            failed_passes: 0,
        }
    }

    #[test]
    fn test_display_lines() {
        assert_eq!(estimate(132.0, EstimatorMode::Weighted).display_line(), "BPM: 132");
        assert_eq!(estimate(52.8, EstimatorMode::Weighted).display_line(), "BPM: 53");
        assert_eq!(
            estimate(119.456, EstimatorMode::Median).display_line(),
            "Estimated BPM: 119.46"
        );
    }
}
