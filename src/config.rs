//! Analysis configuration

use crate::error::{AnalysisError, Result};

/// Window/hop pairs tried by the multi-pass estimator, in voting order
pub const DEFAULT_PASSES: [(usize, usize); 5] = [
    (1024, 512),
    (2048, 512),
    (1024, 256),
    (2048, 1024),
    (4096, 1024),
];

/// Silence gate handed to every detector before its first frame
pub const DEFAULT_SILENCE_DB: f32 = -50.0;

/// Parameters of a single analysis pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Samples analyzed per detector update
    pub window_size: usize,

    /// New samples consumed between detector updates
    pub hop_size: usize,

    /// Sample rate in Hz (0 = use the stream's native rate)
    pub sample_rate: u32,
}

impl AnalysisConfig {
    /// Create a config that follows the stream's native sample rate
    pub fn new(window_size: usize, hop_size: usize) -> Self {
        Self {
            window_size,
            hop_size,
            sample_rate: 0,
        }
    }

    /// Same window and hop, pinned to a concrete sample rate
    pub fn at_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "window and hop must be positive (got {}/{})",
                self.window_size, self.hop_size
            )));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new(1024, 512)
    }
}

/// Which of the two estimation designs to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorMode {
    /// Confidence-weighted histograms, cross-pass vote, octave correction
    Weighted,

    /// Median of beat-flagged readings, no correction
    Median,
}

/// Configuration for a full tempo estimate
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    pub mode: EstimatorMode,

    /// Passes to run, in order
    pub passes: Vec<AnalysisConfig>,

    /// Readings before this many seconds are discarded
    pub warmup_secs: f32,

    /// Stop feeding frames after this many seconds (None = whole file)
    pub time_cap_secs: Option<f32>,

    /// Readings at or below this confidence are discarded (weighted mode)
    pub min_confidence: f32,

    /// Accepted BPM range for beat-flagged readings (median mode)
    pub beat_bpm_range: (f32, f32),

    /// Silence threshold in dB
    pub silence_db: f32,

    /// Run passes on the rayon pool
    pub parallel: bool,
}

impl EstimatorConfig {
    /// Multi-pass weighted-histogram design with octave correction
    pub fn weighted() -> Self {
        Self {
            mode: EstimatorMode::Weighted,
            passes: DEFAULT_PASSES
                .iter()
                .map(|&(window, hop)| AnalysisConfig::new(window, hop))
                .collect(),
            warmup_secs: 3.0,
            time_cap_secs: Some(45.0),
            min_confidence: 0.05,
            beat_bpm_range: (40.0, 200.0),
            silence_db: DEFAULT_SILENCE_DB,
            parallel: false,
        }
    }

    /// Single-pass median design
    pub fn median() -> Self {
        Self {
            mode: EstimatorMode::Median,
            passes: vec![AnalysisConfig::default()],
            warmup_secs: 5.0,
            time_cap_secs: None,
            ..Self::weighted()
        }
    }

    /// Replace the pass list
    pub fn with_passes(mut self, passes: Vec<AnalysisConfig>) -> Self {
        self.passes = passes;
        self
    }

    /// Set or clear the elapsed-time cap
    pub fn with_time_cap(mut self, secs: Option<f32>) -> Self {
        self.time_cap_secs = secs;
        self
    }

    /// Enable parallel passes
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.passes.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "at least one analysis pass is required".to_string(),
            ));
        }
        for pass in &self.passes {
            pass.validate()?;
        }
        let (lo, hi) = self.beat_bpm_range;
        if !(lo > 0.0 && lo <= hi) {
            return Err(AnalysisError::InvalidConfig(format!(
                "beat BPM range [{}, {}] is empty",
                lo, hi
            )));
        }
        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::weighted()
    }
}
