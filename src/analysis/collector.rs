//! Per-pass reading collection
//!
//! Detectors need a few seconds of audio before their output means
//! anything, and report junk values on frames they are unsure about. The
//! collector drops both before anything is aggregated.

use crate::config::{EstimatorConfig, EstimatorMode};
use crate::detector::FrameOutput;

/// One accepted detector reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub bpm: f32,
    pub confidence: f32,
}

/// Validity rule applied after the warm-up period
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadingFilter {
    /// Keep positive BPMs whose confidence exceeds `min_confidence`
    Confidence { min_confidence: f32 },

    /// Keep positive BPMs in `[min_bpm, max_bpm]` on frames where a beat fired
    BeatInRange { min_bpm: f32, max_bpm: f32 },
}

impl ReadingFilter {
    pub fn accepts(&self, output: &FrameOutput) -> bool {
        if output.bpm <= 0.0 {
            return false;
        }
        match *self {
            ReadingFilter::Confidence { min_confidence } => output.confidence > min_confidence,
            ReadingFilter::BeatInRange { min_bpm, max_bpm } => {
                output.is_beat && output.bpm >= min_bpm && output.bpm <= max_bpm
            }
        }
    }
}

/// Accumulates the readings of a single analysis pass
#[derive(Debug, Clone)]
pub struct ReadingCollector {
    warmup_secs: f32,
    filter: ReadingFilter,
    readings: Vec<Reading>,
}

impl ReadingCollector {
    pub fn new(warmup_secs: f32, filter: ReadingFilter) -> Self {
        Self {
            warmup_secs,
            filter,
            readings: Vec::new(),
        }
    }

    /// Warm-up and filter matching the configured estimator design
    pub fn for_config(config: &EstimatorConfig) -> Self {
        let filter = match config.mode {
            EstimatorMode::Weighted => ReadingFilter::Confidence {
                min_confidence: config.min_confidence,
            },
            EstimatorMode::Median => ReadingFilter::BeatInRange {
                min_bpm: config.beat_bpm_range.0,
                max_bpm: config.beat_bpm_range.1,
            },
        };
        Self::new(config.warmup_secs, filter)
    }

    /// Offer the detector output for the frame ending at `elapsed_secs`.
    /// Returns whether it was kept.
    pub fn offer(&mut self, elapsed_secs: f32, output: &FrameOutput) -> bool {
        if elapsed_secs <= self.warmup_secs || !self.filter.accepts(output) {
            return false;
        }
        self.readings.push(Reading {
            bpm: output.bpm,
            confidence: output.confidence,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }
}
