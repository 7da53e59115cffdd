//! Multi-pass tempo estimation
//!
//! Each pass opens its own stream and detector, so passes share nothing and
//! a pass that cannot be set up is simply skipped.

use super::collector::ReadingCollector;
use super::correction::correct_bpm;
use super::result::{Estimate, PassReport};
use super::tally::{majority_vote, median, weighted_histogram};
use crate::config::{AnalysisConfig, EstimatorConfig, EstimatorMode};
use crate::detector::{DetectorFactory, TempoDetector};
use crate::error::{AnalysisError, Result};
use crate::io::{FrameFeeder, SampleSource, SourceOpener};
use rayon::prelude::*;

/// Runs the configured passes over one audio source and combines them
pub struct MultiPassEstimator<O, F> {
    opener: O,
    factory: F,
    config: EstimatorConfig,
}

impl<O, F> MultiPassEstimator<O, F>
where
    O: SourceOpener + Sync,
    F: DetectorFactory + Sync,
{
    pub fn new(opener: O, factory: F, config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            opener,
            factory,
            config,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Feed one configuration's frames through a fresh detector and aggregate.
    /// Stream and detector are dropped when this returns, on every path.
    pub fn run_pass(&self, pass: &AnalysisConfig) -> Result<PassReport> {
        let source = self.opener.open(pass.sample_rate, pass.hop_size)?;
        let resolved = pass.at_sample_rate(source.sample_rate());

        let mut detector = self.factory.create(&resolved)?;
        detector.set_silence_threshold(self.config.silence_db);

        let mut feeder =
            FrameFeeder::new(source, resolved.hop_size).with_time_cap(self.config.time_cap_secs);
        let mut collector = ReadingCollector::for_config(&self.config);

        let mut frames = 0;
        while let Some(frame) = feeder.next_frame() {
            let output = detector.process(frame.samples)?;
            collector.offer(frame.elapsed_secs, &output);
            frames += 1;
        }

        let readings = collector.into_readings();
        let result = match self.config.mode {
            EstimatorMode::Weighted => weighted_histogram(&readings).map(|bin| bin as f32),
            EstimatorMode::Median => {
                let bpms: Vec<f32> = readings.iter().map(|r| r.bpm).collect();
                median(&bpms)
            }
        };

        Ok(PassReport {
            config: resolved,
            frames,
            readings: readings.len(),
            result,
        })
    }

    /// Run every pass and reduce them to a single tempo
    pub fn estimate(&self) -> Result<Estimate> {
        let outcomes: Vec<Result<PassReport>> = if self.config.parallel {
            self.config
                .passes
                .par_iter()
                .map(|pass| self.run_pass(pass))
                .collect()
        } else {
            self.config
                .passes
                .iter()
                .map(|pass| self.run_pass(pass))
                .collect()
        };

        let mut passes = Vec::with_capacity(outcomes.len());
        let mut failed_passes = 0;
        for (pass, outcome) in self.config.passes.iter().zip(outcomes) {
            match outcome {
                Ok(report) => {
                    log::debug!(
                        "Pass {}/{} ({}): {} frames, {} readings, result {:?}",
                        pass.window_size,
                        pass.hop_size,
                        self.factory.name(),
                        report.frames,
                        report.readings,
                        report.result
                    );
                    passes.push(report);
                }
                Err(e) if e.is_pass_scoped() => {
                    log::warn!(
                        "Skipping pass {}/{}: {}",
                        pass.window_size,
                        pass.hop_size,
                        e
                    );
                    failed_passes += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let results: Vec<f32> = passes
            .iter()
            .filter_map(|report| report.result)
            .filter(|&bpm| bpm > 0.0)
            .collect();

        let (bpm, raw_bpm) = match self.config.mode {
            EstimatorMode::Weighted => {
                let raw = majority_vote(&results).ok_or(AnalysisError::NoEstimate)?;
                (correct_bpm(raw as f32), Some(raw))
            }
            EstimatorMode::Median => (median(&results).ok_or(AnalysisError::NoEstimate)?, None),
        };

        if bpm <= 0.0 {
            return Err(AnalysisError::NoEstimate);
        }

        log::info!(
            "Estimated {:.1} BPM from {} of {} passes (raw {:?})",
            bpm,
            results.len(),
            self.config.passes.len(),
            raw_bpm
        );

        Ok(Estimate {
            bpm,
            raw_bpm,
            mode: self.config.mode,
            passes,
            failed_passes,
        })
    }
}
