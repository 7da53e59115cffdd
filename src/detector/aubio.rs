//! Tempo detection with aubio's tempo tracker

use super::{DetectorFactory, FrameOutput, TempoDetector};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use aubio_rs::{OnsetMode, Tempo};

/// Builds aubio tempo trackers on spectral-flux onsets (aubio's "default" tempo method)
#[derive(Debug, Clone, Copy, Default)]
pub struct AubioFactory;

impl DetectorFactory for AubioFactory {
    type Detector = AubioTempo;

    fn create(&self, config: &AnalysisConfig) -> Result<AubioTempo> {
        let construction_error = |reason: String| AnalysisError::DetectorConstruction {
            window_size: config.window_size,
            hop_size: config.hop_size,
            sample_rate: config.sample_rate,
            reason,
        };

        // aubio asserts on these rather than failing cleanly
        if config.hop_size == 0 || config.window_size < config.hop_size || config.sample_rate == 0 {
            return Err(construction_error("invalid window/hop/rate".to_string()));
        }

        let tempo = Tempo::new(
            OnsetMode::SpecFlux,
            config.window_size,
            config.hop_size,
            config.sample_rate,
        )
        .map_err(|e| construction_error(format!("{:?}", e)))?;

        Ok(AubioTempo {
            tempo,
            hop_size: config.hop_size,
        })
    }

    fn name(&self) -> &'static str {
        "aubio"
    }
}

/// aubio `Tempo` behind the detector interface
pub struct AubioTempo {
    tempo: Tempo,
    hop_size: usize,
}

impl TempoDetector for AubioTempo {
    fn set_silence_threshold(&mut self, db: f32) {
        self.tempo.set_silence(db);
    }

    fn process(&mut self, block: &[f32]) -> Result<FrameOutput> {
        // aubio expects exactly hop_size samples
        if block.len() != self.hop_size {
            return Err(AnalysisError::Detection(format!(
                "expected {} samples, got {}",
                self.hop_size,
                block.len()
            )));
        }

        let beat = self
            .tempo
            .do_result(block)
            .map_err(|e| AnalysisError::Detection(format!("{:?}", e)))?;

        Ok(FrameOutput {
            bpm: self.tempo.get_bpm(),
            confidence: self.tempo.get_confidence(),
            is_beat: beat > 0.0,
        })
    }
}
