//! In-memory sample streams
//!
//! For audio that is already decoded (or synthesized) mono PCM.

use super::{SampleSource, SourceOpener};
use crate::error::{AnalysisError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Hands out independent cursors over one shared sample buffer
#[derive(Debug, Clone)]
pub struct MemoryOpener {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl MemoryOpener {
    pub fn new(samples: impl Into<Arc<[f32]>>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

impl SourceOpener for MemoryOpener {
    type Source = MemorySource;

    fn open(&self, sample_rate: u32, _hop_size: usize) -> Result<MemorySource> {
        let mismatched = sample_rate != 0 && sample_rate != self.sample_rate;
        if self.sample_rate == 0 || mismatched {
            return Err(AnalysisError::StreamOpen {
                path: PathBuf::from("<memory>"),
                reason: format!(
                    "buffer is {} Hz, {} Hz requested",
                    self.sample_rate, sample_rate
                ),
            });
        }
        Ok(MemorySource {
            samples: Arc::clone(&self.samples),
            sample_rate: self.sample_rate,
            position: 0,
        })
    }
}

/// Forward-only cursor over a shared sample buffer
#[derive(Debug)]
pub struct MemorySource {
    samples: Arc<[f32]>,
    sample_rate: u32,
    position: usize,
}

impl SampleSource for MemorySource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_block(&mut self, out: &mut [f32]) -> usize {
        let remaining = &self.samples[self.position..];
        let n = out.len().min(remaining.len());
        out[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        n
    }
}
