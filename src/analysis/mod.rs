//! Tempo estimation core
//!
//! Frames from the audio layer go through a detector, the collector keeps
//! the trustworthy readings, each pass is reduced to one BPM, and the
//! passes are combined (and octave-corrected) into the final estimate.

pub mod collector;
pub mod correction;
mod estimator;
mod result;
pub mod tally;

pub use collector::{Reading, ReadingCollector, ReadingFilter};
pub use correction::correct_bpm;
pub use estimator::MultiPassEstimator;
pub use result::{Estimate, PassReport};

use crate::config::EstimatorConfig;
use crate::detector::DefaultFactory;
use crate::error::Result;
use crate::io::SymphoniaOpener;
use std::path::Path;

/// Estimate the tempo of an audio file with the default detector backend
pub fn estimate_file(path: &Path, config: EstimatorConfig) -> Result<Estimate> {
    log::debug!("Estimating tempo for: {:?}", path);
    let estimator =
        MultiPassEstimator::new(SymphoniaOpener::new(path), DefaultFactory::default(), config)?;
    estimator.estimate()
}
