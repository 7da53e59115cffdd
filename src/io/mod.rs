//! Audio input layer
//!
//! The analysis core never touches a file directly. It asks a
//! [`SourceOpener`] for a fresh [`SampleSource`] at the start of every pass
//! and reads hop-sized blocks from it through a [`FrameFeeder`].

mod decoder;
mod feeder;
mod memory;

pub use decoder::{SymphoniaOpener, SymphoniaSource};
pub use feeder::{Frame, FrameFeeder};
pub use memory::{MemoryOpener, MemorySource};

use crate::error::Result;

/// A finite, forward-only stream of mono samples
pub trait SampleSource {
    /// Sample rate of the delivered samples in Hz
    fn sample_rate(&self) -> u32;

    /// Fill `out` with the next samples and return how many were written.
    /// Fewer than `out.len()` means the stream has ended.
    fn read_block(&mut self, out: &mut [f32]) -> usize;
}

/// Opens a new stream over the same audio for each analysis pass
pub trait SourceOpener {
    type Source: SampleSource;

    /// Open the audio at `sample_rate` (0 = native rate), to be read in
    /// blocks of `hop_size` samples
    fn open(&self, sample_rate: u32, hop_size: usize) -> Result<Self::Source>;
}
