//! Hop-sized frame delivery with elapsed-time tracking

use super::SampleSource;

/// One block of samples and the stream time after it
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub samples: &'a [f32],
    /// Seconds of audio consumed, including this block
    pub elapsed_secs: f32,
}

/// Pulls fixed-size blocks from a source until it runs dry or a time cap is reached
///
/// A short read is delivered once, zero-padded to the hop size, and ends the
/// stream. The cap is checked before each pull, so the block that crosses it
/// is still delivered.
pub struct FrameFeeder<S: SampleSource> {
    source: S,
    block: Vec<f32>,
    consumed: u64,
    time_cap_secs: Option<f32>,
    finished: bool,
}

impl<S: SampleSource> FrameFeeder<S> {
    pub fn new(source: S, hop_size: usize) -> Self {
        Self {
            source,
            block: vec![0.0; hop_size],
            consumed: 0,
            time_cap_secs: None,
            finished: false,
        }
    }

    /// Stop after this many seconds of audio
    pub fn with_time_cap(mut self, cap_secs: Option<f32>) -> Self {
        self.time_cap_secs = cap_secs;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    pub fn elapsed_secs(&self) -> f32 {
        match self.source.sample_rate() {
            0 => 0.0,
            rate => (self.consumed as f64 / rate as f64) as f32,
        }
    }

    pub fn next_frame(&mut self) -> Option<Frame<'_>> {
        if self.finished || self.block.is_empty() {
            return None;
        }
        if let Some(cap) = self.time_cap_secs {
            if self.consumed > 0 && self.elapsed_secs() >= cap {
                log::trace!("Time cap of {:.1}s reached", cap);
                self.finished = true;
                return None;
            }
        }

        let read = self.source.read_block(&mut self.block);
        if read == 0 {
            self.finished = true;
            return None;
        }
        if read < self.block.len() {
            self.block[read..].fill(0.0);
            self.finished = true;
        }
        self.consumed += read as u64;

        let elapsed_secs = self.elapsed_secs();
        Some(Frame {
            samples: &self.block,
            elapsed_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{MemoryOpener, SourceOpener};

    fn feeder(len: usize, rate: u32, hop: usize) -> FrameFeeder<crate::io::MemorySource> {
        let source = MemoryOpener::new(vec![0.5; len], rate).open(0, hop).unwrap();
        FrameFeeder::new(source, hop)
    }

    #[test]
    fn test_short_read_is_padded_and_ends_stream() {
        let mut feeder = feeder(10, 4, 4);

        let mut elapsed = Vec::new();
        while let Some(frame) = feeder.next_frame() {
            assert_eq!(frame.samples.len(), 4);
            elapsed.push(frame.elapsed_secs);
            if elapsed.len() == 3 {
                assert_eq!(frame.samples, &[0.5f32, 0.5, 0.0, 0.0][..]);
            }
        }
        assert_eq!(elapsed, vec![1.0, 2.0, 2.5]);
        assert!(feeder.next_frame().is_none());
    }

    #[test]
    fn test_exact_multiple_ends_on_empty_read() {
        let mut feeder = feeder(8, 4, 4);
        let mut count = 0;
        while feeder.next_frame().is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
        assert_eq!(feeder.elapsed_secs(), 2.0);
    }

    #[test]
    fn test_time_cap_lets_crossing_block_through() {
        // 1 block = 0.75s; cap 2.0s => blocks end at 0.75, 1.5, 2.25
        let mut feeder = feeder(100, 4, 3).with_time_cap(Some(2.0));
        let mut last = 0.0;
        let mut count = 0;
        while let Some(frame) = feeder.next_frame() {
            last = frame.elapsed_secs;
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(last, 2.25);
    }
}
