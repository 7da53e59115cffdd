//! Streaming audio decoding with symphonia
//!
//! Packets are decoded lazily and downmixed to mono, so a capped pass only
//! decodes as much of the file as it actually reads.

use super::{SampleSource, SourceOpener};
use crate::error::{AnalysisError, Result};
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Opens audio files through symphonia's default probe and codec registry
#[derive(Debug, Clone)]
pub struct SymphoniaOpener {
    path: PathBuf,
}

impl SymphoniaOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_error(&self, reason: impl ToString) -> AnalysisError {
        AnalysisError::StreamOpen {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl SourceOpener for SymphoniaOpener {
    type Source = SymphoniaSource;

    fn open(&self, sample_rate: u32, hop_size: usize) -> Result<SymphoniaSource> {
        let file = std::fs::File::open(&self.path).map_err(|e| self.open_error(e))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = self.path.extension() {
            hint.with_extension(ext.to_str().unwrap_or(""));
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| self.open_error(format!("failed to probe audio format: {}", e)))?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| self.open_error("no audio track found"))?;

        let track_id = track.id;
        let native_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| self.open_error("no sample rate in audio track"))?;

        if sample_rate != 0 && sample_rate != native_rate {
            return Err(self.open_error(format!(
                "stream is {} Hz, {} Hz requested and resampling is not supported",
                native_rate, sample_rate
            )));
        }

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| self.open_error(format!("failed to create audio decoder: {}", e)))?;

        log::debug!(
            "Opened {:?}: {} Hz, track {}",
            self.path,
            native_rate,
            track_id
        );

        Ok(SymphoniaSource {
            format,
            decoder,
            track_id,
            sample_rate: native_rate,
            pending: Vec::with_capacity(hop_size.max(4096)),
            cursor: 0,
            exhausted: false,
        })
    }
}

/// Mono sample stream over one decoded audio track
pub struct SymphoniaSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    pending: Vec<f32>,
    cursor: usize,
    exhausted: bool,
}

impl SymphoniaSource {
    /// Decode the next packet of our track into `pending`.
    /// Returns false once the stream has nothing more to give.
    fn refill(&mut self) -> bool {
        while !self.exhausted {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.exhausted = true;
                    break;
                }
                Err(e) => {
                    log::warn!("Error reading packet: {:?}", e);
                    self.exhausted = true;
                    break;
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(e) => {
                    log::warn!("Error decoding packet: {:?}", e);
                    continue;
                }
            };

            let spec = *decoded.spec();
            let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            let samples = sample_buf.samples();
            let channels = spec.channels.count().max(1);

            self.pending.clear();
            self.cursor = 0;
            if channels > 1 {
                self.pending.extend(
                    samples
                        .chunks(channels)
                        .map(|frame| frame.iter().sum::<f32>() / channels as f32),
                );
            } else {
                self.pending.extend_from_slice(samples);
            }

            if !self.pending.is_empty() {
                return true;
            }
        }
        false
    }
}

impl SampleSource for SymphoniaSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_block(&mut self, out: &mut [f32]) -> usize {
        let mut written = 0;
        while written < out.len() {
            if self.cursor >= self.pending.len() && !self.refill() {
                break;
            }
            let n = (out.len() - written).min(self.pending.len() - self.cursor);
            out[written..written + n].copy_from_slice(&self.pending[self.cursor..self.cursor + n]);
            written += n;
            self.cursor += n;
        }
        written
    }
}
