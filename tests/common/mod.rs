#![allow(dead_code)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const SR: u32 = 44100;

/// Mono click track: a short decaying click at every beat
pub fn click_track(bpm: f32, seconds: f32, sr: u32) -> Vec<f32> {
    let n = (seconds * sr as f32) as usize;
    let period = 60.0 * sr as f64 / bpm as f64;
    let mut out = vec![0.0f32; n];

    let mut beat = 0usize;
    loop {
        let start = (beat as f64 * period).round() as usize;
        if start >= n {
            break;
        }
        for (i, sample) in out[start..].iter_mut().take(64).enumerate() {
            *sample = 0.9 * (-(i as f32) / 12.0).exp();
        }
        beat += 1;
    }
    out
}

/// Write interleaved 16-bit PCM, duplicating mono input across `channels`
pub fn write_wav_16bit(path: &Path, samples: &[f32], sr: u32, channels: u16) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let data_len = samples.len() as u32 * 2 * channels as u32;
    let block_align = 2 * channels;

    w.write_all(b"RIFF")?;
    w.write_all(&(36 + data_len).to_le_bytes())?;
    w.write_all(b"WAVE")?;

    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?;
    w.write_all(&channels.to_le_bytes())?;
    w.write_all(&sr.to_le_bytes())?;
    w.write_all(&(sr * block_align as u32).to_le_bytes())?;
    w.write_all(&block_align.to_le_bytes())?;
    w.write_all(&16u16.to_le_bytes())?;

    w.write_all(b"data")?;
    w.write_all(&data_len.to_le_bytes())?;
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            w.write_all(&v.to_le_bytes())?;
        }
    }
    w.flush()
}
