//! Codec seam between stored sample bytes and float PCM.
//!
//! The device only talks to [`Codec`]. The uncompressed size carried in a chunk always
//! refers to 16-bit PCM, so a codec fills `uncompressed_size / 2` frames regardless of how
//! the payload itself is encoded. Codecs do not resample; the decoded buffer keeps the
//! source rate declared in the wave format.

use alloc::vec::Vec;

use crate::error::CodecError;
use crate::thunder::chunk::{WaveFormat, WAVE_FORMAT_IEEE_FLOAT, WAVE_FORMAT_PCM};

/// Bytes per frame of the decoded intermediate representation.
pub const DECODED_BYTES_PER_SAMPLE: usize = 2;

/// A sample ready to be stored in a chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSample {
    pub format: WaveFormat,
    pub format_extra: Vec<u8>,
    pub compressed: Vec<u8>,
    pub uncompressed_size: usize,
}

pub trait Codec: Send + Sync {
    /// Decodes `compressed` into `out`, returning the number of frames written.
    fn decode(
        &self,
        compressed: &[u8],
        format: &WaveFormat,
        out: &mut [f32],
    ) -> Result<usize, CodecError>;

    /// Encodes mono float PCM recorded at `sample_rate`.
    fn encode(&self, pcm: &[f32], sample_rate: u32) -> Result<EncodedSample, CodecError>;
}

/// Uncompressed integer and float PCM.
///
/// Decodes 8-bit unsigned, 16-bit signed and 32-bit float payloads, reading the first
/// channel of each frame. Encodes to 16-bit signed mono.
#[derive(Debug, Default, Clone, Copy)]
pub struct PcmCodec;

impl PcmCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for PcmCodec {
    fn decode(
        &self,
        compressed: &[u8],
        format: &WaveFormat,
        out: &mut [f32],
    ) -> Result<usize, CodecError> {
        let bits = format.bits_per_sample;
        let read: fn(&[u8]) -> f32 = match (format.format_tag, bits) {
            (WAVE_FORMAT_PCM, 8) => read_u8,
            (WAVE_FORMAT_PCM, 16) => read_i16,
            (WAVE_FORMAT_IEEE_FLOAT, 32) => read_f32,
            (tag, bits) => return Err(CodecError::UnsupportedFormat { tag, bits }),
        };

        let block_align = format.block_align as usize;
        let expected_align = format.channels as usize * (bits as usize / 8);
        if block_align == 0 || block_align != expected_align {
            return Err(CodecError::BadBlockAlign {
                block_align: format.block_align,
                channels: format.channels,
                bits,
            });
        }

        let frames = compressed.len() / block_align;
        if frames * block_align != compressed.len() || frames != out.len() {
            return Err(CodecError::SizeMismatch {
                expected: out.len(),
                actual: frames,
            });
        }

        for (frame, sample) in compressed.chunks_exact(block_align).zip(out.iter_mut()) {
            *sample = read(frame);
        }

        Ok(frames)
    }

    fn encode(&self, pcm: &[f32], sample_rate: u32) -> Result<EncodedSample, CodecError> {
        if pcm.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let compressed: Vec<u8> = pcm
            .iter()
            .flat_map(|sample| {
                let value = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                value.to_le_bytes()
            })
            .collect();

        Ok(EncodedSample {
            format: WaveFormat::pcm_mono_16(sample_rate),
            format_extra: Vec::new(),
            uncompressed_size: pcm.len() * DECODED_BYTES_PER_SAMPLE,
            compressed,
        })
    }
}

#[inline]
fn read_u8(frame: &[u8]) -> f32 {
    (frame[0] as f32 - 128.0) / 128.0
}

#[inline]
fn read_i16(frame: &[u8]) -> f32 {
    i16::from_le_bytes([frame[0], frame[1]]) as f32 / 32768.0
}

#[inline]
fn read_f32(frame: &[u8]) -> f32 {
    f32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]])
}
