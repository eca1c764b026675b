//! Host chunk layout.
//!
//! ```text
//! [ wave format header: 18 bytes + extra_size extension bytes ]
//! [ compressed_size:   i32, little endian ]
//! [ uncompressed_size: i32, little endian ]
//! [ compressed payload: compressed_size bytes ]
//! ```
//!
//! The chunk comes from preset and project files, so every length is checked before it is
//! used to slice.

use alloc::vec::Vec;

use crate::error::{ChunkError, ChunkResult};

/// Size of the packed wave format header without its extension bytes.
pub const WAVE_FORMAT_SIZE: usize = 18;

const SIZE_FIELDS: usize = 2 * core::mem::size_of::<i32>();

/// Integer PCM format tag.
pub const WAVE_FORMAT_PCM: u16 = 0x0001;
/// 32-bit float PCM format tag.
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;

/// Packed wave format header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormat {
    pub format_tag: u16,
    pub channels: u16,
    pub samples_per_sec: u32,
    pub avg_bytes_per_sec: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Number of codec-specific bytes following the header.
    pub extra_size: u16,
}

impl WaveFormat {
    /// Header for mono 16-bit integer PCM.
    pub fn pcm_mono_16(samples_per_sec: u32) -> Self {
        Self {
            format_tag: WAVE_FORMAT_PCM,
            channels: 1,
            samples_per_sec,
            avg_bytes_per_sec: samples_per_sec * 2,
            block_align: 2,
            bits_per_sample: 16,
            extra_size: 0,
        }
    }

    pub fn read(bytes: &[u8]) -> ChunkResult<Self> {
        let header = take(bytes, 0, WAVE_FORMAT_SIZE)?;

        Ok(Self {
            format_tag: u16_at(header, 0),
            channels: u16_at(header, 2),
            samples_per_sec: u32_at(header, 4),
            avg_bytes_per_sec: u32_at(header, 8),
            block_align: u16_at(header, 12),
            bits_per_sample: u16_at(header, 14),
            extra_size: u16_at(header, 16),
        })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.format_tag.to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.samples_per_sec.to_le_bytes());
        out.extend_from_slice(&self.avg_bytes_per_sec.to_le_bytes());
        out.extend_from_slice(&self.block_align.to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        out.extend_from_slice(&self.extra_size.to_le_bytes());
    }
}

/// Borrowed view of a validated chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub format: WaveFormat,
    pub format_extra: &'a [u8],
    pub uncompressed_size: usize,
    pub compressed: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Validates the layout. The payload must be exactly `compressed_size` bytes long.
    pub fn parse(data: &'a [u8]) -> ChunkResult<Self> {
        let format = WaveFormat::read(data)?;
        let format_size = WAVE_FORMAT_SIZE + format.extra_size as usize;
        let format_extra = take(data, WAVE_FORMAT_SIZE, format.extra_size as usize)?;

        let sizes = take(data, format_size, SIZE_FIELDS)?;
        let compressed_size = non_negative(i32_at(sizes, 0))?;
        let uncompressed_size = non_negative(i32_at(sizes, 4))?;

        let compressed = &data[format_size + SIZE_FIELDS..];
        if compressed.len() != compressed_size {
            return Err(ChunkError::SizeMismatch {
                declared: compressed_size,
                actual: compressed.len(),
            });
        }

        Ok(Self {
            format,
            format_extra,
            uncompressed_size,
            compressed,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            WAVE_FORMAT_SIZE + self.format_extra.len() + SIZE_FIELDS + self.compressed.len(),
        );

        self.format.write(&mut out);
        out.extend_from_slice(self.format_extra);
        out.extend_from_slice(&(self.compressed.len() as i32).to_le_bytes());
        out.extend_from_slice(&(self.uncompressed_size as i32).to_le_bytes());
        out.extend_from_slice(self.compressed);

        out
    }
}

fn take(data: &[u8], offset: usize, len: usize) -> ChunkResult<&[u8]> {
    let needed = offset + len;
    data.get(offset..needed).ok_or(ChunkError::Truncated {
        needed,
        available: data.len(),
    })
}

fn non_negative(value: i32) -> ChunkResult<usize> {
    usize::try_from(value).map_err(|_| ChunkError::NegativeSize(value))
}

#[inline]
fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
fn i32_at(bytes: &[u8], offset: usize) -> i32 {
    u32_at(bytes, offset) as i32
}
