//! Error types for sample loading.
//!
//! None of these reach the host: the device logs them and stays silent.

use thiserror::Error;

/// Errors raised while turning compressed bytes into PCM and back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unsupported format tag {tag:#06x} with {bits} bits per sample")]
    UnsupportedFormat { tag: u16, bits: u16 },

    #[error("block alignment {block_align} does not match {channels} channel(s) of {bits} bits")]
    BadBlockAlign {
        block_align: u16,
        channels: u16,
        bits: u16,
    },

    #[error("payload holds {actual} frames but {expected} were declared")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("no samples to encode")]
    EmptyInput,
}

/// Errors raised while validating a chunk or loading a sample.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("chunk truncated: {needed} bytes needed, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("negative size field: {0}")]
    NegativeSize(i32),

    #[error("declared compressed size {declared} does not match payload of {actual} bytes")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("sample has {0} channels, only mono is supported")]
    NotMono(u16),

    #[error("uncompressed size of {0} bytes exceeds the sample size limit")]
    TooLarge(usize),

    #[error("sample rate of zero")]
    ZeroSampleRate,

    #[error("sample decodes to zero frames")]
    EmptySample,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type ChunkResult<T> = Result<T, ChunkError>;
