#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod math;
pub mod param;
pub mod synth;
pub mod thunder;

/// Native processing rate of the devices in Hz.
pub const NATIVE_SAMPLE_RATE: f32 = 44100.0;

/// Sample rate context for DSP calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRate {
    /// Sample rate in Hz
    pub sample_rate_hz: f32,
}

impl SampleRate {
    /// Create a new sample rate context.
    pub fn new(sample_rate_hz: f32) -> Self {
        Self { sample_rate_hz }
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::new(NATIVE_SAMPLE_RATE)
    }
}
