//! Fast numeric primitives shared by all devices.
//!
//! Everything here is allocation free and deterministic. The only process-wide state is the
//! cosine table, which is built exactly once and then frozen, and the random seed.

pub mod cos_table;
pub mod random;

use spin::Once;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::SampleRate;
use cos_table::CosTable;

/// Tempo assumed until the host reports one.
pub const DEFAULT_TEMPO: u32 = 120;

static COS_TABLE: Once<CosTable> = Once::new();

/// Process-wide cosine table, built on first access.
#[inline]
pub fn cos_table() -> &'static CosTable {
    COS_TABLE.call_once(CosTable::new)
}

/// Computes `2^x`.
#[inline]
pub fn exp2(x: f64) -> f64 {
    x.exp2()
}

/// Computes `2^x` in single precision.
#[inline]
pub fn exp2f(x: f32) -> f32 {
    x.exp2()
}

#[inline]
pub fn mix(v1: f32, v2: f32, mix: f32) -> f32 {
    v1 * (1.0 - mix) + v2 * mix
}

#[inline]
pub fn clamp(f: f32, min: f32, max: f32) -> f32 {
    if f < min {
        min
    } else if f > max {
        max
    } else {
        f
    }
}

/// Explicit handle to the shared math state and the host timing context.
///
/// Constructing it through [`AudioMathContext::init`] guarantees the cosine table is in place
/// before any lookup, on any thread. The handle itself is `Copy` and can be handed to voices.
#[derive(Debug, Clone, Copy)]
pub struct AudioMathContext {
    cos_table: &'static CosTable,
    sample_rate: SampleRate,
    tempo: u32,
}

impl AudioMathContext {
    /// Builds the cosine table if needed and resets the random seed.
    ///
    /// Calling this again is safe; the table is shared and only the seed is reset.
    pub fn init(sample_rate: SampleRate) -> Self {
        let cos_table = cos_table();
        random::reseed();

        Self {
            cos_table,
            sample_rate,
            tempo: DEFAULT_TEMPO,
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate;
    }

    #[inline]
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn set_tempo(&mut self, tempo: u32) {
        self.tempo = tempo;
    }

    #[inline]
    pub fn cos_table(&self) -> &'static CosTable {
        self.cos_table
    }

    #[inline]
    pub fn fast_cos(&self, x: f64) -> f64 {
        self.cos_table.cos(x)
    }

    #[inline]
    pub fn fast_sin(&self, x: f64) -> f64 {
        self.cos_table.sin(x)
    }

    /// Square wave approximation from the 1st, 3rd and 5th partials.
    #[inline]
    pub fn square135(&self, phase: f64) -> f64 {
        self.fast_sin(phase) + self.fast_sin(phase * 3.0) / 3.0 + self.fast_sin(phase * 5.0) / 5.0
    }

    /// Same as [`square135`](Self::square135) without the fundamental.
    #[inline]
    pub fn square35(&self, phase: f64) -> f64 {
        self.fast_sin(phase * 3.0) / 3.0 + self.fast_sin(phase * 5.0) / 5.0
    }

    #[inline]
    pub fn rand_float(&self) -> f32 {
        random::get_float()
    }
}
