//! Conversions between normalized parameters and physical units.
//!
//! Hosts exchange every parameter as a float in `0.0..=1.0`. The functions below come in
//! `param_to_x` / `x_to_param` pairs that are inverse to each other within float precision.
//! Input outside the normalized range is not rejected; the formulas are simply evaluated.
//! Enum conversions are the exception and saturate to the nearest valid variant.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::math::{exp2, exp2f};

const MIN_FREQUENCY: f32 = 20.0;
const MAX_FREQUENCY: f32 = 20000.0;

const MIN_Q: f32 = 0.33;
const MAX_Q: f32 = 12.0;

const VOLUME_SCALE: f32 = 0.4;
const ENV_SCALE: f32 = 5000.0;

const VIBRATO_SCALE: f64 = 70.0;
const VIBRATO_OFFSET: f64 = 0.1;

/// Maximum number of unison voices.
pub const MAX_UNISONO: i32 = 16;

/// MIDI note of the tuning reference.
pub const A4_NOTE: f64 = 69.0;
/// Frequency of the tuning reference in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StateVariableFilterType {
    #[default]
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}

impl StateVariableFilterType {
    fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => Self::Lowpass,
            1 => Self::Highpass,
            2 => Self::Bandpass,
            _ => Self::Notch,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Spread {
    #[default]
    Mono,
    FullInvert,
    HalfInvert,
}

impl Spread {
    fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => Self::Mono,
            1 => Self::FullInvert,
            _ => Self::HalfInvert,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMode {
    #[default]
    Polyphonic,
    MonoLegatoTrill,
}

impl VoiceMode {
    fn from_index(index: i32) -> Self {
        if index <= 0 {
            Self::Polyphonic
        } else {
            Self::MonoLegatoTrill
        }
    }
}

/// Equal-tempered pitch of a (fractional) MIDI note.
#[inline]
pub fn note_to_freq(note: f64) -> f64 {
    A4_FREQUENCY * exp2((note - A4_NOTE) / 12.0)
}

#[inline]
pub fn freq_to_note(freq: f64) -> f64 {
    A4_NOTE + 12.0 * (freq / A4_FREQUENCY).log2()
}

/// Gain factor for a level in dB, 6 dB per doubling.
#[inline]
pub fn db_to_scalar(db: f32) -> f32 {
    exp2f(db / 6.0)
}

#[inline]
pub fn scalar_to_db(scalar: f32) -> f32 {
    scalar.log2() * 6.0
}

#[inline]
pub fn env_value_to_scalar(value: f32) -> f32 {
    ((value - 1.0) / ENV_SCALE).sqrt()
}

#[inline]
pub fn scalar_to_env_value(scalar: f32) -> f32 {
    scalar * scalar * ENV_SCALE + 1.0
}

#[inline]
pub fn volume_to_scalar(volume: f32) -> f32 {
    let v = volume * VOLUME_SCALE;
    v * v
}

#[inline]
pub fn scalar_to_volume(scalar: f32) -> f32 {
    scalar.sqrt() / VOLUME_SCALE
}

#[inline]
pub fn param_to_boolean(value: f32) -> bool {
    value >= 0.5
}

#[inline]
pub fn boolean_to_param(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Quadratic taper from 20 Hz to 20 kHz.
#[inline]
pub fn param_to_frequency(param: f32) -> f32 {
    MIN_FREQUENCY + (MAX_FREQUENCY - MIN_FREQUENCY) * param * param
}

#[inline]
pub fn frequency_to_param(freq: f32) -> f32 {
    ((freq - MIN_FREQUENCY) / (MAX_FREQUENCY - MIN_FREQUENCY)).sqrt()
}

/// Two linear segments meeting at `Q = 1` for `param = 0.5`.
#[inline]
pub fn param_to_q(param: f32) -> f32 {
    if param < 0.5 {
        param / 0.5 * (1.0 - MIN_Q) + MIN_Q
    } else {
        (param - 0.5) / 0.5 * (MAX_Q - 1.0) + 1.0
    }
}

#[inline]
pub fn q_to_param(q: f32) -> f32 {
    if q < 1.0 {
        (q - MIN_Q) / (1.0 - MIN_Q) * 0.5
    } else {
        (q - 1.0) / (MAX_Q - 1.0) * 0.5 + 0.5
    }
}

/// Symmetric level around 0 dB at `param = 0.5`.
#[inline]
pub fn param_to_db(param: f32, range: f32) -> f32 {
    (param * 2.0 - 1.0) * range
}

#[inline]
pub fn db_to_param(db: f32, range: f32) -> f32 {
    (db / range + 1.0) / 2.0
}

#[inline]
pub fn param_to_resonance(param: f32) -> f32 {
    param * 0.99 + 0.01
}

#[inline]
pub fn resonance_to_param(resonance: f32) -> f32 {
    (resonance - 0.01) / 0.99
}

#[inline]
pub fn param_to_state_variable_filter_type(param: f32) -> StateVariableFilterType {
    StateVariableFilterType::from_index((param * 3.0) as i32)
}

#[inline]
pub fn state_variable_filter_type_to_param(filter_type: StateVariableFilterType) -> f32 {
    filter_type as i32 as f32 / 3.0
}

/// Number of unison voices in `1..=16`.
#[inline]
pub fn param_to_unisono(param: f32) -> i32 {
    (param * (MAX_UNISONO - 1) as f32) as i32 + 1
}

#[inline]
pub fn unisono_to_param(unisono: i32) -> f32 {
    (unisono - 1) as f32 / (MAX_UNISONO - 1) as f32
}

#[inline]
pub fn param_to_vibrato_freq(param: f32) -> f64 {
    let p = param as f64;
    (p * p + VIBRATO_OFFSET) * VIBRATO_SCALE
}

#[inline]
pub fn vibrato_freq_to_param(vf: f64) -> f32 {
    let d = vf / VIBRATO_SCALE - VIBRATO_OFFSET;

    if d >= 0.0 {
        d.sqrt() as f32
    } else {
        0.0
    }
}

/// Left channel gain of the equal-power pan law.
#[inline]
pub fn pan_to_scalar_left(pan: f32) -> f32 {
    (1.0 - pan).sqrt()
}

/// Right channel gain of the equal-power pan law.
#[inline]
pub fn pan_to_scalar_right(pan: f32) -> f32 {
    pan.sqrt()
}

#[inline]
pub fn param_to_spread(param: f32) -> Spread {
    Spread::from_index((param * 2.0) as i32)
}

#[inline]
pub fn spread_to_param(spread: Spread) -> f32 {
    spread as i32 as f32 / 2.0
}

#[inline]
pub fn param_to_voice_mode(param: f32) -> VoiceMode {
    VoiceMode::from_index(param as i32)
}

#[inline]
pub fn voice_mode_to_param(voice_mode: VoiceMode) -> f32 {
    voice_mode as i32 as f32
}
