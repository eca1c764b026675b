//! One-shot sample voice.
//!
//! The voice stores only a cursor and gains. The device passes the current decoded buffer
//! into [`ThunderVoice::run`] each block and kills every voice when that buffer is swapped,
//! so a voice can never read from memory that was released.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::math::{exp2, AudioMathContext};
use crate::param::{pan_to_scalar_left, pan_to_scalar_right};
use crate::synth::Voice;

/// Note that plays the sample at its recorded pitch.
pub const REFERENCE_NOTE: f64 = 60.0;

const MAX_VELOCITY: f32 = 127.0;

#[derive(Debug, Default, Clone)]
pub struct ThunderVoice {
    active: bool,
    note: i32,

    position: f64,
    rate: f64,

    gain_left: f32,
    gain_right: f32,
}

impl ThunderVoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts playback from the first frame.
    ///
    /// `detune` is in semitones, `pan` in `0.0..=1.0`. The playback rate combines the pitch
    /// offset from [`REFERENCE_NOTE`] with the ratio of the sample's own rate to the host
    /// rate, so a 22050 Hz sample still plays at its recorded pitch on a 44100 Hz host.
    pub fn note_on(
        &mut self,
        context: &AudioMathContext,
        note: i32,
        velocity: i32,
        detune: f32,
        pan: f32,
        source_rate: u32,
    ) {
        let semitones = note as f64 + detune as f64 - REFERENCE_NOTE;
        let rate_ratio = source_rate as f64 / context.sample_rate().sample_rate_hz as f64;
        let amplitude = velocity.clamp(0, MAX_VELOCITY as i32) as f32 / MAX_VELOCITY;
        let pan = pan.clamp(0.0, 1.0);

        self.active = true;
        self.note = note;
        self.position = 0.0;
        self.rate = exp2(semitones / 12.0) * rate_ratio;
        self.gain_left = amplitude * pan_to_scalar_left(pan);
        self.gain_right = amplitude * pan_to_scalar_right(pan);
    }

    /// Cursor advance per output frame.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Fractional read position in source frames.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn gains(&self) -> (f32, f32) {
        (self.gain_left, self.gain_right)
    }

    /// Adds up to `left.len()` frames into the outputs, scaled by `level`.
    ///
    /// Frames are linearly interpolated; the frame past the end reads as silence. The voice
    /// turns inactive as soon as the cursor leaves the buffer and writes nothing after that.
    #[inline]
    pub fn run(&mut self, samples: &[f32], level: f32, left: &mut [f32], right: &mut [f32]) {
        if !self.active {
            return;
        }

        let gain_left = self.gain_left * level;
        let gain_right = self.gain_right * level;

        for (out_left, out_right) in left.iter_mut().zip(right.iter_mut()) {
            let index = self.position as usize;
            if index >= samples.len() {
                self.active = false;
                break;
            }

            let fract = (self.position - index as f64) as f32;
            let a = samples[index];
            let b = samples.get(index + 1).copied().unwrap_or(0.0);
            let sample = a + (b - a) * fract;

            *out_left += sample * gain_left;
            *out_right += sample * gain_right;

            self.position += self.rate;
        }

        if self.position as usize >= samples.len() {
            self.active = false;
        }
    }
}

impl Voice for ThunderVoice {
    #[inline]
    fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    fn note(&self) -> i32 {
        self.note
    }

    fn kill(&mut self) {
        self.active = false;
    }
}
