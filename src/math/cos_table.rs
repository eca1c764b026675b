//! Table-driven cosine with IEEE-754 phase decomposition.
//!
//! The table holds one full period of cosine sampled at [`COS_TABLE_SIZE`] evenly spaced
//! phases, plus one closing entry so that interpolating from the last slot never has to
//! wrap. Lookups avoid any quadrant logic: the argument is folded with `abs()` and the
//! fractional part of the normalized phase is read straight out of the bit pattern of a
//! `f64`.

use core::f64::consts::{FRAC_PI_2, PI};

#[allow(unused_imports)]
use num_traits::float::Float;

/// Base-2 logarithm of the table size.
pub const COS_TABLE_LOG2_SIZE: u32 = 10;

/// Number of table slots covering one period (`2π`).
pub const COS_TABLE_SIZE: usize = 1 << COS_TABLE_LOG2_SIZE;

/// Fraction bits left below the index in the 32-bit phase word.
const FRACT_BITS: u32 = 32 - COS_TABLE_LOG2_SIZE;
const FRACT_SCALE: u32 = 1 << FRACT_BITS;
const FRACT_MASK: u32 = FRACT_SCALE - 1;

const MANTISSA_BITS: u32 = 52;
const EXPONENT_BIAS: i32 = 1023;

#[derive(Debug, Clone)]
pub struct CosTable {
    values: [f64; COS_TABLE_SIZE + 1],
}

impl Default for CosTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CosTable {
    /// Builds the table by rotating a unit vector by `2π / size` per slot, so only a
    /// single `sin`/`cos` pair is evaluated.
    pub fn new() -> Self {
        let mut values = [0.0; COS_TABLE_SIZE + 1];

        let delta = (PI * 2.0) / COS_TABLE_SIZE as f64;
        let (sd, cd) = delta.sin_cos();
        let mut x = 0.0;
        let mut y = 1.0;

        for value in values.iter_mut() {
            *value = y;
            let tx = x * cd - y * sd;
            y = x * sd + y * cd;
            x = tx;
        }

        // Rotation drifts by a few ulps over a full turn; the wrap must be exact.
        values[COS_TABLE_SIZE] = values[0];

        Self { values }
    }

    /// All `COS_TABLE_SIZE + 1` entries.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Splits a phase in radians into a table index and an interpolation weight.
    ///
    /// `|x|` is normalized to `phase = 1 + |x| / 2π`, which is always `>= 1.0`, so its
    /// unbiased exponent `e` is non-negative. Shifting the raw 64-bit pattern left by `e`
    /// pushes the integer part of the phase out past the mantissa, leaving only its
    /// fractional part in the low 52 bits. The top 32 of those bits form a phase word:
    /// the upper [`COS_TABLE_LOG2_SIZE`] bits select the slot and the remaining bits are
    /// the weight towards the next slot.
    ///
    /// For phases so large that no fraction bits survive (shift of 64 or more, infinity,
    /// NaN) the word is zero and the lookup lands on slot 0.
    #[inline]
    pub fn locate(x: f64) -> (usize, f64) {
        let phase = 1.0 + x.abs() * (1.0 / (PI * 2.0));
        let bits = phase.to_bits();
        let exponent = ((bits >> MANTISSA_BITS) as i32 - EXPONENT_BIAS).max(0) as u32;

        let word = match bits.checked_shl(exponent) {
            Some(shifted) => (shifted >> (MANTISSA_BITS - 32)) as u32,
            None => 0,
        };

        let index = (word >> FRACT_BITS) as usize;
        let fract = (word & FRACT_MASK) as f64 * (1.0 / FRACT_SCALE as f64);

        (index, fract)
    }

    #[inline]
    pub fn cos(&self, x: f64) -> f64 {
        let (index, fract) = Self::locate(x);
        let left = self.values[index];
        let right = self.values[index + 1];

        left + (right - left) * fract
    }

    #[inline]
    pub fn sin(&self, x: f64) -> f64 {
        self.cos(x - FRAC_PI_2)
    }
}
