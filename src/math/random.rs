//! Repeatable pseudo random values for voice detune and phase scatter.
//!
//! Not uniformly distributed and not suited for anything but audio variation: the output is
//! the multiplicative state reduced modulo 255.

use core::sync::atomic::{AtomicU32, Ordering};

const INITIAL_SEED: u32 = 1;
const MULTIPLIER: u32 = 0x15a4e35;

static RNG_STATE: AtomicU32 = AtomicU32::new(INITIAL_SEED);

/// Resets the generator to its initial seed.
#[inline]
pub fn reseed() {
    seed(INITIAL_SEED);
}

#[inline]
pub fn seed(seed: u32) {
    RNG_STATE.store(seed, Ordering::Relaxed);
}

#[inline]
pub fn get_word() -> u32 {
    let next = RNG_STATE.load(Ordering::Relaxed).wrapping_mul(MULTIPLIER);
    RNG_STATE.store(next, Ordering::Relaxed);

    next
}

/// Returns a value in `[0.0, 1.0)` in steps of `1/255`.
#[inline]
pub fn get_float() -> f32 {
    (get_word() % 255) as f32 / 255.0
}
