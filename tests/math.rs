//! Tests for the fast math helpers.

use std::f64::consts::{FRAC_PI_2, PI};

use thunder_dsp::math::cos_table::{CosTable, COS_TABLE_SIZE};
use thunder_dsp::math::{clamp, cos_table, exp2, exp2f, mix, AudioMathContext};
use thunder_dsp::SampleRate;

#[test]
fn cos_table_wraps_exactly() {
    let table = CosTable::new();
    let values = table.values();

    assert_eq!(values.len(), COS_TABLE_SIZE + 1);
    assert_eq!(values[0], 1.0);
    assert_eq!(values[0], values[COS_TABLE_SIZE]);
    assert!((values[COS_TABLE_SIZE / 4]).abs() < 1e-9);
    assert!((values[COS_TABLE_SIZE / 2] + 1.0).abs() < 1e-9);
}

#[test]
fn cos_table_matches_cosine_at_every_slot() {
    let table = CosTable::new();

    for (i, value) in table.values().iter().enumerate() {
        let expected = (PI * 2.0 * i as f64 / COS_TABLE_SIZE as f64).cos();
        assert!((value - expected).abs() < 1e-9, "slot {i}");
    }
}

#[test]
fn locate_boundary_phases() {
    assert_eq!(CosTable::locate(0.0), (0, 0.0));
    assert_eq!(CosTable::locate(FRAC_PI_2), (COS_TABLE_SIZE / 4, 0.0));
    assert_eq!(CosTable::locate(PI), (COS_TABLE_SIZE / 2, 0.0));
    assert_eq!(CosTable::locate(PI * 2.0), (0, 0.0));
}

#[test]
fn locate_fraction_between_slots() {
    let slot = PI * 2.0 / COS_TABLE_SIZE as f64;
    let (index, fract) = CosTable::locate(slot * 3.5);

    assert_eq!(index, 3);
    assert!((fract - 0.5).abs() < 1e-6);

    // Several periods up the fraction is still taken from the phase remainder.
    let (index, fract) = CosTable::locate(PI * 2.0 * 5.0 + slot * 100.25);
    assert_eq!(index, 100);
    assert!((fract - 0.25).abs() < 1e-4);
}

#[test]
fn locate_never_leaves_the_table() {
    for x in [1e10, 1e100, 1e300, f64::MAX, f64::INFINITY, f64::NAN] {
        let (index, fract) = CosTable::locate(x);
        assert!(index < COS_TABLE_SIZE);
        assert!((0.0..1.0).contains(&fract));
    }

    assert_eq!(CosTable::locate(f64::INFINITY), (0, 0.0));
    assert_eq!(CosTable::locate(f64::NAN), (0, 0.0));
}

#[test]
fn fast_cos_accuracy() {
    let table = cos_table();
    let steps = 200_000;

    for i in 0..=steps {
        let x = -10.0 * PI + 20.0 * PI * i as f64 / steps as f64;
        let error = (table.cos(x) - x.cos()).abs();
        assert!(error < 1e-3, "cos({x}) off by {error}");
        assert_eq!(table.cos(-x), table.cos(x));
    }
}

#[test]
fn fast_sin_accuracy() {
    let table = cos_table();

    for i in 0..=10_000 {
        let x = -10.0 * PI + 20.0 * PI * i as f64 / 10_000.0;
        assert!((table.sin(x) - x.sin()).abs() < 1e-3);
    }
}

#[test]
fn square_partials() {
    let context = AudioMathContext::init(SampleRate::default());

    for i in 0..1000 {
        let phase = PI * 2.0 * i as f64 / 1000.0;
        let expected35 = (phase * 3.0).sin() / 3.0 + (phase * 5.0).sin() / 5.0;
        let expected135 = phase.sin() + expected35;

        assert!((context.square35(phase) - expected35).abs() < 2e-3);
        assert!((context.square135(phase) - expected135).abs() < 3e-3);
    }
}

#[test]
fn context_shares_one_table() {
    let a = AudioMathContext::init(SampleRate::new(44100.0));
    let b = AudioMathContext::init(SampleRate::new(48000.0));

    assert!(core::ptr::eq(a.cos_table(), b.cos_table()));
    assert!(core::ptr::eq(a.cos_table(), cos_table()));
    assert_eq!(b.sample_rate().sample_rate_hz, 48000.0);
    assert_eq!(a.tempo(), 120);
}

#[test]
fn exp2_matches_pow() {
    assert_eq!(exp2(0.0), 1.0);
    assert_eq!(exp2(1.0), 2.0);
    assert_eq!(exp2(-1.0), 0.5);
    assert_eq!(exp2f(10.0), 1024.0);

    let mut previous = 0.0;
    for i in -400..=400 {
        let x = i as f64 / 40.0;
        let y = exp2(x);
        assert!((y - 2f64.powf(x)).abs() <= 2f64.powf(x) * 1e-12);
        assert!(y > previous);
        previous = y;

        let yf = exp2f(x as f32);
        assert!((yf - 2f32.powf(x as f32)).abs() <= 2f32.powf(x as f32) * 1e-5);
    }
}

#[test]
fn exp2_never_nan_for_finite_input() {
    for x in [-1e6, -2000.0, 2000.0, 1e6, f64::MIN, f64::MAX] {
        assert!(!exp2(x).is_nan());
        assert!(!exp2f(x as f32).is_nan());
    }
}

#[test]
fn mix_and_clamp() {
    assert_eq!(mix(1.0, 3.0, 0.0), 1.0);
    assert_eq!(mix(1.0, 3.0, 1.0), 3.0);
    assert_eq!(mix(1.0, 3.0, 0.5), 2.0);

    assert_eq!(clamp(-2.0, -1.0, 1.0), -1.0);
    assert_eq!(clamp(2.0, -1.0, 1.0), 1.0);
    assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
}
