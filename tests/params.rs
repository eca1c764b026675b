//! Tests for the parameter mappings.

use thunder_dsp::param::*;

const STEPS: usize = 1000;

fn grid() -> impl Iterator<Item = f32> {
    (0..=STEPS).map(|i| i as f32 / STEPS as f32)
}

fn assert_round_trip(name: &str, forward: impl Fn(f32) -> f32, inverse: impl Fn(f32) -> f32) {
    for p in grid() {
        let back = inverse(forward(p));
        assert!((back - p).abs() < 1e-3, "{name}: {p} came back as {back}");
    }
}

#[test]
fn continuous_mappings_round_trip() {
    assert_round_trip("frequency", param_to_frequency, frequency_to_param);
    assert_round_trip("q", param_to_q, q_to_param);
    assert_round_trip("resonance", param_to_resonance, resonance_to_param);
    assert_round_trip("volume", volume_to_scalar, scalar_to_volume);
    assert_round_trip("envelope", scalar_to_env_value, env_value_to_scalar);
    assert_round_trip(
        "db",
        |p| param_to_db(p, 24.0),
        |db| db_to_param(db, 24.0),
    );
    assert_round_trip(
        "vibrato",
        |p| param_to_vibrato_freq(p) as f32,
        |vf| vibrato_freq_to_param(vf as f64),
    );
}

#[test]
fn frequency_taper() {
    assert_eq!(param_to_frequency(0.0), 20.0);
    assert_eq!(param_to_frequency(1.0), 20000.0);
    assert_eq!(param_to_frequency(0.5), 20.0 + 19980.0 * 0.25);
}

#[test]
fn q_breakpoint() {
    assert!((param_to_q(0.0) - 0.33).abs() < 1e-6);
    assert_eq!(param_to_q(0.5), 1.0);
    assert_eq!(param_to_q(1.0), 12.0);
    assert_eq!(q_to_param(1.0), 0.5);
}

#[test]
fn db_is_symmetric_around_center() {
    assert_eq!(param_to_db(0.5, 12.0), 0.0);
    assert_eq!(param_to_db(0.0, 12.0), -12.0);
    assert_eq!(param_to_db(1.0, 12.0), 12.0);

    assert_eq!(db_to_scalar(0.0), 1.0);
    assert!((db_to_scalar(6.0) - 2.0).abs() < 1e-6);
    assert!((scalar_to_db(db_to_scalar(-9.0)) + 9.0).abs() < 1e-4);
}

#[test]
fn resonance_never_reaches_zero() {
    assert!((param_to_resonance(0.0) - 0.01).abs() < 1e-7);
    assert!((param_to_resonance(1.0) - 1.0).abs() < 1e-6);
}

#[test]
fn vibrato_inverse_clamps_below_range() {
    assert!((param_to_vibrato_freq(0.0) - 7.0).abs() < 1e-9);
    assert!((param_to_vibrato_freq(1.0) - 77.0).abs() < 1e-9);
    assert_eq!(vibrato_freq_to_param(0.0), 0.0);
    assert_eq!(vibrato_freq_to_param(-5.0), 0.0);
}

#[test]
fn unisono_covers_one_to_sixteen() {
    assert_eq!(param_to_unisono(0.0), 1);
    assert_eq!(param_to_unisono(1.0), MAX_UNISONO);

    for n in 1..=MAX_UNISONO {
        assert_eq!(param_to_unisono(unisono_to_param(n)), n);
    }
}

#[test]
fn enum_mappings_round_trip() {
    for filter_type in [
        StateVariableFilterType::Lowpass,
        StateVariableFilterType::Highpass,
        StateVariableFilterType::Bandpass,
        StateVariableFilterType::Notch,
    ] {
        let param = state_variable_filter_type_to_param(filter_type);
        assert_eq!(param_to_state_variable_filter_type(param), filter_type);
    }

    for spread in [Spread::Mono, Spread::FullInvert, Spread::HalfInvert] {
        assert_eq!(param_to_spread(spread_to_param(spread)), spread);
    }

    for mode in [VoiceMode::Polyphonic, VoiceMode::MonoLegatoTrill] {
        assert_eq!(param_to_voice_mode(voice_mode_to_param(mode)), mode);
    }
}

#[test]
fn enum_mappings_truncate_and_saturate() {
    assert_eq!(
        param_to_state_variable_filter_type(0.3),
        StateVariableFilterType::Lowpass
    );
    assert_eq!(
        param_to_state_variable_filter_type(0.4),
        StateVariableFilterType::Highpass
    );
    assert_eq!(
        param_to_state_variable_filter_type(0.7),
        StateVariableFilterType::Bandpass
    );
    assert_eq!(
        param_to_state_variable_filter_type(5.0),
        StateVariableFilterType::Notch
    );
    assert_eq!(
        param_to_state_variable_filter_type(-1.0),
        StateVariableFilterType::Lowpass
    );

    assert_eq!(param_to_spread(0.49), Spread::Mono);
    assert_eq!(param_to_spread(0.5), Spread::FullInvert);
    assert_eq!(param_to_spread(3.0), Spread::HalfInvert);
    assert_eq!(param_to_voice_mode(0.99), VoiceMode::Polyphonic);
    assert_eq!(param_to_voice_mode(1.0), VoiceMode::MonoLegatoTrill);
}

#[test]
fn equal_power_pan() {
    for p in grid() {
        let l = pan_to_scalar_left(p);
        let r = pan_to_scalar_right(p);
        assert!((l * l + r * r - 1.0).abs() < 1e-5);
    }

    assert_eq!(pan_to_scalar_left(0.0), 1.0);
    assert_eq!(pan_to_scalar_right(0.0), 0.0);
    assert_eq!(pan_to_scalar_left(0.5), pan_to_scalar_right(0.5));
}

#[test]
fn boolean_threshold() {
    assert!(!param_to_boolean(0.49));
    assert!(param_to_boolean(0.5));
    assert_eq!(boolean_to_param(true), 1.0);
    assert_eq!(boolean_to_param(false), 0.0);
}

#[test]
fn note_to_freq_reference() {
    assert_eq!(note_to_freq(69.0), 440.0);
    assert!((note_to_freq(81.0) - 880.0).abs() < 1e-9);
    assert!((note_to_freq(57.0) - 220.0).abs() < 1e-9);
    assert!((note_to_freq(60.0) - 261.625_565_300_6).abs() < 1e-6);

    for note in 0..128 {
        let note = note as f64;
        assert!((freq_to_note(note_to_freq(note)) - note).abs() < 1e-9);
    }
}
