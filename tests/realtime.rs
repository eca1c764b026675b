//! The render path must stay out of the logger.
//!
//! Kept in its own test binary: the counting logger is process wide.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{LevelFilter, Log, Metadata, Record};

use thunder_dsp::thunder::{NoteEvent, Thunder, ThunderConfig};

static CALLS: AtomicUsize = AtomicUsize::new(0);

struct CountingLogger;

impl Log for CountingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, _record: &Record) {
        CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&self) {}
}

static LOGGER: CountingLogger = CountingLogger;

fn note_on(offset: usize, note: i32) -> NoteEvent {
    NoteEvent::NoteOn {
        offset,
        note,
        velocity: 127,
        detune: 0.0,
        pan: 0.5,
    }
}

#[test]
fn render_with_voice_stealing_never_logs() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut thunder = Thunder::new(ThunderConfig::default().with_max_voices(2));
    thunder.import_pcm(&[0.5; 1000], 44100).unwrap();
    assert!(CALLS.load(Ordering::SeqCst) > 0);
    CALLS.store(0, Ordering::SeqCst);

    let events = [note_on(0, 60), note_on(8, 62), note_on(16, 64), note_on(24, 65)];
    let mut left = [0.0; 64];
    let mut right = [0.0; 64];
    thunder.render(&events, &mut left, &mut right);
    thunder.run(&mut left, &mut right);

    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    assert_eq!(thunder.stolen_voices(), 2);
    assert_eq!(thunder.active_voices(), 2);
}
