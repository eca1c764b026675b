//! Polyphonic voice management shared by the synth devices.
//!
//! A [`VoicePool`] owns a fixed number of voices allocated up front, so note handling on the
//! audio thread never allocates. When every voice is busy the oldest one is stolen.
//!
//! Nothing here logs: allocation runs inside the audio callback. Steals are counted instead
//! and can be read back from the control side.

use alloc::vec::Vec;

/// Maximum polyphony used when no other value is configured.
pub const DEFAULT_MAX_VOICES: usize = 32;

pub trait Voice {
    fn is_active(&self) -> bool;

    /// Note that started the voice.
    fn note(&self) -> i32;

    /// Key release. One-shot voices may ignore it.
    fn note_off(&mut self) {}

    /// Silences the voice immediately.
    fn kill(&mut self);
}

#[derive(Debug, Clone)]
pub struct VoicePool<V> {
    voices: Vec<V>,
    started_at: Vec<u64>,
    counter: u64,
    stolen: u64,
}

impl<V: Voice> VoicePool<V> {
    /// Creates a pool of `size` voices built by `factory`. A size of zero is raised to one.
    pub fn new(size: usize, factory: impl FnMut(usize) -> V) -> Self {
        let size = size.max(1);

        Self {
            voices: (0..size).map(factory).collect(),
            started_at: alloc::vec![0; size],
            counter: 0,
            stolen: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    /// Returns an idle voice, or steals the voice that was started first.
    ///
    /// The returned voice is stamped as the newest; the caller is expected to start it.
    pub fn allocate(&mut self) -> &mut V {
        let index = match self.voices.iter().position(|voice| !voice.is_active()) {
            Some(index) => index,
            None => {
                let oldest = self
                    .started_at
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, stamp)| **stamp)
                    .map(|(index, _)| index)
                    .unwrap_or(0);

                self.stolen += 1;
                self.voices[oldest].kill();
                oldest
            }
        };

        self.counter += 1;
        self.started_at[index] = self.counter;

        &mut self.voices[index]
    }

    /// Forwards a key release to every active voice playing `note`.
    pub fn note_off(&mut self, note: i32) {
        self.voices
            .iter_mut()
            .filter(|voice| voice.is_active() && voice.note() == note)
            .for_each(|voice| voice.note_off());
    }

    /// Number of voices stolen since the pool was created.
    #[inline]
    pub fn stolen_count(&self) -> u64 {
        self.stolen
    }

    pub fn kill_all(&mut self) {
        self.voices.iter_mut().for_each(|voice| voice.kill());
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|voice| voice.is_active()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.voices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.voices.iter_mut()
    }
}
