//! Decoded sample storage shared between the control and audio threads.
//!
//! The control thread decodes into a fresh buffer, then swaps it into the [`SampleSlot`]
//! while holding the write lock for nothing but the pointer exchange. Every swap bumps the
//! generation. The audio thread takes a snapshot with `try_read`, so it never waits on the
//! control thread; if the lock is contended it keeps rendering from the snapshot it already
//! holds.
//!
//! Replaced buffers go to a retire list owned by the control side and are only dropped once
//! no snapshot refers to them any more. The audio thread therefore never releases memory.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::debug;
use spin::{Mutex, RwLock};

/// Float PCM ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSample {
    samples: Box<[f32]>,
    sample_rate: u32,
}

impl DecodedSample {
    pub fn new(samples: Box<[f32]>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Rate the samples were recorded at, in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// What the audio thread sees of the slot at one point in time.
#[derive(Debug, Clone, Default)]
pub struct SampleSnapshot {
    pub generation: u64,
    pub sample: Option<Arc<DecodedSample>>,
}

#[derive(Debug, Default)]
struct Published {
    generation: u64,
    sample: Option<Arc<DecodedSample>>,
}

#[derive(Debug, Default)]
pub struct SampleSlot {
    current: RwLock<Published>,
    retired: Mutex<Vec<Arc<DecodedSample>>>,
}

impl SampleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live buffer. Called from the control thread only.
    pub fn publish(&self, sample: Option<Arc<DecodedSample>>) -> u64 {
        let (generation, previous) = {
            let mut current = self.current.write();
            current.generation += 1;
            let previous = core::mem::replace(&mut current.sample, sample);
            (current.generation, previous)
        };

        let mut retired = self.retired.lock();
        if let Some(previous) = previous {
            retired.push(previous);
        }
        Self::release_unused(&mut retired);

        debug!("Published sample generation {}", generation);

        generation
    }

    /// Drops retired buffers that no snapshot holds any more.
    pub fn collect_garbage(&self) {
        Self::release_unused(&mut self.retired.lock());
    }

    fn release_unused(retired: &mut Vec<Arc<DecodedSample>>) {
        retired.retain(|sample| Arc::strong_count(sample) > 1);
    }

    /// Number of replaced buffers still waiting to be released.
    pub fn retired_count(&self) -> usize {
        self.retired.lock().len()
    }

    /// Consistent generation and buffer pair, or `None` while the control thread is swapping.
    ///
    /// Cloning the `Arc` neither allocates nor blocks, so this is safe on the audio thread.
    #[inline]
    pub fn try_snapshot(&self) -> Option<SampleSnapshot> {
        self.current.try_read().map(|current| SampleSnapshot {
            generation: current.generation,
            sample: current.sample.clone(),
        })
    }

    /// Blocking snapshot for control-side queries.
    pub fn snapshot(&self) -> SampleSnapshot {
        let current = self.current.read();
        SampleSnapshot {
            generation: current.generation,
            sample: current.sample.clone(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().sample.is_some()
    }
}
