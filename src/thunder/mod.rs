//! Thunder: a one-shot sample player.
//!
//! The device keeps a single compressed mono sample together with its wave format header,
//! decodes it once when it is loaded and replays it per note, pitch shifted relative to
//! [`voice::REFERENCE_NOTE`]. There is no loop point; every note plays to the end of the
//! sample.
//!
//! Loading happens through a [`SampleLoader`], which can be cloned and moved to a control
//! thread. Rendering happens on [`Thunder`], which owns the voices and only ever looks at the
//! shared sample through a non-blocking snapshot.

pub mod chunk;
pub mod codec;
pub mod sample;
pub mod voice;

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, info, warn};
use spin::Mutex;

use crate::error::{ChunkError, ChunkResult};
use crate::math::AudioMathContext;
use crate::param::{db_to_scalar, param_to_db, scalar_to_db};
use crate::synth::{VoicePool, DEFAULT_MAX_VOICES};
use crate::SampleRate;
use chunk::{Chunk, WaveFormat};
use codec::{Codec, EncodedSample, PcmCodec, DECODED_BYTES_PER_SAMPLE};
use sample::{DecodedSample, SampleSlot};
use voice::ThunderVoice;

/// Largest accepted uncompressed sample, in bytes of 16-bit PCM.
pub const MAX_UNCOMPRESSED_SIZE: usize = 32 << 20;

/// Range of the level parameter in dB around unity.
pub const LEVEL_RANGE_DB: f32 = 12.0;

/// Construction time settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThunderConfig {
    pub sample_rate: SampleRate,
    pub max_voices: usize,
}

impl Default for ThunderConfig {
    fn default() -> Self {
        Self {
            sample_rate: SampleRate::default(),
            max_voices: DEFAULT_MAX_VOICES,
        }
    }
}

impl ThunderConfig {
    pub fn with_sample_rate(mut self, sample_rate_hz: f32) -> Self {
        self.sample_rate = SampleRate::new(sample_rate_hz);
        self
    }

    pub fn with_max_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices;
        self
    }
}

/// Automatable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThunderParam {
    /// Output level, `0.5` is unity gain.
    Level,
}

/// Sample accurate note event within one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteEvent {
    NoteOn {
        offset: usize,
        note: i32,
        velocity: i32,
        detune: f32,
        pan: f32,
    },
    NoteOff {
        offset: usize,
        note: i32,
    },
}

impl NoteEvent {
    #[inline]
    pub fn offset(&self) -> usize {
        match self {
            Self::NoteOn { offset, .. } | Self::NoteOff { offset, .. } => *offset,
        }
    }
}

/// The sample as it was loaded, kept to answer chunk requests.
#[derive(Debug, Clone, PartialEq)]
struct SampleAsset {
    format: WaveFormat,
    format_extra: Vec<u8>,
    compressed: Vec<u8>,
    uncompressed_size: usize,
}

impl SampleAsset {
    fn as_chunk(&self) -> Chunk<'_> {
        Chunk {
            format: self.format,
            format_extra: &self.format_extra,
            uncompressed_size: self.uncompressed_size,
            compressed: &self.compressed,
        }
    }
}

struct LoaderState {
    codec: Box<dyn Codec>,
    slot: SampleSlot,
    asset: Mutex<Option<SampleAsset>>,
}

/// Control thread handle for loading and serializing the sample.
///
/// Clones share the same slot; the device picks up whatever was published last.
#[derive(Clone)]
pub struct SampleLoader {
    state: Arc<LoaderState>,
}

impl core::fmt::Debug for SampleLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SampleLoader")
            .field("generation", &self.state.slot.generation())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl SampleLoader {
    pub fn new(codec: impl Codec + 'static) -> Self {
        Self {
            state: Arc::new(LoaderState {
                codec: Box::new(codec),
                slot: SampleSlot::new(),
                asset: Mutex::new(None),
            }),
        }
    }

    #[inline]
    pub fn slot(&self) -> &SampleSlot {
        &self.state.slot
    }

    pub fn is_loaded(&self) -> bool {
        self.state.slot.is_loaded()
    }

    /// Loads a host chunk. A malformed chunk leaves the device unloaded and is only logged.
    pub fn set_chunk(&self, data: &[u8]) {
        if let Err(err) = self.try_set_chunk(data) {
            warn!("Rejected sample chunk of {} bytes: {}", data.len(), err);
        }
    }

    /// Like [`set_chunk`](Self::set_chunk) but reports why a chunk was rejected.
    pub fn try_set_chunk(&self, data: &[u8]) -> ChunkResult<()> {
        match Chunk::parse(data) {
            Ok(chunk) => self.load_sample(
                chunk.compressed,
                chunk.uncompressed_size,
                chunk.format,
                chunk.format_extra,
            ),
            Err(err) => {
                self.unload();
                Err(err)
            }
        }
    }

    /// Serializes the loaded sample, or `None` when nothing is loaded.
    pub fn get_chunk(&self) -> Option<Vec<u8>> {
        self.state
            .asset
            .lock()
            .as_ref()
            .map(|asset| asset.as_chunk().to_bytes())
    }

    /// Decodes and publishes a sample, releasing whatever was loaded before.
    ///
    /// Only mono samples are accepted. On failure the device ends up unloaded.
    pub fn load_sample(
        &self,
        compressed: &[u8],
        uncompressed_size: usize,
        format: WaveFormat,
        format_extra: &[u8],
    ) -> ChunkResult<()> {
        let decoded = match self.decode(compressed, uncompressed_size, &format) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.unload();
                return Err(err);
            }
        };

        info!(
            "Loaded sample: {} frames at {} Hz from {} compressed bytes",
            decoded.len(),
            decoded.sample_rate(),
            compressed.len()
        );

        // Held across the publish: the stored asset always matches the published sample.
        let mut asset = self.state.asset.lock();
        *asset = Some(SampleAsset {
            format,
            format_extra: format_extra.to_vec(),
            compressed: compressed.to_vec(),
            uncompressed_size,
        });
        self.state.slot.publish(Some(Arc::new(decoded)));

        Ok(())
    }

    /// Encodes float PCM with the loader's codec and loads the result.
    pub fn import_pcm(&self, pcm: &[f32], sample_rate: u32) -> ChunkResult<()> {
        let EncodedSample {
            format,
            format_extra,
            compressed,
            uncompressed_size,
        } = self.state.codec.encode(pcm, sample_rate)?;

        self.load_sample(&compressed, uncompressed_size, format, &format_extra)
    }

    pub fn unload(&self) {
        let mut asset = self.state.asset.lock();
        if asset.take().is_some() {
            debug!("Unloading sample");
        }
        self.state.slot.publish(None);
    }

    /// Releases replaced buffers the audio thread has let go of.
    pub fn collect_garbage(&self) {
        self.state.slot.collect_garbage();
    }

    fn decode(
        &self,
        compressed: &[u8],
        uncompressed_size: usize,
        format: &WaveFormat,
    ) -> ChunkResult<DecodedSample> {
        if format.channels != 1 {
            return Err(ChunkError::NotMono(format.channels));
        }
        if format.samples_per_sec == 0 {
            return Err(ChunkError::ZeroSampleRate);
        }

        if uncompressed_size > MAX_UNCOMPRESSED_SIZE {
            return Err(ChunkError::TooLarge(uncompressed_size));
        }

        let frames = uncompressed_size / DECODED_BYTES_PER_SAMPLE;
        if frames == 0 {
            return Err(ChunkError::EmptySample);
        }

        let mut samples = vec![0.0; frames];
        let written = self.state.codec.decode(compressed, format, &mut samples)?;
        samples.truncate(written);

        if samples.is_empty() {
            return Err(ChunkError::EmptySample);
        }

        Ok(DecodedSample::new(
            samples.into_boxed_slice(),
            format.samples_per_sec,
        ))
    }
}

/// The audio side of the device.
#[derive(Debug)]
pub struct Thunder {
    context: AudioMathContext,
    loader: SampleLoader,
    voices: VoicePool<ThunderVoice>,

    sample: Option<Arc<DecodedSample>>,
    generation: u64,

    level_param: f32,
    level: f32,
}

impl Default for Thunder {
    fn default() -> Self {
        Self::new(ThunderConfig::default())
    }
}

impl Thunder {
    /// Device decoding through [`PcmCodec`].
    pub fn new(config: ThunderConfig) -> Self {
        Self::with_codec(config, PcmCodec::new())
    }

    pub fn with_codec(config: ThunderConfig, codec: impl Codec + 'static) -> Self {
        Self::with_loader(config, SampleLoader::new(codec))
    }

    /// Device rendering whatever `loader` publishes.
    pub fn with_loader(config: ThunderConfig, loader: SampleLoader) -> Self {
        let mut thunder = Self {
            context: AudioMathContext::init(config.sample_rate),
            loader,
            voices: VoicePool::new(config.max_voices, |_| ThunderVoice::new()),
            sample: None,
            generation: 0,
            level_param: 0.5,
            level: 1.0,
        };
        thunder.refresh_sample();

        thunder
    }

    /// Handle for loading samples from another thread.
    pub fn loader(&self) -> SampleLoader {
        self.loader.clone()
    }

    pub fn context(&self) -> &AudioMathContext {
        &self.context
    }

    pub fn set_sample_rate(&mut self, sample_rate_hz: f32) {
        self.context.set_sample_rate(SampleRate::new(sample_rate_hz));
    }

    pub fn set_tempo(&mut self, tempo: u32) {
        self.context.set_tempo(tempo);
    }

    pub fn set_chunk(&mut self, data: &[u8]) {
        self.loader.set_chunk(data);
        self.refresh_sample();
    }

    pub fn get_chunk(&self) -> Option<Vec<u8>> {
        self.loader.get_chunk()
    }

    pub fn load_sample(
        &mut self,
        compressed: &[u8],
        uncompressed_size: usize,
        format: WaveFormat,
        format_extra: &[u8],
    ) -> ChunkResult<()> {
        let result = self
            .loader
            .load_sample(compressed, uncompressed_size, format, format_extra);
        self.refresh_sample();

        result
    }

    pub fn import_pcm(&mut self, pcm: &[f32], sample_rate: u32) -> ChunkResult<()> {
        let result = self.loader.import_pcm(pcm, sample_rate);
        self.refresh_sample();

        result
    }

    pub fn unload(&mut self) {
        self.loader.unload();
        self.refresh_sample();
    }

    /// True once a sample has been picked up by the audio side.
    pub fn is_loaded(&self) -> bool {
        self.sample.is_some()
    }

    /// Decoded sample the voices currently read from.
    pub fn sample(&self) -> Option<&DecodedSample> {
        self.sample.as_deref()
    }

    pub fn set_param(&mut self, param: ThunderParam, value: f32) {
        match param {
            ThunderParam::Level => {
                self.level_param = value;
                self.level = db_to_scalar(param_to_db(value, LEVEL_RANGE_DB));
            }
        }
    }

    pub fn get_param(&self, param: ThunderParam) -> f32 {
        match param {
            ThunderParam::Level => self.level_param,
        }
    }

    /// Current output level in dB.
    pub fn level_db(&self) -> f32 {
        scalar_to_db(self.level)
    }

    /// Starts a voice. Ignored while no sample is loaded.
    pub fn note_on(&mut self, note: i32, velocity: i32, detune: f32, pan: f32) {
        self.refresh_sample();

        let Some(sample) = self.sample.as_ref() else {
            return;
        };
        let source_rate = sample.sample_rate();

        self.voices
            .allocate()
            .note_on(&self.context, note, velocity, detune, pan, source_rate);
    }

    /// One-shot voices play to the end; the release only reaches the pool.
    pub fn note_off(&mut self, note: i32) {
        self.voices.note_off(note);
    }

    pub fn all_notes_off(&mut self) {
        self.voices.kill_all();
    }

    pub fn active_voices(&self) -> usize {
        self.voices.active_count()
    }

    /// Voices stolen because the pool was full. Meant for reporting from the control side.
    pub fn stolen_voices(&self) -> u64 {
        self.voices.stolen_count()
    }

    pub fn voices(&self) -> impl Iterator<Item = &ThunderVoice> {
        self.voices.iter()
    }

    /// Adds one block of all active voices into `left` and `right`.
    ///
    /// The outputs are accumulated into, not cleared. Never blocks or allocates.
    pub fn run(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.refresh_sample();

        let Some(sample) = self.sample.as_ref() else {
            return;
        };
        let samples = sample.samples();
        let level = self.level;

        for voice in self.voices.iter_mut() {
            voice.run(samples, level, left, right);
        }
    }

    /// Renders a block, applying `events` at their sample offsets.
    ///
    /// Events must be sorted by offset; offsets past the block are applied at its end.
    pub fn render(&mut self, events: &[NoteEvent], left: &mut [f32], right: &mut [f32]) {
        let len = left.len().min(right.len());
        let mut start = 0;

        for event in events {
            let offset = event.offset().clamp(start, len);
            if offset > start {
                self.run(&mut left[start..offset], &mut right[start..offset]);
                start = offset;
            }

            match *event {
                NoteEvent::NoteOn {
                    note,
                    velocity,
                    detune,
                    pan,
                    ..
                } => self.note_on(note, velocity, detune, pan),
                NoteEvent::NoteOff { note, .. } => self.note_off(note),
            }
        }

        if start < len {
            self.run(&mut left[start..len], &mut right[start..len]);
        }
    }

    /// Picks up a newly published sample. Voices bound to the old one are silenced first.
    fn refresh_sample(&mut self) {
        let Some(snapshot) = self.loader.slot().try_snapshot() else {
            return;
        };

        if snapshot.generation != self.generation {
            self.voices.kill_all();
            self.generation = snapshot.generation;
            self.sample = snapshot.sample;
        }
    }
}
