//! Block adaptive-gain normalization.
//!
//! Behaves like a simple analog compressor: the waveform is processed in
//! chunks of about 10 ms, and a running gain rises slowly while chunks
//! stay under the target level and drops at once when a chunk would
//! exceed it.

use crate::domain::entities::Waveform;
use crate::preprocessing::stats;
use log::debug;
use serde::Deserialize;

/// Tuning for [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Gain chunk duration in seconds (default: 0.01)
    pub chunk_seconds: f64,
    /// Per-chunk gain multiplier while under target (default: 1.05)
    pub release_factor: f32,
    /// Gain stops rising once it reaches this value (default: 100.0).
    /// One release step may overshoot it.
    pub max_gain: f32,
    /// Chunk peaks below this are treated as this value when computing
    /// attack gain (default: 0.02)
    pub silence_floor: f32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            chunk_seconds: 0.01,
            release_factor: 1.05,
            max_gain: 100.0,
            silence_floor: 0.02,
        }
    }
}

/// Running gain carried from one chunk to the next.
#[derive(Debug, Clone, Copy)]
struct GainState {
    gain: f32,
}

impl GainState {
    fn new() -> Self {
        GainState { gain: 1.0 }
    }

    /// Updates the gain for a chunk whose unscaled peak is `local_peak`.
    fn step(&mut self, local_peak: f32, target: f32, cfg: &NormalizerConfig) -> f32 {
        if local_peak < target && self.gain < cfg.max_gain {
            self.gain *= cfg.release_factor;
        }
        if local_peak * self.gain > target {
            self.gain = if local_peak < cfg.silence_floor {
                target / cfg.silence_floor
            } else {
                target / local_peak
            };
        }
        self.gain
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Normalizer { config }
    }

    /// Rescales `wav` in place so its level tracks `db_level` dBFS.
    ///
    /// `db_level` is expected in [-100, 0]; callers validate it. An empty
    /// waveform or one with a zero sample rate is left untouched. The last
    /// chunk absorbs any samples left over after the whole chunks, so
    /// every sample is scaled.
    pub fn normalize(&self, wav: &mut Waveform, db_level: f32) {
        if wav.is_empty() {
            return;
        }
        let Some(chunk) = stats::chunk_len(wav.sample_rate, self.config.chunk_seconds) else {
            return;
        };

        let target = stats::db_to_linear(db_level);
        let len = wav.len();
        let num_chunks = (len / chunk).max(1);
        let mut state = GainState::new();

        for index in 0..num_chunks {
            let start = index * chunk;
            let end = if index == num_chunks - 1 { len } else { start + chunk };
            let block = &mut wav.samples[start..end];

            let gain = state.step(stats::abs_peak(block), target, &self.config);
            block.iter_mut().for_each(|s| *s *= gain);
        }

        debug!(
            "Normalized {} samples in {} chunks to {:.4} (final gain {:.4})",
            len, num_chunks, target, state.gain
        );
    }
}

/// Normalizes `wav` toward `db_level` with the default tuning.
pub fn normalize(wav: &mut Waveform, db_level: f32) {
    Normalizer::default().normalize(wav, db_level)
}
