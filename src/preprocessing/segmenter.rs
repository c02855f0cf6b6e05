//! Silence-based segmentation.
//!
//! The waveform is examined in fixed chunks of about 50 ms. Each chunk is
//! classified loud or quiet by comparing its standard deviation with a
//! threshold derived from the whole waveform's peak. A region opens once
//! enough of the most recent chunks are loud and closes once enough of
//! them are quiet, so brief dropouts inside speech do not split it and
//! brief clicks inside silence do not start one.

use crate::domain::entities::{Region, Waveform};
use crate::preprocessing::stats;
use log::debug;
use serde::Deserialize;

/// Tuning for [`Segmenter`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Analysis chunk duration in seconds (default: 0.05)
    pub chunk_seconds: f64,
    /// Fraction of the waveform's peak used as the loudness threshold
    /// (default: 0.05)
    pub threshold_ratio: f32,
    /// How many chunks to look back over (default: 10)
    pub recent_count: usize,
    /// Loud chunks in the window needed to open a region (default: 3)
    pub louds_to_start: usize,
    /// Quiet chunks in the window needed to close a region (default: 8)
    pub quiets_to_stop: usize,
    /// Treat a region starting at chunk 0 as not started, like older
    /// releases did (default: false)
    pub legacy_zero_sentinel: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            chunk_seconds: 0.05,
            threshold_ratio: 0.05,
            recent_count: 10,
            louds_to_start: 3,
            quiets_to_stop: 8,
            legacy_zero_sentinel: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hysteresis {
    Idle,
    Active { start_chunk: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Segmenter { config }
    }

    /// Finds the non-silent regions of `wav`, in ascending order.
    ///
    /// Returns an empty list for an empty, flat, or entirely silent
    /// waveform. Samples after the last whole chunk are never part of a
    /// region.
    pub fn find_regions(&self, wav: &Waveform) -> Vec<Region> {
        let Some(chunk) = stats::chunk_len(wav.sample_rate, self.config.chunk_seconds) else {
            return Vec::new();
        };
        let loud = self.classify_chunks(wav, chunk);
        if loud.is_empty() {
            return Vec::new();
        }

        let cfg = &self.config;
        let last = loud.len() - 1;
        let mut regions = Vec::new();
        let mut state = Hysteresis::Idle;
        // Chunk where the previous region closed; later regions start no earlier.
        let mut last_close = 0;

        for tick in 0..loud.len() {
            // Window indices before the first chunk count as quiet.
            let first = (tick + 1).saturating_sub(cfg.recent_count);
            let recent_loud = loud[first..=tick].iter().filter(|&&l| l).count();
            let recent_quiet = cfg.recent_count.saturating_sub(recent_loud);

            match state {
                Hysteresis::Idle if recent_loud >= cfg.louds_to_start => {
                    let start_chunk = tick.saturating_sub(recent_loud).max(last_close);
                    if !(cfg.legacy_zero_sentinel && start_chunk == 0) {
                        state = Hysteresis::Active { start_chunk };
                    }
                }
                Hysteresis::Active { start_chunk }
                    if recent_quiet >= cfg.quiets_to_stop || tick == last =>
                {
                    regions.push(Region::new(start_chunk * chunk, (tick - start_chunk) * chunk));
                    last_close = tick;
                    state = Hysteresis::Idle;
                }
                _ => {}
            }
        }

        debug!(
            "Found {} region(s) in {} chunks of {} samples",
            regions.len(),
            loud.len(),
            chunk
        );
        regions
    }

    /// Loud/quiet verdict for every whole chunk of the waveform.
    fn classify_chunks(&self, wav: &Waveform, chunk: usize) -> Vec<bool> {
        let (min, max) = wav.min_max();
        let threshold = (max - min) / 2.0 * self.config.threshold_ratio;
        if threshold <= 0.0 {
            // Flat waveform: nothing can rise above it.
            return Vec::new();
        }
        debug!("Segmentation threshold {:.6} (chunk {} samples)", threshold, chunk);

        wav.samples
            .chunks_exact(chunk)
            .map(|c| stats::std_dev(c) >= threshold)
            .collect()
    }
}

/// Segments `wav` with the default tuning.
pub fn find_regions(wav: &Waveform) -> Vec<Region> {
    Segmenter::default().find_regions(wav)
}
