//! Signal analysis passes over a fully loaded waveform:
//! - Silence-based segmentation
//! - Block adaptive-gain normalization

pub mod normalizer;
pub mod segmenter;
pub mod stats;
