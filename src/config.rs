//! Run configuration, optionally loaded from a TOML file.
//!
//! ```toml
//! [segmenter]
//! quiets_to_stop = 6
//!
//! [normalizer]
//! max_gain = 50.0
//!
//! [output]
//! level_db = -3.0
//! directory = "segments"
//! ```

use crate::domain::errors::AppError;
use crate::preprocessing::normalizer::NormalizerConfig;
use crate::preprocessing::segmenter::SegmenterConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_LEVEL_DB: f32 = -100.0;
pub const MAX_LEVEL_DB: f32 = 0.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Normalization target in dBFS, -100 to 0 (default: -1.0)
    pub level_db: f32,
    /// Where segment files are written (default: current directory)
    pub directory: PathBuf,
    /// Inserted between the input stem and the segment number
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            level_db: -1.0,
            directory: PathBuf::from("."),
            suffix: "_seg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub segmenter: SegmenterConfig,
    pub normalizer: NormalizerConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_level(self.output.level_db)?;

        let seg = &self.segmenter;
        if !(seg.chunk_seconds > 0.0) {
            return invalid("segmenter.chunk_seconds must be positive");
        }
        if !(seg.threshold_ratio >= 0.0) {
            return invalid("segmenter.threshold_ratio must not be negative");
        }
        if seg.recent_count == 0 {
            return invalid("segmenter.recent_count must be at least 1");
        }
        if seg.louds_to_start == 0 || seg.louds_to_start > seg.recent_count {
            return invalid("segmenter.louds_to_start must be between 1 and recent_count");
        }
        if seg.quiets_to_stop == 0 || seg.quiets_to_stop > seg.recent_count {
            return invalid("segmenter.quiets_to_stop must be between 1 and recent_count");
        }

        let norm = &self.normalizer;
        if !(norm.chunk_seconds > 0.0) {
            return invalid("normalizer.chunk_seconds must be positive");
        }
        if !(norm.release_factor >= 1.0) {
            return invalid("normalizer.release_factor must be at least 1.0");
        }
        if !(norm.max_gain > 0.0) {
            return invalid("normalizer.max_gain must be positive");
        }
        if !(norm.silence_floor > 0.0) {
            return invalid("normalizer.silence_floor must be positive");
        }
        Ok(())
    }
}

/// Checks a normalization level against the supported [-100, 0] dB range.
pub fn validate_level(level_db: f32) -> Result<f32, AppError> {
    if (MIN_LEVEL_DB..=MAX_LEVEL_DB).contains(&level_db) {
        Ok(level_db)
    } else {
        Err(AppError::InvalidLevel(level_db))
    }
}

fn invalid(msg: &str) -> Result<(), AppError> {
    Err(AppError::InvalidConfig(msg.to_string()))
}
