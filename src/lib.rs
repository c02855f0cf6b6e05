//! Splits speech recordings at silences and levels them with an adaptive
//! gain pass.
//!
//! ```no_run
//! use splitspeech::infrastructure::wav::read_wav;
//! use splitspeech::preprocessing::{normalizer::normalize, segmenter::find_regions};
//!
//! let mut wav = read_wav("talk.wav")?;
//! let regions = find_regions(&wav);
//! normalize(&mut wav, -1.0);
//! println!("{} region(s)", regions.len());
//! # Ok::<(), splitspeech::AppError>(())
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod preprocessing;

pub use config::Config;
pub use domain::entities::{Region, Waveform};
pub use domain::errors::AppError;
