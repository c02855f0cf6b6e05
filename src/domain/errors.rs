use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported sample format: {bits}-bit (float: {float})")]
    UnsupportedFormat { bits: u16, float: bool },
    #[error("Level {0} dB out of range (expected value -100 to 0)")]
    InvalidLevel(f32),
    #[error("Sample range {start}+{count} outside waveform of {len} samples")]
    InvalidRange { start: usize, count: usize, len: usize },
    #[error("No audio data to output")]
    EmptyWaveform,
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
