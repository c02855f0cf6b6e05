use serde::Serialize;

/// A mono PCM waveform held as floating-point samples, nominally in
/// [-1.0, +1.0]. Values outside that range are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Waveform { samples, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds, or 0.0 for an empty buffer or zero sample rate.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.samples.is_empty() {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Lowest and highest sample values; `(0.0, 0.0)` when empty.
    pub fn min_max(&self) -> (f32, f32) {
        if self.samples.is_empty() {
            return (0.0, 0.0);
        }
        self.samples
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &x| (lo.min(x), hi.max(x)))
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, &x| peak.max(x.abs()))
    }
}

/// A non-silent stretch of a waveform: the half-open sample range
/// `[start, start + count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub start: usize,
    pub count: usize,
}

impl Region {
    pub fn new(start: usize, count: usize) -> Self {
        Region { start, count }
    }

    pub fn end(&self) -> usize {
        self.start + self.count
    }

    pub fn start_seconds(&self, sample_rate: u32) -> f64 {
        seconds(self.start, sample_rate)
    }

    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        seconds(self.count, sample_rate)
    }

    pub fn end_seconds(&self, sample_rate: u32) -> f64 {
        seconds(self.end(), sample_rate)
    }
}

fn seconds(samples: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        0.0
    } else {
        samples as f64 / sample_rate as f64
    }
}
