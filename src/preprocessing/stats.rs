//! Signal statistics shared by the segmenter and normalizer.

/// Number of samples in an analysis chunk of `seconds` at `sample_rate`,
/// rounded to the nearest sample and never less than one.
///
/// Returns `None` for a zero sample rate, which neither pass can analyze.
pub fn chunk_len(sample_rate: u32, seconds: f64) -> Option<usize> {
    if sample_rate == 0 {
        return None;
    }
    let len = (sample_rate as f64 * seconds).round();
    Some((len as usize).max(1))
}

/// Population standard deviation (divisor `n`, no Bessel correction).
pub fn std_dev(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let n = data.len() as f32;
    let mean = data.iter().sum::<f32>() / n;
    let variance = data.iter().map(|&x| (x - mean).powi(2)).sum::<f32>() / n;
    variance.sqrt()
}

/// Largest absolute value; 0.0 for an empty slice.
pub fn abs_peak(data: &[f32]) -> f32 {
    data.iter().fold(0.0f32, |peak, &x| peak.max(x.abs()))
}

/// Linear amplitude for a level in dB relative to full scale.
pub fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}
