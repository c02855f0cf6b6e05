use crate::domain::entities::Waveform;
use crate::domain::errors::AppError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;
use std::path::{Path, PathBuf};

/// Loads a WAV file as a mono waveform.
///
/// 8-bit unsigned, 16-bit signed and 32-bit float PCM are supported.
/// Multi-channel audio is flattened by averaging the channels of each
/// frame.
pub fn read_wav(path: impl AsRef<Path>) -> Result<Waveform, AppError> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    debug!(
        "Reading {}: {} Hz, {} channel(s), {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        // hound hands back 8-bit data already re-centred on zero.
        (SampleFormat::Int, 8) => reader
            .samples::<i32>()
            .map(|s| s.map(|s| s as f32 / 128.0))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i32>()
            .map(|s| s.map(|s| s as f32 / 32768.0))
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(AppError::UnsupportedFormat {
                bits,
                float: format == SampleFormat::Float,
            });
        }
    };

    Ok(Waveform::new(mix_to_mono(&interleaved, spec.channels), spec.sample_rate))
}

fn mix_to_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Writes `count` samples of `wav` starting at `start` as 16-bit mono PCM.
///
/// The range must be non-empty and lie inside the waveform. Samples
/// are scaled by 32768 and rounded without clamping, so values outside
/// [-1.0, 1.0) wrap around.
pub fn write_wav(
    path: impl AsRef<Path>,
    wav: &Waveform,
    start: usize,
    count: usize,
) -> Result<(), AppError> {
    if wav.is_empty() {
        return Err(AppError::EmptyWaveform);
    }
    let len = wav.len();
    if count == 0 || start >= len || start + count > len {
        return Err(AppError::InvalidRange { start, count, len });
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: wav.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for &sample in &wav.samples[start..start + count] {
        writer.write_sample(to_pcm16(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

fn to_pcm16(sample: f32) -> i16 {
    (sample * 32768.0).round() as i32 as i16
}

/// `<stem><suffix><index>.wav` for the `index`-th (1-based) region of `input`.
pub fn segment_file_name(input: &Path, index: usize, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{}{}{}.wav", stem, suffix, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("splitspeech-wav-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_raw<S: hound::Sample + Copy>(path: &Path, spec: WavSpec, samples: &[S]) {
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn reads_16_bit_stereo_as_mono() {
        let path = scratch_dir("stereo16").join("in.wav");
        let spec = WavSpec { channels: 2, sample_rate: 8000, bits_per_sample: 16, sample_format: SampleFormat::Int };
        write_raw(&path, spec, &[16384i16, 0, -32768, -16384, 8192, 8192]);

        let wav = read_wav(&path).unwrap();
        assert_eq!(wav.sample_rate, 8000);
        assert_eq!(wav.samples, vec![0.25, -0.75, 0.25]);
    }

    #[test]
    fn reads_8_bit_unsigned() {
        let path = scratch_dir("mono8").join("in.wav");
        let spec = WavSpec { channels: 1, sample_rate: 11025, bits_per_sample: 8, sample_format: SampleFormat::Int };
        // Written as signed; stored on disk as unsigned bytes 128, 192, 0.
        write_raw(&path, spec, &[0i8, 64, -128]);

        let wav = read_wav(&path).unwrap();
        assert_eq!(wav.samples, vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn reads_float_unchanged() {
        let path = scratch_dir("float32").join("in.wav");
        let spec = WavSpec { channels: 1, sample_rate: 48000, bits_per_sample: 32, sample_format: SampleFormat::Float };
        write_raw(&path, spec, &[0.125f32, -1.5, 0.75]);

        let wav = read_wav(&path).unwrap();
        assert_eq!(wav.samples, vec![0.125, -1.5, 0.75]);
    }

    #[test]
    fn rejects_24_bit() {
        let path = scratch_dir("int24").join("in.wav");
        let spec = WavSpec { channels: 1, sample_rate: 44100, bits_per_sample: 24, sample_format: SampleFormat::Int };
        write_raw(&path, spec, &[0i32, 1000, -1000]);

        match read_wav(&path) {
            Err(AppError::UnsupportedFormat { bits: 24, float: false }) => {}
            other => panic!("expected unsupported format, got {:?}", other),
        }
    }

    #[test]
    fn rejects_garbage_header() {
        let path = scratch_dir("garbage").join("in.wav");
        fs::write(&path, b"RIFX not really a wav file").unwrap();
        assert!(matches!(read_wav(&path), Err(AppError::Wav(_))));
    }

    #[test]
    fn writes_sub_range_as_pcm16() {
        let path = scratch_dir("write").join("out.wav");
        let wav = Waveform::new(vec![0.9, 0.5, -0.25, 0.000_02, 0.1], 16000);
        write_wav(&path, &wav, 1, 3).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!((spec.channels, spec.bits_per_sample, spec.sample_rate), (1, 16, 16000));
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![16384, -8192, 1]);
    }

    #[test]
    fn zero_count_is_rejected() {
        let path = scratch_dir("zero").join("out.wav");
        let wav = Waveform::new(vec![0.0, 0.5, 0.5, 0.5], 8000);
        assert!(matches!(
            write_wav(&path, &wav, 1, 0),
            Err(AppError::InvalidRange { start: 1, count: 0, len: 4 })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn rejects_bad_ranges() {
        let dir = scratch_dir("ranges");
        let wav = Waveform::new(vec![0.1; 10], 8000);
        assert!(matches!(
            write_wav(dir.join("a.wav"), &wav, 10, 1),
            Err(AppError::InvalidRange { start: 10, .. })
        ));
        assert!(matches!(
            write_wav(dir.join("b.wav"), &wav, 5, 6),
            Err(AppError::InvalidRange { len: 10, .. })
        ));
        assert!(matches!(
            write_wav(dir.join("c.wav"), &Waveform::new(vec![], 8000), 0, 0),
            Err(AppError::EmptyWaveform)
        ));
    }

    #[test]
    fn pcm16_conversion_wraps() {
        assert_eq!(to_pcm16(0.5), 16384);
        assert_eq!(to_pcm16(-1.0), -32768);
        assert_eq!(to_pcm16(1.0), -32768);
        assert_eq!(to_pcm16(0.000_02), 1);
    }

    #[test]
    fn segment_names() {
        let name = segment_file_name(Path::new("recordings/talk.wav"), 3, "_seg");
        assert_eq!(name, PathBuf::from("talk_seg3.wav"));
        let name = segment_file_name(Path::new("noext"), 1, "_part");
        assert_eq!(name, PathBuf::from("noext_part1.wav"));
    }
}
