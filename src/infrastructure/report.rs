use crate::domain::entities::{Region, Waveform};
use crate::domain::errors::AppError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Formats a duration as `[Hh:][MMm:]SS.SSs`, e.g. `1h:02m:03.50s`,
/// `4m:05.25s` or `7.00s`.
pub fn format_duration(seconds: f64) -> String {
    let hours = (seconds / 3600.0) as u64;
    let rest = seconds - (hours * 3600) as f64;
    let minutes = (rest / 60.0) as u64;
    let secs = rest - (minutes * 60) as f64;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h:", hours));
    }
    if minutes > 0 {
        if hours > 0 {
            out.push_str(&format!("{:02}m:", minutes));
        } else {
            out.push_str(&format!("{}m:", minutes));
        }
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{:05.2}s", secs));
    } else {
        out.push_str(&format!("{:.2}s", secs));
    }
    out
}

/// Console summary of a loaded file.
pub fn describe_file(path: &Path, wav: &Waveform) -> String {
    format!(
        "File {}:\n  Sample rate:  {:.2} KHz\n  Duration:     {}",
        path.display(),
        wav.sample_rate as f64 / 1000.0,
        format_duration(wav.duration_seconds())
    )
}

/// Console summary of the `number`-th (1-based) region.
pub fn describe_region(number: usize, region: &Region, sample_rate: u32) -> String {
    format!(
        "Segment {}:\n  Starts at sample {}, runs for {} samples\n  Start time:  {}\n  Length:      {}\n  End time:    {}",
        number,
        region.start,
        region.count,
        format_duration(region.start_seconds(sample_rate)),
        format_duration(region.duration_seconds(sample_rate)),
        format_duration(region.end_seconds(sample_rate))
    )
}

/// Console lines for a file that could not be processed.
pub fn describe_failure(path: &Path, error: &str) -> String {
    format!(
        "ERROR: {}\nERROR: One or more error(s) processing {}",
        error,
        path.display()
    )
}

#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub start: usize,
    pub count: usize,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

impl RegionReport {
    pub fn new(region: &Region, sample_rate: u32) -> Self {
        RegionReport {
            start: region.start,
            count: region.count,
            start_seconds: region.start_seconds(sample_rate),
            duration_seconds: region.duration_seconds(sample_rate),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    pub regions: Vec<RegionReport>,
    pub outputs: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(input: &Path) -> Self {
        FileReport {
            input: input.to_path_buf(),
            sample_rate: 0,
            duration_seconds: 0.0,
            regions: Vec::new(),
            outputs: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub level_db: f32,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(7.0), "7.00s");
        assert_eq!(format_duration(0.0), "0.00s");
        assert_eq!(format_duration(245.25), "4m:05.25s");
        assert_eq!(format_duration(3723.5), "1h:02m:03.50s");
        assert_eq!(format_duration(3605.0), "1h:05.00s");
    }

    #[test]
    fn region_description() {
        let text = describe_region(2, &Region::new(15_000, 5_000), 10_000);
        assert!(text.starts_with("Segment 2:"));
        assert!(text.contains("Starts at sample 15000, runs for 5000 samples"));
        assert!(text.contains("Start time:  1.50s"));
        assert!(text.contains("End time:    2.00s"));
    }

    #[test]
    fn failure_is_reported_once() {
        let text = describe_failure(Path::new("bad.wav"), "Attempted load of 'bad.wav' was not successful");
        assert_eq!(
            text,
            "ERROR: Attempted load of 'bad.wav' was not successful\n\
             ERROR: One or more error(s) processing bad.wav"
        );
        assert_eq!(text.matches("was not successful").count(), 1);
    }

    #[test]
    fn file_description() {
        let wav = Waveform::new(vec![0.0; 44_100 * 90], 44_100);
        let text = describe_file(Path::new("a.wav"), &wav);
        assert!(text.contains("44.10 KHz"));
        assert!(text.contains("1m:30.00s"));
    }

    #[test]
    fn report_serializes() {
        let mut file = FileReport::new(Path::new("talk.wav"));
        file.sample_rate = 8000;
        file.regions.push(RegionReport::new(&Region::new(800, 400), 8000));
        let report = RunReport { level_db: -1.0, files: vec![file] };

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files"][0]["regions"][0]["start"], 800);
        assert_eq!(json["files"][0]["regions"][0]["start_seconds"], 0.1);
        assert!(json["files"][0].get("error").is_none());
        assert_eq!(report.error_count(), 0);
    }
}
