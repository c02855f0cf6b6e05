use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use splitspeech::config::{Config, validate_level};
use splitspeech::infrastructure::report::{self, FileReport, RegionReport, RunReport};
use splitspeech::infrastructure::wav::{read_wav, segment_file_name, write_wav};
use splitspeech::preprocessing::normalizer::Normalizer;
use splitspeech::preprocessing::segmenter::Segmenter;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Split WAV recordings into their non-silent segments, normalizing the audio level.
#[derive(Parser)]
#[clap(name = "splitspeech", version)]
struct Cli {
    /// Normalize audio to this level in dB, between -100 and 0 inclusive [default: -1.0]
    #[clap(long, allow_hyphen_values = true)]
    level: Option<f32>,

    /// Directory to write segment files into [default: current directory]
    #[clap(long)]
    out_dir: Option<PathBuf>,

    /// TOML file with segmenter/normalizer tuning
    #[clap(long)]
    config: Option<PathBuf>,

    /// Write a JSON summary of the run to this file
    #[clap(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,

    /// WAV files to process
    #[clap(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(0) => {
            println!("Completed OK.");
            ExitCode::SUCCESS
        }
        Ok(errors) => {
            println!("Exiting with {} error(s)!", errors);
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filter) if !verbose => {
            builder.parse_filters(&filter);
        }
        _ => {
            builder.filter_level(if verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            });
        }
    }
    builder.init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    if let Some(level) = cli.level {
        config.output.level_db = validate_level(level)?;
    }
    if let Some(dir) = &cli.out_dir {
        config.output.directory = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Processes every input file, returning how many of them failed.
fn run(cli: &Cli) -> Result<usize> {
    let config = load_config(cli)?;
    fs::create_dir_all(&config.output.directory).with_context(|| {
        format!("Failed to create output directory '{}'", config.output.directory.display())
    })?;

    let segmenter = Segmenter::new(config.segmenter.clone());
    let normalizer = Normalizer::new(config.normalizer.clone());
    let mut run_report = RunReport {
        level_db: config.output.level_db,
        files: Vec::with_capacity(cli.files.len()),
    };

    let pb = if cli.files.len() > 1 {
        let pb = ProgressBar::new(cli.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        pb.set_message("Splitting audio files");
        Some(pb)
    } else {
        None
    };

    for path in &cli.files {
        let mut file_report = FileReport::new(path);
        let outcome = match &pb {
            Some(pb) => pb.suspend(|| {
                process_file(path, &config, &segmenter, &normalizer, &mut file_report)
            }),
            None => process_file(path, &config, &segmenter, &normalizer, &mut file_report),
        };
        if let Err(e) = outcome {
            let message = format!("{:#}", e);
            println!("{}", report::describe_failure(path, &message));
            debug!("Failed to process {}", path.display());
            file_report.error = Some(message);
        }
        run_report.files.push(file_report);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_with_message("Splitting completed!");
    }

    if let Some(path) = &cli.report {
        run_report
            .save(path)
            .with_context(|| format!("Failed to write report '{}'", path.display()))?;
        info!("Wrote report to {}", path.display());
    }

    Ok(run_report.error_count())
}

fn process_file(
    path: &Path,
    config: &Config,
    segmenter: &Segmenter,
    normalizer: &Normalizer,
    file_report: &mut FileReport,
) -> Result<()> {
    let mut wav = read_wav(path)
        .with_context(|| format!("Attempted load of '{}' was not successful", path.display()))?;
    file_report.sample_rate = wav.sample_rate;
    file_report.duration_seconds = wav.duration_seconds();
    println!("{}", report::describe_file(path, &wav));

    let regions = segmenter.find_regions(&wav);
    if regions.is_empty() {
        anyhow::bail!("Failed segmenting '{}'. Is the entire waveform silent?", path.display());
    }
    info!("{}: {} segment(s)", path.display(), regions.len());

    for (i, region) in regions.iter().enumerate() {
        println!("{}", report::describe_region(i + 1, region, wav.sample_rate));
        file_report.regions.push(RegionReport::new(region, wav.sample_rate));
    }

    normalizer.normalize(&mut wav, config.output.level_db);

    for (i, region) in regions.iter().enumerate() {
        let name = segment_file_name(path, i + 1, &config.output.suffix);
        let out = config.output.directory.join(name);
        println!(
            "Writing '{}' starting at {} for {} samples",
            out.display(),
            region.start,
            region.count
        );
        write_wav(&out, &wav, region.start, region.count)
            .with_context(|| format!("Attempted write of '{}' was not successful", out.display()))?;
        file_report.outputs.push(out);
    }

    Ok(())
}
