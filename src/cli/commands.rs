//! Command implementations

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use tracing::{info, warn};

use crate::adapters::FfmpegAdapter;
use crate::app::{spawn_job, AppContainer, DefaultAppContainer};
use crate::cli::args::{DetectArgs, InspectArgs, RunArgs};
use crate::config_initialization::{initialize_job_configuration, settings_store};
use crate::domain::model::JobEvent;
use crate::highlight::{energy_curve_for_file, HighlightDetector};
use crate::ports::Transcoder;
use crate::utils::logging::progress_line;
use crate::utils::path::ToolLocation;
use crate::utils::{format_file_size, to_timecode};

/// Execute the run command
pub async fn run(args: RunArgs, settings_path: Option<&Path>) -> Result<()> {
    let store = settings_store(settings_path);
    let config = initialize_job_configuration(&args, &store)?;

    info!("URL: {}", config.url);
    info!(
        "{} clip(s) of {}s, {}, {}",
        config.num_clips, config.clip_duration, config.quality, config.aspect_mode
    );
    info!("Output: {}", config.output_dir.display());

    let container = DefaultAppContainer::new(&config.tools, args.yt_dlp.clone());
    let mut job = spawn_job(container.orchestrator(config));

    let mut outcome = None;
    while let Some(event) = job.recv().await {
        match event {
            JobEvent::Log(line) => println!("{}", line),
            JobEvent::Progress(percent) => println!("{}", progress_line(percent)),
            JobEvent::Done(dir) => {
                println!("Highlights saved to {}", dir.display());
                outcome = Some(Ok(()));
            }
            JobEvent::Error(message) => outcome = Some(Err(anyhow!(message))),
        }
    }

    let state = job.join().await;
    info!("Job finished in state {}", state);
    outcome.unwrap_or_else(|| Err(anyhow!("Job ended in state {} without a result", state)))
}

/// Execute the detect command
pub async fn detect(args: DetectArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let input = args.input.clone();
    let curve = tokio::task::spawn_blocking(move || energy_curve_for_file(&input))
        .await
        .context("Analysis worker failed")?
        .with_context(|| format!("Failed to analyze {}", args.input.display()))?;

    let windows = HighlightDetector::new(args.duration, args.clips as usize).detect(&curve);
    if windows.is_empty() {
        warn!("No highlight found in {}", args.input.display());
    }

    if args.json {
        let windows: Vec<_> = windows
            .iter()
            .map(|w| {
                json!({
                    "start": w.start_timecode(),
                    "end": w.end_timecode(),
                    "start_seconds": w.start_seconds,
                    "end_seconds": w.end_seconds,
                    "peak_second": w.peak_second,
                    "peak_energy": w.peak_energy,
                })
            })
            .collect();
        let report = json!({
            "input": args.input.display().to_string(),
            "analyzed_seconds": curve.len(),
            "windows": windows,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize windows")?
        );
    } else {
        println!(
            "Analyzed {} second(s) of {}",
            curve.len(),
            args.input.display()
        );
        for (index, window) in windows.iter().enumerate() {
            println!(
                "  #{}: {} (peak at {}s, energy {:.4})",
                index + 1,
                window,
                window.peak_second,
                window.peak_energy
            );
        }
    }

    Ok(())
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let tools = match &args.ffmpeg {
        Some(path) => ToolLocation::resolve(path)?,
        None => ToolLocation::discover()
            .ok_or_else(|| anyhow!("ffmpeg was not found on PATH; pass --ffmpeg"))?,
    };
    let transcoder = FfmpegAdapter::new(&tools);

    let duration = transcoder
        .probe_duration(&args.input)
        .await
        .context("Failed to probe duration")?;
    // Audio-only inputs have no video stream
    let resolution = match transcoder.probe_resolution(&args.input).await {
        Ok(resolution) => Some(resolution),
        Err(e) => {
            warn!("No video resolution: {}", e);
            None
        }
    };
    let size = std::fs::metadata(&args.input)
        .with_context(|| format!("Failed to stat {}", args.input.display()))?
        .len();

    if args.json {
        let report = json!({
            "input": args.input.display().to_string(),
            "duration_seconds": duration,
            "width": resolution.map(|r| r.width),
            "height": resolution.map(|r| r.height),
            "size_bytes": size,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize media info")?
        );
    } else {
        println!("File: {}", args.input.display());
        println!(
            "Duration: {} ({:.2}s)",
            to_timecode(duration.max(0.0) as u64),
            duration
        );
        match resolution {
            Some(r) => println!("Resolution: {}x{}", r.width, r.height),
            None => println!("Resolution: n/a"),
        }
        println!("Size: {}", format_file_size(size));
    }

    Ok(())
}
