use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use opencv::{core::Vector, imgcodecs};
use serde_json::json;
use slip_reader::batch::BatchProcessor;
use slip_reader::config::PipelineConfig;
use slip_reader::ocr::Engines;
use slip_reader::{Channel, SlipOutcome, SlipPipeline};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    /// Bank app screenshot
    ESlip,
    /// Photo of a printed receipt
    Physical,
}

impl From<Kind> for Channel {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::ESlip => Channel::ESlip,
            Kind::Physical => Channel::Physical,
        }
    }
}

/// Slip reader - extract transactions from Thai bank slips
#[derive(Parser, Debug)]
#[command(name = "slip_reader")]
#[command(about = "Extract transaction data from Thai bank slip images", long_about = None)]
struct Args {
    /// Slip channel of all input files
    #[arg(short = 'k', long, value_enum)]
    kind: Kind,

    /// JSON configuration file (defaults are used for missing keys)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Bank logo template library directory
    #[arg(short = 't', long)]
    templates: Option<PathBuf>,

    /// Slip detection model (ONNX)
    #[arg(short = 'm', long)]
    model: Option<PathBuf>,

    /// Directory containing Tesseract language data
    #[arg(long)]
    tessdata: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,

    /// Write intermediate images to this directory
    #[arg(short = 'd', long)]
    diagnostics_dir: Option<PathBuf>,

    /// Slip images to process
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter(None, log::LevelFilter::Info)
        .filter(Some("slip_reader"), log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if args.jobs == 0 {
        anyhow::bail!("At least one worker is required");
    }

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(templates) = args.templates {
        config.template_library = templates;
    }
    if let Some(model) = args.model {
        config.detector.model_path = model;
    }
    if let Some(tessdata) = args.tessdata {
        config.recognition.datapath = Some(tessdata);
    }
    if let Some(dir) = &args.diagnostics_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create diagnostics directory {}", dir.display()))?;
        config.diagnostics = true;
    }

    let channel = Channel::from(args.kind);
    if channel == Channel::Physical && !config.detector.model_path.is_file() {
        anyhow::bail!(
            "Detection model {} not found",
            config.detector.model_path.display()
        );
    }

    info!("Starting slip reader for {} {} files", args.files.len(), channel);

    let report = BatchProcessor::new(args.jobs).run(&args.files, channel, || {
        let engines = Engines::init(&config, channel == Channel::Physical)?;
        Ok(SlipPipeline::new(config.clone(), engines)?)
    })?;

    for (path, result) in &report.results {
        let line = match result {
            Ok(outcome) => {
                if let Some(dir) = &args.diagnostics_dir {
                    write_diagnostics(dir, path, outcome);
                }
                json!({
                    "file": path.display().to_string(),
                    "bank": outcome.bank,
                    "record": outcome.record,
                    "raw_text": outcome.raw_text,
                })
            }
            Err(error) => json!({
                "file": path.display().to_string(),
                "error": error.to_string(),
            }),
        };
        println!("{line}");
    }

    info!(
        "Done: {} processed, {} failed",
        report.processed(),
        report.failed()
    );
    Ok(())
}

fn write_diagnostics(dir: &Path, source: &Path, outcome: &SlipOutcome) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slip".to_string());

    for (name, image) in &outcome.diagnostics {
        let target = dir.join(format!("{stem}_{name}.png"));
        let written = target
            .to_str()
            .map(|t| imgcodecs::imwrite(t, image, &Vector::new()));
        match written {
            Some(Ok(true)) => {}
            Some(Err(e)) => warn!("Failed to write {}: {}", target.display(), e),
            _ => warn!("Failed to write {}", target.display()),
        }
    }
}
