//! Classify command - tell UV captures from standard ones.

use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use skinreport_core::{BackgroundClassifier, ImagePreprocessor, PhotoKind};

use super::load_config;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Photo files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Sample the photo as-is instead of after the report resize and crop
    #[arg(long)]
    raw: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Verdict {
    path: PathBuf,
    kind: PhotoKind,
}

pub fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let preprocessor = ImagePreprocessor::from_config(&config.imaging);
    let classifier = BackgroundClassifier::from_config(&config.classify);

    let mut files = Vec::new();
    for pattern in &args.inputs {
        let before = files.len();
        files.extend(glob(pattern)?.filter_map(|r| r.ok()).filter(|p| p.is_file()));
        if files.len() == before {
            warn!("No files match {}", pattern);
        }
    }
    if files.is_empty() {
        anyhow::bail!("No matching files found");
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut verdicts = Vec::with_capacity(files.len());
    let mut failed = 0;
    for path in files {
        pb.set_message(path.display().to_string());

        let outcome = image::open(&path).map_err(anyhow::Error::from).and_then(|image| {
            let image = if args.raw {
                image
            } else {
                preprocessor.resize_and_crop(&image)
            };
            Ok(classifier.classify(&image)?)
        });

        match outcome {
            Ok(kind) => {
                debug!("{}: {:?}", path.display(), kind);
                verdicts.push(Verdict { path, kind });
            }
            Err(e) => {
                pb.suspend(|| {
                    eprintln!("{} {}: {}", style("✗").red(), path.display(), e);
                });
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
    } else {
        for verdict in &verdicts {
            let kind = match verdict.kind {
                PhotoKind::Uv => style(verdict.kind.to_string()).magenta(),
                PhotoKind::Standard => style(verdict.kind.to_string()).cyan(),
            };
            println!("{} {}: {}", style("✓").green(), verdict.path.display(), kind);
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} photos could not be classified", failed, failed + verdicts.len());
    }
    Ok(())
}
