//! Generate command - build the report for one session folder.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use skinreport_core::report::Edition;
use skinreport_core::{Pipeline, RunSummary, SkinConfig};

use super::load_config;

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Folder holding the session PDF and photos
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Root folder for generated reports
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Folder with fonts and branding images (default: <export>/Assets)
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Report edition
    #[arg(long)]
    edition: Option<Edition>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = apply_overrides(load_config(config_path)?, &args);

    info!("Generating report from {}", config.paths.input_dir.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = Pipeline::new(config).run_with(|stage| pb.set_message(format!("{}...", stage)));
    pb.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(err) if err.is_input_error() => {
            error!("{}", err);
            eprintln!("{} {}", style("✗").red(), err);
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    debug!("Total generation time: {:?}", start.elapsed());
    Ok(())
}

fn apply_overrides(mut config: SkinConfig, args: &GenerateArgs) -> SkinConfig {
    if let Some(input) = &args.input {
        config.paths.input_dir = input.clone();
    }
    if let Some(export) = &args.export {
        config.paths.export_root = export.clone();
    }
    if let Some(assets) = &args.assets {
        config.paths.asset_dir = Some(assets.clone());
    }
    if let Some(edition) = args.edition {
        config.report.edition = edition;
    }
    config
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} Report written to {}",
        style("✓").green(),
        summary.report_path.display()
    );
    println!(
        "{} {} ({}), {} edition",
        style("ℹ").blue(),
        summary.data.name,
        summary.data.date,
        summary.edition
    );
    println!(
        "{} {} photo pages ({} UV), {} content pages, {} grid tiles",
        style("ℹ").blue(),
        summary.photo_pages,
        summary.uv_photos,
        summary.content_pages,
        summary.tiles
    );
}
