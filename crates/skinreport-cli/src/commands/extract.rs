//! Extract command - read the measured values from a session PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use skinreport_core::{ReportData, ReportExtractor, SessionReportParser};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Session PDF exported by the analysis device
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, _config_path: Option<&str>) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting values from {}", args.input.display());
    let data = SessionReportParser::new().extract_from_pdf(&args.input)?;

    let output = format_data(&data, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_data(data: &ReportData, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Csv => format_csv(data),
        OutputFormat::Text => Ok(format_text(data)),
    }
}

fn format_csv(data: &ReportData) -> anyhow::Result<String> {
    let entries = data.entries();
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(entries.iter().map(|(key, _)| *key))?;
    wtr.write_record(entries.iter().map(|(_, value)| *value))?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(data: &ReportData) -> String {
    let mut output = String::new();

    output.push_str(&format!("Patient: {}\n", data.name));
    output.push_str(&format!("Date: {}\n", data.date));
    output.push('\n');

    for (label, value) in data.entries().into_iter().take(8) {
        output.push_str(&format!("  {:<12} {}\n", label, value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportData {
        ReportData::from_values(
            ["12", "5", "7.5", "40", "21", "9", "14", "3.25"].map(String::from),
            "12/03/2024".to_string(),
            "Jane Doe".to_string(),
        )
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let csv = format_csv(&sample()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Spots,Wrinkles,Texture"));
        assert!(lines[1].ends_with("12/03/2024,Jane Doe"));
    }

    #[test]
    fn test_text_lists_metrics() {
        let text = format_text(&sample());
        assert!(text.starts_with("Patient: Jane Doe\n"));
        assert!(text.contains("UV Spots     21"));
    }
}
