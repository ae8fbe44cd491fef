//! Batch evaluation against a labeled set of accident reports.
//!
//! Locates every text, measures the geodesic error against the labeled
//! coordinate and writes a JSON report.

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rta_locator::{Config, Locator};

use crate::report::{load_test_set, snippet, text_result, Report};

#[derive(Parser, Debug)]
#[command(name = "evaluate")]
#[command(about = "Evaluate the locator on labeled accident reports")]
struct Args {
    /// Labeled texts (`{"text_list": [{"text", "rta_coords"}]}`)
    #[arg(short, long, default_value = "rta_texts.json")]
    input: PathBuf,

    /// Where to write the JSON report
    #[arg(short, long, default_value = "test_results.json")]
    output: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gazetteer JSON file (overrides the configuration)
    #[arg(short, long)]
    gazetteer: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(path) = args.gazetteer {
        config.gazetteer.path = path;
    }

    let locator = Locator::from_config(&config).context("Failed to initialize locator")?;
    let test_set = load_test_set(&args.input)?;
    if test_set.text_list.is_empty() {
        anyhow::bail!("Test set {} contains no texts", args.input.display());
    }

    let pb = ProgressBar::new(test_set.text_list.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let results: Vec<_> = test_set
        .text_list
        .par_iter()
        .enumerate()
        .map(|(i, item)| {
            let predicted = locator.locate(&item.text).point;
            pb.inc(1);
            text_result(i + 1, predicted, item.actual())
        })
        .collect();

    pb.finish_with_message("Evaluation complete");

    println!(
        "{:<3} | {:<40} | {:<25} | {:<25} | {:<10}",
        "ID", "Text Snippet", "Predicted Coords", "Actual Coords", "Error (m)"
    );
    println!("{}", "-".repeat(130));
    for (result, item) in results.iter().zip(&test_set.text_list) {
        let predicted = format!("{:.6}, {:.6}", result.predicted[0], result.predicted[1]);
        let actual = format!("{:.6}, {:.6}", result.actual[0], result.actual[1]);
        println!(
            "{:<3} | {:<40} | {:<25} | {:<25} | {:<10.2}",
            result.id,
            snippet(&item.text, 40),
            predicted,
            actual,
            result.error_meters
        );
    }

    let report = Report::new(results);
    println!("{}", "-".repeat(130));
    println!("\nAverage error: {:.2} meters", report.average_error_meters);

    report.write(&args.output)?;
    info!("Results saved to {}", args.output.display());

    Ok(())
}
