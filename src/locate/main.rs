//! Single-text locator.
//!
//! Reads an accident report from the arguments or stdin and prints the
//! estimated coordinate.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rta_locator::{Config, Locator};

#[derive(Parser, Debug)]
#[command(name = "locate")]
#[command(about = "Estimate the coordinate of an accident report")]
struct Args {
    /// Report text; read from stdin when omitted
    text: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gazetteer JSON file (overrides the configuration)
    #[arg(short, long)]
    gazetteer: Option<PathBuf>,

    /// Lemma dictionary file or directory (overrides the configuration)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Print the estimate and all candidates as JSON
    #[arg(long)]
    json: bool,
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
    if let Some(path) = args.dictionary {
        config.lemmatizer.dictionary = Some(path);
    }

    let locator = Locator::from_config(&config).context("Failed to initialize locator")?;

    let text = if args.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read text from stdin")?;
        buf
    } else {
        args.text.join(" ")
    };

    let location = locator.locate(&text);
    info!("{} candidate(s)", location.candidates.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&location)?);
    } else {
        for candidate in &location.candidates {
            info!(
                "{:<13} {:.1} {:.6}, {:.6}  {}",
                candidate.source.to_string(),
                candidate.confidence,
                candidate.lat,
                candidate.lon,
                candidate.details
            );
        }
        println!("{}, {}", location.point.lat, location.point.lon);
    }

    Ok(())
}
