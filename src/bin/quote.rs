//! One-shot premium quote from a JSON profile.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin quote -- [--model <dir>] [--city-tiers <file>] [<profile.json> | -]
//! ```
//!
//! Reads a profile such as
//! `{"age": 30, "weight": 90, "height": 1.75, "income_lpa": 12, "smoker": false,
//! "city": "Mumbai", "occupation": "private_job"}` from the file (or stdin when
//! omitted or `-`) and prints the quote as JSON. Other settings come from the
//! same `PREMIUM_*` environment variables as the TUI.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use premium_predictor::adapters::sanitize::RedactingMakeWriter;
use premium_predictor::application::build_service;
use premium_predictor::config::AppConfig;
use premium_predictor::domain::{ValidationError, ValidationErrors};
use premium_predictor::ProfileInput;

struct Args {
    model: Option<PathBuf>,
    city_tiers: Option<PathBuf>,
    input: Option<PathBuf>,
}

fn usage() -> String {
    "Usage: quote [--model <dir>] [--city-tiers <file>] [<profile.json> | -]".to_string()
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut parsed = Args {
        model: None,
        city_tiers: None,
        input: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => {
                let v = args.next().with_context(usage)?;
                parsed.model = Some(PathBuf::from(v));
            }
            "--city-tiers" => {
                let v = args.next().with_context(usage)?;
                parsed.city_tiers = Some(PathBuf::from(v));
            }
            "-h" | "--help" => bail!(usage()),
            "-" => {}
            _ => {
                if parsed.input.is_some() {
                    bail!(usage());
                }
                parsed.input = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(parsed)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read profile from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    // stdout carries the quote; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(RedactingMakeWriter::new(std::io::stderr)),
        )
        .init();

    let args = parse_args()?;

    let mut config = AppConfig::from_env()?;
    if let Some(model) = args.model {
        config.model_path = model;
    }
    if let Some(city_tiers) = args.city_tiers {
        config.city_tiers_path = Some(city_tiers);
    }

    let service = build_service(&config)?;

    let raw = read_input(args.input.as_ref())?;
    let input: ProfileInput = serde_json::from_str(&raw)
        .map_err(|e| ValidationErrors::from(ValidationError::Malformed(e.to_string())))
        .map_err(premium_predictor::InsuranceError::from)?;

    let quote = service.quote(&input)?;
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}
