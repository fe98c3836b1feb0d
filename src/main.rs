//! Paged-editor CLI (for testing purposes only)
//! The main interface is through WASM bindings.
//!
//! Heights are read from stdin (whitespace separated) when none are given.
//! Prints the page ranges as JSON.

use clap::Parser;
use paged_editor::layout::page::CONTENT_HEIGHT_PX;
use paged_editor::{MeasureError, MeasuredHeights, Pagination};
use std::io::{self, Read};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "paged-editor", about = "Split block heights into letter pages", version)]
struct Cli {
    /// Page content height in pixels
    #[arg(long, default_value_t = f64::from(CONTENT_HEIGHT_PX), value_parser = parse_px)]
    budget: f64,

    /// Block heights in pixels, e.g. `120` or `120.5px`
    #[arg(value_parser = parse_px, allow_negative_numbers = true)]
    heights: Vec<f64>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read stdin: {0}")]
    Stdin(#[from] io::Error),
    #[error("not a pixel value: {0}")]
    NotPixels(String),
    #[error(transparent)]
    Measure(#[from] MeasureError),
    #[error("failed to serialize ranges: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(mut cli: Cli) -> Result<String, CliError> {
    if cli.heights.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        cli.heights = parse_heights(&input)?;
    }
    paginate(&cli)
}

fn paginate(cli: &Cli) -> Result<String, CliError> {
    let heights = MeasuredHeights::try_from_px(&cli.heights)?;
    let pagination = Pagination::compute(&heights, cli.budget);
    tracing::info!(
        blocks = heights.len(),
        pages = pagination.page_count(),
        budget = cli.budget,
        "paginated"
    );

    Ok(serde_json::to_string_pretty(&pagination.ranges())?)
}

fn parse_heights(input: &str) -> Result<Vec<f64>, CliError> {
    input
        .split_whitespace()
        .map(|value| parse_px(value).map_err(|_| CliError::NotPixels(value.to_owned())))
        .collect()
}

fn parse_px(value: &str) -> Result<f64, String> {
    value
        .trim_end_matches("px")
        .parse()
        .map_err(|_| format!("not a pixel value: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("paged-editor").chain(args.iter().copied()))
    }

    #[test]
    fn test_budget_defaults_to_letter_content() {
        let cli = parse(&["400", "400"]).unwrap();
        assert_eq!(cli.budget, 864.0);
        assert_eq!(cli.heights, vec![400.0, 400.0]);
    }

    #[test]
    fn test_budget_forms() {
        let joined = parse(&["--budget=800", "400", "400"]).unwrap();
        let spaced = parse(&["--budget", "800px", "400", "400"]).unwrap();
        assert_eq!(joined.budget, 800.0);
        assert_eq!(spaced.budget, 800.0);
        assert_eq!(joined.heights, spaced.heights);
    }

    #[test]
    fn test_help_and_bad_values() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["tall"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(parse(&["--budget"]).unwrap_err().kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_negative_height_is_rejected_after_parsing() {
        let cli = parse(&["100", "-5"]).unwrap();
        assert!(matches!(paginate(&cli), Err(CliError::Measure(_))));
    }

    #[test]
    fn test_paginate_prints_ranges() {
        let cli = parse(&["--budget=800", "400", "400", "100.5px"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&paginate(&cli).unwrap()).unwrap();
        assert_eq!(json[0]["endIndex"], 1);
        assert_eq!(json[1]["startIndex"], 2);
    }

    #[test]
    fn test_stdin_heights() {
        assert_eq!(parse_heights("10 20px\n30").unwrap(), vec![10.0, 20.0, 30.0]);
        assert!(matches!(parse_heights("10 x"), Err(CliError::NotPixels(v)) if v == "x"));
    }
}
