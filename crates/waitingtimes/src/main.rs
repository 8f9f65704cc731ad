mod config;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use waitingtimes_parser::import_patient_data;

use crate::render::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Patient waiting-times data tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a patient visit CSV and print it with the derived datetime columns
    Import(ImportArgs),
    /// Import a patient visit CSV and print a short summary
    Check(CheckArgs),
    /// Print the expected input columns and the derived columns
    Schema,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Patient visit CSV (falls back to $WAITINGTIMES_PATIENT_DATA)
    path: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// Print at most this many rows
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Patient visit CSV (falls back to $WAITINGTIMES_PATIENT_DATA)
    path: Option<PathBuf>,
    /// Emit the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Import(args) => handle_import(args),
        Command::Check(args) => handle_check(args),
        Command::Schema => {
            print!("{}", render::schema_listing());
            Ok(())
        }
    }
}

fn handle_import(args: ImportArgs) -> Result<()> {
    let path = config::resolve_input(args.path)?;
    let df = import_patient_data(&path)
        .with_context(|| format!("failed to import {}", path.display()))?;

    let output = render::render_frame(&df, args.format, args.limit)?;
    print!("{output}");
    Ok(())
}

fn handle_check(args: CheckArgs) -> Result<()> {
    let path = config::resolve_input(args.path)?;
    let df = import_patient_data(&path)
        .with_context(|| format!("failed to import {}", path.display()))?;

    let summary = render::summarize(&path, &df)?;
    info!(rows = summary.rows, "patient data check passed");
    print!("{}", render::render_summary(&summary, args.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_import_options() {
        let cli = Cli::try_parse_from([
            "waitingtimes",
            "import",
            "visits.csv",
            "--format",
            "json",
            "--limit",
            "5",
        ])
        .expect("parse import args");

        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.path, Some(PathBuf::from("visits.csv")));
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("expected import command, got {other:?}"),
        }
    }

    #[test]
    fn path_is_optional() {
        let cli = Cli::try_parse_from(["waitingtimes", "check", "--json"]).expect("parse check");
        match cli.command {
            Command::Check(args) => {
                assert!(args.path.is_none());
                assert!(args.json);
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["waitingtimes", "import", "--format", "xml"]).is_err());
    }
}
