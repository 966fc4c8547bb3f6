//! # edi-cli
//!
//! Command-line interface for parsing MSCONS and APERAK interchanges.
//!
//! `edi parse` prints the parsed interchanges as JSON on stdout;
//! `edi validate` additionally checks the UNB/UNZ and UNH/UNT envelopes.
//! Logs go to stderr; set `LOGGING_CONFIG=json` for JSON log lines and
//! `RUST_LOG` to change the level.
//!
//! Exit codes: 0 on success, 1 when at least one file failed, 3 when the
//! configuration could not be loaded.

use anyhow::Context;
use clap::{Parser, Subcommand};
use edi_energy_model::Interchange;
use edi_energy_parser::{EdifactParser, ParserConfig};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const EXIT_FAILED: u8 = 1;
const EXIT_FATAL: u8 = 3;

#[derive(Parser)]
#[command(name = "edi")]
#[command(about = "MSCONS/APERAK interchange parser")]
#[command(version)]
struct Cli {
    /// Path to parser configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse interchange files and print them as JSON
    Parse {
        /// Input file paths
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Stop after this many segments per file
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Parse interchange files and check their envelopes
    Validate {
        /// Input file paths
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Serialize)]
struct ParsedFile<'a> {
    file: String,
    interchange: &'a Interchange,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = env::var("LOGGING_CONFIG").is_ok_and(|value| value.eq_ignore_ascii_case("json"));
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ParserConfig> {
    match path {
        Some(path) => ParserConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(ParserConfig::default()),
    }
}

async fn run(command: Commands, mut config: ParserConfig) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Parse {
            files,
            pretty,
            max_lines,
        } => {
            if max_lines.is_some() {
                config.max_lines_to_parse = max_lines;
            }
            tracing::info!(files = files.len(), "Parsing");
            let results = parse_files(files, config).await?;

            let mut parsed = Vec::new();
            let mut errors = 0;
            for (path, result) in &results {
                match result {
                    Ok(interchange) => parsed.push(ParsedFile {
                        file: path.display().to_string(),
                        interchange,
                    }),
                    Err(e) => {
                        errors += 1;
                        eprintln!("ERROR: {e:#}");
                    }
                }
            }

            let json = if pretty {
                serde_json::to_string_pretty(&parsed)
            } else {
                serde_json::to_string(&parsed)
            }
            .context("Failed to serialize parse output")?;
            println!("{json}");

            let messages: usize = parsed.iter().map(|p| p.interchange.nachrichten.len()).sum();
            eprintln!(
                "Parse summary: files={}, messages={messages}, errors={errors}",
                results.len()
            );
            Ok(exit_code(errors))
        }
        Commands::Validate { files } => {
            config.validate_envelopes = true;
            tracing::info!(files = files.len(), "Validating");
            let results = parse_files(files, config).await?;

            let mut errors = 0;
            for (path, result) in &results {
                match result {
                    Ok(interchange) => println!(
                        "{}: valid ({} messages)",
                        path.display(),
                        interchange.nachrichten.len()
                    ),
                    Err(e) => {
                        errors += 1;
                        eprintln!("ERROR: {e:#}");
                    }
                }
            }
            eprintln!(
                "Validation summary: files={}, invalid={errors}",
                results.len()
            );
            Ok(exit_code(errors))
        }
    }
}

fn exit_code(errors: usize) -> ExitCode {
    if errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILED)
    }
}

/// Parse every file on the blocking pool; results keep the input order
async fn parse_files(
    files: Vec<PathBuf>,
    config: ParserConfig,
) -> anyhow::Result<Vec<(PathBuf, anyhow::Result<Interchange>)>> {
    let parser = Arc::new(EdifactParser::with_config(config));

    let tasks: Vec<_> = files
        .into_iter()
        .map(|path| {
            let parser = Arc::clone(&parser);
            let task = tokio::spawn(parse_file(parser, path.clone()));
            (path, task)
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for (path, task) in tasks {
        let result = task.await.context("Parser task panicked")?;
        results.push((path, result));
    }
    Ok(results)
}

async fn parse_file(parser: Arc<EdifactParser>, path: PathBuf) -> anyhow::Result<Interchange> {
    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let interchange = tokio::task::spawn_blocking(move || parser.parse(&text))
        .await
        .context("Parser task panicked")?
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(
        file = %path.display(),
        messages = interchange.nachrichten.len(),
        "parsed"
    );
    Ok(interchange)
}
