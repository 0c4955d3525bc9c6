//! Record extractor: splits a notes file of section / numbered item / url
//! triples into one small text file per item, grouped in section folders.
//!
//! With no arguments it runs the interactive prompt; `--input`, `--output`
//! and the `parse` subcommand run a single pass without prompting.

mod assembler;
mod classify;
mod filename;
mod parse;
mod settings;
mod shell;
mod writer;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use settings::OnCollision;

#[derive(Parser)]
#[command(name = "record_extractor", about = "Split a notes file into one text file per record")]
struct Cli {
    /// Input notes file
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output root; one folder per section is created inside it
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Override the configured policy for records that map to the same file
    #[arg(long, value_enum)]
    on_collision: Option<OnCollision>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one parse pass and exit
    Parse,
}

fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let settings = settings::load()?;
    init_tracing(&settings.log_level);

    let cli = Cli::parse();
    let policy = cli.on_collision.unwrap_or(settings.on_collision);
    tracing::debug!(?policy, "settings loaded");

    match (cli.command, cli.input, cli.output) {
        (Some(Commands::Parse), Some(input), Some(output)) => {
            let t0 = Instant::now();
            let summary = parse::parse_file(&input, &output, policy)?;
            println!("Parsing complete!");
            summary.print();
            tracing::info!(elapsed_ms = t0.elapsed().as_millis() as u64, "done");
            Ok(())
        }
        (Some(Commands::Parse), _, _) => bail!("`parse` needs both --input and --output"),
        (None, None, None) => shell::run_interactive(policy),
        (None, _, _) => bail!("--input/--output are only used with the `parse` subcommand"),
    }
}
