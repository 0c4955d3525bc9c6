//! QR batch: finds the text files below a folder, pulls the urls out of
//! each and renders them as SVG QR codes named after the source file.

mod batch;
mod menu;
mod output;
mod render;
mod scan;
mod settings;
mod urls;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use console::style;
use dialoguer::theme::ColorfulTheme;
use tracing::info;

use output::ImageWriter;
use render::Strategy;

#[derive(Parser)]
#[command(name = "qr_batch", about = "Render the urls found in text files as SVG QR codes")]
struct Cli {
    /// Folder scanned recursively for .txt files (prompted when absent)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,
    /// Folder the .svg files are written to, created if missing
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// SVG construction to use
    #[arg(short, long, value_enum, ignore_case = true)]
    strategy: Option<Strategy>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
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
    let theme = ColorfulTheme::default();

    println!("{}", style("QR Code Generator").cyan().bold());

    let input_dir = match cli.input_dir {
        Some(dir) if dir.is_dir() => dir,
        Some(dir) => bail!("input folder {} does not exist", dir.display()),
        None => menu::prompt_input_folder(&theme)?,
    };
    let files = scan::find_text_files(&input_dir)?;
    menu::print_files(&input_dir, &files);

    let output_dir = match cli.output_dir {
        Some(dir) => {
            menu::ensure_output_folder(&dir)?;
            dir
        }
        None => menu::prompt_output_folder(&theme)?,
    };

    if !(cli.yes || menu::confirm_generation(&theme)?) {
        menu::cancelled();
        return Ok(());
    }

    let strategy = match cli.strategy.or(settings.default_strategy) {
        Some(s) => s,
        None => menu::prompt_strategy(&theme)?,
    };
    info!(%strategy, files = files.len(), output = %output_dir.display(), "generating");

    let t0 = Instant::now();
    let summary = batch::run_batch(
        &files,
        &ImageWriter::new(&output_dir),
        strategy,
        &settings.style(),
    )?;
    summary.print();
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "done");
    Ok(())
}
