//! Tflat CLI - flatten a transcript file into a terminal table or CSV

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tflat")]
#[command(author = "Yolog Team")]
#[command(version)]
#[command(about = "Flatten an AI coding session transcript (JSONL) into a table or CSV", long_about = None)]
#[command(after_help = "Unknown or extra arguments are rejected, not ignored.")]
struct Args {
    /// Path to the transcript (newline-delimited JSON)
    transcript: PathBuf,

    /// Keep only the last N rows
    count: Option<usize>,

    /// Write CSV to this path instead of printing a table
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tflat={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Tail reads only make sense for a limited terminal preview; a CSV
    // export always wants the whole file.
    let tail = args.count.is_some() && args.csv.is_none();
    let lines = tflat::read_lines(&args.transcript, tail)
        .with_context(|| format!("failed to read {}", args.transcript.display()))?;

    let rows = tflat::limit_rows(tflat::flatten_lines(&lines), args.count);

    if let Some(csv_path) = &args.csv {
        tflat::render::write_csv(&rows, csv_path)
            .with_context(|| format!("failed to write {}", csv_path.display()))?;
        println!("Wrote {} rows to {}", rows.len(), csv_path.display());
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        tflat::render::render_table(&rows, &mut out)?;
    }

    Ok(())
}
