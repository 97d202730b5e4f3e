//! PDF Batch Print CLI tool
//!
//! Sends every PDF in a folder to the default printer, in natural order,
//! with a pause between jobs.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pdf_batch_print::discover::find_pdfs;
use pdf_batch_print::dispatch::{list_batch, run_batch, BatchOptions, ThreadSleep, DEFAULT_DELAY};
use pdf_batch_print::pdf::extract_metadata;
use pdf_batch_print::print::SystemPrinter;

/// Exit status when --strict is set and some files failed
const EXIT_SOME_FAILED: i32 = 2;

/// PDF Batch Print - Print every PDF in a folder, one job at a time
#[derive(Parser)]
#[command(name = "pdf-batch-print")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Print every PDF in the current folder, 15 seconds apart
    pdf-batch-print

    # Give a slow printer more time between jobs
    pdf-batch-print --delay 30

    # See the print order and page counts without printing
    pdf-batch-print --dir ~/handouts --dry-run

    # Print to a named CUPS queue
    pdf-batch-print --command lp --command-arg -d --command-arg office")]
struct Cli {
    /// Folder to scan for *.pdf files (defaults to the current directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Seconds to wait between print jobs
    #[arg(long, default_value_t = DEFAULT_DELAY.as_secs_f64())]
    delay: f64,

    /// Give up on a print command after this many seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Program to run for each file instead of the system print verb;
    /// the file path is passed as its last argument
    #[arg(long)]
    command: Option<String>,

    /// Argument for --command (repeatable)
    #[arg(long = "command-arg", requires = "command", allow_hyphen_values = true)]
    command_args: Vec<String>,

    /// List the files in print order with page counts, without printing
    #[arg(long)]
    dry_run: bool,

    /// Exit with status 2 if any file could not be printed
    #[arg(long)]
    strict: bool,

    /// Don't wait for Enter before exiting
    #[arg(long)]
    no_wait: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let no_wait = cli.no_wait;

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    if !no_wait && io::stdin().is_terminal() {
        wait_for_enter();
    }

    process::exit(code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_batch_print=info,warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Run the batch, returning the process exit code
fn run(cli: Cli) -> Result<i32> {
    let delay = seconds(cli.delay).context("invalid --delay")?;
    let timeout = cli.timeout.map(seconds).transpose().context("invalid --timeout")?;

    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "--- PDF Batch Print ---")?;
    writeln!(stdout, "Scanning for PDF files in: {}\n", dir.display())?;

    let files = find_pdfs(&dir).with_context(|| format!("Failed to scan {}", dir.display()))?;

    if cli.dry_run {
        list_batch(&files, extract_metadata, &mut stdout)?;
        return Ok(0);
    }

    let mut printer = match cli.command {
        Some(program) => SystemPrinter::program(program, cli.command_args),
        None => SystemPrinter::default(),
    }
    .with_timeout(timeout);

    let options = BatchOptions { delay };
    let report = run_batch(&files, &options, &mut printer, &mut ThreadSleep, &mut stdout)?;

    if cli.strict && report.has_failures() {
        return Ok(EXIT_SOME_FAILED);
    }
    Ok(0)
}

/// Convert a seconds argument to a Duration
fn seconds(value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{} is not a valid number of seconds", value))
}

fn wait_for_enter() {
    print!("Press Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
