//! Batch dispatch
//!
//! Sends an ordered list of files to a [`Printer`] one at a time, pausing
//! between jobs so the printer's spooler isn't flooded. A failed file is
//! reported and skipped; it never stops the batch.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::error::Result;
use crate::natural::display_name;
use crate::pdf::PdfMetadata;
use crate::print::Printer;

/// Delay between print jobs when none is configured
pub const DEFAULT_DELAY: Duration = Duration::from_secs(15);

const RULE: &str = "---------------------------------";

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Pause after every file except the last
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

/// Blocks between print jobs
pub trait Pause {
    fn pause(&mut self, delay: Duration);
}

/// Pauses by sleeping the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// A file the printer refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files in the batch
    pub total: usize,
    /// Print attempts made
    pub attempted: usize,
    /// Pauses taken between jobs
    pub pauses: usize,
    /// Files that failed, in dispatch order
    pub failures: Vec<DispatchFailure>,
}

impl BatchReport {
    /// Number of files handed to the printer without error
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Print each file in order, pausing `options.delay` between files
///
/// Progress goes to `out`. An empty list is reported and returns at once,
/// without touching the printer or pausing. The only error returned is a
/// failure to write progress; print failures land in the report.
pub fn run_batch<P, S, W>(
    files: &[PathBuf],
    options: &BatchOptions,
    printer: &mut P,
    pauser: &mut S,
    out: &mut W,
) -> Result<BatchReport>
where
    P: Printer + ?Sized,
    S: Pause + ?Sized,
    W: Write + ?Sized,
{
    let total = files.len();
    let mut report = BatchReport {
        total,
        ..BatchReport::default()
    };

    if files.is_empty() {
        writeln!(out, "No PDF files found in this directory. Exiting.")?;
        return Ok(report);
    }

    writeln!(out, "Found {} PDF files to print.", total)?;
    writeln!(
        out,
        "A delay of {} seconds will be added between each print job.\n",
        format_seconds(options.delay)
    )?;
    writeln!(out, "{}", RULE)?;

    for (i, path) in files.iter().enumerate() {
        let name = display_name(path);
        writeln!(out, "({}/{}) Sending to printer: {}", i + 1, total, name)?;
        out.flush()?;

        report.attempted += 1;
        match printer.submit(path) {
            Ok(()) => debug!(file = %name, "submitted"),
            Err(e) => {
                warn!(file = %name, error = %e, "print failed");
                writeln!(out, "  -> Could not print {}. Error: {}", name, e)?;
                report.failures.push(DispatchFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        if i + 1 < total {
            writeln!(out, "  -> Waiting for {} seconds...", format_seconds(options.delay))?;
            out.flush()?;
            pauser.pause(options.delay);
            report.pauses += 1;
        }
    }

    writeln!(out, "{}", RULE)?;
    if report.has_failures() {
        writeln!(
            out,
            "{} of {} files could not be sent to the printer:",
            report.failures.len(),
            total
        )?;
        for failure in &report.failures {
            writeln!(out, "  - {}: {}", display_name(&failure.path), failure.reason)?;
        }
    }
    writeln!(out, "All PDF files have been sent to the printing queue!")?;

    info!(
        total,
        succeeded = report.succeeded(),
        failed = report.failures.len(),
        "batch finished"
    );

    Ok(report)
}

/// Print the dispatch order without printing anything
///
/// Each line shows the position and file name and, when `inspect` can read
/// the file, its page count, title and author.
pub fn list_batch<W, F>(files: &[PathBuf], mut inspect: F, out: &mut W) -> Result<()>
where
    W: Write + ?Sized,
    F: FnMut(&Path) -> Result<PdfMetadata>,
{
    if files.is_empty() {
        writeln!(out, "No PDF files found in this directory.")?;
        return Ok(());
    }

    let total = files.len();
    writeln!(out, "{} PDF files would be printed in this order:", total)?;
    let mut total_pages = 0;
    for (i, path) in files.iter().enumerate() {
        let name = display_name(path);
        match inspect(path) {
            Ok(metadata) => {
                total_pages += metadata.page_count;
                writeln!(
                    out,
                    "({}/{}) {} [{} pages]{}",
                    i + 1,
                    total,
                    name,
                    metadata.page_count,
                    describe(&metadata)
                )?;
            }
            Err(e) => writeln!(out, "({}/{}) {} [unreadable: {}]", i + 1, total, name, e)?,
        }
    }
    writeln!(out, "Total pages: {}", total_pages)?;

    Ok(())
}

/// ` "Title" by Author`, or whichever part the document has
fn describe(metadata: &PdfMetadata) -> String {
    let mut text = String::new();
    if let Some(title) = &metadata.title {
        text.push_str(&format!(" \"{}\"", title));
    }
    if let Some(author) = &metadata.author {
        text.push_str(&format!(" by {}", author));
    }
    text
}

fn format_seconds(delay: Duration) -> String {
    if delay.subsec_nanos() == 0 {
        delay.as_secs().to_string()
    } else {
        format!("{}", delay.as_secs_f64())
    }
}
