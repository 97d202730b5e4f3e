//! PDF Batch Print Library
//!
//! Sends a folder of PDF files to the system printer one at a time.
//! This library provides functionality to:
//! - Order filenames naturally ("paper 2" before "paper 10")
//! - Discover the PDF files in a directory
//! - Dispatch each file to a printer with a fixed delay between jobs
//! - Read page counts for dry-run listings
//!
//! # Example
//!
//! ```no_run
//! use pdf_batch_print::dispatch::{run_batch, BatchOptions, ThreadSleep};
//! use pdf_batch_print::discover::find_pdfs;
//! use pdf_batch_print::print::SystemPrinter;
//! use std::path::Path;
//!
//! let files = find_pdfs(Path::new(".")).expect("Failed to scan directory");
//! let mut printer = SystemPrinter::default();
//! let report = run_batch(
//!     &files,
//!     &BatchOptions::default(),
//!     &mut printer,
//!     &mut ThreadSleep,
//!     &mut std::io::stdout(),
//! )
//! .expect("Failed to write progress");
//! assert_eq!(report.attempted, files.len());
//! ```

pub mod error;
pub mod natural;
pub mod discover;
pub mod dispatch;
pub mod print;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
