//! Error types for the PDF batch print library

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF batch print library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(#[from] glob::PatternError),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// The print command ran but reported failure
    #[error("{program} exited with {status}{}", format_stderr(.stderr))]
    PrintCommand {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The print command did not finish in time and was killed
    #[error("print command for {} timed out after {}s", .path.display(), .timeout.as_secs_f64())]
    PrintTimeout { path: PathBuf, timeout: Duration },

    /// General error
    #[error("{0}")]
    General(String),
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_file() {
        let err = Error::PrintTimeout {
            path: PathBuf::from("report 2.pdf"),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            err.to_string(),
            "print command for report 2.pdf timed out after 30s"
        );
    }

    #[test]
    fn test_format_stderr_skips_blank_output() {
        assert_eq!(format_stderr("  \n"), "");
        assert_eq!(
            format_stderr("lp: No default destination.\n"),
            ": lp: No default destination."
        );
    }
}
