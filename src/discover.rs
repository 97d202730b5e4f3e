//! PDF file discovery

use std::path::{Path, PathBuf};
use glob::{glob_with, MatchOptions, Pattern};
use tracing::{debug, warn};
use crate::error::{Error, Result};
use crate::natural::sort_naturally;

/// Filename pattern for candidate files
pub const PDF_PATTERN: &str = "*.pdf";

/// Find every PDF file directly inside `dir`, in natural order
///
/// Matching is case-sensitive except on Windows, where the filesystem
/// itself ignores case. Directories whose names end in `.pdf` are skipped,
/// as are entries the glob walk could not read.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    // Escape the directory so characters like '[' in it match literally
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        PDF_PATTERN
    );
    let options = MatchOptions {
        case_sensitive: !cfg!(windows),
        ..MatchOptions::new()
    };

    let mut paths = Vec::new();
    for entry in glob_with(&pattern, options)? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(path) => debug!(path = %path.display(), "skipping non-file match"),
            Err(e) => warn!("glob error for {}: {}", pattern, e),
        }
    }

    sort_naturally(&mut paths);
    debug!(count = paths.len(), dir = %dir.display(), "discovered PDF files");

    Ok(paths)
}
