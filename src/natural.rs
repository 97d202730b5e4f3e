//! Natural sort ordering for filenames
//!
//! Orders names so that embedded numbers compare by value: `"paper 2.pdf"`
//! sorts before `"paper 10.pdf"`. Text between the numbers compares
//! case-insensitively.

use std::cmp::Ordering;
use std::path::Path;

/// A run of decimal digits, compared by magnitude
///
/// Stored as its digits with leading zeros removed, so runs of any length
/// compare exactly: a longer run is a larger number, and runs of equal
/// length compare digit by digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number(String);

impl Number {
    /// Build a number from a run of ASCII digits
    pub fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Number("0".to_string())
        } else {
            Number(trimmed.to_string())
        }
    }

    /// The digits without leading zeros
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One run of a filename
///
/// Variant order is the comparison order when a number meets text at the
/// same position: numbers sort first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Token {
    /// A maximal run of digits
    Number(Number),
    /// A maximal run of non-digits, lowercased
    Text(String),
}

/// Ordering key for a filename
///
/// Keys compare token by token; when one key is a prefix of the other the
/// shorter key sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey(pub Vec<Token>);

impl SortKey {
    /// The tokens of this key, in filename order
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }
}

/// Split a filename into its natural sort key
///
/// The name is cut into alternating text and digit runs. Empty text runs at
/// the boundaries are kept, so every key starts and ends with a text token:
///
/// - `"report 10.pdf"` → `["report ", 10, ".pdf"]`
/// - `"10.pdf"` → `["", 10, ".pdf"]`
/// - `"a1"` → `["a", 1, ""]`
/// - `"notes"` → `["notes"]`
pub fn sort_key(name: &str) -> SortKey {
    let mut tokens = Vec::new();
    let mut rest = name;

    loop {
        let text_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        tokens.push(Token::Text(rest[..text_end].to_lowercase()));
        rest = &rest[text_end..];
        if rest.is_empty() {
            break;
        }

        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        tokens.push(Token::Number(Number::from_digits(&rest[..digits_end])));
        rest = &rest[digits_end..];
    }

    SortKey(tokens)
}

/// Compare two filenames in natural order
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Sort paths in natural order of their file names
///
/// Names with equal keys (`"File 1.pdf"` and `"file 01.pdf"`) fall back to
/// the raw file name, so the result doesn't depend on the input order.
pub fn sort_naturally<P: AsRef<Path>>(paths: &mut [P]) {
    paths.sort_by_cached_key(|path| {
        let name = display_name(path.as_ref());
        (sort_key(&name), name)
    });
}

/// File name of a path as text, or the whole path if it has none
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
