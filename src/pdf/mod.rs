//! PDF inspection module

pub mod metadata;

// Re-export commonly used items
pub use metadata::{extract_metadata, PdfMetadata};
