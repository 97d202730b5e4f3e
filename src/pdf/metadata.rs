//! PDF metadata extraction

use std::path::Path;
use lopdf::{Dictionary, Document, Object};
use crate::error::{Error, Result};

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Follow `obj` to a dictionary, resolving one level of reference
fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object, what: &str) -> Result<&'a Dictionary> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id)?,
        other => other,
    };
    match obj {
        Object::Dictionary(dict) => Ok(dict),
        _ => Err(Error::General(format!("{} is not a dictionary", what))),
    }
}

/// Read the Count field of the root Pages dictionary
///
/// Nested page trees keep their total in the root node, so this is cheaper
/// than walking the tree and agrees with what a printer driver reports.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let root = doc.trailer.get(b"Root")
        .map_err(|_| Error::General("No Root in trailer".to_string()))?;
    let catalog = resolve_dict(doc, root, "Catalog")?;

    let pages = catalog.get(b"Pages")
        .map_err(|_| Error::General("No Pages in catalog".to_string()))?;
    let pages = resolve_dict(doc, pages, "Pages")?;

    match pages.get(b"Count") {
        Ok(Object::Integer(n)) if *n >= 0 => Ok(*n as usize),
        Ok(_) => Err(Error::General("Count is not a page count".to_string())),
        Err(_) => Err(Error::General("No Count in Pages".to_string())),
    }
}

/// Decode a PDF text string: UTF-16BE with a byte order mark, else UTF-8
fn decode_text(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        _ => String::from_utf8(bytes.to_vec()).ok(),
    }
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    info.get(key)
        .ok()
        .and_then(|obj| obj.as_str().ok())
        .and_then(decode_text)
}

fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(Document::load(path)?)
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    let doc = load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    let info = doc.trailer.get(b"Info")
        .ok()
        .and_then(|obj| resolve_dict(&doc, obj, "Info").ok());

    Ok(PdfMetadata {
        page_count,
        title: info.and_then(|info| info_string(info, b"Title")),
        author: info.and_then(|info| info_string(info, b"Author")),
    })
}
