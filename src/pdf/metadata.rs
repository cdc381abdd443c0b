//! PDF metadata extraction

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};

/// Count pages by reading the Count field from the Pages dictionary
/// This is more reliable than get_pages() which doesn't handle nested page trees
pub(crate) fn count_pages_in(doc: &Document) -> Result<usize> {
    let catalog = doc.catalog()
        .map_err(|_| Error::General("No catalog in trailer".to_string()))?;

    let pages_id = catalog.get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("Catalog has no Pages reference".to_string()))?;

    let count = doc.get_dictionary(pages_id)?
        .get(b"Count")
        .and_then(Object::as_i64)
        .map_err(|_| Error::General("Pages has no integer Count".to_string()))?;

    Ok(count.max(0) as usize)
}

/// Read a text entry from the Info dictionary, if present
///
/// Text strings may be PDFDocEncoded or UTF-16BE with a byte order mark.
fn info_entry(doc: &Document, key: &[u8]) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;
    let (_, info) = doc.dereference(info).ok()?;
    let value = info.as_dict().ok()?.get(key).ok()?;
    lopdf::decode_text_string(value).ok()
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// PDF header version, e.g. "1.7"
    pub version: String,
    /// Size of the file in bytes
    pub file_size: u64,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
}

/// Load a document, rejecting missing files and documents without pages
pub(crate) fn load_document(path: &Path) -> Result<(Document, usize)> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_in(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok((doc, page_count))
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    let (doc, page_count) = load_document(path)?;
    let file_size = std::fs::metadata(path)?.len();

    Ok(PdfMetadata {
        page_count,
        version: doc.version.clone(),
        file_size,
        title: info_entry(&doc, b"Title"),
        author: info_entry(&doc, b"Author"),
    })
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    load_document(path).map(|(_, page_count)| page_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_extract_metadata_nonexistent_file() {
        let result = extract_metadata(Path::new("nonexistent.pdf"));
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_not_a_pdf_is_pdf_error() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let result = count_pages(&path);
        assert!(matches!(result.unwrap_err(), Error::Pdf(_)));
    }
}
