//! PDF text extraction.
//!
//! Parsing is CPU-bound and `pdf-extract` can panic on malformed input, so
//! async callers go through [`extract_text_blocking`], which runs on the
//! blocking pool and turns a panic into an [`ExtractionError`].

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// Inserted between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Document is empty")]
    Empty,

    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Extraction task aborted: {0}")]
    Aborted(String),
}

/// Extracts the text of every page, in page order, joined with [`PAGE_SEPARATOR`].
/// The parsed document is owned by this call and dropped before it returns.
pub fn extract_text(pdf: &[u8]) -> Result<String, ExtractionError> {
    if pdf.is_empty() {
        return Err(ExtractionError::Empty);
    }
    debug!(size = pdf.len(), "Opening PDF document");

    let expected = lopdf::Document::load_mem(pdf)
        .map_err(|e| ExtractionError::Parse(e.to_string()))?
        .get_pages()
        .len();

    // pdf-extract stops at the first page it cannot decode and returns the
    // pages before it as a success.
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf)
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;
    ensure_all_pages(expected, &pages)?;

    debug!(pages = pages.len(), "Extracted page text");
    Ok(join_pages(&pages))
}

pub async fn extract_text_blocking(pdf: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&pdf))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))?
}

fn ensure_all_pages<S>(expected: usize, pages: &[S]) -> Result<(), ExtractionError> {
    if pages.len() == expected {
        Ok(())
    } else {
        Err(ExtractionError::Parse(format!(
            "extracted {} of {expected} pages",
            pages.len()
        )))
    }
}

fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}


#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn test_join_pages_in_order() {
        assert_eq!(join_pages(&["one", "two", "three"]), "one\ntwo\nthree");
    }

    #[test]
    fn test_join_single_page_has_no_separator() {
        assert_eq!(join_pages(&["only"]), "only");
    }

    #[test]
    fn test_empty_bytes_rejected() {
        assert!(matches!(extract_text(&[]), Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = extract_text(b"this is not a pdf at all").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(_)));
    }

    #[test]
    fn test_pages_extracted_in_order() {
        let pdf = pdf_with_pages(&["Alpha", "Bravo", "Charlie"]);
        let text = extract_text(&pdf).unwrap();

        let a = text.find("Alpha").expect("page 1 text");
        let b = text.find("Bravo").expect("page 2 text");
        let c = text.find("Charlie").expect("page 3 text");
        assert!(a < b && b < c, "pages out of order: {text:?}");
    }

    #[test]
    fn test_every_page_is_extracted() {
        let pdf = pdf_with_pages(&["Alpha", "Bravo", "Charlie", "Delta"]);
        let text = extract_text(&pdf).unwrap();

        for page in ["Alpha", "Bravo", "Charlie", "Delta"] {
            assert!(text.contains(page), "missing {page}: {text:?}");
        }
    }

    #[test]
    fn test_truncated_page_list_is_parse_error() {
        let err = ensure_all_pages(3, &["Alpha", "Bravo"]).unwrap_err();
        match err {
            ExtractionError::Parse(message) => assert_eq!(message, "extracted 2 of 3 pages"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ensure_all_pages(2, &["Alpha", "Bravo"]).is_ok());
        assert!(ensure_all_pages::<&str>(0, &[]).is_ok());
    }

    #[tokio::test]
    async fn test_blocking_wrapper_reports_parse_errors() {
        let err = extract_text_blocking(Bytes::from_static(b"%PDF-broken"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Parse(_) | ExtractionError::Aborted(_)
        ));
    }
}
