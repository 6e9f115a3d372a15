//! PDF text extraction.
//!
//! Page text comes from `pdf-extract`; link annotations are read directly from
//! the page dictionaries with `lopdf`.

use std::panic::{self, AssertUnwindSafe};

use lopdf::{Dictionary, Document, Object};

use super::{ExtractionError, MAILTO_PREFIX};

/// Page texts in page order, each followed by that page's `mailto:` link URIs.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let page_texts = extract_page_texts(bytes)?;
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    let page_links = mailto_links_by_page(&doc);

    // The two libraries walk the page tree independently; tolerate a count
    // mismatch rather than dropping text or links.
    let page_count = page_texts.len().max(page_links.len());
    let mut lines = Vec::new();
    for index in 0..page_count {
        if let Some(text) = page_texts.get(index) {
            lines.push(text.clone());
        }
        if let Some(links) = page_links.get(index) {
            lines.extend(links.iter().cloned());
        }
    }

    Ok(lines.join("\n"))
}

fn extract_page_texts(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractionError::Panicked)?
    .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// `mailto:` URIs of every link annotation, grouped per page in page order.
/// Annotations that cannot be resolved are skipped.
fn mailto_links_by_page(doc: &Document) -> Vec<Vec<String>> {
    doc.get_pages()
        .values()
        .map(|page_id| {
            doc.get_dictionary(*page_id)
                .map(|page| mailto_links(doc, page))
                .unwrap_or_default()
        })
        .collect()
}

fn mailto_links(doc: &Document, page: &Dictionary) -> Vec<String> {
    let Some(annots) = page
        .get(b"Annots")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_array().ok())
    else {
        return Vec::new();
    };

    annots
        .iter()
        .filter_map(|annot| resolve(doc, annot)?.as_dict().ok())
        .filter(|annot| matches!(annot.get(b"Subtype").and_then(Object::as_name), Ok(b"Link")))
        .filter_map(|annot| link_uri(doc, annot))
        .filter(|uri| uri.starts_with(MAILTO_PREFIX))
        .collect()
}

fn link_uri(doc: &Document, annot: &Dictionary) -> Option<String> {
    let action = resolve(doc, annot.get(b"A").ok()?)?.as_dict().ok()?;
    match resolve(doc, action.get(b"URI").ok()?)? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::fixtures::pdf_bytes;

    #[test]
    fn test_page_text_is_extracted() {
        let bytes = pdf_bytes(&[(&["JOHN SMITH", "I know Python and SQL"], &[])]);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("JOHN SMITH"), "got: {text:?}");
        assert!(text.contains("Python"), "got: {text:?}");
    }

    #[test]
    fn test_mailto_links_follow_their_page() {
        let bytes = pdf_bytes(&[
            (&["Page one"], &["mailto:first@example.com", "https://example.com"]),
            (&["Page two"], &["mailto:second@example.com"]),
        ]);
        let doc = Document::load_mem(&bytes).unwrap();
        let links = mailto_links_by_page(&doc);
        assert_eq!(
            links,
            vec![
                vec!["mailto:first@example.com".to_string()],
                vec!["mailto:second@example.com".to_string()],
            ]
        );

        let text = extract_text(&bytes).unwrap();
        let first = text.find("mailto:first@example.com").unwrap();
        let second = text.find("mailto:second@example.com").unwrap();
        assert!(first < second);
        assert!(!text.contains("https://example.com"));
    }

    #[test]
    fn test_no_mailto_line_without_mailto_links() {
        let bytes = pdf_bytes(&[(&["Jane Doe"], &["https://jane.dev"])]);
        let text = extract_text(&bytes).unwrap();
        assert!(!text.lines().any(|l| l.starts_with(MAILTO_PREFIX)));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(extract_text(b"%PDF-1.4 this is not really a pdf").is_err());
        assert!(extract_text(b"").is_err());
    }
}
