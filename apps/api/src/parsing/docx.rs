//! DOCX text extraction.
//!
//! A DOCX file is a ZIP archive. Body text lives in `word/document.xml`;
//! hyperlink targets live in the part's relationship table,
//! `word/_rels/document.xml.rels`.

use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{ExtractionError, MAILTO_PREFIX};

const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const HYPERLINK_REL_SUFFIX: &str = "/hyperlink";

/// Body paragraphs one per line, followed by every `mailto:` hyperlink target
/// in relationship-table order.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let document_xml = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or(ExtractionError::MissingPart(DOCUMENT_PART))?;
    let mut lines = parse_paragraphs(&document_xml)?;

    if let Some(rels_xml) = read_part(&mut archive, DOCUMENT_RELS_PART)? {
        lines.extend(
            parse_hyperlink_targets(&rels_xml)?
                .into_iter()
                .filter(|target| target.starts_with(MAILTO_PREFIX)),
        );
    }

    Ok(lines.join("\n"))
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ExtractionError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

/// Collects the text of every body-level `w:p`. Paragraphs inside tables are
/// not body paragraphs and are skipped.
fn parse_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => {
                    if paragraph_depth == 0 {
                        current.clear();
                    }
                    paragraph_depth += 1;
                }
                b"w:r" if paragraph_depth > 0 => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            // Tab stops under `w:pPr/w:tabs` share the `w:tab` name; only
            // run content is text.
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" if table_depth == 0 && paragraph_depth == 0 => {
                    paragraphs.push(String::new());
                }
                b"w:tab" if run_depth > 0 => current.push('\t'),
                b"w:cr" if run_depth > 0 => current.push('\n'),
                b"w:br" if run_depth > 0 => current.push_str(break_text(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" if table_depth == 0 && paragraph_depth > 0 => {
                    paragraph_depth -= 1;
                    if paragraph_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"w:r" if run_depth > 0 => run_depth -= 1,
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text && paragraph_depth > 0 => {
                let text = e
                    .unescape()
                    .map_err(|e| ExtractionError::Xml(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Xml(format!(
                    "error at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Text-wrapping breaks (the default `w:type`) are line breaks; page and
/// column breaks carry no text.
fn break_text(br: &BytesStart<'_>) -> Result<&'static str, ExtractionError> {
    let break_type = br
        .try_get_attribute("w:type")
        .map_err(|e| ExtractionError::Xml(e.to_string()))?;
    match break_type {
        Some(attr) if &*attr.value != b"textWrapping" => Ok(""),
        _ => Ok("\n"),
    }
}

/// Returns the `Target` of every hyperlink relationship, in table order.
fn parse_hyperlink_targets(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut targets = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let Some(target) = hyperlink_target(&e)? {
                    targets.push(target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Xml(format!(
                    "error at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(targets)
}

fn hyperlink_target(rel: &BytesStart<'_>) -> Result<Option<String>, ExtractionError> {
    let mut rel_type = None;
    let mut target = None;
    for attr in rel.attributes() {
        let attr = attr.map_err(|e| ExtractionError::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ExtractionError::Xml(e.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"Type" => rel_type = Some(value),
            b"Target" => target = Some(value),
            _ => {}
        }
    }

    match rel_type {
        Some(t) if t.ends_with(HYPERLINK_REL_SUFFIX) => Ok(target),
        _ => Ok(None),
    }
}
