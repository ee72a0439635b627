//! PDF document metadata

use std::path::Path;

use lopdf::{Dictionary, Document, Object};

use crate::error::Result;
use crate::extractors::{Extractor, extension_of};
use crate::record::Record;
use crate::value::Value;

/// Accepts `.pdf`. Emits `page_count` plus the standard Info-dictionary
/// fields; the document timestamps are prefixed `pdf_` so they never shadow
/// the filesystem ones.
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn accepts(&self, path: &Path) -> bool {
        extension_of(path) == ".pdf"
    }

    fn extract(&self, path: &Path) -> Result<Record> {
        let doc = Document::load(path)?;

        let mut record = Record::new();
        record.insert("page_count", doc.get_pages().len());

        let info = info_dict(&doc);
        record.insert("author", info_text(&doc, info, b"Author"));
        record.insert("title", info_text(&doc, info, b"Title"));
        record.insert("subject", info_text(&doc, info, b"Subject"));
        record.insert("keywords", info_text(&doc, info, b"Keywords"));
        record.insert("creator", info_text(&doc, info, b"Creator"));
        record.insert("producer", info_text(&doc, info, b"Producer"));
        record.insert("pdf_created", info_text(&doc, info, b"CreationDate"));
        record.insert("pdf_modified", info_text(&doc, info, b"ModDate"));
        Ok(record)
    }
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn info_text(doc: &Document, info: Option<&Dictionary>, key: &[u8]) -> Value {
    let object = match info.and_then(|dict| dict.get(key).ok()) {
        Some(object) => object,
        None => return Value::Null,
    };
    // Info entries may themselves be indirect references.
    let object = match object {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(resolved) => resolved,
            Err(_) => return Value::Null,
        },
        other => other,
    };
    match object {
        Object::String(bytes, _) => Value::Text(decode_pdf_string(bytes)),
        _ => Value::Null,
    }
}

/// PDF text strings are either UTF-16BE with a BOM or (roughly) Latin-1;
/// invalid bytes are replaced rather than propagated as errors.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}
