//! Office document metadata, modern (OpenXML zip) and legacy (OLE compound)
//!
//! Both extractors rename the document-level `created`/`modified` properties
//! to `office_created`/`office_modified` so they never shadow the filesystem
//! timestamps emitted by the basic extractor.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::DateTime;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;
use zip::ZipArchive;

use crate::error::Result;
use crate::extractors::{Extractor, extension_of};
use crate::record::Record;
use crate::value::Value;

/// Extensions handled by either office extractor. Shared with the stats
/// layer's document-family predicate.
pub fn is_office_path(path: &Path) -> bool {
    let ext = extension_of(path);
    OPENXML_EXTENSIONS.contains(&ext.as_str()) || LEGACY_EXTENSIONS.contains(&ext.as_str())
}

const OPENXML_EXTENSIONS: &[&str] = &[".docx", ".pptx", ".xlsx"];
const LEGACY_EXTENSIONS: &[&str] = &[".doc", ".ppt", ".xls"];

/// Accepts `.docx`/`.pptx`/`.xlsx`. Reads the core-properties XML for
/// `title`, `subject`, `creator`, `description`, `keywords`,
/// `lastModifiedBy`, `revision`, `office_created`, `office_modified`, plus
/// format-specific counts: `word_count`/`char_count`/`page_count` for word
/// processor files, `num_slides` for presentations, `num_sheets` for
/// spreadsheets.
///
/// A file that is not actually a zip archive yields an empty fragment; an
/// archive missing `docProps/core.xml` just omits the core fields.
pub struct OpenXmlOfficeExtractor;

impl Extractor for OpenXmlOfficeExtractor {
    fn name(&self) -> &'static str {
        "office"
    }

    fn accepts(&self, path: &Path) -> bool {
        OPENXML_EXTENSIONS.contains(&extension_of(path).as_str())
    }

    fn extract(&self, path: &Path) -> Result<Record> {
        let mut archive = match ZipArchive::new(File::open(path)?) {
            Ok(archive) => archive,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "not a zip container");
                return Ok(Record::new());
            }
        };

        let mut record = Record::new();
        if let Some(xml) = read_archive_file(&mut archive, "docProps/core.xml") {
            parse_core_properties(&xml, &mut record)?;
        }

        match extension_of(path).as_str() {
            ".docx" => {
                if let Some(xml) = read_archive_file(&mut archive, "docProps/app.xml") {
                    parse_app_counts(&xml, &mut record)?;
                }
            }
            ".pptx" => {
                let slides = archive
                    .file_names()
                    .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
                    .count();
                record.insert("num_slides", slides);
            }
            ".xlsx" => {
                if let Some(xml) = read_archive_file(&mut archive, "xl/workbook.xml") {
                    record.insert("num_sheets", count_elements(&xml, "sheet")?);
                }
            }
            _ => {}
        }

        Ok(record)
    }
}

fn read_archive_file(archive: &mut ZipArchive<File>, name: &str) -> Option<String> {
    let mut entry = archive.by_name(name).ok()?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml).ok()?;
    Some(xml)
}

const CORE_PROPERTY_TAGS: &[&str] = &[
    "title",
    "subject",
    "creator",
    "description",
    "keywords",
    "lastModifiedBy",
    "revision",
    "created",
    "modified",
];

fn parse_core_properties(xml: &str, record: &mut Record) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut current: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let local = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
                current = CORE_PROPERTY_TAGS.contains(&local.as_str()).then_some(local);
            }
            Event::Text(text) => {
                if let Some(tag) = &current {
                    let value = text.unescape()?.to_string();
                    if !value.is_empty() {
                        record.insert(rename_reserved(tag), value);
                    }
                }
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

/// `created`/`modified` collide with the basic extractor's filesystem
/// timestamps, so they get the `office_` prefix.
fn rename_reserved(key: &str) -> String {
    match key {
        "created" | "modified" => format!("office_{}", key),
        other => other.to_string(),
    }
}

fn parse_app_counts(xml: &str, record: &mut Record) -> Result<()> {
    let counts = [
        ("Words", "word_count"),
        ("Characters", "char_count"),
        ("Pages", "page_count"),
    ];
    let mut reader = Reader::from_str(xml);
    let mut current: Option<&str> = None;
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let local = start.local_name();
                let local = String::from_utf8_lossy(local.as_ref());
                current = counts
                    .iter()
                    .find(|(tag, _)| *tag == local)
                    .map(|(_, key)| *key);
            }
            Event::Text(text) => {
                if let Some(key) = current {
                    if let Ok(n) = text.unescape()?.trim().parse::<i64>() {
                        record.insert(key, n);
                    }
                }
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

fn count_elements(xml: &str, local_name: &str) -> Result<usize> {
    let mut reader = Reader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == local_name.as_bytes() => count += 1,
            Event::Empty(e) if e.local_name().as_ref() == local_name.as_bytes() => count += 1,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(count)
}

/// Accepts `.doc`/`.ppt`/`.xls`. Reads a fixed property-ID table from the
/// compound file's SummaryInformation stream. A file that is not actually a
/// valid compound file yields an empty fragment rather than an error.
pub struct LegacyOfficeExtractor;

/// SummaryInformation property IDs, in emission order.
const SUMMARY_PROPERTIES: &[(u32, &str)] = &[
    (2, "title"),
    (3, "subject"),
    (4, "author"),
    (5, "keywords"),
    (7, "template"),
    (8, "last_saved_by"),
    (9, "revision_number"),
    (12, "total_editing_time"),
    (13, "last_printed"),
    (14, "office_created"),
    (15, "office_modified"),
    (16, "page_count"),
];

impl Extractor for LegacyOfficeExtractor {
    fn name(&self) -> &'static str {
        "legacy-office"
    }

    fn accepts(&self, path: &Path) -> bool {
        LEGACY_EXTENSIONS.contains(&extension_of(path).as_str())
    }

    fn extract(&self, path: &Path) -> Result<Record> {
        let mut compound = match cfb::open(path) {
            Ok(compound) => compound,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "not a compound file");
                return Ok(Record::new());
            }
        };

        let mut stream = match compound.open_stream("\u{5}SummaryInformation") {
            Ok(stream) => stream,
            Err(_) => return Ok(Record::new()),
        };
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;

        let properties = parse_property_set(&bytes);
        let mut record = Record::new();
        for (pid, name) in SUMMARY_PROPERTIES {
            if let Some(raw) = properties.get(pid) {
                record.insert(*name, raw.to_value(*pid));
            }
        }
        Ok(record)
    }
}

/// A property value as stored in the stream, before per-field conversion.
enum RawProperty {
    Text(String),
    Int(i64),
    FileTime(u64),
}

impl RawProperty {
    fn to_value(&self, pid: u32) -> Value {
        match self {
            RawProperty::Text(s) => Value::Text(s.clone()),
            RawProperty::Int(n) => Value::Int(*n),
            // Property 12 (total editing time) is a FILETIME-typed duration,
            // not a point in time.
            RawProperty::FileTime(ft) if pid == 12 => Value::Int((ft / 10_000_000) as i64),
            RawProperty::FileTime(0) => Value::Null,
            RawProperty::FileTime(ft) => filetime_to_string(*ft)
                .map(Value::Text)
                .unwrap_or(Value::Null),
        }
    }
}

/// Windows FILETIME: 100ns intervals since 1601-01-01 UTC.
fn filetime_to_string(ft: u64) -> Option<String> {
    const FILETIME_UNIX_OFFSET: i64 = 11_644_473_600;
    let secs = (ft / 10_000_000) as i64 - FILETIME_UNIX_OFFSET;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

const VT_I2: u32 = 2;
const VT_I4: u32 = 3;
const VT_LPSTR: u32 = 30;
const VT_FILETIME: u32 = 64;

/// Minimal OLE property-set parser covering the scalar types the
/// SummaryInformation stream actually uses. Anything malformed or of an
/// unhandled type is silently skipped.
fn parse_property_set(bytes: &[u8]) -> HashMap<u32, RawProperty> {
    let mut properties = HashMap::new();
    // Header: byte order, version, system id, CLSID, property set count,
    // then the first set's FMTID and section offset.
    let Some(section_start) = u32_at(bytes, 44).map(|o| o as usize) else {
        return properties;
    };
    let Some(count) = u32_at(bytes, section_start + 4) else {
        return properties;
    };

    for i in 0..count as usize {
        let entry = section_start + 8 + i * 8;
        let (Some(pid), Some(offset)) = (u32_at(bytes, entry), u32_at(bytes, entry + 4)) else {
            break;
        };
        let at = section_start + offset as usize;
        let Some(vt) = u32_at(bytes, at) else {
            continue;
        };
        let value = match vt {
            VT_I2 => u16_at(bytes, at + 4).map(|n| RawProperty::Int(n as i16 as i64)),
            VT_I4 => u32_at(bytes, at + 4).map(|n| RawProperty::Int(n as i32 as i64)),
            VT_FILETIME => u64_at(bytes, at + 4).map(RawProperty::FileTime),
            VT_LPSTR => {
                u32_at(bytes, at + 4).and_then(|len| {
                    bytes.get(at + 8..at + 8 + len as usize).map(|raw| {
                        // Length includes the terminating nul.
                        let text = String::from_utf8_lossy(raw);
                        RawProperty::Text(text.trim_end_matches('\0').to_string())
                    })
                })
            }
            _ => None,
        };
        if let Some(value) = value {
            properties.insert(pid, value);
        }
    }
    properties
}

fn u16_at(bytes: &[u8], offset: usize) -> Option<u16> {
    bytes
        .get(offset..offset + 2)
        .map(|s| u16::from_le_bytes([s[0], s[1]]))
}

fn u32_at(bytes: &[u8], offset: usize) -> Option<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|s| u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
}

fn u64_at(bytes: &[u8], offset: usize) -> Option<u64> {
    bytes
        .get(offset..offset + 8)
        .map(|s| u64::from_le_bytes([s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]]))
}
