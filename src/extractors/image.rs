//! Raster image metadata

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Tag, Value as ExifValue};

use crate::error::Result;
use crate::extractors::{Extractor, extension_of};
use crate::record::Record;
use crate::value::Value;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp"];

/// Whether a path carries a raster image extension.
///
/// Shared with the stats layer, which ranks "image records" by the same
/// predicate the dispatch used.
pub fn is_image_path(path: &Path) -> bool {
    IMAGE_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Accepts raster images. Emits `width`, `height`, `xres`/`yres` (DPI,
/// `Null` when the file carries no resolution tags), and every EXIF tag of
/// the primary image flattened under an `exif:` prefix (GPS tags included).
pub struct ImageExtractor;

impl Extractor for ImageExtractor {
    fn name(&self) -> &'static str {
        "image"
    }

    fn accepts(&self, path: &Path) -> bool {
        is_image_path(path)
    }

    fn extract(&self, path: &Path) -> Result<Record> {
        let (width, height) = image::image_dimensions(path)?;

        let mut record = Record::new();
        record.insert("width", width);
        record.insert("height", height);

        // Files without an EXIF segment are the common case, not an error.
        let exif_data = exif::Reader::new()
            .read_from_container(&mut BufReader::new(File::open(path)?))
            .ok();

        let (xres, yres) = exif_data
            .as_ref()
            .map(|e| (resolution(e, Tag::XResolution), resolution(e, Tag::YResolution)))
            .unwrap_or((None, None));
        record.insert("xres", xres);
        record.insert("yres", yres);

        if let Some(exif_data) = exif_data {
            for field in exif_data.fields() {
                if field.ifd_num != In::PRIMARY {
                    continue;
                }
                record.insert(format!("exif:{}", field.tag), convert_exif_value(field));
            }
        }

        Ok(record)
    }
}

fn resolution(exif_data: &exif::Exif, tag: Tag) -> Option<f64> {
    match &exif_data.get_field(tag, In::PRIMARY)?.value {
        ExifValue::Rational(r) if !r.is_empty() => Some(r[0].to_f64()),
        _ => None,
    }
}

/// Normalize an EXIF value to a scalar: single rationals become floats,
/// single integers stay integers, byte strings decode lossily, and anything
/// multi-valued falls back to its display form.
fn convert_exif_value(field: &exif::Field) -> Value {
    match &field.value {
        ExifValue::Ascii(parts) => Value::Text(
            parts
                .iter()
                .map(|part| String::from_utf8_lossy(part).to_string())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        ExifValue::Byte(bytes) | ExifValue::Undefined(bytes, _) => {
            Value::Text(String::from_utf8_lossy(bytes).to_string())
        }
        ExifValue::Short(v) if v.len() == 1 => Value::Int(v[0] as i64),
        ExifValue::Long(v) if v.len() == 1 => Value::Int(v[0] as i64),
        ExifValue::SShort(v) if v.len() == 1 => Value::Int(v[0] as i64),
        ExifValue::SLong(v) if v.len() == 1 => Value::Int(v[0] as i64),
        ExifValue::Rational(v) if v.len() == 1 => Value::Float(v[0].to_f64()),
        ExifValue::SRational(v) if v.len() == 1 => Value::Float(v[0].to_f64()),
        ExifValue::Float(v) if v.len() == 1 => Value::Float(v[0] as f64),
        ExifValue::Double(v) if v.len() == 1 => Value::Float(v[0]),
        _ => Value::Text(field.display_value().to_string()),
    }
}
