//! Tabular export of a collection
//!
//! The collection's key registry is the authoritative column order; records
//! missing a column emit an empty cell. The semicolon delimiter implies
//! decimal-comma float localization (the spreadsheet convention in locales
//! that use `;` as a list separator).

use std::io::Write;
use std::str::FromStr;

use crate::collection::Collection;
use crate::error::Result;
use crate::value::Value;

/// Output delimiter for tabular export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
        }
    }

    /// Whether floats should be written with a decimal comma.
    pub fn uses_decimal_comma(self) -> bool {
        self == Delimiter::Semicolon
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "," => Ok(Delimiter::Comma),
            ";" => Ok(Delimiter::Semicolon),
            "tab" | "\t" => Ok(Delimiter::Tab),
            other => Err(format!("unsupported delimiter '{}' (use ',', ';', or 'tab')", other)),
        }
    }
}

/// Write the collection as delimited text: header row from the key
/// registry, one row per record.
pub fn write_csv<W: Write>(
    writer: W,
    collection: &Collection,
    delimiter: Delimiter,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(writer);

    let keys = collection.keys();
    if keys.is_empty() {
        csv_writer.flush()?;
        return Ok(());
    }
    csv_writer.write_record(keys)?;

    for record in collection {
        let row: Vec<String> = keys
            .iter()
            .map(|key| cell(record.get(key), delimiter))
            .collect();
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn cell(value: Option<&Value>, delimiter: Delimiter) -> String {
    match value {
        Some(Value::Float(x)) if delimiter.uses_decimal_comma() => {
            x.to_string().replace('.', ",")
        }
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn sample() -> Collection {
        let mut c = Collection::new();

        let mut a = Record::with_path("a.txt");
        a.insert("size", 10u64);
        c.push(a);

        let mut b = Record::with_path("b.png");
        b.insert("xres", 72.5);
        c.push(b);

        c
    }

    fn export(collection: &Collection, delimiter: Delimiter) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, collection, delimiter).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_follows_key_registry() {
        let csv = export(&sample(), Delimiter::Comma);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("path,size,xres"));
        assert_eq!(lines.next(), Some("a.txt,10,"));
        assert_eq!(lines.next(), Some("b.png,,72.5"));
    }

    #[test]
    fn test_tab_delimiter() {
        let csv = export(&sample(), Delimiter::Tab);
        assert_eq!(csv.lines().next(), Some("path\tsize\txres"));
    }

    #[test]
    fn test_semicolon_localizes_floats() {
        let csv = export(&sample(), Delimiter::Semicolon);
        let last = csv.lines().nth(2).unwrap();
        assert_eq!(last, "b.png;;72,5");
    }

    #[test]
    fn test_delimiter_parsing() {
        assert_eq!(",".parse::<Delimiter>().unwrap(), Delimiter::Comma);
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::Semicolon);
        assert_eq!("tab".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert!("|".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_empty_collection_writes_empty_header() {
        let csv = export(&Collection::new(), Delimiter::Comma);
        // No keys, no records: just the empty header line.
        assert_eq!(csv.trim_end(), "");
    }
}
