// catalog-sorter/src/catalog.rs

use serde::{Deserialize, Serialize};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use serde_json::Value;
use std::{fs, io::{self, Write}, path::{Path, PathBuf}};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::record::Record;

/// How a catalog is laid out on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// `[{"name":"a"},{"name":"b"}]`
    Compact,
    /// One tab per nesting level, `": "` between key and value.
    #[default]
    Pretty,
}

/// Ordered records of one catalog file, held wholesale in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn from_records(records: Vec<Record>) -> Self { Self { records } }

    /// Reads `path`; the root must be an array of objects.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let catalog = Self::parse(&text, path)?;
        debug!(path = %path.display(), records = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Parses catalog text; `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|source| CatalogError::Parse { path: origin.to_path_buf(), source })?;
        let Value::Array(items) = value else {
            return Err(CatalogError::NotAnArray { path: origin.to_path_buf() });
        };
        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(Record::new(map)),
                _ => Err(CatalogError::NotAnObject { path: origin.to_path_buf(), index }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// Serialized file contents. With `ensure_ascii`, every non-ASCII
    /// character in keys and strings is written as a `\uXXXX` escape.
    pub fn to_json(&self, indent: IndentStyle, ensure_ascii: bool) -> Result<Vec<u8>> {
        match indent {
            IndentStyle::Compact => self.serialize_with(CompactFormatter, ensure_ascii),
            IndentStyle::Pretty => self.serialize_with(PrettyFormatter::with_indent(b"\t"), ensure_ascii),
        }
    }

    fn serialize_with<F: Formatter>(&self, formatter: F, ensure_ascii: bool) -> Result<Vec<u8>> {
        if ensure_ascii {
            self.encode(AsciiEscaped(formatter))
        } else {
            self.encode(formatter)
        }
    }

    fn encode<F: Formatter>(&self, formatter: F) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        self.records.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Replaces `path` with this catalog. Writes a sibling temp file first and
    /// renames it into place, so the old file stays intact if the write fails.
    /// An existing file's permissions carry over to the replacement.
    pub fn store(&self, path: &Path, indent: IndentStyle, ensure_ascii: bool) -> Result<()> {
        let bytes = self.to_json(indent, ensure_ascii)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CatalogError::io(&dir, e))?;
        tmp.write_all(&bytes).map_err(|e| CatalogError::io(tmp.path(), e))?;
        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| CatalogError::io(tmp.path(), e))?;
        }
        tmp.as_file().sync_all().map_err(|e| CatalogError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| CatalogError::io(path, e.error))?;
        debug!(path = %path.display(), bytes = bytes.len(), ?indent, ensure_ascii, "stored catalog");
        Ok(())
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn records(&self) -> &[Record] { &self.records }
    pub fn records_mut(&mut self) -> &mut [Record] { &mut self.records }
    pub fn iter(&self) -> std::slice::Iter<'_, Record> { self.records.iter() }
    pub fn into_records(self) -> Vec<Record> { self.records }
}

/// Wraps a formatter and writes non-ASCII characters as `\uXXXX`, using
/// UTF-16 surrogate pairs outside the BMP.
struct AsciiEscaped<F>(F);

impl<F: Formatter> Formatter for AsciiEscaped<F> {
    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;
    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}
