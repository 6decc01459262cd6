// src/formats/dbf.rs

//! dBase III table codec, the attribute half of a shapefile.
//!
//! # Header (32 bytes)
//!
//! | Offset | Field          | Type   | Description                     |
//! |--------|----------------|--------|---------------------------------|
//! | 0      | version        | u8     | 0x03 (dBase III, no memo)       |
//! | 1-3    | last update    | u8[3]  | YY (since 1900), MM, DD         |
//! | 4-7    | record count   | u32 LE | patched when the writer closes  |
//! | 8-9    | header length  | u16 LE | 32 + 32 * fields + 1            |
//! | 10-11  | record length  | u16 LE | 1 (deletion flag) + field sizes |
//! | 29     | language id    | u8     | code page hint                  |
//!
//! Each field descriptor is 32 bytes: name (11, NUL padded), type (1),
//! reserved (4), length (1), decimals (1), reserved (14). The descriptor
//! array ends with 0x0D and the file with 0x1A.

use std::collections::HashSet;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};

use chrono::{Datelike, NaiveDate};

use crate::formats::encoding::TextEncoding;
use crate::layer::{Field, FieldType, Value};

pub const HEADER_LEN: usize = 32;
pub const DESCRIPTOR_LEN: usize = 32;
pub const MAX_FIELDS: usize = 255;
pub const MAX_NAME_LEN: usize = 10;

const VERSION: u8 = 0x03;
const HEADER_TERMINATOR: u8 = 0x0D;
const EOF_MARKER: u8 = 0x1A;
const DELETED: u8 = b'*';
const ACTIVE: u8 = b' ';

const PREALLOC_ROWS: usize = 4096;

const DEFAULT_STRING_LEN: usize = 254;
const DEFAULT_INTEGER_LEN: usize = 20;
const DEFAULT_DOUBLE_LEN: usize = 24;
const DEFAULT_DOUBLE_DECIMALS: usize = 15;

/// dBase column type letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbfKind {
    Character,
    Numeric,
    Float,
    Date,
    Logical,
    /// Anything else found while reading (memo, etc.); decoded as text.
    Other(u8),
}

impl DbfKind {
    pub fn code(self) -> u8 {
        match self {
            DbfKind::Character => b'C',
            DbfKind::Numeric => b'N',
            DbfKind::Float => b'F',
            DbfKind::Date => b'D',
            DbfKind::Logical => b'L',
            DbfKind::Other(c) => c,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code.to_ascii_uppercase() {
            b'C' => DbfKind::Character,
            b'N' => DbfKind::Numeric,
            b'F' => DbfKind::Float,
            b'D' => DbfKind::Date,
            b'L' => DbfKind::Logical,
            other => DbfKind::Other(other),
        }
    }
}

/// A column as laid out on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfField {
    pub name: String,
    pub kind: DbfKind,
    pub length: u8,
    pub decimals: u8,
}

impl DbfField {
    /// Schema field this column reads back as.
    pub fn to_field(&self) -> Field {
        let field_type = match self.kind {
            DbfKind::Character | DbfKind::Other(_) => FieldType::String,
            DbfKind::Numeric if self.decimals == 0 && self.length <= 20 => FieldType::Integer,
            DbfKind::Numeric | DbfKind::Float => FieldType::Double,
            DbfKind::Date => FieldType::Date,
            DbfKind::Logical => FieldType::Boolean,
        };
        Field::new(self.name.clone(), field_type)
            .with_length(usize::from(self.length), usize::from(self.decimals))
    }
}

/// Lay out a schema as dBase columns.
///
/// Names are reduced to ten ASCII bytes and made unique with a numeric
/// suffix, the way shapefile writers usually do it.
pub fn layout_fields(fields: &[Field]) -> io::Result<Vec<DbfField>> {
    if fields.len() > MAX_FIELDS {
        return Err(invalid_input(format!(
            "{} fields exceed the dBase limit of {MAX_FIELDS}",
            fields.len()
        )));
    }

    let mut used = HashSet::new();
    let mut out = Vec::with_capacity(fields.len());

    for field in fields {
        let name = unique_name(&field.name, &mut used);
        let (kind, length, decimals) = match field.field_type {
            FieldType::String => (
                DbfKind::Character,
                pick_len(field.length, DEFAULT_STRING_LEN, 254),
                0,
            ),
            FieldType::Integer => (
                DbfKind::Numeric,
                pick_len(field.length, DEFAULT_INTEGER_LEN, 20),
                0,
            ),
            FieldType::Double => {
                let length = pick_len(field.length, DEFAULT_DOUBLE_LEN, 32);
                let wanted = if field.length == 0 {
                    DEFAULT_DOUBLE_DECIMALS
                } else {
                    field.precision
                };
                (DbfKind::Numeric, length, wanted.min(length.saturating_sub(2)))
            }
            FieldType::Date => (DbfKind::Date, 8, 0),
            FieldType::Boolean => (DbfKind::Logical, 1, 0),
        };

        out.push(DbfField {
            name,
            kind,
            length: length as u8,
            decimals: decimals as u8,
        });
    }

    let record_len: usize = 1 + out.iter().map(|f| usize::from(f.length)).sum::<usize>();
    if record_len > usize::from(u16::MAX) {
        return Err(invalid_input(format!(
            "record length {record_len} exceeds the dBase limit"
        )));
    }

    Ok(out)
}

fn pick_len(requested: usize, default: usize, max: usize) -> usize {
    if requested == 0 { default } else { requested.min(max) }
}

fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    let mut base: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .take(MAX_NAME_LEN)
        .collect();
    if base.is_empty() {
        base = "FIELD".to_string();
    }

    let mut candidate = base.clone();
    let mut n = 1;
    while used.contains(&candidate.to_ascii_uppercase()) {
        let suffix = format!("_{n}");
        let keep = MAX_NAME_LEN - suffix.len();
        candidate = format!("{}{}", &base[..base.len().min(keep)], suffix);
        n += 1;
    }
    used.insert(candidate.to_ascii_uppercase());
    candidate
}

/// Streaming dBase writer.
///
/// The record count in the header is only known once all rows are in, so
/// [`DbfWriter::finish`] seeks back and patches it.
pub struct DbfWriter<W: Write + Seek> {
    out: BufWriter<W>,
    fields: Vec<DbfField>,
    encoding: TextEncoding,
    records: u32,
}

impl<W: Write + Seek> DbfWriter<W> {
    pub fn new(out: W, fields: Vec<DbfField>, encoding: TextEncoding) -> io::Result<Self> {
        let mut out = BufWriter::new(out);
        out.write_all(&build_header(&fields, 0, encoding, chrono::Local::now().date_naive()))?;
        for field in &fields {
            out.write_all(&build_descriptor(field))?;
        }
        out.write_all(&[HEADER_TERMINATOR])?;

        Ok(Self {
            out,
            fields,
            encoding,
            records: 0,
        })
    }

    pub fn fields(&self) -> &[DbfField] {
        &self.fields
    }

    /// Write one row. `values` must follow the column order; missing
    /// trailing values are written as null.
    pub fn write_record(&mut self, values: &[Value]) -> io::Result<()> {
        if values.len() > self.fields.len() {
            return Err(invalid_input(format!(
                "row has {} values for {} columns",
                values.len(),
                self.fields.len()
            )));
        }

        self.out.write_all(&[ACTIVE])?;
        for (idx, field) in self.fields.iter().enumerate() {
            let value = values.get(idx).unwrap_or(&Value::Null);
            self.out
                .write_all(&encode_value(value, field, self.encoding))?;
        }
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    pub fn record_count(&self) -> u32 {
        self.records
    }

    /// Write the end marker, patch the record count and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.write_all(&[EOF_MARKER])?;
        self.out.flush()?;
        let mut inner = self.out.into_inner().map_err(|e| e.into_error())?;
        inner.seek(SeekFrom::Start(4))?;
        inner.write_all(&self.records.to_le_bytes())?;
        inner.seek(SeekFrom::End(0))?;
        inner.flush()?;
        Ok(inner)
    }
}

fn build_header(
    fields: &[DbfField],
    records: u32,
    encoding: TextEncoding,
    today: NaiveDate,
) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[0] = VERSION;
    header[1] = (today.year() - 1900).clamp(0, 255) as u8;
    header[2] = today.month() as u8;
    header[3] = today.day() as u8;
    header[4..8].copy_from_slice(&records.to_le_bytes());

    let header_len = (HEADER_LEN + DESCRIPTOR_LEN * fields.len() + 1) as u16;
    let record_len = (1 + fields.iter().map(|f| usize::from(f.length)).sum::<usize>()) as u16;
    header[8..10].copy_from_slice(&header_len.to_le_bytes());
    header[10..12].copy_from_slice(&record_len.to_le_bytes());
    header[29] = encoding.language_driver();
    header
}

fn build_descriptor(field: &DbfField) -> [u8; DESCRIPTOR_LEN] {
    let mut desc = [0u8; DESCRIPTOR_LEN];
    let name = field.name.as_bytes();
    let n = name.len().min(MAX_NAME_LEN);
    desc[..n].copy_from_slice(&name[..n]);
    desc[11] = field.kind.code();
    desc[16] = field.length;
    desc[17] = field.decimals;
    desc
}

/// Render one value into exactly `field.length` bytes.
fn encode_value(value: &Value, field: &DbfField, encoding: TextEncoding) -> Vec<u8> {
    let width = usize::from(field.length);
    match field.kind {
        DbfKind::Character | DbfKind::Other(_) => {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                Value::Integer(v) => v.to_string(),
                Value::Double(v) => v.to_string(),
                Value::Date(d) => d.format("%Y-%m-%d").to_string(),
                Value::Boolean(b) => (if *b { "T" } else { "F" }).to_string(),
            };
            pad_right(encode_to_width(&text, width, encoding), width)
        }
        DbfKind::Numeric | DbfKind::Float => {
            let decimals = usize::from(field.decimals);
            let number = match value {
                Value::Integer(v) if decimals == 0 => Some(v.to_string()),
                Value::Integer(v) => Some(fit_number(*v as f64, width, decimals)),
                Value::Double(v) if v.is_finite() => Some(fit_number(*v, width, decimals)),
                Value::Boolean(b) => Some((if *b { "1" } else { "0" }).to_string()),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| fit_number(v, width, decimals)),
                _ => None,
            };
            match number {
                None => vec![b' '; width],
                Some(n) if n.len() > width => vec![b'*'; width],
                Some(n) => format!("{n:>width$}").into_bytes(),
            }
        }
        DbfKind::Date => {
            let date = match value {
                Value::Date(d) => Some(*d),
                Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%Y%m%d"))
                    .ok(),
                _ => None,
            };
            match date {
                Some(d) => d.format("%Y%m%d").to_string().into_bytes(),
                None => vec![b' '; width],
            }
        }
        DbfKind::Logical => match value {
            Value::Boolean(true) => vec![b'T'],
            Value::Boolean(false) => vec![b'F'],
            Value::Integer(v) => vec![if *v != 0 { b'T' } else { b'F' }],
            _ => vec![b'?'],
        },
    }
}

/// Format `v` with as many of `decimals` as fit in `width`. Fractional
/// digits go before the value does: the result is only wider than `width`
/// when the integer part alone is.
fn fit_number(v: f64, width: usize, decimals: usize) -> String {
    (0..=decimals)
        .rev()
        .map(|d| format!("{v:.d$}"))
        .find(|text| text.len() <= width)
        .unwrap_or_else(|| format!("{v:.0}"))
}

/// Encode at most `width` bytes of `text`, cutting between characters.
fn encode_to_width(text: &str, width: usize, encoding: TextEncoding) -> Vec<u8> {
    let bytes = encoding.encode(text);
    if bytes.len() <= width {
        return bytes;
    }
    // Every supported encoding spends at least one byte per character.
    let mut end = text
        .char_indices()
        .nth(width)
        .map_or(text.len(), |(idx, _)| idx);
    loop {
        let bytes = encoding.encode(&text[..end]);
        if bytes.len() <= width || end == 0 {
            return bytes;
        }
        end = text[..end]
            .char_indices()
            .next_back()
            .map_or(0, |(idx, _)| idx);
    }
}

fn pad_right(mut bytes: Vec<u8>, width: usize) -> Vec<u8> {
    bytes.resize(width, b' ');
    bytes
}

/// A fully decoded table.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfTable {
    pub fields: Vec<DbfField>,
    pub records: Vec<Vec<Value>>,
    /// Zero-based file positions of rows flagged as deleted. They are not
    /// part of `records`.
    pub deleted: Vec<usize>,
}

/// Read a whole table. Rows flagged as deleted are skipped and their
/// positions listed in [`DbfTable::deleted`].
pub fn read_table<R: Read>(mut input: R, encoding: TextEncoding) -> io::Result<DbfTable> {
    let mut header = [0u8; HEADER_LEN];
    input.read_exact(&mut header)?;

    let record_count = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    let header_len = usize::from(u16::from_le_bytes([header[8], header[9]]));
    let record_len = usize::from(u16::from_le_bytes([header[10], header[11]]));

    if header_len < HEADER_LEN + 1 {
        return Err(invalid_data(format!("header length {header_len} too small")));
    }

    let mut rest = vec![0u8; header_len - HEADER_LEN];
    input.read_exact(&mut rest)?;

    let mut fields = Vec::new();
    for desc in rest.chunks(DESCRIPTOR_LEN) {
        if desc[0] == HEADER_TERMINATOR || desc.len() < DESCRIPTOR_LEN {
            break;
        }
        let name_end = desc[..11].iter().position(|&b| b == 0).unwrap_or(11);
        fields.push(DbfField {
            name: String::from_utf8_lossy(&desc[..name_end]).trim().to_string(),
            kind: DbfKind::from_code(desc[11]),
            length: desc[16],
            decimals: desc[17],
        });
    }

    let expected_len = 1 + fields.iter().map(|f| usize::from(f.length)).sum::<usize>();
    if expected_len != record_len {
        return Err(invalid_data(format!(
            "record length {record_len} does not match field sizes ({expected_len})"
        )));
    }

    // The count comes from the file and may be garbage.
    let mut records = Vec::with_capacity(record_count.min(PREALLOC_ROWS));
    let mut deleted = Vec::new();
    let mut buf = vec![0u8; record_len];
    for row in 0..record_count {
        input.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => invalid_data(format!(
                "header declares {record_count} records, data ends at record {row}"
            )),
            _ => e,
        })?;
        if buf[0] == DELETED {
            deleted.push(row);
            continue;
        }
        let mut pos = 1;
        let mut values = Vec::with_capacity(fields.len());
        for field in &fields {
            let end = pos + usize::from(field.length);
            values.push(decode_value(&buf[pos..end], field, encoding));
            pos = end;
        }
        records.push(values);
    }

    Ok(DbfTable {
        fields,
        records,
        deleted,
    })
}

fn decode_value(raw: &[u8], field: &DbfField, encoding: TextEncoding) -> Value {
    match field.kind {
        DbfKind::Character | DbfKind::Other(_) => {
            let text = encoding.decode(raw);
            let text = text.trim_end_matches([' ', '\0']);
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        }
        DbfKind::Numeric | DbfKind::Float => {
            let text = String::from_utf8_lossy(raw);
            let text = text.trim();
            if text.is_empty() || text.starts_with('*') {
                return Value::Null;
            }
            if field.to_field().field_type == FieldType::Integer {
                if let Ok(v) = text.parse::<i64>() {
                    return Value::Integer(v);
                }
            }
            text.parse::<f64>().map(Value::Double).unwrap_or(Value::Null)
        }
        DbfKind::Date => {
            let text = String::from_utf8_lossy(raw);
            NaiveDate::parse_from_str(text.trim(), "%Y%m%d")
                .map(Value::Date)
                .unwrap_or(Value::Null)
        }
        DbfKind::Logical => match raw.first().copied() {
            Some(b'T' | b't' | b'Y' | b'y') => Value::Boolean(true),
            Some(b'F' | b'f' | b'N' | b'n') => Value::Boolean(false),
            _ => Value::Null,
        },
    }
}

fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn schema() -> Vec<Field> {
        vec![
            Field::new("name", FieldType::String).with_length(12, 0),
            Field::new("population", FieldType::Integer),
            Field::new("area", FieldType::Double).with_length(10, 2),
            Field::new("founded", FieldType::Date),
            Field::new("capital", FieldType::Boolean),
        ]
    }

    #[test]
    fn long_and_duplicate_names_are_shortened_uniquely() {
        let fields = vec![
            Field::new("population_total", FieldType::Integer),
            Field::new("population_tot", FieldType::Integer),
            Field::new("größe", FieldType::Double),
        ];
        let laid_out = layout_fields(&fields).unwrap();
        let names: Vec<&str> = laid_out.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["population", "populati_1", "gr__e"]);
    }

    #[test]
    fn writes_header_and_patches_record_count() {
        let fields = layout_fields(&schema()).unwrap();
        let mut writer = DbfWriter::new(Cursor::new(Vec::new()), fields, TextEncoding::utf8()).unwrap();
        writer
            .write_record(&[
                Value::from("Lyon"),
                Value::Integer(513_275),
                Value::Double(47.87),
                Value::Date(NaiveDate::from_ymd_opt(1900, 1, 2).unwrap()),
                Value::Boolean(false),
            ])
            .unwrap();
        writer.write_record(&[Value::from("Paris")]).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert_eq!(bytes[0], 0x03);
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 32 + 5 * 32 + 1);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 1 + 12 + 20 + 10 + 8 + 1);
        assert_eq!(*bytes.last().unwrap(), 0x1A);

        let header_len = 32 + 5 * 32 + 1;
        let first = &bytes[header_len..header_len + 52];
        assert_eq!(&first[..13], b" Lyon        ");
        assert_eq!(&first[33..43], b"     47.87");
        assert_eq!(&first[43..51], b"19000102");
        assert_eq!(first[51], b'F');
    }

    #[test]
    fn reads_back_what_it_wrote() {
        let fields = layout_fields(&schema()).unwrap();
        let mut writer =
            DbfWriter::new(Cursor::new(Vec::new()), fields, TextEncoding::windows_1252()).unwrap();
        writer
            .write_record(&[
                Value::from("Besançon"),
                Value::Integer(-5),
                Value::Null,
                Value::Null,
                Value::Boolean(true),
            ])
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let table = read_table(Cursor::new(bytes), TextEncoding::windows_1252()).unwrap();
        assert_eq!(table.fields.len(), 5);
        assert_eq!(
            table.records,
            vec![vec![
                Value::from("Besançon"),
                Value::Integer(-5),
                Value::Null,
                Value::Null,
                Value::Boolean(true),
            ]]
        );
    }

    #[test]
    fn numbers_wider_than_the_column_become_stars() {
        let field = DbfField {
            name: "n".into(),
            kind: DbfKind::Numeric,
            length: 3,
            decimals: 0,
        };
        assert_eq!(encode_value(&Value::Integer(12345), &field, TextEncoding::utf8()), b"***");
        assert_eq!(encode_value(&Value::Integer(42), &field, TextEncoding::utf8()), b" 42");
    }

    #[test]
    fn utf8_text_is_not_cut_mid_character() {
        let field = DbfField {
            name: "s".into(),
            kind: DbfKind::Character,
            length: 4,
            decimals: 0,
        };
        // "aéé" is 5 bytes; cutting at 4 would split the second 'é'.
        assert_eq!(encode_value(&Value::from("aéé"), &field, TextEncoding::utf8()), b"a\xc3\xa9 ");
    }

    #[test]
    fn wide_doubles_give_up_decimals_not_the_value() {
        let fields = layout_fields(&[Field::new("area", FieldType::Double)]).unwrap();
        assert_eq!((fields[0].length, fields[0].decimals), (24, 15));

        let mut writer = DbfWriter::new(Cursor::new(Vec::new()), fields, TextEncoding::utf8()).unwrap();
        writer.write_record(&[Value::Double(123456789.5)]).unwrap();
        writer.write_record(&[Value::Double(-9.87e20)]).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let table = read_table(Cursor::new(bytes), TextEncoding::utf8()).unwrap();
        assert_eq!(table.records[0][0], Value::Double(123456789.5));
        assert_eq!(table.records[1][0], Value::Double(-9.87e20));
    }

    #[test]
    fn integer_part_too_wide_still_overflows() {
        let field = DbfField {
            name: "d".into(),
            kind: DbfKind::Numeric,
            length: 5,
            decimals: 2,
        };
        let enc = TextEncoding::utf8();
        assert_eq!(encode_value(&Value::Double(12.25), &field, enc), b"12.25");
        assert_eq!(encode_value(&Value::Double(1234.25), &field, enc), b" 1234");
        assert_eq!(encode_value(&Value::from("123.71"), &field, enc), b"123.7");
        assert_eq!(encode_value(&Value::Double(123456.0), &field, enc), b"*****");
    }

    #[test]
    fn single_byte_text_is_cut_by_characters() {
        let field = DbfField {
            name: "s".into(),
            kind: DbfKind::Character,
            length: 4,
            decimals: 0,
        };
        let cp1251: TextEncoding = "CP1251".parse().unwrap();
        assert_eq!(
            encode_value(&Value::from("Москва"), &field, cp1251),
            cp1251.encode("Моск")
        );
    }

    #[test]
    fn record_count_beyond_the_data_is_invalid() {
        let fields = layout_fields(&[Field::new("n", FieldType::Integer)]).unwrap();
        let writer = DbfWriter::new(Cursor::new(Vec::new()), fields, TextEncoding::utf8()).unwrap();
        let mut bytes = writer.finish().unwrap().into_inner();
        bytes[4..8].copy_from_slice(&u32::MAX.to_le_bytes());

        let err = read_table(Cursor::new(bytes), TextEncoding::utf8()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn deleted_rows_are_skipped_and_reported() {
        let fields = layout_fields(&[Field::new("n", FieldType::Integer)]).unwrap();
        let record_len = 1 + usize::from(fields[0].length);
        let mut writer = DbfWriter::new(Cursor::new(Vec::new()), fields, TextEncoding::utf8()).unwrap();
        for n in 0..3 {
            writer.write_record(&[Value::Integer(n)]).unwrap();
        }
        let mut bytes = writer.finish().unwrap().into_inner();
        let header_len = usize::from(u16::from_le_bytes([bytes[8], bytes[9]]));
        bytes[header_len + record_len] = b'*';

        let table = read_table(Cursor::new(bytes), TextEncoding::utf8()).unwrap();
        assert_eq!(table.deleted, vec![1]);
        assert_eq!(
            table.records,
            vec![vec![Value::Integer(0)], vec![Value::Integer(2)]]
        );
    }
}
