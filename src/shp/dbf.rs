//! Reader for the dBase III attribute table stored next to a shapefile.
//!
//! The whole table is decoded up front so that a broken side file is
//! reported when it is opened rather than on the first name lookup.

use std::fmt;
use std::path::Path;

use log::debug;
use regex::Regex;

use crate::error::DbfError;

const HEADER_LEN: usize = 32;
const FIELD_DESCRIPTOR_LEN: usize = 32;
const FIELD_TERMINATOR: u8 = 0x0D;
const DELETED_FLAG: u8 = b'*';

#[derive(Clone, Debug, PartialEq)]
pub struct DbfField {
    pub name: String,
    /// dBase type letter: `C`, `N`, `F`, `L`, `D`, ...
    pub kind: char,
    pub length: usize,
    pub decimal_count: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DbfValue {
    Character(String),
    /// `None` for blank or overflowed (`*`) numbers.
    Numeric(Option<f64>),
    /// `None` for the uninitialised `?` value.
    Logical(Option<bool>),
    /// `YYYYMMDD` as stored.
    Date(String),
    /// Any other field type, as trimmed text.
    Other(String),
}

impl DbfValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Character(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DbfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character(s) | Self::Date(s) | Self::Other(s) => f.write_str(s),
            Self::Numeric(Some(n)) => write!(f, "{n}"),
            Self::Logical(Some(b)) => write!(f, "{b}"),
            Self::Numeric(None) | Self::Logical(None) => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dbf {
    fields: Vec<DbfField>,
    records: Vec<Vec<DbfValue>>,
}

fn le_u16(bytes: &[u8], at: usize) -> usize {
    usize::from(u16::from_le_bytes([bytes[at], bytes[at + 1]]))
}

fn le_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

fn decode_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim().to_string()
}

fn decode_value(field: &DbfField, raw: &[u8]) -> DbfValue {
    let text = decode_text(raw);
    match field.kind {
        'C' => DbfValue::Character(String::from_utf8_lossy(raw).trim_end().to_string()),
        'N' | 'F' => DbfValue::Numeric(text.parse().ok()),
        'L' => DbfValue::Logical(match text.as_str() {
            "Y" | "y" | "T" | "t" => Some(true),
            "N" | "n" | "F" | "f" => Some(false),
            _ => None,
        }),
        'D' => DbfValue::Date(text),
        _ => DbfValue::Other(text),
    }
}

impl Dbf {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbfError> {
        if bytes.len() < HEADER_LEN {
            return Err(DbfError::Malformed(format!(
                "header needs {HEADER_LEN} bytes, file has {}",
                bytes.len()
            )));
        }
        let record_count = le_u32(bytes, 4);
        let header_len = le_u16(bytes, 8);
        let record_len = le_u16(bytes, 10);
        if header_len > bytes.len() || header_len < HEADER_LEN + 1 {
            return Err(DbfError::Malformed(format!("bad header length {header_len}")));
        }

        let mut fields = Vec::new();
        let mut at = HEADER_LEN;
        while at < header_len && bytes[at] != FIELD_TERMINATOR {
            if at + FIELD_DESCRIPTOR_LEN > header_len {
                return Err(DbfError::Malformed(
                    "field descriptor runs past the header".to_string(),
                ));
            }
            let d = &bytes[at..at + FIELD_DESCRIPTOR_LEN];
            let name_end = d[..11].iter().position(|&b| b == 0).unwrap_or(11);
            fields.push(DbfField {
                name: decode_text(&d[..name_end]),
                kind: char::from(d[11]).to_ascii_uppercase(),
                length: usize::from(d[16]),
                decimal_count: d[17],
            });
            at += FIELD_DESCRIPTOR_LEN;
        }

        let field_len: usize = fields.iter().map(|f| f.length).sum();
        if record_len < field_len + 1 {
            return Err(DbfError::Malformed(format!(
                "record length {record_len} is shorter than its fields ({})",
                field_len + 1
            )));
        }

        let mut records = Vec::with_capacity(record_count.min(bytes.len() / record_len));
        for i in 0..record_count {
            let start = header_len + i * record_len;
            let Some(raw) = bytes.get(start..start + record_len) else {
                return Err(DbfError::Malformed(format!(
                    "record {i} of {record_count} is truncated"
                )));
            };
            if raw[0] == DELETED_FLAG {
                debug!("skipping deleted DBF record {i}");
                continue;
            }
            let mut offset = 1;
            let values = fields
                .iter()
                .map(|field| {
                    let value = decode_value(field, &raw[offset..offset + field.length]);
                    offset += field.length;
                    value
                })
                .collect();
            records.push(values);
        }

        debug!(
            "read DBF table with {} fields and {} records",
            fields.len(),
            records.len()
        );
        Ok(Self { fields, records })
    }

    pub fn fields(&self) -> &[DbfField] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field_index(&self, name: &str) -> Result<usize, DbfError> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| DbfError::NoSuchField(name.to_string()))
    }

    /// Names of the fields matching `pattern`, in declaration order.
    pub fn matching_field_names(&self, pattern: &Regex) -> Vec<&str> {
        self.field_names().filter(|n| pattern.is_match(n)).collect()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, index: usize) -> Result<&[DbfValue], DbfError> {
        self.records
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DbfError::NoSuchRecord(index))
    }

    pub fn value(&self, field: &str, record: usize) -> Result<&DbfValue, DbfError> {
        let column = self.field_index(field)?;
        Ok(&self.record(record)?[column])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a dBase III table in memory. Every column is `(name, kind, length)`.
    pub(crate) fn dbf_bytes(columns: &[(&str, u8, u8)], rows: &[(bool, Vec<&str>)]) -> Vec<u8> {
        let header_len = HEADER_LEN + columns.len() * FIELD_DESCRIPTOR_LEN + 1;
        let record_len = 1 + columns.iter().map(|c| usize::from(c.2)).sum::<usize>();

        let mut out = vec![0u8; HEADER_LEN];
        out[0] = 0x03;
        out[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
        out[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
        out[10..12].copy_from_slice(&(record_len as u16).to_le_bytes());

        for (name, kind, length) in columns {
            let mut d = [0u8; FIELD_DESCRIPTOR_LEN];
            d[..name.len()].copy_from_slice(name.as_bytes());
            d[11] = *kind;
            d[16] = *length;
            out.extend_from_slice(&d);
        }
        out.push(FIELD_TERMINATOR);

        for (deleted, values) in rows {
            out.push(if *deleted { DELETED_FLAG } else { b' ' });
            for ((_, kind, length), value) in columns.iter().zip(values) {
                let width = usize::from(*length);
                let cell = if *kind == b'N' {
                    format!("{value:>width$}")
                } else {
                    format!("{value:<width$}")
                };
                out.extend_from_slice(cell.as_bytes());
            }
        }
        out.push(0x1A);
        out
    }

    fn sample() -> Dbf {
        let bytes = dbf_bytes(
            &[("ID", b'N', 6), ("ST_NAME", b'C', 16), ("OK", b'L', 1), ("SINCE", b'D', 8)],
            &[
                (false, vec!["1", "Lake Vanern", "T", "20050101"]),
                (true, vec!["2", "gone", "F", "20050102"]),
                (false, vec!["", "Gotland", "?", ""]),
            ],
        );
        Dbf::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let dbf = sample();
        let names: Vec<&str> = dbf.field_names().collect();
        assert_eq!(names, ["ID", "ST_NAME", "OK", "SINCE"]);
        assert_eq!(dbf.fields()[1].kind, 'C');
        assert_eq!(dbf.fields()[1].length, 16);
        assert_eq!(dbf.field_index("OK").unwrap(), 2);
        assert!(matches!(dbf.field_index("NOPE"), Err(DbfError::NoSuchField(_))));
    }

    #[test]
    fn test_typed_values_and_deleted_rows() {
        let dbf = sample();
        assert_eq!(dbf.record_count(), 2);
        assert_eq!(
            dbf.record(0).unwrap(),
            &[
                DbfValue::Numeric(Some(1.0)),
                DbfValue::Character("Lake Vanern".to_string()),
                DbfValue::Logical(Some(true)),
                DbfValue::Date("20050101".to_string()),
            ]
        );
        assert_eq!(dbf.value("ID", 1).unwrap(), &DbfValue::Numeric(None));
        assert_eq!(dbf.value("OK", 1).unwrap(), &DbfValue::Logical(None));
        assert_eq!(dbf.value("ST_NAME", 1).unwrap().as_str(), Some("Gotland"));
        assert!(matches!(dbf.record(2), Err(DbfError::NoSuchRecord(2))));
    }

    #[test]
    fn test_matching_field_names() {
        let dbf = sample();
        let pattern = Regex::new("^(?:.*NAME.*)$").unwrap();
        assert_eq!(dbf.matching_field_names(&pattern), ["ST_NAME"]);
    }

    #[test]
    fn test_malformed_tables() {
        assert!(matches!(Dbf::from_bytes(&[0u8; 10]), Err(DbfError::Malformed(_))));

        let mut bytes = dbf_bytes(&[("NAME", b'C', 8)], &[(false, vec!["a"]), (false, vec!["b"])]);
        bytes.truncate(bytes.len() - 6);
        assert!(matches!(Dbf::from_bytes(&bytes), Err(DbfError::Malformed(_))));
    }

    #[test]
    fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.dbf");
        std::fs::write(&path, dbf_bytes(&[("NAME", b'C', 8)], &[(false, vec!["Oslo"])])).unwrap();
        let dbf = Dbf::open(&path).unwrap();
        assert_eq!(dbf.value("NAME", 0).unwrap(), &DbfValue::Character("Oslo".to_string()));
        assert!(matches!(Dbf::open(dir.path().join("missing.dbf")), Err(DbfError::Io(_))));
    }
}
