//! ESRI shapefile decoding.
//!
//! Only the Null, Point, PolyLine and Polygon record types are understood.
//! Any other type tag is an error rather than a silently skipped record.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use memmap2::{Mmap, MmapOptions};
use regex::Regex;

use crate::error::ShapefileError;
use crate::shp::cursor::{ByteOrder, Cursor};
use crate::shp::dbf::{Dbf, DbfValue};
use crate::shp::name::wash_shape_name;

pub const FILE_CODE: i32 = 9994;
pub const HEADER_LEN: usize = 100;

/// DBF column used for shape names when no column matches.
pub const DEFAULT_NAME_FIELD: &str = "NAME";

pub const SHAPE_NULL: i32 = 0;
pub const SHAPE_POINT: i32 = 1;
pub const SHAPE_POLYLINE: i32 = 3;
pub const SHAPE_POLYGON: i32 = 5;

/// The 100-byte main file header.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapefileHeader {
    pub file_code: i32,
    /// Total file length in 16-bit words.
    pub file_length: i32,
    pub version: i32,
    pub shape_type: i32,
    /// `xmin, xmax, ymin, ymax, zmin, zmax, mmin, mmax`
    pub bbox: [f64; 8],
}

impl ShapefileHeader {
    fn read(cursor: &mut Cursor<'_>) -> Result<Self, ShapefileError> {
        let file_code = cursor.read_i32(ByteOrder::Big)?;
        cursor.skip(5 * 4)?;
        let file_length = cursor.read_i32(ByteOrder::Big)?;
        let version = cursor.read_i32(ByteOrder::Little)?;
        let shape_type = cursor.read_i32(ByteOrder::Little)?;
        let mut bbox = [0.0; 8];
        for v in &mut bbox {
            *v = cursor.read_f64(ByteOrder::Little)?;
        }

        if file_code != FILE_CODE {
            warn!("unexpected shapefile file code {file_code}, expected {FILE_CODE}");
        }

        Ok(Self {
            file_code,
            file_length,
            version,
            shape_type,
            bbox,
        })
    }

    pub fn file_length_bytes(&self) -> usize {
        usize::try_from(self.file_length).unwrap_or(0) * 2
    }
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ShapefileHeader {{")?;
        writeln!(f, "\tFile code:\t{}", self.file_code)?;
        writeln!(f, "\tFile length:\t{}", self.file_length)?;
        writeln!(f, "\tVersion:\t{}", self.version)?;
        writeln!(f, "\tShape type:\t{}", self.shape_type)?;
        let names = ["xmin", "xmax", "ymin", "ymax", "zmin", "zmax", "mmin", "mmax"];
        for (name, v) in names.iter().zip(self.bbox) {
            writeln!(f, "\t{name}:\t{v}")?;
        }
        writeln!(f, "}}")
    }
}

/// A vertex; `x` is longitude and `y` latitude for geographic data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn read(cursor: &mut Cursor<'_>) -> Result<Self, ShapefileError> {
        let x = cursor.read_f64(ByteOrder::Little)?;
        let y = cursor.read_f64(ByteOrder::Little)?;
        Ok(Self { x, y })
    }

}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Body of a PolyLine or Polygon record.
///
/// Points are stored without repeats: a point equal to the previously kept
/// one is dropped, and a ring's closing point is dropped when it repeats the
/// first. A record whose points all coincide therefore keeps none of them.
/// `parts` keeps the start offsets exactly as stored in the file.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiPartShape {
    pub bbox: [f64; 4],
    pub parts: Vec<i32>,
    pub points: Vec<Point>,
}

impl MultiPartShape {
    fn read(cursor: &mut Cursor<'_>) -> Result<Self, ShapefileError> {
        let mut bbox = [0.0; 4];
        for v in &mut bbox {
            *v = cursor.read_f64(ByteOrder::Little)?;
        }
        let num_parts = cursor.read_i32(ByteOrder::Little)?;
        let num_points = cursor.read_i32(ByteOrder::Little)?;
        let (Ok(num_parts), Ok(num_points)) =
            (usize::try_from(num_parts), usize::try_from(num_points))
        else {
            return Err(ShapefileError::MalformedRecord(format!(
                "negative part ({num_parts}) or point ({num_points}) count"
            )));
        };
        if cursor.remaining() < num_parts * 4 + num_points * 16 {
            return Err(ShapefileError::MalformedRecord(format!(
                "{num_parts} parts and {num_points} points do not fit in the file"
            )));
        }

        let parts = (0..num_parts)
            .map(|_| cursor.read_i32(ByteOrder::Little))
            .collect::<Result<Vec<_>, _>>()?;

        let mut points: Vec<Point> = Vec::with_capacity(num_points);
        for _ in 0..num_points {
            let point = Point::read(cursor)?;
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        if points.first() == points.last() {
            points.pop();
        }
        points.shrink_to_fit();

        Ok(Self {
            bbox,
            parts,
            points,
        })
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Points of part `i`. The last part runs to the end of the point list.
    ///
    /// Part offsets refer to the file's point numbering, so after repeated
    /// points were dropped they are clamped to the points that remain.
    pub fn part(&self, i: usize) -> Option<&[Point]> {
        let clamp = |offset: i32| usize::try_from(offset).unwrap_or(0).min(self.points.len());
        let start = clamp(*self.parts.get(i)?);
        let end = match self.parts.get(i + 1) {
            Some(&next) => clamp(next),
            None => self.points.len(),
        };
        Some(&self.points[start..end.max(start)])
    }

    /// Edges of part `i`, including the one closing the ring back to its first point.
    pub fn segments(&self, i: usize) -> Option<impl Iterator<Item = (Point, Point)> + '_> {
        let ring = self.part(i)?;
        let closing = ring.last().copied().zip(ring.first().copied());
        Some(ring.windows(2).map(|w| (w[0], w[1])).chain(closing))
    }
}

impl fmt::Display for MultiPartShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.bbox.iter().enumerate() {
            writeln!(f, "\tbox[{i}]:\t{v}")?;
        }
        writeln!(f, "\tNumParts:\t{}", self.num_parts())?;
        writeln!(f, "\tNumPoints:\t{}", self.num_points())?;
        for (i, p) in self.parts.iter().enumerate() {
            writeln!(f, "\tParts[{i}]:\t{p}")?;
        }
        for (i, p) in self.points.iter().enumerate() {
            writeln!(f, "\tPoints[{i}]:\t{p}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Null,
    Point(Point),
    PolyLine(MultiPartShape),
    Polygon(MultiPartShape),
}

impl Shape {
    /// Decode a record body, starting at its type tag.
    fn read(cursor: &mut Cursor<'_>) -> Result<Self, ShapefileError> {
        match cursor.read_i32(ByteOrder::Little)? {
            SHAPE_NULL => Ok(Self::Null),
            SHAPE_POINT => Ok(Self::Point(Point::read(cursor)?)),
            SHAPE_POLYLINE => Ok(Self::PolyLine(MultiPartShape::read(cursor)?)),
            SHAPE_POLYGON => Ok(Self::Polygon(MultiPartShape::read(cursor)?)),
            other => Err(ShapefileError::UnsupportedShape(other)),
        }
    }

    pub fn shape_type(&self) -> i32 {
        match self {
            Self::Null => SHAPE_NULL,
            Self::Point(_) => SHAPE_POINT,
            Self::PolyLine(_) => SHAPE_POLYLINE,
            Self::Polygon(_) => SHAPE_POLYGON,
        }
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Self::Null => &[],
            Self::Point(p) => std::slice::from_ref(p),
            Self::PolyLine(m) | Self::Polygon(m) => &m.points,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => writeln!(f, "NullShape {{\n\tType:\t{SHAPE_NULL}\n}}"),
            Self::Point(p) => writeln!(
                f,
                "Point {{\n\tType:\t{SHAPE_POINT}\n\tX:\t{}\n\tY:\t{}\n}}",
                p.x, p.y
            ),
            Self::PolyLine(m) => write!(f, "PolyLine {{\n\tType:\t{SHAPE_POLYLINE}\n{m}}}\n"),
            Self::Polygon(m) => write!(f, "Polygon {{\n\tType:\t{SHAPE_POLYGON}\n{m}}}\n"),
        }
    }
}

/// A decoded record with its 1-based record number.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRecord {
    pub number: i32,
    /// Content length in 16-bit words, as declared in the record header.
    pub content_length: i32,
    pub shape: Shape,
}

struct RecordHeader {
    number: i32,
    content_end: usize,
}

impl RecordHeader {
    fn read(cursor: &mut Cursor<'_>) -> Result<(Self, i32), ShapefileError> {
        let number = cursor.read_i32(ByteOrder::Big)?;
        let content_length = cursor.read_i32(ByteOrder::Big)?;
        let words = usize::try_from(content_length).map_err(|_| {
            ShapefileError::MalformedRecord(format!(
                "record {number} has negative length {content_length}"
            ))
        })?;
        let header = Self {
            number,
            content_end: cursor.position() + words * 2,
        };
        Ok((header, content_length))
    }
}

/// Read one record body and leave the cursor at the end declared by its header.
fn read_record(cursor: &mut Cursor<'_>) -> Result<ShapeRecord, ShapefileError> {
    let (header, content_length) = RecordHeader::read(cursor)?;
    let shape = Shape::read(cursor)?;
    if cursor.position() > header.content_end {
        return Err(ShapefileError::MalformedRecord(format!(
            "record {} is longer than its declared {content_length} words",
            header.number
        )));
    }
    cursor.seek(header.content_end)?;
    Ok(ShapeRecord {
        number: header.number,
        content_length,
        shape,
    })
}

enum Source {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Source {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => &map[..],
            Self::Owned(bytes) => bytes.as_slice(),
        }
    }
}

/// A shapefile, optionally paired with its DBF attribute table.
///
/// The file is memory-mapped for the lifetime of the value and unmapped on drop.
pub struct Shapefile {
    path: Option<PathBuf>,
    source: Source,
    dbf: Option<Dbf>,
    name_field: String,
    header: Option<ShapefileHeader>,
    records: Option<Vec<ShapeRecord>>,
}

impl Shapefile {
    /// Map `path` and load the sibling `.dbf` if there is one.
    ///
    /// A missing or unreadable DBF is logged and leaves the shapefile without
    /// attribute data.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ShapefileError> {
        Self::open_with_names(path.as_ref(), None)
    }

    /// Like [`Shapefile::open`], taking shape names from the first DBF column
    /// matching `pattern`.
    pub fn open_matching<P: AsRef<Path>>(path: P, pattern: &Regex) -> Result<Self, ShapefileError> {
        Self::open_with_names(path.as_ref(), Some(pattern))
    }

    fn open_with_names(path: &Path, pattern: Option<&Regex>) -> Result<Self, ShapefileError> {
        let shapefile = Self::open_without_dbf(path)?;
        let dbf_path = path.with_extension("dbf");
        if !dbf_path.exists() {
            warn!(
                "no DBF file found at {}, no metadata will be imported",
                dbf_path.display()
            );
            return Ok(shapefile);
        }
        match Dbf::open(&dbf_path) {
            Ok(dbf) => Ok(match pattern {
                Some(pattern) => shapefile.with_dbf_matching(dbf, pattern),
                None => shapefile.with_dbf(dbf),
            }),
            Err(e) => {
                warn!(
                    "error reading {}: {e}, no metadata will be imported",
                    dbf_path.display()
                );
                Ok(shapefile)
            }
        }
    }

    /// Map `path` without looking for attribute data.
    pub fn open_without_dbf<P: AsRef<Path>>(path: P) -> Result<Self, ShapefileError> {
        let file = File::open(path.as_ref())?;
        let source = if file.metadata()?.len() == 0 {
            Source::Owned(Vec::new())
        } else {
            // SAFETY: the mapping is read-only and no writer is expected while it is held.
            Source::Mapped(unsafe { MmapOptions::new().map(&file)? })
        };
        debug!("mapped {} ({} bytes)", path.as_ref().display(), source.bytes().len());
        Ok(Self::new(Some(path.as_ref().to_path_buf()), source))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(None, Source::Owned(bytes))
    }

    fn new(path: Option<PathBuf>, source: Source) -> Self {
        Self {
            path,
            source,
            dbf: None,
            name_field: DEFAULT_NAME_FIELD.to_string(),
            header: None,
            records: None,
        }
    }

    /// Attach an attribute table. The first column whose name contains `NAME`
    /// supplies shape names.
    pub fn with_dbf(self, dbf: Dbf) -> Self {
        let field = dbf.field_names().find(|n| n.contains(DEFAULT_NAME_FIELD)).map(str::to_string);
        self.attach(dbf, field)
    }

    /// Attach an attribute table, taking shape names from the first column
    /// matching `pattern`.
    pub fn with_dbf_matching(self, dbf: Dbf, pattern: &Regex) -> Self {
        let field = dbf.matching_field_names(pattern).first().map(|n| n.to_string());
        self.attach(dbf, field)
    }

    pub fn with_dbf_path<P: AsRef<Path>>(self, path: P) -> Result<Self, ShapefileError> {
        Ok(self.with_dbf(Dbf::open(path)?))
    }

    fn attach(mut self, dbf: Dbf, field: Option<String>) -> Self {
        self.name_field = field.unwrap_or_else(|| DEFAULT_NAME_FIELD.to_string());
        debug!("shape names come from DBF field {}", self.name_field);
        self.dbf = Some(dbf);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn dbf(&self) -> Option<&Dbf> {
        self.dbf.as_ref()
    }

    pub fn name_field(&self) -> &str {
        &self.name_field
    }

    pub fn is_parsed(&self) -> bool {
        self.records.is_some()
    }

    pub fn header(&self) -> Option<&ShapefileHeader> {
        self.header.as_ref()
    }

    pub fn records(&self) -> Option<&[ShapeRecord]> {
        self.records.as_deref()
    }

    /// Decode the header and every record. Later calls return the cached records.
    pub fn parse(&mut self) -> Result<&[ShapeRecord], ShapefileError> {
        if self.records.is_none() {
            let mut cursor = Cursor::new(self.source.bytes());
            let header = ShapefileHeader::read(&mut cursor)?;
            let mut records = Vec::new();
            while cursor.has_remaining() {
                records.push(read_record(&mut cursor)?);
            }
            debug!("parsed {} shapefile records", records.len());
            self.header = Some(header);
            self.records = Some(records);
        }
        Ok(self.records.as_deref().unwrap_or_default())
    }

    /// Shape with 1-based record number `index`.
    ///
    /// Before `parse` this scans the record headers from the start of the
    /// file and decodes only the requested record.
    pub fn get_shape(&self, index: i32) -> Result<Shape, ShapefileError> {
        if let Some(records) = &self.records {
            let max = records.iter().map(|r| r.number).max().unwrap_or(0);
            return match records.iter().find(|r| r.number == index) {
                Some(record) => Ok(record.shape.clone()),
                None => Err(missing(index, max)),
            };
        }

        if index < 1 {
            return Err(ShapefileError::IndexOutOfBounds { index, max: 0 });
        }
        let mut cursor = Cursor::new(self.source.bytes());
        ShapefileHeader::read(&mut cursor)?;
        let mut max = 0;
        while cursor.has_remaining() {
            let (header, _) = RecordHeader::read(&mut cursor)?;
            max = max.max(header.number);
            if header.number == index {
                return Shape::read(&mut cursor);
            }
            cursor.seek(header.content_end)?;
        }
        Err(missing(index, max))
    }

    /// Display name of record `index`: the washed DBF name value, or the
    /// index itself when there is no usable name.
    pub fn get_shape_name(&self, index: i32) -> String {
        let value = usize::try_from(index)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|row| self.dbf.as_ref()?.value(&self.name_field, row).ok());
        match value {
            Some(DbfValue::Character(name)) => wash_shape_name(name),
            _ => index.to_string(),
        }
    }
}

fn missing(index: i32, max: i32) -> ShapefileError {
    if index > max || index < 1 {
        ShapefileError::IndexOutOfBounds { index, max }
    } else {
        ShapefileError::MalformedRecord(format!("missing shape {index}"))
    }
}

impl fmt::Display for Shapefile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => writeln!(f, "{}:", path.display())?,
            None => writeln!(f, "<memory>:")?,
        }
        match (&self.header, &self.records) {
            (Some(header), Some(records)) => {
                write!(f, "{header}")?;
                for record in records {
                    write!(f, "{}", record.shape)?;
                }
                Ok(())
            }
            _ => writeln!(f, "Unparsed"),
        }
    }
}
