//! ESRI shapefile reading with optional dBase attribute lookup.

pub mod cursor;
pub mod dbf;
pub mod name;
pub mod shapefile;

pub use dbf::{Dbf, DbfField, DbfValue};
pub use name::wash_shape_name;
pub use shapefile::{MultiPartShape, Point, Shape, ShapeRecord, Shapefile, ShapefileHeader};
