//! Bounds-checked reader over a byte slice.
//!
//! Shapefiles mix byte orders inside a single record, so every read names
//! its byte order instead of the cursor carrying a mode.

use crate::error::ShapefileError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Move to an absolute offset. Offsets past the end are an underflow.
    pub fn seek(&mut self, pos: usize) -> Result<(), ShapefileError> {
        if pos > self.buf.len() {
            return Err(underflow(pos - self.pos, self));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), ShapefileError> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ShapefileError> {
        if self.remaining() < n {
            return Err(underflow(n, self));
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ShapefileError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_i32(&mut self, order: ByteOrder) -> Result<i32, ShapefileError> {
        let bytes = self.array::<4>()?;
        Ok(match order {
            ByteOrder::Big => i32::from_be_bytes(bytes),
            ByteOrder::Little => i32::from_le_bytes(bytes),
        })
    }

    pub fn read_f64(&mut self, order: ByteOrder) -> Result<f64, ShapefileError> {
        let bytes = self.array::<8>()?;
        Ok(match order {
            ByteOrder::Big => f64::from_be_bytes(bytes),
            ByteOrder::Little => f64::from_le_bytes(bytes),
        })
    }
}

fn underflow(expected: usize, cursor: &Cursor<'_>) -> ShapefileError {
    ShapefileError::MalformedRecord(format!(
        "file ended prematurely: needed {expected} bytes at offset {}, {} left",
        cursor.pos,
        cursor.remaining()
    ))
}
