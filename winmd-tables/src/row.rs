//! Typed access to the columns of a single table row.

use std::fmt;

use crate::catalog::{Column, ColumnKind, HeapKind, TableType};
use crate::error::{FormatError, FormatErrorKind};
use crate::schema::TableSchema;
use crate::utils::read_le;

/// One row of a metadata table: a typed projection over a stride-wide span
/// of the stream buffer.
///
/// Columns are addressed by position in the table's column list. All stored
/// heap and row indices are 1-based in the file format and are returned
/// verbatim; a value of 0 means the field is absent.
#[derive(Clone, Copy)]
pub struct Row<'data> {
    ty: TableType,
    schema: TableSchema,
    bytes: &'data [u8],
}

impl<'data> Row<'data> {
    pub(crate) fn new(ty: TableType, schema: TableSchema, bytes: &'data [u8]) -> Self {
        Self { ty, schema, bytes }
    }

    /// The table this row belongs to.
    pub fn table_type(&self) -> TableType {
        self.ty
    }

    /// The raw bytes backing this row.
    pub fn bytes(&self) -> &'data [u8] {
        self.bytes
    }

    /// Looks up a column and slices its bytes out of the row.
    fn cell(&self, col: usize) -> Result<(Column, &'data [u8]), FormatError> {
        let column = self
            .ty
            .columns()
            .get(col)
            .copied()
            .ok_or(FormatErrorKind::SchemaMalformed(self.ty, col))?;
        let (offset, width) = self
            .schema
            .column(col)
            .ok_or(FormatErrorKind::SchemaMalformed(self.ty, col))?;
        let bytes = self
            .bytes
            .get(offset..offset + width)
            .ok_or(FormatErrorKind::Truncated(offset + width, self.bytes.len()))?;
        Ok((column, bytes))
    }

    /// Reads a constant column of the given declared width.
    fn constant(&self, col: usize, width: u8) -> Result<u64, FormatError> {
        let (column, bytes) = self.cell(col)?;
        match column.kind {
            ColumnKind::Constant(declared) if declared == width => Ok(read_le(bytes)),
            _ => Err(FormatErrorKind::SchemaMalformed(self.ty, col).into()),
        }
    }

    /// Reads a 1-byte constant column.
    pub fn u8(&self, col: usize) -> Result<u8, FormatError> {
        Ok(self.constant(col, 1)? as u8)
    }

    /// Reads a 2-byte constant column.
    pub fn u16(&self, col: usize) -> Result<u16, FormatError> {
        Ok(self.constant(col, 2)? as u16)
    }

    /// Reads a 4-byte constant column.
    pub fn u32(&self, col: usize) -> Result<u32, FormatError> {
        Ok(self.constant(col, 4)? as u32)
    }

    /// Reads an 8-byte constant column.
    pub fn u64(&self, col: usize) -> Result<u64, FormatError> {
        self.constant(col, 8)
    }

    /// Reads a heap-index column of the given heap, normalised to `u32`.
    fn heap_index(&self, col: usize, heap: HeapKind) -> Result<u32, FormatError> {
        let (column, bytes) = self.cell(col)?;
        match column.kind {
            ColumnKind::Heap(declared) if declared == heap => Ok(read_le(bytes) as u32),
            _ => Err(FormatErrorKind::SchemaMalformed(self.ty, col).into()),
        }
    }

    /// Reads a `#Strings` heap index, normalised to `u32`.
    pub fn string_index(&self, col: usize) -> Result<u32, FormatError> {
        self.heap_index(col, HeapKind::Strings)
    }

    /// Reads a `#GUID` heap index, normalised to `u32`.
    pub fn guid_index(&self, col: usize) -> Result<u32, FormatError> {
        self.heap_index(col, HeapKind::Guid)
    }

    /// Reads a `#Blob` heap index, normalised to `u32`.
    pub fn blob_index(&self, col: usize) -> Result<u32, FormatError> {
        self.heap_index(col, HeapKind::Blob)
    }

    /// Reads a simple-index column as its target table and the stored
    /// 1-based row number (0 meaning absent).
    pub fn simple_index(&self, col: usize) -> Result<(TableType, u32), FormatError> {
        let (column, bytes) = self.cell(col)?;
        match column.kind {
            ColumnKind::Table(target) => Ok((target, read_le(bytes) as u32)),
            _ => Err(FormatErrorKind::SchemaMalformed(self.ty, col).into()),
        }
    }

    /// Decodes a coded-index column into its target table and the stored
    /// 1-based row number (0 meaning absent).
    pub fn coded_index(&self, col: usize) -> Result<(TableType, u32), FormatError> {
        let (column, bytes) = self.cell(col)?;
        match column.kind {
            ColumnKind::Coded(family) => family.decode(read_le(bytes) as u32),
            _ => Err(FormatErrorKind::SchemaMalformed(self.ty, col).into()),
        }
    }
}

impl fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("table", &self.ty)
            .field("bytes", &self.bytes)
            .finish()
    }
}
