//! The `#~` tables stream reader.

use std::fmt;

use crate::catalog::TableType;
use crate::error::{FormatError, FormatErrorKind};
use crate::row::Row;
use crate::schema::{HeapSizes, TableSchema};
use crate::utils::{u32_at, u64_at};

/// The size of the fixed part of the stream header, up to `Rows[]`.
const HEADER_SIZE: usize = 24;

/// A parsed `#~` (or `#-`) tables stream.
///
/// The stream borrows the caller's byte buffer; every [`TableView`] and
/// [`Row`] handed out is a sub-slice of it. The row-count vector and the
/// per-table row layouts are resolved once, here; row decoding stays lazy.
///
/// See <https://github.com/stakx/ecma-335/blob/master/docs/ii.24.2.6-metadata-stream.md>
/// for a definition of the stream's format.
#[derive(Clone)]
pub struct TablesStream<'data> {
    major_version: u8,
    minor_version: u8,
    heap_sizes: HeapSizes,
    valid: u64,
    sorted: u64,
    row_counts: [u32; 64],
    tables: [Option<TableView<'data>>; 64],
}

/// One valid table of a [`TablesStream`]: its row count, resolved row
/// layout, and the slice of the stream buffer holding its packed rows.
#[derive(Clone, Copy)]
pub struct TableView<'data> {
    ty: TableType,
    rows: u32,
    schema: TableSchema,
    contents: &'data [u8],
}

impl<'data> TablesStream<'data> {
    /// Parses a tables stream out of the given buffer.
    ///
    /// The buffer must hold exactly the stream: the 24-byte header, one
    /// little-endian `u32` row count per bit set in `Valid`, and the packed
    /// rows of every valid table in ascending table-number order, ending at
    /// the buffer's end.
    #[tracing::instrument(level = "trace", name = "TablesStream::parse", skip_all)]
    pub fn parse(buf: &'data [u8]) -> Result<Self, FormatError> {
        let header_short = || FormatErrorKind::Truncated(HEADER_SIZE, buf.len());

        let reserved0 = u32_at(buf, 0).ok_or_else(header_short)?;
        let major_version = *buf.get(4).ok_or_else(header_short)?;
        let minor_version = *buf.get(5).ok_or_else(header_short)?;
        let heap_sizes = HeapSizes::new(*buf.get(6).ok_or_else(header_short)?);
        let reserved1 = *buf.get(7).ok_or_else(header_short)?;
        let valid = u64_at(buf, 8).ok_or_else(header_short)?;
        let sorted = u64_at(buf, 16).ok_or_else(header_short)?;

        if reserved0 != 0 || reserved1 != 1 {
            return Err(FormatErrorKind::ReservedFieldMismatch.into());
        }

        // Sizing consults the row counts of every table a column can point
        // at, so an unrecognised table bit poisons the whole schema.
        for number in 0..64u8 {
            if valid >> number & 1 != 0 && TableType::from_number(number).is_none() {
                return Err(FormatErrorKind::UnknownTableBit(number).into());
            }
        }

        let base = HEADER_SIZE + 4 * valid.count_ones() as usize;

        let mut row_counts = [0u32; 64];
        let mut offset = HEADER_SIZE;
        for number in 0..64usize {
            if valid >> number & 1 != 0 {
                row_counts[number] =
                    u32_at(buf, offset).ok_or(FormatErrorKind::Truncated(base, buf.len()))?;
                offset += 4;
            }
        }

        let mut tables = [None; 64];
        let mut cursor = base;
        for ty in TableType::ALL {
            if valid >> ty.number() & 1 == 0 {
                continue;
            }
            let rows = row_counts[ty.number() as usize];
            let schema = TableSchema::resolve(ty, heap_sizes, &row_counts);
            let size = rows as usize * schema.stride();
            let contents = buf
                .get(cursor..cursor + size)
                .ok_or(FormatErrorKind::Truncated(cursor + size, buf.len()))?;
            tables[ty.number() as usize] = Some(TableView {
                ty,
                rows,
                schema,
                contents,
            });
            cursor += size;
        }

        // The last table must end exactly at the buffer's end.
        if cursor != buf.len() {
            return Err(FormatErrorKind::Truncated(cursor, buf.len()).into());
        }

        Ok(Self {
            major_version,
            minor_version,
            heap_sizes,
            valid,
            sorted,
            row_counts,
            tables,
        })
    }

    /// The stream's major version, typically 2.
    pub fn major_version(&self) -> u8 {
        self.major_version
    }

    /// The stream's minor version, typically 0.
    pub fn minor_version(&self) -> u8 {
        self.minor_version
    }

    /// The heap index widths declared by the header's `HeapSizes` byte.
    pub fn heap_sizes(&self) -> HeapSizes {
        self.heap_sizes
    }

    /// The raw `Valid` mask: bit `t` is set iff table `t` is present.
    pub fn valid(&self) -> u64 {
        self.valid
    }

    /// The raw `Sorted` mask. Advisory only; nothing here verifies sort
    /// order.
    pub fn sorted(&self) -> u64 {
        self.sorted
    }

    /// Whether the `Sorted` mask marks the given table as sorted.
    pub fn is_sorted(&self, ty: TableType) -> bool {
        self.sorted >> ty.number() & 1 != 0
    }

    /// The number of rows in the given table; 0 if the table is not present.
    pub fn row_count(&self, ty: TableType) -> u32 {
        self.row_counts[ty.number() as usize]
    }

    /// Returns a view of the given table, or `None` if its `Valid` bit is
    /// clear.
    pub fn table(&self, ty: TableType) -> Option<TableView<'data>> {
        self.tables[ty.number() as usize]
    }

    /// Returns a view of the table with the given raw table number, if the
    /// catalog defines it and its `Valid` bit is set.
    pub fn table_by_number(&self, number: u8) -> Option<TableView<'data>> {
        self.table(TableType::from_number(number)?)
    }

    /// Iterates over the valid tables in ascending table-number order.
    pub fn iter(&self) -> impl Iterator<Item = TableView<'data>> + '_ {
        self.tables.iter().flatten().copied()
    }
}

impl fmt::Debug for TablesStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TablesStream")
            .field("major_version", &self.major_version)
            .field("minor_version", &self.minor_version)
            .field("heap_sizes", &self.heap_sizes.bits())
            .field("valid", &format_args!("{:#018x}", self.valid))
            .field("sorted", &format_args!("{:#018x}", self.sorted))
            .field("tables", &self.valid.count_ones())
            .finish()
    }
}

impl<'data> TableView<'data> {
    /// The table this view is of.
    pub fn table_type(&self) -> TableType {
        self.ty
    }

    /// The table's number, i.e. its bit position in the `Valid` mask.
    pub fn number(&self) -> u8 {
        self.ty.number()
    }

    /// The number of rows in the table.
    pub fn row_count(&self) -> u32 {
        self.rows
    }

    /// The fixed byte width of one row.
    pub fn stride(&self) -> usize {
        self.schema.stride()
    }

    /// The table's resolved row layout.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The packed row bytes of the table; `row_count() * stride()` long.
    pub fn bytes(&self) -> &'data [u8] {
        self.contents
    }

    /// Returns the row at the given 0-based index.
    pub fn row(&self, index: u32) -> Result<Row<'data>, FormatError> {
        if index >= self.rows {
            return Err(FormatErrorKind::OutOfBounds(self.ty, index).into());
        }
        let stride = self.schema.stride();
        let start = index as usize * stride;
        let bytes = self
            .contents
            .get(start..start + stride)
            .ok_or(FormatErrorKind::Truncated(start + stride, self.contents.len()))?;
        Ok(Row::new(self.ty, self.schema, bytes))
    }

    /// Iterates over the table's rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'data>> + 'data {
        let ty = self.ty;
        let schema = self.schema;
        self.contents
            .chunks_exact(schema.stride())
            .map(move |bytes| Row::new(ty, schema, bytes))
    }
}

impl fmt::Debug for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("table", &self.ty)
            .field("rows", &self.rows)
            .field("schema", &self.schema)
            .finish()
    }
}
