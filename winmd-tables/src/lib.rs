//! A zero-copy reader for the ECMA-335 metadata tables stream.
//!
//! Windows Metadata (`.winmd`) and managed PE files embed a self-describing
//! relational database of type, method, field, and assembly records. The
//! database lives in the `#~` stream (or its uncompressed twin `#-`, which
//! this crate reads identically): a 24-byte header, a bitmask of present
//! tables, one row count per present table, and then every table's rows
//! packed back to back.
//!
//! Row layouts are not fixed. An index into a heap is 2 or 4 bytes depending
//! on the header's `HeapSizes` byte; an index into another table is 2 or 4
//! bytes depending on that table's row count; a *coded* index multiplexes
//! several target tables behind tag bits and widens once any target is too
//! large. [`TablesStream::parse`] resolves the resulting layout for every
//! present table once, up front, and hands out [`TableView`]s whose rows
//! decode lazily against that layout.
//!
//! The crate stops at the tables stream. Locating the stream inside a PE
//! image and reading the `#Strings`, `#US`, `#Blob`, and `#GUID` heaps that
//! the decoded indices point into are their own concerns; heap indices are
//! surfaced here as opaque `u32` values.
//!
//! # Example
//!
//! ```
//! use winmd_tables::TablesStream;
//!
//! // The smallest well-formed stream: a header with an empty `Valid` mask.
//! let mut buf = vec![0u8; 24];
//! buf[4] = 2; // major version
//! buf[7] = 1; // reserved, must be 1
//!
//! let stream = TablesStream::parse(&buf)?;
//! assert_eq!(stream.major_version(), 2);
//! assert_eq!(stream.iter().count(), 0);
//! # Ok::<(), winmd_tables::FormatError>(())
//! ```

#![warn(missing_docs)]

mod catalog;
mod coded;
mod error;
mod row;
mod schema;
mod stream;
mod utils;

pub use catalog::{Column, ColumnKind, HeapKind, TableType};
pub use coded::CodedIndexKind;
pub use error::{FormatError, FormatErrorKind};
pub use row::Row;
pub use schema::{HeapSizes, TableSchema};
pub use stream::{TableView, TablesStream};
