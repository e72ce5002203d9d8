use thiserror::Error;

use crate::catalog::TableType;
use crate::coded::CodedIndexKind;

/// The kind of a [`FormatError`].
#[derive(Debug, Clone, Copy, Error)]
#[non_exhaustive]
pub enum FormatErrorKind {
    /// The stream needs more bytes than the buffer holds, or holds bytes
    /// past the end of the last table.
    #[error("tables stream needs {0} bytes, but the buffer holds {1}")]
    Truncated(usize, usize),
    /// A reserved header field holds an unexpected value.
    #[error("reserved header field mismatch")]
    ReservedFieldMismatch,
    /// The `Valid` mask has a bit set whose table number is not in the catalog.
    #[error("valid mask bit {0} does not name a known table")]
    UnknownTableBit(u8),
    /// A column was requested that the table's schema cannot satisfy.
    #[error("table {0:?} has no column {1} of the requested kind")]
    SchemaMalformed(TableType, usize),
    /// A row index past the end of the table.
    #[error("row index {1} is out of bounds for table {0:?}")]
    OutOfBounds(TableType, u32),
    /// A coded index whose tag does not select a target table.
    #[error("tag {1} is not valid for the {0:?} coded index")]
    BadCodedIndex(CodedIndexKind, u32),
}

/// An error encountered while reading a tables stream.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct FormatError {
    pub(crate) kind: FormatErrorKind,
    #[source]
    pub(crate) source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl FormatError {
    /// Returns the corresponding [`FormatErrorKind`] for this error.
    pub fn kind(&self) -> FormatErrorKind {
        self.kind
    }
}

impl From<FormatErrorKind> for FormatError {
    fn from(kind: FormatErrorKind) -> Self {
        Self { kind, source: None }
    }
}
