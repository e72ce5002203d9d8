//! Shared helpers for synthesising `#~` stream buffers.

use winmd_tables::TableType;

/// Builds the 24-byte stream header.
pub fn header(heap_sizes: u8, valid: u64, sorted: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(24);
    buf.extend_from_slice(&0u32.to_le_bytes()); // reserved
    buf.push(2); // major version
    buf.push(0); // minor version
    buf.push(heap_sizes);
    buf.push(1); // reserved, must be 1
    buf.extend_from_slice(&valid.to_le_bytes());
    buf.extend_from_slice(&sorted.to_le_bytes());
    buf
}

/// Assembles a complete stream from per-table row counts and packed row
/// payloads. The `Valid` mask is derived from the added tables.
pub struct StreamBuilder {
    heap_sizes: u8,
    sorted: u64,
    tables: Vec<(TableType, u32, Vec<u8>)>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self {
            heap_sizes: 0,
            sorted: 0,
            tables: Vec::new(),
        }
    }

    pub fn heap_sizes(mut self, bits: u8) -> Self {
        self.heap_sizes = bits;
        self
    }

    pub fn sorted(mut self, mask: u64) -> Self {
        self.sorted = mask;
        self
    }

    pub fn table(mut self, ty: TableType, rows: u32, payload: Vec<u8>) -> Self {
        self.tables.push((ty, rows, payload));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.tables.sort_by_key(|(ty, _, _)| ty.number());
        let valid = self
            .tables
            .iter()
            .fold(0u64, |mask, (ty, _, _)| mask | 1 << ty.number());

        let mut buf = header(self.heap_sizes, valid, self.sorted);
        for (_, rows, _) in &self.tables {
            buf.extend_from_slice(&rows.to_le_bytes());
        }
        for (_, _, payload) in &self.tables {
            buf.extend_from_slice(payload);
        }
        buf
    }
}
