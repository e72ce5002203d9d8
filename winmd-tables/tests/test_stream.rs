mod common;

use similar_asserts::assert_eq;
use winmd_tables::{FormatErrorKind, TableType, TablesStream};

use common::{header, StreamBuilder};

#[test]
fn test_empty_valid_mask() {
    let buf = [
        0x00, 0x00, 0x00, 0x00, // reserved
        0x02, 0x00, // version 2.0
        0x00, // heap sizes
        0x01, // reserved
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // valid
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
    ];

    let stream = TablesStream::parse(&buf).unwrap();
    assert_eq!(stream.major_version(), 2);
    assert_eq!(stream.minor_version(), 0);
    assert_eq!(stream.valid(), 0);
    assert_eq!(stream.sorted(), 0);
    assert_eq!(stream.iter().count(), 0);
    assert!(stream.table(TableType::Module).is_none());
}

#[test]
fn test_single_module_table() {
    // One Module row: 2 + 2 + 2 + 2 + 2 bytes with all heap indices narrow.
    let buf = StreamBuilder::new()
        .table(TableType::Module, 1, vec![0; 10])
        .build();

    let stream = TablesStream::parse(&buf).unwrap();
    assert_eq!(stream.valid(), 1);
    assert_eq!(stream.row_count(TableType::Module), 1);

    let views: Vec<_> = stream.iter().collect();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].number(), 0);
    assert_eq!(views[0].row_count(), 1);
    assert_eq!(views[0].stride(), 10);
    assert_eq!(views[0].bytes().len(), 10);
}

#[test]
fn test_multi_table_layout() {
    // Module (stride 10), TypeRef (stride 6), Field (stride 6), all with
    // narrow heap and coded indices.
    let buf = StreamBuilder::new()
        .table(TableType::Module, 1, vec![0xAA; 10])
        .table(TableType::TypeRef, 2, vec![0xBB; 12])
        .table(TableType::Field, 1, vec![0xCC; 6])
        .build();

    let stream = TablesStream::parse(&buf).unwrap();

    let layout: Vec<_> = stream
        .iter()
        .map(|view| (view.table_type(), view.row_count(), view.stride()))
        .collect();
    assert_eq!(
        layout,
        vec![
            (TableType::Module, 1, 10),
            (TableType::TypeRef, 2, 6),
            (TableType::Field, 1, 6),
        ]
    );

    // The payload segments are contiguous, in table-number order, and cover
    // the buffer exactly.
    let base = 24 + 4 * stream.valid().count_ones() as usize;
    let total: usize = stream
        .iter()
        .map(|view| view.row_count() as usize * view.stride())
        .sum();
    assert_eq!(total, buf.len() - base);
    assert_eq!(stream.table(TableType::TypeRef).unwrap().bytes(), [0xBB; 12]);

    // By-type and by-number access agree with iteration.
    for ty in TableType::ALL {
        let bit_set = stream.valid() >> ty.number() & 1 != 0;
        assert_eq!(stream.table(ty).is_some(), bit_set);
        assert_eq!(stream.table_by_number(ty.number()).is_some(), bit_set);
    }
    assert!(stream.table_by_number(63).is_none());
}

#[test]
fn test_sorted_mask_is_advisory() {
    let buf = StreamBuilder::new()
        .table(TableType::Module, 1, vec![0; 10])
        .table(TableType::InterfaceImpl, 1, vec![0; 4])
        .sorted(1 << TableType::InterfaceImpl.number())
        .build();

    let stream = TablesStream::parse(&buf).unwrap();
    assert!(stream.is_sorted(TableType::InterfaceImpl));
    assert!(!stream.is_sorted(TableType::Module));
    assert_eq!(stream.sorted(), 1 << 9);
}

#[test]
fn test_header_too_short() {
    let err = TablesStream::parse(&[]).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::Truncated(24, 0)));

    let buf = header(0, 0, 0);
    let err = TablesStream::parse(&buf[..23]).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::Truncated(24, 23)));
}

#[test]
fn test_row_counts_truncated() {
    // Valid announces one table but the buffer ends inside Rows[].
    let mut buf = header(0, 1, 0);
    buf.extend_from_slice(&[0x01, 0x00]);

    let err = TablesStream::parse(&buf).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::Truncated(28, 26)));
}

#[test]
fn test_payload_truncated() {
    let buf = StreamBuilder::new()
        .table(TableType::Module, 1, vec![0; 10])
        .build();

    let err = TablesStream::parse(&buf[..buf.len() - 1]).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::Truncated(38, 37)));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut buf = StreamBuilder::new()
        .table(TableType::Module, 1, vec![0; 10])
        .build();
    buf.push(0);

    let err = TablesStream::parse(&buf).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::Truncated(38, 39)));
}

#[test]
fn test_reserved_field_mismatch() {
    let mut buf = header(0, 0, 0);
    buf[0] = 1;
    let err = TablesStream::parse(&buf).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::ReservedFieldMismatch));

    let mut buf = header(0, 0, 0);
    buf[7] = 0;
    let err = TablesStream::parse(&buf).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::ReservedFieldMismatch));
}

#[test]
fn test_unknown_table_bit() {
    // Bit 0x2D is the first number past the catalog.
    let buf = header(0, 1 << 0x2D, 0);
    let err = TablesStream::parse(&buf).unwrap_err();
    assert!(matches!(err.kind(), FormatErrorKind::UnknownTableBit(0x2D)));
}

#[test]
fn test_coded_index_width_promotion() {
    // HasCustomAttribute has 22 targets, so 5 tag bits and a promotion
    // threshold of 2^11 rows. MethodDef rows are 14 bytes each here.
    let narrow = StreamBuilder::new()
        .table(TableType::MethodDef, 2047, vec![0; 2047 * 14])
        .table(TableType::CustomAttribute, 1, vec![0; 6])
        .build();
    let stream = TablesStream::parse(&narrow).unwrap();
    assert_eq!(stream.table(TableType::MethodDef).unwrap().stride(), 14);
    assert_eq!(stream.table(TableType::CustomAttribute).unwrap().stride(), 6);

    // One more MethodDef row widens the Parent column of every table using
    // the family.
    let wide = StreamBuilder::new()
        .table(TableType::MethodDef, 2048, vec![0; 2048 * 14])
        .table(TableType::CustomAttribute, 1, vec![0; 8])
        .build();
    let stream = TablesStream::parse(&wide).unwrap();
    assert_eq!(stream.table(TableType::MethodDef).unwrap().stride(), 14);
    assert_eq!(stream.table(TableType::CustomAttribute).unwrap().stride(), 8);
}

#[test]
fn test_wide_heap_indices_change_stride() {
    // HeapSizes = 0b101: 4-byte #Strings and #Blob indices, 2-byte #GUID.
    let buf = StreamBuilder::new()
        .heap_sizes(0b101)
        .table(TableType::Field, 1, vec![0; 10])
        .build();

    let stream = TablesStream::parse(&buf).unwrap();
    assert_eq!(stream.heap_sizes().string_index_size(), 4);
    assert_eq!(stream.heap_sizes().guid_index_size(), 2);
    assert_eq!(stream.heap_sizes().blob_index_size(), 4);
    assert_eq!(stream.table(TableType::Field).unwrap().stride(), 10);
}
