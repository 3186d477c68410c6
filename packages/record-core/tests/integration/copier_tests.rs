//! Field copying between schemas.

use record_core::copier::{FieldCopier, IndexMap};
use record_core::record::{RecordAssembler, RecordView};
use record_core::schema::FieldDef;
use record_core::RecordError;

use crate::helpers::schema_from;

/// Int64 "Id" = 100 and V_WString "IdStr" = "100", followed by bytes that
/// belong to whatever came after the record in its buffer.
const SHORT_WSTRING_RECORD: [u8; 50] = [
    100, 0, 0, 0, 0, 0, 0, 0, 0, 8, 0, 0, 0, 7, 0, 0, 0, 13, 49, 0, 48, 0, 48, 0, 33, 156, 241,
    23, 49, 106, 0, 16, 96, 106, 68, 179, 193, 2, 0, 0, 192, 106, 68, 179, 193, 2, 0, 0, 10, 0,
];

#[test]
fn test_copy_short_wstring() {
    let schema = schema_from(vec![
        FieldDef::int64("Id"),
        FieldDef::v_wstring("IdStr", 1_073_741_823),
    ]);
    let copier = FieldCopier::new(
        &schema,
        &schema,
        vec![IndexMap::new(0, 0), IndexMap::new(1, 1)],
    )
    .unwrap();

    let mut destination = RecordAssembler::new(schema.clone());
    copier.copy(&SHORT_WSTRING_RECORD, &mut destination).unwrap();

    let id_str = destination.binding_by_name("IdStr").unwrap();
    assert_eq!(id_str.current_string().unwrap().as_deref(), Some("100"));
    let id = destination.binding_by_name("Id").unwrap();
    assert_eq!(id.current_int().unwrap(), Some(100));

    let regenerated = destination.generate().unwrap();
    assert_eq!(regenerated, &SHORT_WSTRING_RECORD[..24]);
}

#[test]
fn test_copy_between_reordered_schemas() {
    let source = schema_from(vec![
        FieldDef::v_wstring("Some String", 1000),
        FieldDef::double("Some Number"),
    ]);
    let destination = schema_from(vec![
        FieldDef::double("Number"),
        FieldDef::v_wstring("String", 1000),
    ]);

    let mut producer = RecordAssembler::new(source.clone());
    producer.set_string("Some String", &"long enough to leave the slot ".repeat(10)).unwrap();
    producer.set_float("Some Number", 12.5).unwrap();
    let record = producer.generate().unwrap().to_vec();

    let copier = FieldCopier::new(
        &destination,
        &source,
        vec![IndexMap::new(1, 0), IndexMap::new(0, 1)],
    )
    .unwrap();
    let mut consumer = RecordAssembler::new(destination.clone());
    copier.copy(&record, &mut consumer).unwrap();
    let copied = consumer.generate().unwrap().to_vec();

    let view = RecordView::new(&destination, &copied).unwrap();
    assert_eq!(view.get_float("Number").unwrap(), Some(12.5));
    assert_eq!(
        view.get_string("String").unwrap(),
        Some("long enough to leave the slot ".repeat(10))
    );
}

#[test]
fn test_copy_carries_nulls() {
    let schema = schema_from(vec![FieldDef::int32("N"), FieldDef::blob("B", 10)]);
    let copier = FieldCopier::new(
        &schema,
        &schema,
        vec![IndexMap::new(0, 0), IndexMap::new(1, 1)],
    )
    .unwrap();

    let mut producer = RecordAssembler::new(schema.clone());
    let all_null = producer.generate().unwrap().to_vec();

    let mut consumer = RecordAssembler::new(schema.clone());
    consumer.set_int("N", 5).unwrap();
    consumer.set_blob("B", b"payload").unwrap();
    copier.copy(&all_null, &mut consumer).unwrap();

    assert!(consumer.binding(0).unwrap().is_null());
    assert!(consumer.binding(1).unwrap().is_null());
}

#[test]
fn test_invalid_maps_construct_nothing() {
    let source = schema_from(vec![FieldDef::bool("A")]);
    let destination = schema_from(vec![FieldDef::bool("A"), FieldDef::bool("B")]);

    let result = FieldCopier::new(
        &destination,
        &source,
        vec![IndexMap::new(0, 1), IndexMap::new(1, 0)],
    );
    assert!(matches!(
        result,
        Err(RecordError::IndexOutOfRange { index: 1, len: 1 })
    ));
}

#[test]
fn test_copy_rejects_malformed_source() {
    let schema = schema_from(vec![FieldDef::v_string("S", 100)]);
    let copier = FieldCopier::new(&schema, &schema, vec![IndexMap::new(0, 0)]).unwrap();
    let mut destination = RecordAssembler::new(schema.clone());

    // Slot points past the end of the record.
    let record = [40, 0, 0, 0, 0, 0, 0, 0];
    assert!(matches!(
        copier.copy(&record, &mut destination),
        Err(RecordError::MalformedRecord { .. })
    ));
}

#[test]
fn test_copy_does_not_read_into_next_record() {
    let schema = schema_from(vec![FieldDef::v_string("S", 100)]);
    let copier = FieldCopier::new(&schema, &schema, vec![IndexMap::new(0, 0)]).unwrap();
    let mut destination = RecordAssembler::new(schema.clone());

    // Empty variable region, the slot points at bytes after the record.
    let buffer = [8, 0, 0, 0, 0, 0, 0, 0, 0x0B, b'h', b'e', b'l', b'l', b'o'];
    assert!(matches!(
        copier.copy(&buffer, &mut destination),
        Err(RecordError::MalformedRecord { .. })
    ));
    assert!(destination.binding(0).unwrap().is_null());
}
