//! Record assembly and decoding scenarios.

use chrono::NaiveDate;

use record_core::record::{record_len, RecordAssembler, RecordView};
use record_core::schema::FieldDef;
use record_core::types::Value;
use record_core::RecordError;

use crate::helpers::{every_type_schema, schema_from};

fn u32_at(bytes: &[u8], offset: usize) -> usize {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize
}

#[test]
fn test_byte_and_long_string() {
    let schema = schema_from(vec![FieldDef::byte("Byte"), FieldDef::v_string("Text", 250)]);
    let mut assembler = RecordAssembler::new(schema.clone());
    assembler.set_int("Byte", 1).unwrap();
    assembler.set_string("Text", &"B".repeat(200)).unwrap();

    let record = assembler.generate().unwrap().to_vec();
    let fixed_len = schema.fixed_len();
    assert_eq!(record.len(), fixed_len + 4 + u32_at(&record, fixed_len));

    // Slot at 2 points 8 bytes ahead, past the length word, to a 4-byte
    // prefix holding len * 2.
    assert_eq!(u32_at(&record, 2), 8);
    assert_eq!(u32_at(&record, 6), 204);
    assert_eq!(u32_at(&record, 10), 400);

    let view = RecordView::new(&schema, &record).unwrap();
    assert_eq!(view.get_int("Byte").unwrap(), Some(1));
    assert_eq!(view.get_string("Text").unwrap(), Some("B".repeat(200)));
}

#[test]
fn test_length_prefix_boundary() {
    let schema = schema_from(vec![FieldDef::v_string("Text", 1000)]);
    let mut assembler = RecordAssembler::new(schema.clone());

    assembler.set_string("Text", &"a".repeat(127)).unwrap();
    let short = assembler.generate().unwrap().to_vec();
    assert_eq!(short.len(), 4 + 4 + 1 + 127);
    assert_eq!(short[8], (127 << 1) | 1);

    assembler.set_string("Text", &"a".repeat(128)).unwrap();
    let long = assembler.generate().unwrap().to_vec();
    assert_eq!(long.len(), 4 + 4 + 4 + 128);
    assert_eq!(u32_at(&long, 8), 256);

    for (record, len) in [(&short, 127), (&long, 128)] {
        let view = RecordView::new(&schema, record).unwrap();
        assert_eq!(view.get_string("Text").unwrap(), Some("a".repeat(len)));
    }
}

#[test]
fn test_small_values_stay_in_slot() {
    let schema = schema_from(vec![FieldDef::blob("Blob", 100)]);
    let mut assembler = RecordAssembler::new(schema.clone());

    for len in 0..=3u8 {
        let payload: Vec<u8> = (1..=len).collect();
        assembler.set_blob("Blob", &payload).unwrap();
        let record = assembler.generate().unwrap().to_vec();

        assert_eq!(record.len(), 8, "payload of {} bytes", len);
        assert_eq!(u32_at(&record, 4), 0);
        let view = RecordView::new(&schema, &record).unwrap();
        assert_eq!(view.get_blob("Blob").unwrap(), Some(&payload[..]));
    }

    assembler.set_blob("Blob", &[9, 9, 9, 9]).unwrap();
    let record = assembler.generate().unwrap().to_vec();
    assert_eq!(record.len(), 8 + 5);
}

#[test]
fn test_every_type_round_trip() {
    let schema = every_type_schema();
    let when = NaiveDate::from_ymd_opt(2020, 2, 29)
        .unwrap()
        .and_hms_opt(23, 59, 58)
        .unwrap();

    let values = vec![
        ("Bool", Value::Bool(true)),
        ("Byte", Value::Int(255)),
        ("Int16", Value::Int(-32768)),
        ("Int32", Value::Int(123_456)),
        ("Int64", Value::Int(-9_000_000_000)),
        ("FixedDecimal", Value::Float(12345.67)),
        ("Float", Value::Float(0.5)),
        ("Double", Value::Float(std::f64::consts::PI)),
        ("String", Value::Text("fixed".to_string())),
        ("WString", Value::Text("wide ünïcode".to_string())),
        ("V_String", Value::Text("variable".to_string())),
        ("V_WString", Value::Text("variable wide ✓".to_string())),
        (
            "Date",
            Value::DateTime(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap().and_hms_opt(0, 0, 0).unwrap()),
        ),
        ("DateTime", Value::DateTime(when)),
        ("Blob", Value::Blob((0..=255).collect())),
        ("SpatialObj", Value::Blob(vec![1, 2])),
    ];

    let mut assembler = RecordAssembler::new(schema.clone());
    for (name, value) in &values {
        assembler.set_value(name, value).unwrap();
    }
    let expected_size = assembler.data_size();
    let record = assembler.generate().unwrap().to_vec();
    assert_eq!(record.len(), expected_size);

    let view = RecordView::new(&schema, &record).unwrap();
    for (index, (name, value)) in values.iter().enumerate() {
        assert_eq!(view.value(index).unwrap().as_ref(), Some(value), "field {}", name);
        assert!(!view.is_null(index).unwrap());
    }
}

#[test]
fn test_every_type_null() {
    let schema = every_type_schema();
    let mut assembler = RecordAssembler::new(schema.clone());
    for field in schema.fields() {
        assembler.set_null(&field.name).unwrap();
    }
    let record = assembler.generate().unwrap().to_vec();
    assert_eq!(record.len(), schema.min_record_len());

    let view = RecordView::new(&schema, &record).unwrap();
    for index in 0..schema.num_fields() {
        assert!(view.is_null(index).unwrap());
        assert_eq!(view.value(index).unwrap(), None);
    }
}

#[test]
fn test_empty_variable_value_is_not_null() {
    let schema = schema_from(vec![FieldDef::v_wstring("Text", 10)]);
    let mut assembler = RecordAssembler::new(schema.clone());
    assembler.set_string("Text", "").unwrap();
    let record = assembler.generate().unwrap().to_vec();

    assert_eq!(&record[..4], &[0, 0, 0, 0]);
    let view = RecordView::new(&schema, &record).unwrap();
    assert!(!view.is_null(0).unwrap());
    assert_eq!(view.get_string("Text").unwrap(), Some(String::new()));
}

#[test]
fn test_fixed_text_truncates_silently() {
    let schema = schema_from(vec![FieldDef::string("Code", 3), FieldDef::v_string("Name", 5)]);
    let mut assembler = RecordAssembler::new(schema.clone());
    assembler.set_string("Code", "ABCDEF").unwrap();
    assembler.set_string("Name", "truncated").unwrap();
    let record = assembler.generate().unwrap().to_vec();

    let view = RecordView::new(&schema, &record).unwrap();
    assert_eq!(view.get_string("Code").unwrap().as_deref(), Some("ABC"));
    assert_eq!(view.get_string("Name").unwrap().as_deref(), Some("trunc"));
}

#[test]
fn test_bad_date_text_is_an_error() {
    let schema = schema_from(vec![FieldDef::date("When")]);
    let mut record = vec![0u8; schema.min_record_len()];
    record[..10].copy_from_slice(b"not a date");

    let view = RecordView::new(&schema, &record).unwrap();
    assert!(matches!(
        view.get_datetime("When"),
        Err(RecordError::ValueParse { .. })
    ));
}

#[test]
fn test_truncated_record_is_rejected() {
    let schema = schema_from(vec![FieldDef::v_string("Text", 500)]);
    let mut assembler = RecordAssembler::new(schema.clone());
    assembler.set_string("Text", &"z".repeat(300)).unwrap();
    let record = assembler.generate().unwrap().to_vec();

    assert_eq!(record_len(&record, schema.fixed_len()).unwrap(), record.len());
    assert!(matches!(
        RecordView::new(&schema, &record[..100]),
        Err(RecordError::MalformedRecord { .. })
    ));
}
