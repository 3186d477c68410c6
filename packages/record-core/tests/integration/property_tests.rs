//! Codec properties over generated values.

use proptest::prelude::*;

use record_core::codec::variable;
use record_core::record::{RecordAssembler, RecordView};
use record_core::schema::FieldDef;
use record_core::types::Value;

use crate::helpers::schema_from;

proptest! {
    #[test]
    fn blob_round_trips_through_record(payload in prop::collection::vec(any::<u8>(), 0..600)) {
        let schema = schema_from(vec![FieldDef::byte("Tag"), FieldDef::blob("Data", 1_000_000)]);
        let mut assembler = RecordAssembler::new(schema.clone());
        assembler.set_int("Tag", 3).unwrap();
        assembler.set_blob("Data", &payload).unwrap();
        let record = assembler.generate().unwrap().to_vec();

        prop_assert_eq!(
            record.len(),
            schema.min_record_len() + variable::encoded_len(payload.len())
        );
        let view = RecordView::new(&schema, &record).unwrap();
        prop_assert_eq!(view.get_blob("Data").unwrap(), Some(&payload[..]));
        prop_assert_eq!(view.get_int("Tag").unwrap(), Some(3));
    }

    #[test]
    fn several_variable_fields_round_trip(
        first in ".{0,200}",
        second in ".{0,200}",
        third in prop::collection::vec(any::<u8>(), 0..10),
    ) {
        let schema = schema_from(vec![
            FieldDef::v_string("First", 10_000),
            FieldDef::v_wstring("Second", 10_000),
            FieldDef::blob("Third", 10_000),
        ]);
        let mut assembler = RecordAssembler::new(schema.clone());
        assembler.set_string("First", &first).unwrap();
        assembler.set_string("Second", &second).unwrap();
        assembler.set_blob("Third", &third).unwrap();
        let record = assembler.generate().unwrap().to_vec();

        let view = RecordView::new(&schema, &record).unwrap();
        prop_assert_eq!(view.get_string("First").unwrap(), Some(first.clone()));
        prop_assert_eq!(view.get_string("Second").unwrap(), Some(second.clone()));
        prop_assert_eq!(view.get_blob("Third").unwrap(), Some(&third[..]));
    }

    #[test]
    fn integers_round_trip(value in any::<i64>()) {
        let schema = schema_from(vec![
            FieldDef::int16("I16"),
            FieldDef::int32("I32"),
            FieldDef::int64("I64"),
        ]);
        let mut assembler = RecordAssembler::new(schema.clone());
        for name in ["I16", "I32", "I64"] {
            assembler.set_value(name, &Value::Int(value)).unwrap();
        }
        let record = assembler.generate().unwrap().to_vec();

        let view = RecordView::new(&schema, &record).unwrap();
        prop_assert_eq!(view.get_int("I16").unwrap(), Some(i64::from(value as i16)));
        prop_assert_eq!(view.get_int("I32").unwrap(), Some(i64::from(value as i32)));
        prop_assert_eq!(view.get_int("I64").unwrap(), Some(value));
    }

    #[test]
    fn doubles_round_trip(value in any::<f64>().prop_filter("not NaN", |v| !v.is_nan())) {
        let schema = schema_from(vec![FieldDef::double("D")]);
        let mut assembler = RecordAssembler::new(schema.clone());
        assembler.set_float("D", value).unwrap();
        let record = assembler.generate().unwrap().to_vec();

        let view = RecordView::new(&schema, &record).unwrap();
        prop_assert_eq!(view.get_float("D").unwrap(), Some(value));
    }
}
