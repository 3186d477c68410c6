//! Output cache delivery.

use std::cell::RefCell;
use std::rc::Rc;

use tempfile::tempdir;

use record_core::output::{MemorySink, OutputCache, RecordPacket, RecordSink};
use record_core::record::{RecordAssembler, RecordView};
use record_core::schema::FieldDef;
use record_core::{CacheConfig, RecordSchema, Result};

use crate::helpers::schema_from;

fn schema() -> RecordSchema {
    schema_from(vec![FieldDef::int32("Seq"), FieldDef::v_string("Payload", 10_000)])
}

fn record(assembler: &mut RecordAssembler, seq: i64, payload_len: usize) -> Vec<u8> {
    assembler.set_int("Seq", seq).unwrap();
    assembler.set_string("Payload", &"p".repeat(payload_len)).unwrap();
    assembler.generate().unwrap().to_vec()
}

/// Sink that decodes each delivered record's sequence number.
struct SequenceSink {
    schema: RecordSchema,
    seen: Rc<RefCell<Vec<i64>>>,
}

impl RecordSink for SequenceSink {
    fn deliver(&mut self, packet: RecordPacket<'_>) -> Result<()> {
        for record in packet.records() {
            let view = RecordView::new(&self.schema, record?)?;
            if let Some(seq) = view.get_int("Seq")? {
                self.seen.borrow_mut().push(seq);
            }
        }
        Ok(())
    }
}

#[test]
fn test_capacity_plus_one_flushes_then_grows() {
    let schema = schema();
    let mut assembler = RecordAssembler::new(schema.clone());
    let capacity = 64;
    let config = CacheConfig {
        cache_size: capacity,
        min_cache_size: capacity,
        ..CacheConfig::default()
    };
    let mut cache = OutputCache::new(&schema, MemorySink::new(), config);

    let small = record(&mut assembler, 1, 10);
    cache.write(&small).unwrap();

    // fixed 9 + length word 4 + prefix 1 + payload 51 = capacity + 1
    let big = record(&mut assembler, 2, 51);
    assert_eq!(big.len(), capacity + 1);
    cache.write(&big).unwrap();

    assert_eq!(cache.sink().packets, vec![small]);
    assert!(cache.capacity() >= capacity + 1);
    assert_eq!(cache.len(), big.len());
}

#[test]
fn test_records_arrive_in_order() {
    let schema = schema();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = SequenceSink {
        schema: schema.clone(),
        seen: Rc::clone(&seen),
    };
    let config = CacheConfig {
        cache_size: 256,
        min_cache_size: 256,
        ..CacheConfig::default()
    };
    let mut cache = OutputCache::new(&schema, sink, config);
    let mut assembler = RecordAssembler::new(schema.clone());

    for seq in 0..100 {
        let bytes = record(&mut assembler, seq, (seq as usize * 7) % 300);
        cache.write(&bytes).unwrap();
    }
    cache.close().unwrap();

    assert_eq!(*seen.borrow(), (0..100).collect::<Vec<_>>());
    let stats = cache.stats();
    assert_eq!(stats.records, 100);
    assert!(stats.flushes > 1);
}

#[test]
fn test_flush_keeps_cache_open() {
    let schema = schema();
    let mut assembler = RecordAssembler::new(schema.clone());
    let mut cache = OutputCache::new(&schema, MemorySink::new(), CacheConfig::default());

    cache.write(&record(&mut assembler, 1, 5)).unwrap();
    cache.flush().unwrap();
    cache.flush().unwrap();
    cache.write(&record(&mut assembler, 2, 5)).unwrap();
    cache.close().unwrap();

    let sink = cache.into_sink();
    assert_eq!(sink.packets.len(), 2);
    let all = sink.concat();
    let count = RecordPacket::new(&all, schema.fixed_len()).records().count();
    assert_eq!(count, 2);
}

#[test]
fn test_config_from_file_drives_cache() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("output.toml");
    std::fs::write(&path, "buffered = false\n")?;

    let config = CacheConfig::from_file(&path)?;
    let schema = schema();
    let mut assembler = RecordAssembler::new(schema.clone());
    let mut cache = OutputCache::new(&schema, MemorySink::new(), config);
    cache.write(&record(&mut assembler, 1, 3))?;
    assert_eq!(cache.sink().packets.len(), 1);
    Ok(())
}
