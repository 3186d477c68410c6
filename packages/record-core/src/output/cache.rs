use tracing::debug;

use crate::config::CacheConfig;
use crate::error::{RecordError, Result};
use crate::record::record_len;
use crate::schema::RecordSchema;

use super::{RecordPacket, RecordSink};

/// Running totals of an output cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputStats {
    /// Records written
    pub records: u64,
    /// Bytes written
    pub bytes: u64,
    /// Packets delivered to the sink
    pub flushes: u64,
}

/// Growable record cache in front of a [`RecordSink`].
///
/// The write cursor never exceeds the capacity. A record that does not fit
/// in the remaining space first flushes what is buffered, and a record
/// larger than the whole cache grows it.
#[derive(Debug)]
pub struct OutputCache<S> {
    sink: S,
    fixed_len: usize,
    config: CacheConfig,
    buffer: Option<Vec<u8>>,
    capacity: usize,
    stats: OutputStats,
}

impl<S: RecordSink> OutputCache<S> {
    /// Creates a cache for records of `schema` delivering to `sink`.
    pub fn new(schema: &RecordSchema, sink: S, config: CacheConfig) -> Self {
        let capacity = if config.buffered { config.cache_size } else { 0 };
        Self {
            sink,
            fixed_len: schema.fixed_len(),
            buffer: Some(Vec::with_capacity(capacity)),
            capacity,
            config,
            stats: OutputStats::default(),
        }
    }

    /// Appends one record, delivering buffered records first if it does not
    /// fit. In unbuffered mode the record is delivered immediately.
    ///
    /// # Errors
    /// `CacheClosed` after [`close`](Self::close), `MalformedRecord` if
    /// `record` is not exactly one framed record, or any sink error.
    pub fn write(&mut self, record: &[u8]) -> Result<()> {
        if self.buffer.is_none() {
            return Err(RecordError::CacheClosed);
        }
        let expected = record_len(record, self.fixed_len)?;
        if expected != record.len() {
            return Err(RecordError::MalformedRecord {
                offset: 0,
                len: expected,
                record_len: record.len(),
            });
        }

        if !self.config.buffered {
            self.sink.deliver(RecordPacket::new(record, self.fixed_len))?;
            self.stats.flushes += 1;
            self.count(record);
            return Ok(());
        }

        if record.len() > self.capacity - self.len() {
            if self.len() > 0 {
                self.flush()?;
            }
            if record.len() > self.capacity {
                self.grow(record.len());
            }
        }

        if let Some(buffer) = self.buffer.as_mut() {
            buffer.extend_from_slice(record);
        }
        self.count(record);
        Ok(())
    }

    /// Delivers buffered records, keeping the cache for further writes.
    pub fn flush(&mut self) -> Result<()> {
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(());
        };
        if buffer.is_empty() {
            return Ok(());
        }

        self.sink
            .deliver(RecordPacket::new(buffer.as_slice(), self.fixed_len))?;
        debug!(
            bytes = buffer.len(),
            records = self.stats.records,
            total_bytes = self.stats.bytes,
            "Flushed output cache"
        );
        buffer.clear();
        self.stats.flushes += 1;
        Ok(())
    }

    /// Flushes and releases the cache. Later writes fail with `CacheClosed`.
    pub fn close(&mut self) -> Result<()> {
        if self.buffer.is_none() {
            return Ok(());
        }
        self.flush()?;
        self.buffer = None;
        self.capacity = 0;
        debug!(
            records = self.stats.records,
            bytes = self.stats.bytes,
            flushes = self.stats.flushes,
            "Closed output cache"
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.buffer.is_none()
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> OutputStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the sink. Buffered records that were not flushed are dropped.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn count(&mut self, record: &[u8]) {
        self.stats.records += 1;
        self.stats.bytes += record.len() as u64;
    }

    fn grow(&mut self, needed: usize) {
        let new_capacity = needed.max(self.config.min_cache_size);
        debug!(
            from = self.capacity,
            to = new_capacity,
            "Growing output cache"
        );
        self.buffer = Some(Vec::with_capacity(new_capacity));
        self.capacity = new_capacity;
    }
}
