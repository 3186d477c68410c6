//! Output caching of assembled records.
//!
//! An [`OutputCache`] gathers records into one contiguous buffer and hands
//! it to a [`RecordSink`] as a [`RecordPacket`] when the next record would
//! not fit, on [`flush`](OutputCache::flush) and on
//! [`close`](OutputCache::close). Delivery is a plain synchronous call.

mod cache;
mod packet;

use crate::error::Result;

pub use cache::{OutputCache, OutputStats};
pub use packet::{RecordPacket, Records};

/// Downstream consumer of record packets.
pub trait RecordSink {
    /// Receives a packet of one or more records. The bytes are only valid
    /// for the duration of the call.
    fn deliver(&mut self, packet: RecordPacket<'_>) -> Result<()>;
}

impl<F> RecordSink for F
where
    F: FnMut(RecordPacket<'_>) -> Result<()>,
{
    fn deliver(&mut self, packet: RecordPacket<'_>) -> Result<()> {
        self(packet)
    }
}

/// Sink that keeps a copy of every delivered packet.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub packets: Vec<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All delivered bytes, concatenated in delivery order.
    pub fn concat(&self) -> Vec<u8> {
        self.packets.concat()
    }
}

impl RecordSink for MemorySink {
    fn deliver(&mut self, packet: RecordPacket<'_>) -> Result<()> {
        self.packets.push(packet.bytes().to_vec());
        Ok(())
    }
}
