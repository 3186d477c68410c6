//! Binary record codec.
//!
//! Provides record schemas with computed field offsets, fixed and variable
//! field encoding, record assembly from field bindings, raw field copying
//! between schemas, and a growable output cache feeding a downstream sink.

pub mod arena;
pub mod codec;
pub mod config;
pub mod copier;
pub mod error;
pub mod output;
pub mod record;
pub mod schema;
pub mod types;

pub use config::CacheConfig;
pub use copier::{FieldCopier, IndexMap};
pub use error::{RecordError, Result};
pub use output::{OutputCache, RecordPacket, RecordSink};
pub use record::{RecordAssembler, RecordView};
pub use schema::{FieldDescriptor, Generator, RecordSchema};
pub use types::{FieldType, Value};
