//! Input side of butterfly-roads
//!
//! Error types and the record sources that stream ways and nodes out of
//! OSM files.

pub mod error;
pub mod pbf;
pub mod source;
pub mod xml;

pub use source::{open_source, InputFormat, MemorySource, Node, RecordSource, Way};
