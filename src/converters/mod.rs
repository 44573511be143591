//! Format converters
//!
//! Score file (XML) representation of engraving elements.

pub mod trill_xml;

pub use trill_xml::{read_trill, read_trill_from_bytes, write_trill, ReadError, WriteError};
