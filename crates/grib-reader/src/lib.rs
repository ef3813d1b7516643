//! GRIB message indexing and field retrieval.
//!
//! Message boundaries are found by a single scan over the file; each message
//! is then decoded on demand by seeking to its recorded offset. Decoding of
//! the binary payload is delegated to the `grib` crate.

mod decode;
pub mod error;
pub mod file;
pub mod index;
pub mod memory;
pub mod sections;
pub mod sort;
pub mod source;
pub mod tables;

pub use error::{ReadError, ReadResult};
pub use file::{GribFile, IndexEntry};
pub use index::{MessageIndex, MessageLocation};
pub use memory::InMemorySource;
pub use sort::{sorted_order, SortKey, SortOrder};
pub use source::FieldSource;
pub use tables::{Grib2Tables, LevelType, ParameterInfo};
