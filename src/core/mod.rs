//! Core parsing engine
//!
//! Block lifecycle orchestration, slot buffers, the input layer and error
//! types.

pub mod buffer;
mod engine;
mod error;
pub mod io;

pub use buffer::{SlotBuffer, INITIAL_SLOT_CAPACITY};
pub use engine::{BlockStatus, VcfParser, VcfSource, DEFAULT_BLOCK_SIZE};
pub use error::{
    BufferError, GenotypeError, GenotypeResult, HeaderError, RecordError, Result, VcfError,
};
pub use io::{
    detect_compression, CompressionFormat, VcfLineReader, DEFAULT_BUFFER_SIZE, MMAP_THRESHOLD,
};
