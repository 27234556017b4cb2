//! FastVcf - High-performance block-parallel VCF parsing
//!
//! Reads Variant Call Format files in bounded blocks: the eight fixed
//! columns of each record are split sequentially, then the per-sample
//! genotype strings of the whole block are decoded in parallel across a
//! bounded worker pool.
//!
//! # Features
//!
//! - Reusable per-slot buffers: no per-line allocation in steady state
//! - Fork-join genotype decoding with structurally disjoint writes
//! - Transparent gzip/bzip2 input, memory mapping for large plain files
//! - Pluggable record sources for pre-split (binary-format) upstreams
//!
//! # Example
//!
//! ```ignore
//! use fast_vcf::{VcfParser, DEFAULT_BLOCK_SIZE};
//!
//! let mut parser = VcfParser::open("cohort.vcf.gz", 4, DEFAULT_BLOCK_SIZE)?;
//! loop {
//!     let status = parser.parse_block()?;
//!     for variant in parser.variants() {
//!         println!("{}\t{}", variant.chrom, variant.pos + 1);
//!     }
//!     if !status.is_full() {
//!         break;
//!     }
//! }
//! ```

pub mod core;
pub mod record;

// Re-export commonly used types
pub use crate::core::{
    BlockStatus, BufferError, GenotypeError, HeaderError, RecordError, Result, SlotBuffer,
    VcfError, VcfLineReader, VcfParser, VcfSource, DEFAULT_BLOCK_SIZE,
};
pub use crate::record::{decode_genotypes, Genotype, Variant, MISSING_ALLELE};
