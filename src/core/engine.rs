//! Block-parallel parse engine
//!
//! Orchestrates one block lifecycle per call: pull records from the source
//! and split their fixed columns sequentially, then decode the genotype
//! suffixes of the whole block in parallel on a bounded rayon pool.
//!
//! Parallel safety rests on disjoint ownership: the decode tasks are driven
//! by `par_iter_mut().zip(..)`, so every task holds the only `&mut` to its
//! variant and a shared reference to its own slot. Nothing is locked.

use crate::core::buffer::SlotBuffer;
use crate::core::error::{RecordError, Result, VcfError};
use crate::core::io::VcfLineReader;
use crate::record::genotype::decode_genotypes;
use crate::record::Variant;
use rayon::prelude::*;
use std::path::Path;

/// Default number of records per block.
pub const DEFAULT_BLOCK_SIZE: usize = 10_000;

/// Outcome of one block-parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// The block was filled completely; more input likely remains.
    Full,
    /// End of input was reached; the block may be partially filled or empty.
    EndOfInput,
}

impl BlockStatus {
    /// True when the block was filled to `block_size`.
    pub fn is_full(&self) -> bool {
        matches!(self, BlockStatus::Full)
    }
}

/// Upstream provider of records with the 8 fixed fields pre-split.
///
/// The text implementation is [`VcfLineReader`]; a binary-format reader
/// (e.g. BCF) can implement the same contract and feed the engine through
/// [`VcfParser::with_source`]. Either way the genotype suffix written into
/// the slot starts at the FORMAT column and decodes identically.
pub trait VcfSource {
    /// Declared number of samples per record.
    fn sample_count(&self) -> usize;

    /// Pull the next record: populate a [`Variant`] with the 8 fixed fields
    /// and write the FORMAT+samples suffix into `slot`. The second element
    /// of the pair is the record's 1-based position in the input, used for
    /// error context. Returns `Ok(None)` at end of input.
    fn next_record(&mut self, slot: &mut SlotBuffer) -> Result<Option<(Variant, u64)>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Open,
    Closed,
}

/// Block-parallel VCF parse engine.
///
/// Owns the record source, one slot buffer per block position (persisted
/// across calls so capacities only ever grow) and the worker pool. Each
/// [`parse_block`](VcfParser::parse_block) call yields the next block of
/// decoded variants in input order.
pub struct VcfParser<S = VcfLineReader> {
    source: S,
    pool: rayon::ThreadPool,
    block_size: usize,
    sample_count: usize,
    slots: Vec<SlotBuffer>,
    line_numbers: Vec<u64>,
    variants: Vec<Variant>,
    state: EngineState,
}

impl VcfParser<VcfLineReader> {
    /// Open a VCF text file (plain, gzip or bzip2).
    pub fn open<P: AsRef<Path>>(path: P, threads: usize, block_size: usize) -> Result<Self> {
        let source = VcfLineReader::open(path)?;
        Self::with_source(source, threads, block_size)
    }
}

impl<S: VcfSource> VcfParser<S> {
    /// Build the engine around any record source.
    ///
    /// `threads` and `block_size` below 1 are clamped to 1.
    pub fn with_source(source: S, threads: usize, block_size: usize) -> Result<Self> {
        let threads = threads.max(1);
        let block_size = block_size.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| {
                VcfError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to create thread pool: {}", e),
                ))
            })?;

        let sample_count = source.sample_count();
        Ok(Self {
            source,
            pool,
            block_size,
            sample_count,
            slots: (0..block_size).map(|_| SlotBuffer::new()).collect(),
            line_numbers: vec![0; block_size],
            variants: Vec::with_capacity(block_size),
            state: EngineState::Open,
        })
    }

    /// Number of samples declared by the source.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Configured records-per-block limit.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Variants decoded by the most recent
    /// [`parse_block`](VcfParser::parse_block) call, in input order.
    ///
    /// The backing storage is reused: consume the slice before the next
    /// call.
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// True once end of input has been reached.
    pub fn is_closed(&self) -> bool {
        self.state == EngineState::Closed
    }

    /// Read, split and decode one block of records.
    ///
    /// Returns [`BlockStatus::Full`] when the block filled completely and
    /// [`BlockStatus::EndOfInput`] once the source is exhausted (the final
    /// block may be partial or empty). A malformed record aborts the whole
    /// call: a desynchronized genotype array must never escape.
    pub fn parse_block(&mut self) -> Result<BlockStatus> {
        self.variants.clear();
        if self.state == EngineState::Closed {
            return Ok(BlockStatus::EndOfInput);
        }

        // Sequential phase: pull records, split fixed fields, stash the
        // genotype suffixes slot by slot.
        while self.variants.len() < self.block_size {
            let slot = &mut self.slots[self.variants.len()];
            match self.source.next_record(slot)? {
                Some((variant, record_number)) => {
                    self.line_numbers[self.variants.len()] = record_number;
                    self.variants.push(variant);
                }
                None => {
                    self.state = EngineState::Closed;
                    break;
                }
            }
        }

        // Parallel phase: one decode task per filled slot, joined before
        // the block is handed back.
        let filled = self.variants.len();
        let slots = &self.slots[..filled];
        let line_numbers = &self.line_numbers[..filled];
        self.pool.install(|| {
            self.variants
                .par_iter_mut()
                .zip(slots.par_iter())
                .zip(line_numbers.par_iter())
                .try_for_each(|((variant, slot), &line)| {
                    decode_genotypes(slot.as_slice(), variant)
                        .map_err(|source| RecordError::Genotype { line, source })
                })
        })?;

        if filled == self.block_size && self.state == EngineState::Open {
            Ok(BlockStatus::Full)
        } else {
            Ok(BlockStatus::EndOfInput)
        }
    }
}
