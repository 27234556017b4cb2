//! Growable slot buffers for block-wise line storage
//!
//! Each block position owns one [`SlotBuffer`] that persists across blocks.
//! Capacity grows geometrically and never shrinks, so steady-state parsing
//! performs no per-line allocation.

use crate::core::error::BufferError;
use log::debug;

/// Initial capacity of each slot (10 KiB), enough for the genotype suffix
/// of a typical cohort line.
pub const INITIAL_SLOT_CAPACITY: usize = 10 * 1024;

/// Multiplicative growth factor applied until a suffix fits (8/5 = 1.6).
const GROWTH_NUM: usize = 8;
const GROWTH_DEN: usize = 5;

/// One growable byte buffer bound to a block position.
#[derive(Debug)]
pub struct SlotBuffer {
    data: Vec<u8>,
}

impl SlotBuffer {
    /// Create an empty slot with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_SLOT_CAPACITY)
    }

    /// Create an empty slot with an explicit initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Replace the slot contents with `suffix`, growing capacity by the
    /// geometric factor until it fits. Capacity never shrinks.
    pub fn fill(&mut self, suffix: &[u8]) -> Result<(), BufferError> {
        self.data.clear();
        if suffix.len() > self.data.capacity() {
            let mut capacity = self.data.capacity().max(1);
            while capacity < suffix.len() {
                let grown = capacity
                    .checked_mul(GROWTH_NUM)
                    .ok_or(BufferError::CapacityOverflow {
                        required: suffix.len(),
                    })?
                    / GROWTH_DEN;
                // Integer growth must make progress even from tiny capacities
                capacity = grown.max(capacity + 1);
            }
            debug!("growing slot buffer to {} bytes", capacity);
            self.data.reserve_exact(capacity);
        }
        self.data.extend_from_slice(suffix);
        Ok(())
    }

    /// The stored suffix.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Length of the stored suffix.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the slot holds no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current capacity (monotonically non-decreasing).
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }
}

impl Default for SlotBuffer {
    fn default() -> Self {
        Self::new()
    }
}
