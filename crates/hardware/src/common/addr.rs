//! Physical and Block Address types.
//!
//! This module defines strong types for byte addresses and block addresses to prevent
//! accidental mixing of the two. It provides the following:
//! 1. **Type Safety:** Distinguishes byte-granular and block-granular addresses at compile time.
//! 2. **Address Manipulation:** Block offset extraction, alignment, and set indexing.
//! 3. **Tagging:** A `BlockAddr` is also the tag stored in a cache line.

use std::fmt;

use serde::Serialize;

use super::constants::{BLOCK_OFFSET_MASK, BLOCK_SHIFT};

/// A byte address as issued by the requester.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PhysAddr(pub u64);

/// A block address: a byte address with the block offset shifted out.
///
/// The full block address is what a cache line stores as its tag, so the set
/// index is recovered as `block mod num_sets` rather than from separate
/// tag/index bit fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BlockAddr(pub u64);

impl PhysAddr {
    /// Creates a new byte address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the block this address falls into.
    #[inline(always)]
    pub const fn block(&self) -> BlockAddr {
        BlockAddr(self.0 >> BLOCK_SHIFT)
    }

    /// Extracts the byte offset within the block (0..`BLOCK_SIZE`).
    #[inline(always)]
    pub const fn block_offset(&self) -> usize {
        (self.0 & BLOCK_OFFSET_MASK) as usize
    }
}

impl BlockAddr {
    /// Creates a new block address from a raw block number.
    #[inline(always)]
    pub const fn new(block: u64) -> Self {
        Self(block)
    }

    /// Returns the raw block number.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the block-aligned byte address of the first byte in this block.
    #[inline(always)]
    pub const fn base(&self) -> PhysAddr {
        PhysAddr(self.0 << BLOCK_SHIFT)
    }

    /// Returns the set this block maps to in a cache with `num_sets` sets.
    ///
    /// # Panics
    ///
    /// Panics if `num_sets` is zero.
    #[inline(always)]
    pub const fn set_index(&self, num_sets: usize) -> usize {
        (self.0 % num_sets as u64) as usize
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for BlockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blk:{:#x}", self.0)
    }
}
