//! Global Cache Constants.
//!
//! This module defines the geometry constants shared by the block store, the
//! controller, the packet model, and the memory backing store.

/// Cache block (line) size in bytes.
///
/// The block size is fixed; only capacity and associativity are configurable.
pub const BLOCK_SIZE: usize = 64;

/// Number of bits to shift to convert between byte addresses and block addresses.
pub const BLOCK_SHIFT: u32 = BLOCK_SIZE.trailing_zeros();

/// Mask for extracting the byte offset within a block from an address.
pub const BLOCK_OFFSET_MASK: u64 = BLOCK_SIZE as u64 - 1;

/// Default request size in bytes for trace reads that omit one.
pub const DEFAULT_ACCESS_SIZE: usize = 8;
