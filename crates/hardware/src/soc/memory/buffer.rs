//! Sparse backing store for main memory.
//!
//! Memory is held block by block in a map, so any 64-bit address can be used without
//! reserving the whole address space. Blocks that were never written read as zero.

use std::collections::HashMap;

use crate::common::addr::{BlockAddr, PhysAddr};
use crate::common::constants::BLOCK_SIZE;
use crate::common::packet::BlockData;

/// Block-granular sparse memory contents.
#[derive(Debug, Clone, Default)]
pub struct MemBuffer {
    blocks: HashMap<BlockAddr, Box<BlockData>>,
}

impl MemBuffer {
    /// Creates an empty (all-zero) buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of one block.
    pub fn read_block(&self, block: BlockAddr) -> BlockData {
        self.blocks.get(&block).map_or([0; BLOCK_SIZE], |b| **b)
    }

    /// Replaces one block.
    pub fn write_block(&mut self, block: BlockAddr, data: &BlockData) {
        let _ = self.blocks.insert(block, Box::new(*data));
    }

    /// Copies `data` into memory starting at `addr`, spanning blocks as needed.
    ///
    /// Used to preload memory contents before a run.
    pub fn load(&mut self, addr: PhysAddr, data: &[u8]) {
        let mut cursor = addr;
        let mut rest = data;
        while !rest.is_empty() {
            let off = cursor.block_offset();
            let n = rest.len().min(BLOCK_SIZE - off);
            let block = self
                .blocks
                .entry(cursor.block())
                .or_insert_with(|| Box::new([0; BLOCK_SIZE]));
            block[off..off + n].copy_from_slice(&rest[..n]);
            rest = &rest[n..];
            cursor = PhysAddr(cursor.val() + n as u64);
        }
    }

    /// Reads `len` bytes starting at `addr`, spanning blocks as needed.
    pub fn read_bytes(&self, addr: PhysAddr, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        let mut cursor = addr;
        while out.len() < len {
            let off = cursor.block_offset();
            let n = (len - out.len()).min(BLOCK_SIZE - off);
            let block = self.read_block(cursor.block());
            out.extend_from_slice(&block[off..off + n]);
            cursor = PhysAddr(cursor.val() + n as u64);
        }
        out
    }

    /// Number of blocks that have been written at least once.
    pub fn resident_blocks(&self) -> usize {
        self.blocks.len()
    }
}
