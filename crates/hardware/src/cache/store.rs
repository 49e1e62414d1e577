//! Block Store.
//!
//! A fixed grid of cache lines organized as `num_sets` rows of `ways` lines each, held
//! in one contiguous allocation made at construction. The store only stores and looks
//! up; every state transition is driven by the controller.
//!
//! Lines are tagged with their full block address, so a hit is simply
//! `valid && tag == block` within the set `block mod num_sets`.

use crate::common::addr::BlockAddr;
use crate::common::constants::BLOCK_SIZE;
use crate::common::packet::BlockData;

/// One cache line: metadata plus a block of data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheLine {
    /// Line holds a block.
    pub valid: bool,
    /// Line was written since it was filled. Never set without `valid`.
    pub dirty: bool,
    /// Full block address of the cached block.
    pub tag: BlockAddr,
    /// Recency stamp of the most recent hit or fill. Strictly increasing across the store.
    pub last_access: u64,
    /// Block contents.
    pub data: BlockData,
}

impl Default for CacheLine {
    fn default() -> Self {
        Self {
            valid: false,
            dirty: false,
            tag: BlockAddr(0),
            last_access: 0,
            data: [0; BLOCK_SIZE],
        }
    }
}

/// Set-associative grid of cache lines.
#[derive(Debug, Clone)]
pub struct BlockStore {
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    clock: u64,
}

impl BlockStore {
    /// Creates a store of `num_sets * ways` invalid, zeroed lines.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero; geometry is validated by
    /// [`CacheConfig::validate`](crate::config::CacheConfig::validate) beforehand.
    pub fn new(num_sets: usize, ways: usize) -> Self {
        assert!(num_sets > 0 && ways > 0, "block store needs at least one set and one way");
        Self {
            lines: vec![CacheLine::default(); num_sets * ways],
            num_sets,
            ways,
            clock: 0,
        }
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Set that `block` maps to.
    #[inline]
    pub const fn set_index(&self, block: BlockAddr) -> usize {
        block.set_index(self.num_sets)
    }

    #[inline]
    fn idx(&self, set: usize, way: usize) -> usize {
        assert!(
            set < self.num_sets && way < self.ways,
            "line ({set}, {way}) outside {}x{} block store",
            self.num_sets,
            self.ways
        );
        set * self.ways + way
    }

    /// Finds the way holding `block`, if any.
    pub fn lookup(&self, block: BlockAddr) -> Option<usize> {
        self.set(self.set_index(block))
            .iter()
            .position(|line| line.valid && line.tag == block)
    }

    /// All lines of one set, in way order.
    ///
    /// # Panics
    ///
    /// Panics if `set` is out of range.
    pub fn set(&self, set: usize) -> &[CacheLine] {
        let base = self.idx(set, 0);
        &self.lines[base..base + self.ways]
    }

    /// One line.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    pub fn line(&self, set: usize, way: usize) -> &CacheLine {
        &self.lines[self.idx(set, way)]
    }

    /// Block contents of one line.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    pub fn read(&self, set: usize, way: usize) -> &BlockData {
        &self.line(set, way).data
    }

    /// Copies `bytes` into a line at `offset`, optionally marking it dirty.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of range, if the bytes run past the end of the
    /// block, or if the line is invalid and `mark_dirty` is set.
    pub fn write(&mut self, set: usize, way: usize, offset: usize, bytes: &[u8], mark_dirty: bool) {
        let i = self.idx(set, way);
        let line = &mut self.lines[i];
        assert!(!mark_dirty || line.valid, "dirtying invalid line ({set}, {way})");
        line.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        line.dirty |= mark_dirty;
    }

    /// Fills a line with a new block, replacing whatever it held.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    pub fn install(&mut self, set: usize, way: usize, tag: BlockAddr, data: &BlockData, dirty: bool) {
        let i = self.idx(set, way);
        let line = &mut self.lines[i];
        line.valid = true;
        line.dirty = dirty;
        line.tag = tag;
        line.data = *data;
    }

    /// Clears a line's dirty bit once its data has been written back.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    pub fn clean(&mut self, set: usize, way: usize) {
        let i = self.idx(set, way);
        self.lines[i].dirty = false;
    }

    /// Marks a line as the most recently used in the store.
    ///
    /// Stamps come from a per-store access counter rather than the event clock, so two
    /// accesses in the same tick still order.
    ///
    /// # Panics
    ///
    /// Panics if `set` or `way` is out of range.
    pub fn touch(&mut self, set: usize, way: usize) {
        let i = self.idx(set, way);
        self.clock += 1;
        self.lines[i].last_access = self.clock;
    }

    /// Iterates over every line with its `(set, way)` coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &CacheLine)> + '_ {
        let ways = self.ways;
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (i / ways, i % ways, line))
    }

    /// Number of valid lines.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }
}
