//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy prefers an empty way and otherwise evicts the line with the oldest
//! access timestamp. Timestamps come from the controller's logical clock, which is
//! globally monotonic, so comparing them gives exact LRU order within a set.
//!
//! # Selection
//!
//! 1. The first invalid way in scan order, if any.
//! 2. Otherwise the way with the smallest `last_access`; on ties the lowest way index.
//!
//! # Performance
//!
//! - **Time Complexity:** `get_victim()` is O(W) where W is the associativity
//! - **Space Complexity:** O(1); recency is stored in the lines

use super::ReplacementPolicy;
use crate::cache::store::CacheLine;

/// Timestamp-based LRU policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    fn get_victim(&self, set: &[CacheLine]) -> usize {
        if let Some(way) = set.iter().position(|line| !line.valid) {
            return way;
        }
        let mut victim = 0;
        for (way, line) in set.iter().enumerate().skip(1) {
            // Strict comparison keeps the lowest index among equal timestamps.
            if line.last_access < set[victim].last_access {
                victim = way;
            }
        }
        victim
    }
}
