//! Cache Replacement Policies.
//!
//! Implements the algorithm for selecting the victim way when a miss is filled.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, by per-line access timestamp.

/// Least Recently Used replacement policy.
pub mod lru;

pub use lru::LruPolicy;

use super::store::CacheLine;

/// Trait for cache replacement policies.
///
/// Recency lives in the lines themselves (`last_access`), so a policy only reads the
/// set it is handed and keeps no state of its own.
pub trait ReplacementPolicy: Send + Sync {
    /// Selects the way to fill in a set.
    ///
    /// # Arguments
    ///
    /// * `set` - The lines of the target set, in way order.
    ///
    /// # Returns
    ///
    /// The index of the way to fill. Must be `< set.len()`.
    fn get_victim(&self, set: &[CacheLine]) -> usize;
}
