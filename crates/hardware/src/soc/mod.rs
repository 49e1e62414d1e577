//! Components around the cache.
//!
//! This module provides the memory side of the model. It includes:
//! 1. **Traits:** The [`MemSidePort`](traits::MemSidePort) the cache controller drives.
//! 2. **Memory:** Main memory with sparse storage and latency modeling.

/// Main memory (buffer, latency controllers, port implementation).
pub mod memory;

/// Transport traits.
pub mod traits;

pub use memory::Memory;
pub use traits::MemSidePort;
