//! Memory Access Types.
//!
//! This module defines the classification of requests seen by the cache controller.
//! The kind decides which controller path a request takes:
//! 1. **Read / Write:** Looked up in the block store; hit or miss path.
//! 2. **Other:** Control traffic the controller accepts and drops without a lookup.

use serde::{Deserialize, Serialize};

/// Kind of request carried by a packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Data read access.
    ///
    /// Returns `size` bytes from the block at the request offset.
    Read,

    /// Data write access.
    ///
    /// Applies the payload into the block and marks it dirty.
    Write,

    /// Non-read, non-write control traffic.
    ///
    /// Accepted and dropped immediately: no lookup, no response, no hit/miss signal.
    Other,
}

impl AccessType {
    /// Returns `true` for requests that go through the block store.
    #[inline]
    pub const fn is_read_or_write(self) -> bool {
        matches!(self, Self::Read | Self::Write)
    }

    /// Returns `true` for writes.
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}
