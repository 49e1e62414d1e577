//! Common utilities and types used throughout the cache model.
//!
//! This module provides fundamental building blocks that are shared across all components.
//! It includes:
//! 1. **Address Types:** Strong types for byte and block addresses.
//! 2. **Constants:** Block geometry.
//! 3. **Access Kinds:** Read / Write / Other request classification.
//! 4. **Packets:** The request/response unit exchanged on both transports.
//! 5. **Error Handling:** Backpressure, contract violations, and construction errors.

/// Address type definitions (byte and block addresses).
pub mod addr;

/// Block geometry constants.
pub mod constants;

/// Request kind definitions.
pub mod data;

/// Error and backpressure types.
pub mod error;

/// Request/response packets.
pub mod packet;

pub use addr::{BlockAddr, PhysAddr};
pub use constants::{BLOCK_SHIFT, BLOCK_SIZE};
pub use data::AccessType;
pub use error::{Busy, ConfigError, PacketError, ProtocolError, SimError, TraceError};
pub use packet::{BlockData, Packet};
