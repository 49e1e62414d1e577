//! Error and backpressure definitions.
//!
//! This module defines the error handling surface of the cache model. It provides:
//! 1. **Backpressure:** `Busy`, the retry signal returned while a transaction is in flight.
//! 2. **Contract violations:** `ProtocolError`, raised when a transport delivers something
//!    the controller cannot have asked for. These halt the simulation.
//! 3. **Construction errors:** `ConfigError` for bad geometry and `PacketError` for
//!    malformed requests.
//! 4. **Front-end errors:** `TraceError` for trace loading and `SimError` for a run.

use thiserror::Error;

use super::addr::{BlockAddr, PhysAddr};
use super::packet::Packet;

/// Invalid cache or memory configuration, detected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity cannot hold even a single block.
    #[error("cache capacity of {size} bytes is smaller than one {block}-byte block")]
    TooSmall {
        /// Configured capacity in bytes.
        size: usize,
        /// Block size in bytes.
        block: usize,
    },

    /// Associativity of zero.
    #[error("cache associativity must be at least 1 way")]
    ZeroWays,

    /// Capacity does not split into whole sets.
    #[error("cache capacity of {size} bytes is not a multiple of block size x ways ({stride} bytes)")]
    Geometry {
        /// Configured capacity in bytes.
        size: usize,
        /// Bytes per set (block size times associativity).
        stride: usize,
    },

    /// DRAM row size of zero or not a power of two.
    #[error("DRAM row size must be a non-zero power of two, got {0}")]
    RowSize(u64),
}

/// Malformed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    /// Zero-length read or write.
    #[error("zero-length access at {addr}")]
    Empty {
        /// Request address.
        addr: PhysAddr,
    },

    /// Access spills past the end of its block.
    #[error("access of {size} bytes at {addr} crosses a block boundary")]
    CrossesBlock {
        /// Request address.
        addr: PhysAddr,
        /// Request size in bytes.
        size: usize,
    },
}

/// Backpressure signal: the controller is blocked on an in-flight transaction.
///
/// Carries the rejected request back to the caller, who must hold it and resubmit
/// once the controller signals it is ready again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cache controller busy; request for {} must be retried", .0.addr())]
pub struct Busy(pub Packet);

impl Busy {
    /// Returns the rejected request.
    pub fn into_packet(self) -> Packet {
        self.0
    }
}

/// Contract violation between the controller and one of its transports.
///
/// Any of these means an invariant the rest of the hierarchy relies on can no longer be
/// trusted; the simulation stops rather than continue on corrupt state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Memory answered while no miss was outstanding.
    #[error("memory response for {addr} arrived with no pending transaction")]
    UnexpectedResponse {
        /// Address of the stray response.
        addr: PhysAddr,
    },

    /// Memory answered a fetch for a block other than the one requested.
    #[error("memory returned {got} while the pending miss is for {expected}")]
    MismatchedResponse {
        /// Block of the pending miss.
        expected: BlockAddr,
        /// Block carried by the response.
        got: BlockAddr,
    },

    /// A writeback acknowledgement was expected but something else arrived.
    #[error("expected writeback acknowledgement, got a response for {addr}")]
    UnexpectedAck {
        /// Address of the response.
        addr: PhysAddr,
    },

    /// A response delivery fired with nothing queued for the requester.
    #[error("response delivery scheduled with no response queued")]
    NoQueuedResponse,

    /// A fill would overwrite dirty data that was never written back.
    #[error("fill of set {set} way {way} would discard dirty {tag}")]
    DirtyOverwrite {
        /// Target set.
        set: usize,
        /// Target way.
        way: usize,
        /// Tag of the dirty line.
        tag: BlockAddr,
    },

    /// The replacement policy returned a way outside the set.
    #[error("replacement policy chose way {way} in a {ways}-way set")]
    VictimOutOfRange {
        /// Chosen way.
        way: usize,
        /// Associativity.
        ways: usize,
    },
}

/// Failure while loading a request trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Trace file could not be read.
    #[error("cannot read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line did not follow the trace grammar.
    #[error("line {line}: {msg}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        msg: String,
    },

    /// A line parsed but describes an invalid request.
    #[error("line {line}: {source}")]
    Packet {
        /// 1-based line number.
        line: usize,
        /// Underlying packet error.
        #[source]
        source: PacketError,
    },
}

/// Failure of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A transport broke the controller's protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
