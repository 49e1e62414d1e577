//! Request/response packets.
//!
//! A `Packet` is the unit of traffic on both sides of the controller:
//! 1. **Upstream:** requester reads, writes, posted writes, and control traffic.
//! 2. **Downstream:** whole-block fetches and writebacks issued by the controller.
//!
//! A packet becomes a response in place (`make_response`), the way a timing request is
//! turned around and sent back on the port it arrived on.

use super::addr::{BlockAddr, PhysAddr};
use super::constants::BLOCK_SIZE;
use super::data::AccessType;
use super::error::PacketError;

/// Raw contents of one cache block.
pub type BlockData = [u8; BLOCK_SIZE];

/// A request or response travelling between requester, controller, and memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    addr: PhysAddr,
    cmd: AccessType,
    size: usize,
    data: Vec<u8>,
    needs_response: bool,
    is_response: bool,
}

impl Packet {
    /// Rejects empty accesses and accesses that spill past the end of their block.
    const fn check_bounds(addr: PhysAddr, size: usize) -> Result<(), PacketError> {
        if size == 0 {
            return Err(PacketError::Empty { addr });
        }
        // block_offset() < BLOCK_SIZE, so the subtraction cannot underflow.
        if size > BLOCK_SIZE - addr.block_offset() {
            return Err(PacketError::CrossesBlock { addr, size });
        }
        Ok(())
    }

    fn checked(
        addr: PhysAddr,
        cmd: AccessType,
        data: Vec<u8>,
        size: usize,
        needs_response: bool,
    ) -> Result<Self, PacketError> {
        Self::check_bounds(addr, size)?;
        Ok(Self {
            addr,
            cmd,
            size,
            data,
            needs_response,
            is_response: false,
        })
    }

    /// Creates a read request for `size` bytes at `addr`.
    ///
    /// # Errors
    ///
    /// Fails if `size` is zero or the access crosses a block boundary.
    pub fn read(addr: impl Into<PhysAddr>, size: usize) -> Result<Self, PacketError> {
        let addr = addr.into();
        Self::check_bounds(addr, size)?;
        Self::checked(addr, AccessType::Read, vec![0; size], size, true)
    }

    /// Creates a write request that expects a response.
    ///
    /// # Errors
    ///
    /// Fails if `data` is empty or the access crosses a block boundary.
    pub fn write(addr: impl Into<PhysAddr>, data: Vec<u8>) -> Result<Self, PacketError> {
        let size = data.len();
        Self::checked(addr.into(), AccessType::Write, data, size, true)
    }

    /// Creates a write request that does not expect a response.
    ///
    /// # Errors
    ///
    /// Fails if `data` is empty or the access crosses a block boundary.
    pub fn posted_write(addr: impl Into<PhysAddr>, data: Vec<u8>) -> Result<Self, PacketError> {
        let size = data.len();
        Self::checked(addr.into(), AccessType::Write, data, size, false)
    }

    /// Creates a control packet that carries no data and expects no response.
    pub fn other(addr: impl Into<PhysAddr>) -> Self {
        Self {
            addr: addr.into(),
            cmd: AccessType::Other,
            size: 0,
            data: Vec::new(),
            needs_response: false,
            is_response: false,
        }
    }

    /// Creates a whole-block fetch for `block`.
    pub fn block_read(block: BlockAddr) -> Self {
        Self {
            addr: block.base(),
            cmd: AccessType::Read,
            size: BLOCK_SIZE,
            data: vec![0; BLOCK_SIZE],
            needs_response: true,
            is_response: false,
        }
    }

    /// Creates a whole-block writeback of `data` to `block`.
    pub fn block_write(block: BlockAddr, data: &BlockData) -> Self {
        Self {
            addr: block.base(),
            cmd: AccessType::Write,
            size: BLOCK_SIZE,
            data: data.to_vec(),
            needs_response: true,
            is_response: false,
        }
    }

    /// Request address.
    pub const fn addr(&self) -> PhysAddr {
        self.addr
    }

    /// Block the request falls into.
    pub const fn block(&self) -> BlockAddr {
        self.addr.block()
    }

    /// Request kind.
    pub const fn cmd(&self) -> AccessType {
        self.cmd
    }

    /// Access size in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Payload (writes) or returned data (read responses).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the requester waits for a response.
    pub const fn needs_response(&self) -> bool {
        self.needs_response
    }

    /// Whether this packet has been turned into a response.
    pub const fn is_response(&self) -> bool {
        self.is_response
    }

    /// Returns `true` for a read request or response.
    pub const fn is_read(&self) -> bool {
        matches!(self.cmd, AccessType::Read)
    }

    /// Returns `true` for a write request or response.
    pub const fn is_write(&self) -> bool {
        matches!(self.cmd, AccessType::Write)
    }

    /// Turns the request into a response in place.
    pub const fn make_response(&mut self) {
        self.is_response = true;
    }

    /// Fills the packet data from `block` at this packet's block offset.
    pub fn set_data_from(&mut self, block: &BlockData) {
        let off = self.addr.block_offset();
        self.data.clear();
        self.data.extend_from_slice(&block[off..off + self.size]);
    }

    /// Returns the payload as a full block.
    ///
    /// Only meaningful for whole-block packets (fetch responses and writebacks); shorter
    /// payloads are zero-padded.
    pub fn block_data(&self) -> BlockData {
        let mut block = [0; BLOCK_SIZE];
        let n = self.data.len().min(BLOCK_SIZE);
        block[..n].copy_from_slice(&self.data[..n]);
        block
    }
}
