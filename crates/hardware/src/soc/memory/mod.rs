//! Main memory behind the cache.
//!
//! This module implements the downstream responder. It provides:
//! 1. **Buffer:** Sparse block storage (`MemBuffer`) for memory contents.
//! 2. **Controller:** Latency modeling (simple or DRAM row-buffer) for timing.
//! 3. **Memory:** The [`MemSidePort`] implementation that serves block fetches and
//!    writebacks and schedules their completions in issue order.

/// Sparse block storage.
pub mod buffer;

/// Memory controller implementations for access latency modeling.
pub mod controller;

use std::fmt;

use serde::Serialize;
use tracing::trace;

use self::buffer::MemBuffer;
use self::controller::MemoryController;
use crate::common::addr::BlockAddr;
use crate::common::error::ConfigError;
use crate::common::packet::Packet;
use crate::config::MemoryConfig;
use crate::sim::event::{Event, EventQueue, Tick};
use crate::soc::traits::MemSidePort;

/// Kind of downstream access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemOp {
    /// Block read on behalf of a miss.
    Fetch,
    /// Block write of a dirty victim.
    Writeback,
}

/// One served downstream access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemAccess {
    /// Fetch or writeback.
    pub op: MemOp,
    /// Block accessed.
    pub block: BlockAddr,
    /// Tick the request arrived.
    pub issued: Tick,
    /// Tick the response was scheduled for.
    pub completed: Tick,
}

/// Main memory device.
pub struct Memory {
    buffer: MemBuffer,
    controller: Box<dyn MemoryController>,
    ready_at: Tick,
    log: Vec<MemAccess>,
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("resident_blocks", &self.buffer.resident_blocks())
            .field("ready_at", &self.ready_at)
            .field("accesses", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl Memory {
    /// Creates an all-zero memory with the given latency model.
    pub fn new(controller: Box<dyn MemoryController>) -> Self {
        Self {
            buffer: MemBuffer::new(),
            controller,
            ready_at: 0,
            log: Vec::new(),
        }
    }

    /// Creates a memory with the latency model selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid DRAM row size.
    pub fn from_config(config: &MemoryConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(controller::from_config(config)?))
    }

    /// Memory contents.
    pub const fn buffer(&self) -> &MemBuffer {
        &self.buffer
    }

    /// Mutable memory contents, for preloading.
    pub const fn buffer_mut(&mut self) -> &mut MemBuffer {
        &mut self.buffer
    }

    /// Every access served so far, in issue order.
    pub fn log(&self) -> &[MemAccess] {
        &self.log
    }

    /// Number of block fetches served.
    pub fn fetches(&self) -> u64 {
        self.count(MemOp::Fetch)
    }

    /// Number of writebacks served.
    pub fn writebacks(&self) -> u64 {
        self.count(MemOp::Writeback)
    }

    fn count(&self, op: MemOp) -> u64 {
        self.log.iter().filter(|a| a.op == op).count() as u64
    }
}

impl MemSidePort for Memory {
    fn send_timing_req(&mut self, mut pkt: Packet, events: &mut EventQueue) {
        let now = events.now();
        let latency = self.controller.access_latency(pkt.addr().val());
        // Completions never overtake earlier requests on this port.
        let done = now.saturating_add(latency).max(self.ready_at);
        self.ready_at = done;

        let block = pkt.block();
        let op = if pkt.is_write() {
            self.buffer.write_block(block, &pkt.block_data());
            MemOp::Writeback
        } else {
            pkt.set_data_from(&self.buffer.read_block(block));
            MemOp::Fetch
        };
        trace!(?op, %block, now, done, "memory access");

        pkt.make_response();
        self.log.push(MemAccess {
            op,
            block,
            issued: now,
            completed: done,
        });
        events.schedule(done, Event::MemResponse(pkt));
    }
}
