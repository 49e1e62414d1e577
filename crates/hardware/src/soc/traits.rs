//! Transport traits for the components around the cache.
//!
//! This module defines the downstream port the controller drives. It provides:
//! 1. **Issue:** `send_timing_req` hands a fetch or writeback to the responder.
//! 2. **Completion:** the responder answers later by scheduling an
//!    [`Event::MemResponse`](crate::sim::event::Event::MemResponse) on the shared queue,
//!    after a latency the controller neither controls nor assumes.
//!
//! Responses on one port must come back in the order their requests were sent.

use crate::common::packet::Packet;
use crate::sim::event::EventQueue;

/// Memory-side port of the cache controller.
pub trait MemSidePort {
    /// Accepts a timing request for a whole block.
    ///
    /// # Arguments
    ///
    /// * `pkt` - A block fetch or block writeback.
    /// * `events` - Queue on which to schedule the eventual response.
    fn send_timing_req(&mut self, pkt: Packet, events: &mut EventQueue);
}
