//! Trace-driven requester.
//!
//! Stands in for the compute agent in front of the cache: it replays a list of packets
//! strictly one at a time. A request that expects a response holds the requester until
//! the response arrives; a request turned away with `Busy` is held and resubmitted when
//! the controller signals a retry.

use std::collections::VecDeque;

use crate::common::packet::Packet;
use crate::sim::event::Tick;

/// A response received by the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Tick the response arrived.
    pub tick: Tick,
    /// The response packet.
    pub packet: Packet,
}

/// Replays a fixed request stream.
#[derive(Debug, Default)]
pub struct TraceRequester {
    queue: VecDeque<Packet>,
    held: Option<Packet>,
    waiting: bool,
    issued: u64,
    completions: Vec<Completion>,
}

impl TraceRequester {
    /// Creates a requester that will issue `requests` in order.
    pub fn new(requests: impl IntoIterator<Item = Packet>) -> Self {
        Self {
            queue: requests.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Next packet to offer the cache: a previously rejected one first, then the stream.
    ///
    /// Returns `None` while a response is outstanding or when the stream is exhausted.
    pub fn next_packet(&mut self) -> Option<Packet> {
        if self.waiting {
            return None;
        }
        self.held.take().or_else(|| self.queue.pop_front())
    }

    /// Records that the cache accepted the last packet.
    pub const fn accepted(&mut self, needs_response: bool) {
        self.issued += 1;
        self.waiting = needs_response;
    }

    /// Holds a packet the cache turned away until the next retry.
    pub fn rejected(&mut self, pkt: Packet) {
        self.held = Some(pkt);
    }

    /// Records a response from the cache.
    pub fn recv_response(&mut self, packet: Packet, tick: Tick) {
        self.waiting = false;
        self.completions.push(Completion { tick, packet });
    }

    /// Returns `true` once every request was accepted and every response received.
    pub fn is_done(&self) -> bool {
        self.queue.is_empty() && self.held.is_none() && !self.waiting
    }

    /// Requests not yet accepted (including a held one).
    pub fn remaining(&self) -> usize {
        self.queue.len() + usize::from(self.held.is_some())
    }

    /// Requests accepted so far.
    pub const fn issued(&self) -> u64 {
        self.issued
    }

    /// Responses received so far, in arrival order.
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }
}
