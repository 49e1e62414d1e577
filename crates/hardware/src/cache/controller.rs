//! Cache controller state machine.
//!
//! The controller accepts one request at a time from the requester side and drives the
//! block store and the memory side until that request is resolved:
//!
//! ```text
//!            hit                     CpuSend / Unblock
//!   Idle ─────────────► HitPending ────────────────────► Idle
//!    │
//!    │ miss: fetch block
//!    ▼        fetch response,
//!   AwaitFetch ─── clean victim: fill ─────► UnblockPending ──► Idle
//!    │                                          ▲
//!    │ fetch response, dirty victim:            │ writeback ack: fill
//!    ▼ issue writeback                          │
//!   AwaitWriteback ─────────────────────────────┘
//! ```
//!
//! While not `Idle` every new request is turned away with [`Busy`]. A rejection is
//! remembered and answered with an [`Event::CpuRetry`] once the controller unblocks.
//!
//! The victim way is chosen when the fetched block arrives and kept in the pending
//! transaction, so the way written back is the way filled even if recency changes in
//! between. A dirty victim is written back, and the writeback acknowledged, before the
//! fetched block is installed over it.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use super::policies::{LruPolicy, ReplacementPolicy};
use super::store::BlockStore;
use crate::common::addr::BlockAddr;
use crate::common::error::{Busy, ConfigError, ProtocolError};
use crate::common::packet::{BlockData, Packet};
use crate::config::CacheConfig;
use crate::sim::event::{Event, EventQueue, Tick};
use crate::soc::traits::MemSidePort;

/// Controller FSM state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Ready to accept a request.
    Idle,
    /// A hit was served; its response or unblock is scheduled.
    HitPending,
    /// Waiting for memory to return the missing block.
    AwaitFetch,
    /// Waiting for memory to acknowledge the victim's writeback.
    AwaitWriteback,
    /// A miss was filled; its response or unblock is scheduled.
    UnblockPending,
}

impl ControllerState {
    /// Returns `true` in every state except `Idle`.
    pub const fn is_blocked(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Per-request hit/miss signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lookup {
    /// Served from the block store.
    Hit,
    /// Sent to memory.
    Miss,
    /// Not a read or write; dropped without a lookup.
    Bypass,
}

#[derive(Debug)]
enum Phase {
    Fetching,
    WritingBack {
        victim: BlockAddr,
        fetched: Box<BlockData>,
    },
}

/// State of the one outstanding miss.
#[derive(Debug)]
struct PendingTransaction {
    request: Packet,
    chosen_way: Option<usize>,
    phase: Phase,
}

impl PendingTransaction {
    const fn new(request: Packet) -> Self {
        Self {
            request,
            chosen_way: None,
            phase: Phase::Fetching,
        }
    }

    const fn awaiting_writeback(&self) -> bool {
        matches!(self.phase, Phase::WritingBack { .. })
    }
}

/// Blocking, write-back, set-associative cache controller.
pub struct CacheController {
    store: BlockStore,
    policy: Box<dyn ReplacementPolicy>,
    latency: Tick,
    state: ControllerState,
    pending: Option<PendingTransaction>,
    to_cpu: Option<Packet>,
    need_retry: bool,
}

impl fmt::Debug for CacheController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheController")
            .field("num_sets", &self.store.num_sets())
            .field("ways", &self.store.ways())
            .field("latency", &self.latency)
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("need_retry", &self.need_retry)
            .finish_non_exhaustive()
    }
}

impl CacheController {
    /// Creates a controller with LRU replacement.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is invalid.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Self::with_policy(config, Box::new(LruPolicy::new()))
    }

    /// Creates a controller with a custom replacement policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry is invalid.
    pub fn with_policy(
        config: &CacheConfig,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            size = config.size_bytes,
            sets = config.num_sets(),
            ways = config.ways,
            latency = config.latency,
            "cache controller configured"
        );
        Ok(Self {
            store: BlockStore::new(config.num_sets(), config.ways),
            policy,
            latency: config.latency,
            state: ControllerState::Idle,
            pending: None,
            to_cpu: None,
            need_retry: false,
        })
    }

    /// Current FSM state.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Returns `true` while a transaction is unresolved.
    pub const fn is_blocked(&self) -> bool {
        self.state.is_blocked()
    }

    /// Read-only view of the block store.
    pub const fn store(&self) -> &BlockStore {
        &self.store
    }

    /// Controller latency in ticks.
    pub const fn latency(&self) -> Tick {
        self.latency
    }

    /// The request behind the outstanding miss, if any.
    pub fn pending_request(&self) -> Option<&Packet> {
        self.pending.as_ref().map(|t| &t.request)
    }

    /// The way the outstanding miss will fill, once chosen.
    pub fn chosen_way(&self) -> Option<usize> {
        self.pending.as_ref().and_then(|t| t.chosen_way)
    }

    /// Returns `true` while a victim writeback is unacknowledged.
    pub fn awaiting_writeback(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(PendingTransaction::awaiting_writeback)
    }

    /// Offers a request to the controller.
    ///
    /// On a hit the response (or a plain unblock) is scheduled `latency` ticks out. On a
    /// miss a block fetch is sent to `mem`. Control traffic is dropped and leaves the
    /// controller idle.
    ///
    /// # Errors
    ///
    /// Returns [`Busy`] with the request while a previous transaction is unresolved.
    /// A [`Event::CpuRetry`] follows once the controller is ready again.
    pub fn handle_request(
        &mut self,
        pkt: Packet,
        events: &mut EventQueue,
        mem: &mut dyn MemSidePort,
    ) -> Result<Lookup, Busy> {
        if self.is_blocked() {
            trace!(addr = %pkt.addr(), state = ?self.state, "request rejected");
            self.need_retry = true;
            return Err(Busy(pkt));
        }

        if !pkt.cmd().is_read_or_write() {
            debug!(addr = %pkt.addr(), "non read/write request dropped");
            return Ok(Lookup::Bypass);
        }

        let block = pkt.block();
        let set = self.store.set_index(block);

        if let Some(way) = self.store.lookup(block) {
            debug!(addr = %pkt.addr(), set, way, write = pkt.is_write(), "hit");
            self.store.touch(set, way);
            if pkt.is_write() {
                self.store
                    .write(set, way, pkt.addr().block_offset(), pkt.data(), true);
            }
            self.state = ControllerState::HitPending;
            self.respond(pkt, set, way, events);
            return Ok(Lookup::Hit);
        }

        debug!(addr = %pkt.addr(), set, write = pkt.is_write(), "miss");
        mem.send_timing_req(Packet::block_read(block), events);
        self.pending = Some(PendingTransaction::new(pkt));
        self.state = ControllerState::AwaitFetch;
        Ok(Lookup::Miss)
    }

    /// Handles a response from memory: a fetched block or a writeback acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if no miss is outstanding, if the response does not
    /// answer the request the controller is waiting on, or if the replacement policy
    /// picks a way outside the set. All of these are fatal.
    pub fn handle_response(
        &mut self,
        pkt: Packet,
        events: &mut EventQueue,
        mem: &mut dyn MemSidePort,
    ) -> Result<(), ProtocolError> {
        let mut txn = self
            .pending
            .take()
            .ok_or(ProtocolError::UnexpectedResponse { addr: pkt.addr() })?;
        let block = txn.request.block();
        let set = self.store.set_index(block);

        let (way, fetched) = match std::mem::replace(&mut txn.phase, Phase::Fetching) {
            Phase::WritingBack { victim, fetched } => {
                let Some(way) = txn.chosen_way.filter(|_| pkt.is_write() && pkt.block() == victim)
                else {
                    return Err(ProtocolError::UnexpectedAck { addr: pkt.addr() });
                };
                debug!(%victim, set, way, "writeback acknowledged");
                self.store.clean(set, way);
                (way, *fetched)
            }
            Phase::Fetching => {
                if !pkt.is_read() || pkt.block() != block {
                    return Err(ProtocolError::MismatchedResponse {
                        expected: block,
                        got: pkt.block(),
                    });
                }
                let way = match txn.chosen_way {
                    Some(way) => way,
                    None => {
                        let way = self.policy.get_victim(self.store.set(set));
                        if way >= self.store.ways() {
                            return Err(ProtocolError::VictimOutOfRange {
                                way,
                                ways: self.store.ways(),
                            });
                        }
                        txn.chosen_way = Some(way);
                        way
                    }
                };

                let victim = self.store.line(set, way);
                if victim.valid && victim.dirty {
                    let tag = victim.tag;
                    debug!(victim = %tag, set, way, "writing back dirty victim");
                    mem.send_timing_req(Packet::block_write(tag, &victim.data), events);
                    txn.phase = Phase::WritingBack {
                        victim: tag,
                        fetched: Box::new(pkt.block_data()),
                    };
                    self.pending = Some(txn);
                    self.state = ControllerState::AwaitWriteback;
                    return Ok(());
                }
                (way, pkt.block_data())
            }
        };

        self.fill(set, way, &txn.request, &fetched)?;
        self.state = ControllerState::UnblockPending;
        self.respond(txn.request, set, way, events);
        Ok(())
    }

    /// Delivers the queued response and unblocks.
    ///
    /// Called when a scheduled [`Event::CpuSend`] fires.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::NoQueuedResponse`] if nothing was queued.
    pub fn send_to_cpu(&mut self, events: &mut EventQueue) -> Result<Packet, ProtocolError> {
        let pkt = self.to_cpu.take().ok_or(ProtocolError::NoQueuedResponse)?;
        trace!(addr = %pkt.addr(), "response delivered");
        self.unblock(events);
        Ok(pkt)
    }

    /// Returns to `Idle`, owing the requester a retry if one was turned away.
    ///
    /// Called when a scheduled [`Event::Unblock`] fires.
    pub fn unblock(&mut self, events: &mut EventQueue) {
        debug_assert!(self.pending.is_none(), "unblock with a miss outstanding");
        self.state = ControllerState::Idle;
        if std::mem::take(&mut self.need_retry) {
            events.schedule_in(0, Event::CpuRetry);
        }
    }

    fn fill(
        &mut self,
        set: usize,
        way: usize,
        request: &Packet,
        fetched: &BlockData,
    ) -> Result<(), ProtocolError> {
        let line = self.store.line(set, way);
        if line.valid && line.dirty {
            return Err(ProtocolError::DirtyOverwrite {
                set,
                way,
                tag: line.tag,
            });
        }
        self.store.install(set, way, request.block(), fetched, false);
        if request.is_write() {
            self.store
                .write(set, way, request.addr().block_offset(), request.data(), true);
        }
        self.store.touch(set, way);
        debug!(block = %request.block(), set, way, dirty = request.is_write(), "filled");
        Ok(())
    }

    fn respond(&mut self, mut pkt: Packet, set: usize, way: usize, events: &mut EventQueue) {
        if pkt.needs_response() {
            pkt.set_data_from(self.store.read(set, way));
            pkt.make_response();
            self.to_cpu = Some(pkt);
            events.schedule_in(self.latency, Event::CpuSend);
        } else {
            events.schedule_in(self.latency, Event::Unblock);
        }
    }
}
