//! Simulator: owns the event queue and every component it dispatches to.
//!
//! The requester, the cache controller, and memory never hold references to each other.
//! Each event popped from the queue is routed here to the component that owns it, with
//! the queue and the downstream port passed in by `&mut` for the duration of the call.

use tracing::{debug, info, trace, warn};

use crate::cache::CacheController;
use crate::common::error::SimError;
use crate::config::Config;
use crate::sim::event::{Event, EventQueue, Tick};
use crate::sim::loader::Trace;
use crate::sim::requester::TraceRequester;
use crate::soc::Memory;
use crate::stats::SimStats;

/// Top-level simulator: requester, cache, and memory around one event queue.
#[derive(Debug)]
pub struct Simulator {
    /// Pending events.
    pub events: EventQueue,
    /// The cache under test.
    pub cache: CacheController,
    /// Main memory behind the cache.
    pub memory: Memory,
    /// Trace replay in front of the cache.
    pub requester: TraceRequester,
    /// Counters for this run.
    pub stats: SimStats,
    issue_gap: Tick,
}

impl Simulator {
    /// Builds a simulator from a validated configuration and a trace.
    ///
    /// Preloads from the trace are written to memory and the first issue is scheduled
    /// at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is invalid.
    pub fn new(config: &Config, trace: Trace) -> Result<Self, SimError> {
        config.validate()?;
        let cache = CacheController::new(&config.cache)?;
        let mut memory = Memory::from_config(&config.memory)?;
        for (addr, bytes) in &trace.preload {
            memory.buffer_mut().load(*addr, bytes);
        }
        Ok(Self::with_parts(
            cache,
            memory,
            TraceRequester::new(trace.requests),
            config.requester.issue_gap,
        ))
    }

    /// Assembles a simulator from prebuilt components.
    pub fn with_parts(
        cache: CacheController,
        memory: Memory,
        requester: TraceRequester,
        issue_gap: Tick,
    ) -> Self {
        let mut events = EventQueue::new();
        events.schedule(0, Event::CpuIssue);
        Self {
            events,
            cache,
            memory,
            requester,
            stats: SimStats::default(),
            issue_gap,
        }
    }

    /// Processes the next event.
    ///
    /// Returns `Ok(false)` once the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Protocol`] if the controller reports a contract violation.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some((tick, event)) = self.events.pop() else {
            return Ok(false);
        };
        trace!(tick, ?event, "dispatch");

        match event {
            Event::CpuIssue | Event::CpuRetry => self.issue(),
            Event::CpuSend => {
                let resp = self.cache.send_to_cpu(&mut self.events)?;
                self.requester.recv_response(resp, tick);
                self.schedule_next_issue();
            }
            Event::Unblock => self.cache.unblock(&mut self.events),
            Event::MemResponse(pkt) => {
                self.cache
                    .handle_response(pkt, &mut self.events, &mut self.memory)?;
            }
        }

        self.stats.ticks = tick;
        Ok(true)
    }

    /// Runs until no events remain and returns the final counters.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError`] raised by [`step`](Self::step).
    pub fn run(&mut self) -> Result<SimStats, SimError> {
        info!(requests = self.requester.remaining(), "simulation start");
        while self.step()? {}

        if !self.requester.is_done() {
            warn!(
                remaining = self.requester.remaining(),
                "event queue drained with requests outstanding"
            );
        }
        self.stats.fetches = self.memory.fetches();
        self.stats.writebacks = self.memory.writebacks();
        info!(
            ticks = self.stats.ticks,
            hits = self.stats.hits,
            misses = self.stats.misses,
            "simulation done"
        );
        Ok(self.stats.clone())
    }

    fn issue(&mut self) {
        let Some(pkt) = self.requester.next_packet() else {
            return;
        };
        let needs_response = pkt.needs_response();
        match self
            .cache
            .handle_request(pkt, &mut self.events, &mut self.memory)
        {
            Ok(lookup) => {
                self.stats.record(lookup);
                self.requester.accepted(needs_response);
                if !needs_response {
                    self.schedule_next_issue();
                }
            }
            Err(busy) => {
                self.stats.retries += 1;
                debug!(addr = %busy.0.addr(), "request deferred until retry");
                self.requester.rejected(busy.into_packet());
            }
        }
    }

    fn schedule_next_issue(&mut self) {
        if self.requester.remaining() > 0 {
            self.events.schedule_in(self.issue_gap, Event::CpuIssue);
        }
    }
}
