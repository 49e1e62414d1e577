//! Discrete-event simulation driver.
//!
//! Provides the event queue, the trace format and requester that feed the cache, and
//! the simulator loop that ties them to the cache and memory.

/// Tick type, events, and the ordered event queue.
pub mod event;
/// Trace file parsing.
pub mod loader;
/// Trace replay in front of the cache.
pub mod requester;
/// Event dispatch loop.
pub mod simulator;

pub use event::{Event, EventQueue, Tick};
pub use loader::{Trace, load_trace, parse_trace};
pub use requester::{Completion, TraceRequester};
pub use simulator::Simulator;
