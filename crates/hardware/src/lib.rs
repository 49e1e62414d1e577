//! Timing model of a blocking, write-back, set-associative cache.
//!
//! This crate simulates one cache controller between a requester and main memory as a
//! discrete-event system:
//! 1. **Cache:** Block store, LRU replacement, and the controller state machine that
//!    serves hits, fetches misses, and writes back dirty victims.
//! 2. **Memory:** Sparse main memory with fixed or DRAM row-buffer latency.
//! 3. **Simulation:** Ordered event queue, trace loader, requester, and the dispatch loop.
//! 4. **Configuration and statistics:** JSON configuration and per-run counters.
//!
//! ```
//! use microcache_core::{Config, Simulator};
//! use microcache_core::sim::parse_trace;
//!
//! let trace = parse_trace("R 0x1000\nR 0x1000\n").unwrap();
//! let mut sim = Simulator::new(&Config::default(), trace).unwrap();
//! let stats = sim.run().unwrap();
//! assert_eq!((stats.hits, stats.misses), (1, 1));
//! ```

/// Cache controller, block store, and replacement policies.
pub mod cache;
/// Common types (addresses, packets, access types, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Event queue, trace loading, requester, and simulator loop.
pub mod sim;
/// Memory side of the model (main memory, port trait).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The cache controller state machine.
pub use crate::cache::CacheController;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Per-run counters.
pub use crate::stats::SimStats;
