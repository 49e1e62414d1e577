//! Set-Associative Write-Back Cache.
//!
//! This module implements a blocking, write-back, set-associative cache that sits between
//! one requester and one memory responder. It is split into:
//! 1. **Store:** The grid of lines (`BlockStore`) with lookup and fill helpers.
//! 2. **Policies:** Victim selection on a miss (`ReplacementPolicy`, `LruPolicy`).
//! 3. **Controller:** The state machine (`CacheController`) that accepts requests, fetches
//!    missing blocks, writes back dirty victims, and schedules responses.

/// Cache controller state machine.
pub mod controller;

/// Cache replacement policy implementations.
pub mod policies;

/// Block store (cache line grid).
pub mod store;

pub use controller::{CacheController, ControllerState, Lookup};
pub use policies::{LruPolicy, ReplacementPolicy};
pub use store::{BlockStore, CacheLine};
