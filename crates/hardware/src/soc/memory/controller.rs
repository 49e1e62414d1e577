//! Memory controller implementations for latency modeling.
//!
//! This module provides:
//! 1. **SimpleController:** Fixed latency per access (no row-buffer modeling).
//! 2. **DramController:** Row-buffer-aware latency (CAS, RAS, precharge) for DRAM-style timing.
//!
//! The cache controller never sees these latencies directly; they only decide when the
//! memory port schedules its response.

use crate::common::error::ConfigError;
use crate::config::{MemoryConfig, MemoryController as ControllerKind};
use crate::sim::event::Tick;

/// Trait for memory controller implementations that report access latency in ticks.
pub trait MemoryController: Send + Sync {
    /// Returns the number of ticks required for an access to the given address.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address being accessed (used for row-buffer modeling).
    fn access_latency(&mut self, addr: u64) -> Tick;
}

/// Builds the latency model selected by `config`.
///
/// # Errors
///
/// Returns [`ConfigError::RowSize`] if a DRAM row size is not a power of two.
pub fn from_config(config: &MemoryConfig) -> Result<Box<dyn MemoryController>, ConfigError> {
    config.validate()?;
    Ok(match config.controller {
        ControllerKind::Simple => Box::new(SimpleController::new(config.latency)),
        ControllerKind::Dram => Box::new(DramController::with_row_bytes(
            config.t_cas,
            config.t_ras,
            config.t_pre,
            config.row_bytes,
        )),
    })
}

/// Fixed-latency memory controller; every access takes the same number of ticks.
#[derive(Debug, Clone)]
pub struct SimpleController {
    latency: Tick,
}

impl SimpleController {
    /// Creates a simple controller with the given fixed latency in ticks.
    pub const fn new(latency: Tick) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u64) -> Tick {
        self.latency
    }
}

/// DRAM-style controller with one open row; models CAS, RAS, and precharge latencies.
#[derive(Debug, Clone)]
pub struct DramController {
    open_row: Option<u64>,
    t_cas: Tick,
    t_ras: Tick,
    t_pre: Tick,
    row_mask: u64,
}

impl DramController {
    /// Creates a DRAM controller with 2 KiB rows.
    ///
    /// # Arguments
    ///
    /// * `t_cas` - Column access strobe latency.
    /// * `t_ras` - Row access strobe latency.
    /// * `t_pre` - Precharge latency.
    pub const fn new(t_cas: Tick, t_ras: Tick, t_pre: Tick) -> Self {
        Self::with_row_bytes(t_cas, t_ras, t_pre, 2048)
    }

    /// Creates a DRAM controller with `row_bytes`-sized rows.
    ///
    /// `row_bytes` must be a power of two; [`MemoryConfig::validate`] enforces this for
    /// configured controllers.
    pub const fn with_row_bytes(t_cas: Tick, t_ras: Tick, t_pre: Tick, row_bytes: u64) -> Self {
        Self {
            open_row: None,
            t_cas,
            t_ras,
            t_pre,
            row_mask: !(row_bytes - 1),
        }
    }

    /// Row currently held in the row buffer.
    pub const fn open_row(&self) -> Option<u64> {
        self.open_row
    }
}

impl MemoryController for DramController {
    fn access_latency(&mut self, addr: u64) -> Tick {
        let row = addr & self.row_mask;
        match self.open_row.replace(row) {
            Some(open) if open == row => self.t_cas,
            Some(_) => self.t_pre + self.t_ras + self.t_cas,
            None => self.t_ras + self.t_cas,
        }
    }
}
