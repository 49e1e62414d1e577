//! Configuration system for the cache model.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a simulation. It provides:
//! 1. **Defaults:** Baseline cache, memory, and requester constants.
//! 2. **Structures:** Hierarchical config for the cache, the memory behind it, and the requester.
//! 3. **Validation:** Geometry checks that reject a bad cache at construction time.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with `Config::default()`.

use serde::Deserialize;

use crate::common::constants::BLOCK_SIZE;
use crate::common::error::ConfigError;

/// Default configuration constants.
///
/// These values define the baseline configuration when a field is not
/// explicitly set in the JSON configuration.
mod defaults {
    /// Default cache capacity in bytes (1 KiB).
    pub const CACHE_SIZE: usize = 1024;

    /// Default associativity (4 ways per set).
    pub const CACHE_WAYS: usize = 4;

    /// Default controller latency in ticks, applied to every hit and every miss resolution.
    pub const CACHE_LATENCY: u64 = 1;

    /// Default fixed memory latency in ticks.
    pub const MEM_LATENCY: u64 = 10;

    /// CAS (Column Access Strobe) latency in ticks.
    pub const T_CAS: u64 = 14;

    /// RAS (Row Access Strobe) latency in ticks.
    pub const T_RAS: u64 = 14;

    /// Precharge latency in ticks.
    pub const T_PRE: u64 = 14;

    /// DRAM row size in bytes.
    pub const ROW_BYTES: u64 = 2048;

    /// Ticks between a completed request and the next issue.
    pub const ISSUE_GAP: u64 = 1;
}

/// Memory controller implementation types.
///
/// Specifies how the memory behind the cache models access latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryController {
    /// Simple fixed-latency memory controller.
    ///
    /// Every fetch and writeback takes `latency` ticks.
    #[default]
    Simple,
    /// DRAM controller with row buffer modeling.
    ///
    /// Models CAS, RAS, and precharge latencies with row buffer hits and conflicts.
    #[serde(alias = "DRAM")]
    Dram,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use microcache_core::config::{Config, MemoryController};
///
/// let json = r#"{
///     "cache": { "size_bytes": 256, "ways": 4, "latency": 2 },
///     "memory": { "controller": "Dram", "t_cas": 5 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.num_sets(), 1);
/// assert_eq!(config.memory.controller, MemoryController::Dram);
/// assert_eq!(config.memory.t_ras, 14);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Cache geometry and timing
    #[serde(default)]
    pub cache: CacheConfig,
    /// Memory behind the cache
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Trace-driven requester in front of the cache
    #[serde(default)]
    pub requester: RequesterConfig,
}

impl Config {
    /// Parses a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input. Geometry is not checked here;
    /// see [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks every section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.memory.validate()
    }
}

/// Cache geometry and timing.
///
/// The block size is fixed at [`BLOCK_SIZE`]; capacity must hold a whole number of
/// `BLOCK_SIZE * ways` sets.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total capacity in bytes
    #[serde(default = "CacheConfig::default_size_bytes")]
    pub size_bytes: usize,

    /// Ways per set
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Controller latency in ticks (hit-to-response and fill-to-response delay)
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,
}

impl CacheConfig {
    fn default_size_bytes() -> usize {
        defaults::CACHE_SIZE
    }

    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    fn default_latency() -> u64 {
        defaults::CACHE_LATENCY
    }

    /// Checks the geometry constraints.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroWays`] when `ways == 0`.
    /// - [`ConfigError::TooSmall`] when capacity is below one block.
    /// - [`ConfigError::Geometry`] when capacity is not a multiple of `BLOCK_SIZE * ways`.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if self.size_bytes < BLOCK_SIZE {
            return Err(ConfigError::TooSmall {
                size: self.size_bytes,
                block: BLOCK_SIZE,
            });
        }
        let stride = BLOCK_SIZE * self.ways;
        if self.size_bytes % stride != 0 {
            return Err(ConfigError::Geometry {
                size: self.size_bytes,
                stride,
            });
        }
        Ok(())
    }

    /// Number of sets: `size_bytes / (BLOCK_SIZE * ways)`.
    ///
    /// Only meaningful after [`CacheConfig::validate`] succeeds.
    pub const fn num_sets(&self) -> usize {
        self.size_bytes / (BLOCK_SIZE * self.ways)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            ways: defaults::CACHE_WAYS,
            latency: defaults::CACHE_LATENCY,
        }
    }
}

/// Configuration of the memory responder behind the cache.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Latency model
    #[serde(default)]
    pub controller: MemoryController,

    /// Fixed latency in ticks (Simple controller)
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,

    /// CAS latency in ticks (Dram controller)
    #[serde(default = "MemoryConfig::default_t_cas")]
    pub t_cas: u64,

    /// RAS latency in ticks (Dram controller)
    #[serde(default = "MemoryConfig::default_t_ras")]
    pub t_ras: u64,

    /// Precharge latency in ticks (Dram controller)
    #[serde(default = "MemoryConfig::default_t_pre")]
    pub t_pre: u64,

    /// DRAM row size in bytes (Dram controller)
    #[serde(default = "MemoryConfig::default_row_bytes")]
    pub row_bytes: u64,
}

impl MemoryConfig {
    fn default_latency() -> u64 {
        defaults::MEM_LATENCY
    }

    fn default_t_cas() -> u64 {
        defaults::T_CAS
    }

    fn default_t_ras() -> u64 {
        defaults::T_RAS
    }

    fn default_t_pre() -> u64 {
        defaults::T_PRE
    }

    fn default_row_bytes() -> u64 {
        defaults::ROW_BYTES
    }

    /// Checks the DRAM row size.
    ///
    /// # Errors
    ///
    /// [`ConfigError::RowSize`] when `row_bytes` is zero or not a power of two.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if !self.row_bytes.is_power_of_two() {
            return Err(ConfigError::RowSize(self.row_bytes));
        }
        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            controller: MemoryController::default(),
            latency: defaults::MEM_LATENCY,
            t_cas: defaults::T_CAS,
            t_ras: defaults::T_RAS,
            t_pre: defaults::T_PRE,
            row_bytes: defaults::ROW_BYTES,
        }
    }
}

/// Trace-driven requester settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RequesterConfig {
    /// Ticks between a completed request and the next issue
    #[serde(default = "RequesterConfig::default_issue_gap")]
    pub issue_gap: u64,
}

impl RequesterConfig {
    fn default_issue_gap() -> u64 {
        defaults::ISSUE_GAP
    }
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            issue_gap: defaults::ISSUE_GAP,
        }
    }
}
