//! Simulation statistics collection and reporting.
//!
//! This module tracks the metrics of a cache simulation run. It provides:
//! 1. **Timing:** Simulated ticks and host wall-clock time.
//! 2. **Requests:** Accepted requests split into hits, misses, and bypassed traffic.
//! 3. **Flow control:** Requests turned away while the controller was blocked.
//! 4. **Memory traffic:** Block fetches and dirty writebacks sent downstream.

use std::time::Instant;

use serde::Serialize;

use crate::cache::Lookup;

/// Simulation statistics for one run.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Tick of the last processed event.
    pub ticks: u64,
    /// Requests accepted by the controller.
    pub requests: u64,
    /// Accepted requests served from the cache.
    pub hits: u64,
    /// Accepted requests that went to memory.
    pub misses: u64,
    /// Accepted requests that were neither reads nor writes.
    pub bypassed: u64,
    /// Offers rejected because the controller was busy.
    pub retries: u64,
    /// Block fetches served by memory.
    pub fetches: u64,
    /// Dirty victim writebacks served by memory.
    pub writebacks: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            ticks: 0,
            requests: 0,
            hits: 0,
            misses: 0,
            bypassed: 0,
            retries: 0,
            fetches: 0,
            writebacks: 0,
        }
    }
}

impl PartialEq for SimStats {
    fn eq(&self, other: &Self) -> bool {
        self.ticks == other.ticks
            && self.requests == other.requests
            && self.hits == other.hits
            && self.misses == other.misses
            && self.bypassed == other.bypassed
            && self.retries == other.retries
            && self.fetches == other.fetches
            && self.writebacks == other.writebacks
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "cache", "memory"];

impl SimStats {
    /// Counts one accepted request.
    pub const fn record(&mut self, lookup: Lookup) {
        self.requests += 1;
        match lookup {
            Lookup::Hit => self.hits += 1,
            Lookup::Miss => self.misses += 1,
            Lookup::Bypass => self.bypassed += 1,
        }
    }

    /// Hits plus misses.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of cache accesses that hit, `0.0` when there were none.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty
    /// slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        if want("summary") {
            println!("\n==========================================================");
            println!("CACHE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {:.4} s", seconds);
            println!("sim_ticks                {}", self.ticks);
            println!("sim_requests             {}", self.requests);
            println!("----------------------------------------------------------");
        }
        if want("cache") {
            let total = self.requests.max(1) as f64;
            println!("CACHE");
            println!(
                "  hits                   {} ({:.2}%)",
                self.hits,
                (self.hits as f64 / total) * 100.0
            );
            println!(
                "  misses                 {} ({:.2}%)",
                self.misses,
                (self.misses as f64 / total) * 100.0
            );
            println!("  bypassed               {}", self.bypassed);
            println!("  hit_rate               {:.2}%", self.hit_rate() * 100.0);
            println!("  retries                {}", self.retries);
            println!("----------------------------------------------------------");
        }
        if want("memory") {
            println!("MEMORY");
            println!("  fetches                {}", self.fetches);
            println!("  writebacks             {}", self.writebacks);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
