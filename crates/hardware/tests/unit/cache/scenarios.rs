//! End-to-End Cache Scenarios.
//!
//! Runs whole traces through the simulator (requester, controller, memory, event queue)
//! and checks observable behavior: returned data, hit/miss counts, memory traffic, and
//! the ordering of writebacks relative to fills and responses.

use crate::common::harness::{response_data, run_trace};
use microcache_core::common::{BlockAddr, PhysAddr};
use microcache_core::config::{Config, MemoryController};
use microcache_core::soc::memory::MemOp;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn config(size_bytes: usize, ways: usize) -> Config {
    let mut config = Config::default();
    config.cache.size_bytes = size_bytes;
    config.cache.ways = ways;
    config
}

#[test]
fn repeated_read_returns_identical_data() {
    let sim = run_trace(
        &Config::default(),
        "I 0x2000 0011223344556677\nR 0x2000 8\nR 0x2000 8\n",
    );
    let data = response_data(&sim);
    assert_eq!(data.len(), 2);
    assert_eq!(data[0], data[1]);
    assert_eq!(data[0], vec![0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77]);
    assert_eq!((sim.stats.misses, sim.stats.hits), (1, 1));
}

#[test]
fn write_is_visible_to_next_read() {
    let sim = run_trace(&Config::default(), "W 0x100 cafebabe\nR 0x100 4\n");
    assert_eq!(response_data(&sim)[1], vec![0xca, 0xfe, 0xba, 0xbe]);
}

#[test]
fn write_survives_eviction() {
    // One line: the second access evicts the dirty block, the third refetches it.
    let sim = run_trace(
        &config(64, 1),
        "W 0x10 a1a2a3a4\nR 0x40 4\nR 0x10 4\n",
    );
    assert_eq!(response_data(&sim)[2], vec![0xa1, 0xa2, 0xa3, 0xa4]);
    assert_eq!(sim.stats.writebacks, 1);
    assert_eq!(sim.stats.fetches, 3);
    assert_eq!(
        sim.memory.buffer().read_bytes(PhysAddr(0x10), 4),
        vec![0xa1, 0xa2, 0xa3, 0xa4]
    );
}

#[test]
fn writeback_completes_before_fill_response() {
    let sim = run_trace(&config(64, 1), "W 0x0 ff\nR 0x40 8\n");

    let log = sim.memory.log();
    let fetch = log
        .iter()
        .find(|a| a.op == MemOp::Fetch && a.block == BlockAddr(1))
        .unwrap();
    let wb = log.iter().find(|a| a.op == MemOp::Writeback).unwrap();
    assert_eq!(wb.block, BlockAddr(0));
    assert!(wb.issued >= fetch.completed, "writeback goes out once the fetch returns");

    let resp_tick = sim.requester.completions()[1].tick;
    assert!(wb.completed < resp_tick, "response for the new block after the ack");
    assert!(sim.cache.store().line(0, 0).tag == BlockAddr(1));
}

#[test]
fn dirty_lines_stay_in_cache_at_end_of_run() {
    let sim = run_trace(&Config::default(), "W 0x0 01\n");
    assert_eq!(sim.stats.writebacks, 0);
    assert_eq!(sim.memory.buffer().read_bytes(PhysAddr(0), 1), vec![0]);
    assert!(sim.cache.store().iter().any(|(_, _, l)| l.dirty));
}

#[test]
fn back_to_back_posted_writes_are_retried_not_dropped() {
    let mut cfg = Config::default();
    cfg.requester.issue_gap = 0;
    let sim = run_trace(&cfg, "P 0x0 01\nP 0x40 02\nP 0x80 03\nR 0x40 1\n");

    assert!(sim.stats.retries > 0);
    assert_eq!(sim.stats.requests, 4);
    assert!(sim.requester.is_done());
    assert_eq!(response_data(&sim), vec![vec![0x02]]);
}

#[rstest]
#[case::default_timing(1, 1)]
#[case::zero_latency_back_to_back(0, 0)]
#[case::zero_latency_spaced(0, 3)]
fn lru_victim_skips_recently_written_line(#[case] latency: u64, #[case] issue_gap: u64) {
    // 256 bytes, 4 ways: a single set. With zero latency and no gap, the hit on block 0
    // lands on the same tick as the fill of block 1 and must still count as newer.
    let mut cfg = config(256, 4);
    cfg.cache.latency = latency;
    cfg.requester.issue_gap = issue_gap;
    let sim = run_trace(
        &cfg,
        "R 0x00\nR 0x40\nW 0x00 0102030405060708\nR 0x80\nR 0xc0\nR 0x100\n",
    );

    assert_eq!(sim.stats.misses, 5);
    assert_eq!(sim.stats.hits, 1);
    assert_eq!(sim.stats.writebacks, 0);

    let store = sim.cache.store();
    assert_eq!(store.line(0, 0).tag, BlockAddr(0));
    assert!(store.line(0, 0).dirty);
    assert_eq!(store.line(0, 1).tag, BlockAddr(4));
    assert_eq!(store.line(0, 2).tag, BlockAddr(2));
    assert_eq!(store.line(0, 3).tag, BlockAddr(3));

    let fetched: Vec<_> = sim.memory.log().iter().map(|a| a.block.val()).collect();
    assert_eq!(fetched, vec![0, 1, 2, 3, 4]);
}

#[test]
fn miss_and_hit_latency() {
    // Fixed memory latency 10, controller latency 1, issue gap 1.
    let sim = run_trace(&Config::default(), "R 0x0\nR 0x0\n");
    let ticks: Vec<_> = sim.requester.completions().iter().map(|c| c.tick).collect();
    // Miss: fetch done at 10, response at 11. Next issue at 12, hit response at 13.
    assert_eq!(ticks, vec![11, 13]);
    assert_eq!(sim.stats.ticks, 13);
}

#[test]
fn dram_row_buffer_latency() {
    let json = r#"{ "memory": { "controller": "Dram", "t_cas": 2, "t_ras": 3, "t_pre": 4 } }"#;
    let cfg = Config::from_json(json).unwrap();
    assert_eq!(cfg.memory.controller, MemoryController::Dram);

    // Same 2 KiB row, then a different row.
    let sim = run_trace(&cfg, "R 0x0\nR 0x40\nR 0x800\n");
    let lat: Vec<_> = sim
        .memory
        .log()
        .iter()
        .map(|a| a.completed - a.issued)
        .collect();
    assert_eq!(lat, vec![5, 2, 9]);
}

#[test]
fn other_traffic_is_counted_but_not_cached() {
    let sim = run_trace(&Config::default(), "O 0x40\nR 0x40\nO 0x40\n");
    assert_eq!(sim.stats.bypassed, 2);
    assert_eq!(sim.stats.requests, 3);
    assert_eq!(sim.stats.misses, 1);
    assert_eq!(sim.memory.log().len(), 1);
    assert_eq!(sim.requester.completions().len(), 1);
}

#[test]
fn conflicting_blocks_map_to_same_set() {
    // 4 sets, 1 way: blocks 0 and 4 share set 0 and keep evicting each other.
    let sim = run_trace(&config(256, 1), "R 0x0\nR 0x100\nR 0x0\nR 0x100\n");
    assert_eq!(sim.stats.misses, 4);
    assert_eq!(sim.cache.store().occupancy(), 1);

    // Blocks 0..4 fit side by side.
    let sim = run_trace(&config(256, 1), "R 0x0\nR 0x40\nR 0x80\nR 0xc0\nR 0x0\n");
    assert_eq!(sim.stats.misses, 4);
    assert_eq!(sim.stats.hits, 1);
}
