//! Memory Subsystem Unit Tests.
//!
//! Verifies the latency controllers (fixed and DRAM row buffer), the sparse block
//! buffer, and the memory port's in-order completion scheduling.

use crate::common::mocks::memory::MockMemoryController;
use microcache_core::common::{BLOCK_SIZE, BlockAddr, Packet, PhysAddr};
use microcache_core::config::{MemoryConfig, MemoryController as Kind};
use microcache_core::sim::{Event, EventQueue};
use microcache_core::soc::memory::buffer::MemBuffer;
use microcache_core::soc::memory::controller::{
    DramController, MemoryController, SimpleController, from_config,
};
use microcache_core::soc::MemSidePort;
use microcache_core::soc::memory::{MemOp, Memory};

// ══════════════════════════════════════════════════════════
// 1. Latency controllers
// ══════════════════════════════════════════════════════════

#[test]
fn simple_controller_fixed_latency() {
    let mut ctrl = SimpleController::new(10);
    assert_eq!(ctrl.access_latency(0x1000), 10);
    assert_eq!(ctrl.access_latency(u64::MAX), 10);
}

#[test]
fn dram_cold_start_latency() {
    let mut ctrl = DramController::new(5, 10, 8);
    assert_eq!(ctrl.open_row(), None);
    // No row open: t_ras + t_cas.
    assert_eq!(ctrl.access_latency(0x1000), 15);
}

#[test]
fn dram_row_buffer_hit_and_conflict() {
    let mut ctrl = DramController::new(5, 10, 8);
    let _ = ctrl.access_latency(0x1000);
    // Same 2 KiB row: t_cas only.
    assert_eq!(ctrl.access_latency(0x17c0), 5);
    // Different row: t_pre + t_ras + t_cas.
    assert_eq!(ctrl.access_latency(0x1800), 23);
    assert_eq!(ctrl.open_row(), Some(0x1800));
}

#[test]
fn dram_custom_row_size() {
    let mut ctrl = DramController::with_row_bytes(1, 2, 3, 256);
    let _ = ctrl.access_latency(0x0);
    assert_eq!(ctrl.access_latency(0xc0), 1);
    assert_eq!(ctrl.access_latency(0x100), 6);
}

#[test]
fn from_config_selects_model() {
    let simple = MemoryConfig {
        latency: 7,
        ..MemoryConfig::default()
    };
    assert_eq!(from_config(&simple).unwrap().access_latency(0), 7);

    let dram = MemoryConfig {
        controller: Kind::Dram,
        t_cas: 1,
        t_ras: 2,
        t_pre: 3,
        ..MemoryConfig::default()
    };
    let mut ctrl = from_config(&dram).unwrap();
    assert_eq!(ctrl.access_latency(0), 3);
    assert_eq!(ctrl.access_latency(0x40), 1);
}

#[test]
fn from_config_rejects_bad_row_size() {
    let bad = MemoryConfig {
        controller: Kind::Dram,
        row_bytes: 1000,
        ..MemoryConfig::default()
    };
    assert!(from_config(&bad).is_err());
}

// ══════════════════════════════════════════════════════════
// 2. Sparse buffer
// ══════════════════════════════════════════════════════════

#[test]
fn buffer_reads_zero_until_written() {
    let mut buf = MemBuffer::new();
    assert_eq!(buf.read_block(BlockAddr(u64::MAX >> 6)), [0; BLOCK_SIZE]);

    buf.write_block(BlockAddr(3), &[0x5a; BLOCK_SIZE]);
    assert_eq!(buf.read_block(BlockAddr(3)), [0x5a; BLOCK_SIZE]);
    assert_eq!(buf.resident_blocks(), 1);
}

#[test]
fn buffer_load_and_read_bytes_span_blocks() {
    let mut buf = MemBuffer::new();
    let data: Vec<u8> = (0..100).collect();
    buf.load(PhysAddr(0x30), &data);

    assert_eq!(buf.resident_blocks(), 3);
    assert_eq!(buf.read_bytes(PhysAddr(0x30), 100), data);
    assert_eq!(buf.read_block(BlockAddr(1))[0], 0x10);
}

// ══════════════════════════════════════════════════════════
// 3. Memory port
// ══════════════════════════════════════════════════════════

fn memory(latency: u64) -> Memory {
    Memory::new(Box::new(MockMemoryController::new(latency)))
}

#[test]
fn fetch_returns_block_contents_after_latency() {
    let mut mem = memory(10);
    mem.buffer_mut().load(PhysAddr(0x40), &[1, 2, 3]);
    let mut events = EventQueue::new();

    mem.send_timing_req(Packet::block_read(BlockAddr(1)), &mut events);

    let (tick, event) = events.pop().unwrap();
    assert_eq!(tick, 10);
    let Event::MemResponse(resp) = event else {
        panic!("expected a memory response");
    };
    assert!(resp.is_response());
    assert_eq!(&resp.data()[..4], &[1, 2, 3, 0]);
    assert_eq!(mem.fetches(), 1);
}

#[test]
fn writeback_updates_contents() {
    let mut mem = memory(4);
    let mut events = EventQueue::new();

    mem.send_timing_req(Packet::block_write(BlockAddr(2), &[9; BLOCK_SIZE]), &mut events);

    assert_eq!(mem.buffer().read_block(BlockAddr(2)), [9; BLOCK_SIZE]);
    assert_eq!(mem.writebacks(), 1);
    assert_eq!(mem.log()[0].op, MemOp::Writeback);
    assert_eq!(mem.log()[0].completed, 4);
}

#[test]
fn same_tick_completions_pop_in_issue_order() {
    let mut ctrl = MockMemoryController::new(5);
    ctrl.set_latency(20);
    let mut mem = Memory::new(Box::new(ctrl));
    let mut events = EventQueue::new();

    mem.send_timing_req(Packet::block_read(BlockAddr(0)), &mut events);
    mem.send_timing_req(Packet::block_read(BlockAddr(1)), &mut events);

    let log = mem.log();
    assert_eq!(log[0].completed, 20);
    assert_eq!(log[1].completed, 20);

    let (_, first) = events.pop().unwrap();
    let (_, second) = events.pop().unwrap();
    assert!(matches!(first, Event::MemResponse(ref p) if p.block() == BlockAddr(0)));
    assert!(matches!(second, Event::MemResponse(ref p) if p.block() == BlockAddr(1)));
}

#[test]
fn dram_latency_can_shrink_but_not_reorder() {
    let cfg = MemoryConfig {
        controller: Kind::Dram,
        t_cas: 1,
        t_ras: 10,
        t_pre: 10,
        ..MemoryConfig::default()
    };
    let mut mem = Memory::from_config(&cfg).unwrap();
    let mut events = EventQueue::new();

    // Cold access takes 11; a row hit issued at the same tick would take 1.
    mem.send_timing_req(Packet::block_read(BlockAddr(0)), &mut events);
    mem.send_timing_req(Packet::block_read(BlockAddr(1)), &mut events);

    let done: Vec<_> = mem.log().iter().map(|a| a.completed).collect();
    assert_eq!(done, vec![11, 11]);
}
