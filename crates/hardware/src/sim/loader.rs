//! Request trace loading.
//!
//! A trace is a text file with one request per line:
//!
//! ```text
//! # op  address  [argument]
//! I 0x1000 deadbeef      # preload memory at 0x1000 (not a request)
//! R 0x1000 4             # read 4 bytes (size defaults to 8)
//! W 0x1004 0102          # write bytes 01 02, expects a response
//! P 0x2000 ff            # posted write, no response
//! O 0x0                  # other (non read/write) traffic
//! ```
//!
//! Addresses are hex with a `0x` prefix or decimal. Everything after `#` is ignored.

use std::fs;
use std::path::Path;

use crate::common::addr::PhysAddr;
use crate::common::constants::DEFAULT_ACCESS_SIZE;
use crate::common::error::TraceError;
use crate::common::packet::Packet;

/// A parsed trace: memory preloads plus the request stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    /// Bytes to place in memory before the run.
    pub preload: Vec<(PhysAddr, Vec<u8>)>,
    /// Requests, in issue order.
    pub requests: Vec<Packet>,
}

impl Trace {
    /// A trace with no preloads.
    pub const fn from_requests(requests: Vec<Packet>) -> Self {
        Self {
            preload: Vec::new(),
            requests,
        }
    }
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, otherwise any error from
/// [`parse_trace`].
pub fn load_trace(path: impl AsRef<Path>) -> Result<Trace, TraceError> {
    parse_trace(&fs::read_to_string(path)?)
}

/// Parses trace text.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] for a line that does not follow the grammar and
/// [`TraceError::Packet`] for a well-formed line describing an invalid request.
pub fn parse_trace(text: &str) -> Result<Trace, TraceError> {
    let mut trace = Trace::default();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let body = raw.split_once('#').map_or(raw, |(body, _)| body).trim();
        let mut fields = body.split_whitespace();
        let Some(op) = fields.next() else {
            continue;
        };
        let addr = fields
            .next()
            .ok_or_else(|| parse_error(line, "missing address"))
            .and_then(|s| parse_u64(s).ok_or_else(|| parse_error(line, format!("bad address `{s}`"))))?;
        let arg = fields.next();
        if let Some(extra) = fields.next() {
            return Err(parse_error(line, format!("unexpected field `{extra}`")));
        }

        let pkt = match op.to_ascii_uppercase().as_str() {
            "I" => {
                let data = required_hex(arg, line)?;
                trace.preload.push((PhysAddr(addr), data));
                continue;
            }
            "R" => {
                let size = match arg {
                    Some(s) => parse_u64(s)
                        .ok_or_else(|| parse_error(line, format!("bad size `{s}`")))?
                        as usize,
                    None => DEFAULT_ACCESS_SIZE,
                };
                Packet::read(addr, size)
            }
            "W" => Packet::write(addr, required_hex(arg, line)?),
            "P" => Packet::posted_write(addr, required_hex(arg, line)?),
            "O" => Ok(Packet::other(addr)),
            other => return Err(parse_error(line, format!("unknown op `{other}`"))),
        }
        .map_err(|source| TraceError::Packet { line, source })?;

        trace.requests.push(pkt);
    }

    Ok(trace)
}

fn parse_error(line: usize, msg: impl Into<String>) -> TraceError {
    TraceError::Parse {
        line,
        msg: msg.into(),
    }
}

fn parse_u64(s: &str) -> Option<u64> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn required_hex(arg: Option<&str>, line: usize) -> Result<Vec<u8>, TraceError> {
    let s = arg.ok_or_else(|| parse_error(line, "missing data"))?;
    parse_hex(s).ok_or_else(|| parse_error(line, format!("bad hex data `{s}`")))
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() || !s.is_ascii() || s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
