//! Packet framing state machine
//!
//! The assembler scans for the `D K` start marker, reads the little-endian
//! total length from the next two bytes and buffers until exactly that many
//! bytes have arrived. Framing faults are recovered silently: stray bytes
//! while idle are dropped, and a start marker not followed by `K` abandons
//! the attempt. The byte that broke the marker is not reconsidered as a new
//! start.
//!
//! Declared lengths of 4 or less can never be satisfied, so such attempts
//! stall until [`PacketAssembler::reset`] is called. There is no maximum
//! length or timeout.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::protocol::{layout, marker};
use crate::types::{AssembledPacket, ByteEvent, Timestamp};

/// Observable state of a [`PacketAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblerState {
    /// Waiting for a start marker
    Idle,
    /// Collecting the bytes of one packet
    Accumulating,
}

/// Running counters kept by the assembler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Every byte fed, in any state
    pub bytes_seen: u64,
    /// Bytes dropped while idle because they were not a start marker
    pub bytes_discarded: u64,
    /// Attempts abandoned because the second byte was not `K`
    pub framing_violations: u64,
    /// Packets handed out complete
    pub packets_completed: u64,
    /// Explicit resets that dropped a partial packet
    pub resets: u64,
}

#[derive(Debug, Clone)]
struct InProgressPacket {
    buffer: Vec<u8>,
    start_time: Timestamp,
    length_low: u8,
    declared_length: Option<u16>,
}

impl InProgressPacket {
    fn start(first: u8, start_time: Timestamp) -> Self {
        let mut buffer = Vec::with_capacity(64);
        buffer.push(first);
        Self { buffer, start_time, length_low: 0, declared_length: None }
    }
}

/// Byte-at-a-time RHSP packet assembler.
///
/// Holds at most one partial packet. Each instance is independent, so one
/// assembler can be used per captured channel.
#[derive(Debug, Clone, Default)]
pub struct PacketAssembler {
    pending: Option<InProgressPacket>,
    stats: DecodeStats,
}

impl PacketAssembler {
    /// Create an idle assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte that arrived at `at`.
    ///
    /// Returns the completed packet when `byte` is its last byte.
    pub fn feed(&mut self, byte: u8, at: Timestamp) -> Option<AssembledPacket> {
        self.feed_span(byte, at, at)
    }

    /// Feed one byte event; a completed packet ends at the event's `end`.
    pub fn feed_event(&mut self, event: &ByteEvent) -> Option<AssembledPacket> {
        self.feed_span(event.value, event.start, event.end)
    }

    fn feed_span(&mut self, byte: u8, start: Timestamp, end: Timestamp) -> Option<AssembledPacket> {
        self.stats.bytes_seen += 1;

        let Some(packet) = self.pending.as_mut() else {
            if byte == marker::FIRST {
                self.pending = Some(InProgressPacket::start(byte, start));
            } else {
                self.stats.bytes_discarded += 1;
            }
            return None;
        };

        packet.buffer.push(byte);
        let received = packet.buffer.len();

        match received {
            2 if byte != marker::SECOND => {
                trace!(byte, at = %start, "framing violation: start marker not followed by 'K'");
                self.stats.framing_violations += 1;
                self.pending = None;
                None
            }
            2 => None,
            3 => {
                packet.length_low = byte;
                None
            }
            layout::HEADER_LEN => {
                let length = u16::from_le_bytes([packet.length_low, byte]);
                packet.declared_length = Some(length);
                if usize::from(length) <= layout::HEADER_LEN {
                    trace!(length, "declared length shorter than header; packet will stall");
                }
                None
            }
            n if packet.declared_length.map(usize::from) == Some(n) => {
                self.pending.take().map(|done| {
                    self.stats.packets_completed += 1;
                    debug!(
                        len = done.buffer.len(),
                        start = %done.start_time,
                        end = %end,
                        "assembled RHSP packet"
                    );
                    AssembledPacket::new(done.buffer, done.start_time, end)
                })
            }
            _ => None,
        }
    }

    /// Drop any partial packet and return to idle.
    pub fn reset(&mut self) {
        if let Some(dropped) = self.pending.take() {
            self.stats.resets += 1;
            debug!(pending = dropped.buffer.len(), "assembler reset dropped partial packet");
        }
    }

    /// Current state
    pub fn state(&self) -> AssemblerState {
        match self.pending {
            Some(_) => AssemblerState::Accumulating,
            None => AssemblerState::Idle,
        }
    }

    /// Whether no packet is in progress
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Bytes buffered for the packet in progress (0 when idle)
    pub fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, |p| p.buffer.len())
    }

    /// Length declared by the packet in progress, once both length bytes arrived
    pub fn declared_length(&self) -> Option<u16> {
        self.pending.as_ref().and_then(|p| p.declared_length)
    }

    /// Counters since construction
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }
}
