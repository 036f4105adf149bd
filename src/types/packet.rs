//! Assembled packet buffers

use std::sync::Arc;

use super::Timestamp;
use super::protocol::layout;

/// A fully framed RHSP packet, header through trailing byte.
///
/// Produced by the [`PacketAssembler`](crate::PacketAssembler) once the
/// buffer length matches the length declared in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPacket {
    /// Packet bytes (shared via Arc so records and observers can hold them cheaply)
    pub bytes: Arc<[u8]>,

    /// Timestamp of the `D` start marker
    pub start_time: Timestamp,

    /// Timestamp of the last byte
    pub end_time: Timestamp,
}

impl AssembledPacket {
    /// Create a new assembled packet
    pub fn new(bytes: Vec<u8>, start_time: Timestamp, end_time: Timestamp) -> Self {
        Self { bytes: bytes.into(), start_time, end_time }
    }

    /// Number of bytes in the packet
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the packet holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The little-endian total length carried in bytes 2..=3, if present
    pub fn declared_length(&self) -> Option<u16> {
        let lo = *self.bytes.get(layout::LENGTH_OFFSET)?;
        let hi = *self.bytes.get(layout::LENGTH_OFFSET + 1)?;
        Some(u16::from_le_bytes([lo, hi]))
    }
}
