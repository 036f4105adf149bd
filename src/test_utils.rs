//! Test utilities for building RHSP byte streams
//!
//! Shared by unit tests, integration tests (via the `benchmark` feature) and
//! benches, so packets are always framed the same way.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::protocol::{layout, marker};
use crate::types::{ByteEvent, Timestamp};

/// Spacing between consecutive synthetic bytes (one byte at 460800 baud, 8N1).
pub const BYTE_SPACING_NS: u64 = 21_700;

/// Build a complete RHSP packet with a correct length field.
///
/// Destination and source addresses are fixed at `0x02` and `0x00`; the
/// trailing byte is a simple additive checksum (the decoder ignores it).
pub fn build_packet(msg_num: u8, ref_num: u8, type_id: u16, payload: &[u8]) -> Vec<u8> {
    let total = layout::PAYLOAD_OFFSET + payload.len() + 1;
    let length = u16::try_from(total).expect("test packet exceeds u16 length");

    let mut bytes = Vec::with_capacity(total);
    bytes.extend_from_slice(&[marker::FIRST, marker::SECOND]);
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&[0x02, 0x00, msg_num, ref_num]);
    bytes.extend_from_slice(&type_id.to_le_bytes());
    bytes.extend_from_slice(payload);

    let checksum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    bytes.push(checksum);
    bytes
}

/// Turn raw bytes into evenly spaced byte events starting at `t = 0`.
pub fn byte_events(bytes: &[u8]) -> Vec<ByteEvent> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let start = Timestamp::from_nanos(i as u64 * BYTE_SPACING_NS);
            let end = Timestamp::from_nanos((i as u64 + 1) * BYTE_SPACING_NS);
            ByteEvent::spanning(value, start, end)
        })
        .collect()
}

/// Render bytes as a `time,value` capture export with a header line.
pub fn capture_text(bytes: &[u8]) -> String {
    let mut text = String::from("Time [s],Value\n");
    for event in byte_events(bytes) {
        text.push_str(&format!("{:.9},{:#04x}\n", event.start.as_secs_f64(), event.value));
    }
    text
}

/// A mixed stream: noise, a keep-alive, a broken start, an ACK and an I2C read.
pub fn sample_stream(interface_first_id: u16) -> Vec<u8> {
    let mut bytes = vec![0x00, 0xFF, 0x13];
    bytes.extend(build_packet(1, 0, 0x7F04, &[]));
    bytes.extend([marker::FIRST, 0x00]);
    bytes.extend(build_packet(2, 1, 0x7F01, &[]));
    bytes.extend(build_packet(3, 0, interface_first_id + 40, &[0, 0x1A, 6]));
    bytes
}
