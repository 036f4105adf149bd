//! Packet classification.
//!
//! Turns an assembled packet into a labeled record. Classification is a pure,
//! total function of the packet bytes and the interface base id: unknown type
//! ids fall back to a generic command (when `ref_num == 0`) or response.
//!
//! Header fields are read at fixed offsets: `msg_num` at 6, `ref_num` at 7 and
//! the little-endian `type_id` at 8..=9. The payload runs from offset 10 up to,
//! but excluding, the trailing byte, which is never validated. Bytes missing
//! from a truncated packet read as zero.
//!
//! # Example
//!
//! ```rust
//! use rhsp::classifier::classify;
//! use rhsp::FrameCategory;
//!
//! let bytes = [0x44, 0x4B, 0x0B, 0x00, 0x00, 0x00, 0x01, 0x00, 0x03, 0x7F, 0x00];
//! let class = classify(&bytes, 0);
//! assert_eq!(class.category, FrameCategory::KnownCommand);
//! assert_eq!(class.packet_type_name, "GetModuleStatus");
//! assert_eq!(class.msg_num, 1);
//! ```

mod table;

pub use table::{I2cLayout, PACKET_TYPES, PacketTypeEntry, TypeIdMatcher, lookup};

use std::borrow::Cow;

use crate::types::protocol::layout;
use crate::types::{AssembledPacket, DecodedRecord, FrameCategory, I2cFields, Timestamp};

/// Label used for unknown commands
pub const GENERIC_COMMAND_NAME: &str = "Command";
/// Label used for unknown responses
pub const GENERIC_RESPONSE_NAME: &str = "Response";

/// Classification of one packet, without timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub category: FrameCategory,
    pub packet_type_name: &'static str,
    pub type_id: u16,
    pub msg_num: u8,
    pub ref_num: u8,
    pub i2c: I2cFields,
}

impl Classification {
    /// Attach timing to produce a record.
    pub fn into_record(self, start_time: Timestamp, end_time: Timestamp) -> DecodedRecord {
        DecodedRecord {
            category: self.category,
            start_time,
            end_time,
            type_id: self.type_id,
            packet_type_name: Cow::Borrowed(self.packet_type_name),
            msg_num: self.msg_num,
            ref_num: self.ref_num,
            i2c: self.i2c,
        }
    }
}

/// Type-specific bytes: offset 10 up to the trailing byte.
pub fn payload(bytes: &[u8]) -> &[u8] {
    let end = bytes.len().saturating_sub(1);
    bytes.get(layout::PAYLOAD_OFFSET..end).unwrap_or(&[])
}

fn byte_at(bytes: &[u8], offset: usize) -> u8 {
    bytes.get(offset).copied().unwrap_or(0)
}

/// Classify raw packet bytes (header through trailing byte).
pub fn classify(bytes: &[u8], interface_first_id: u32) -> Classification {
    let msg_num = byte_at(bytes, layout::MSG_NUM_OFFSET);
    let ref_num = byte_at(bytes, layout::REF_NUM_OFFSET);
    let type_id = u16::from_le_bytes([
        byte_at(bytes, layout::TYPE_ID_OFFSET),
        byte_at(bytes, layout::TYPE_ID_OFFSET + 1),
    ]);

    let (category, packet_type_name, i2c) = match lookup(type_id, interface_first_id) {
        Some(entry) => (entry.category, entry.name, entry.extract(payload(bytes))),
        None if ref_num == 0 => (FrameCategory::GenericCommand, GENERIC_COMMAND_NAME, I2cFields::NONE),
        None => (FrameCategory::GenericResponse, GENERIC_RESPONSE_NAME, I2cFields::NONE),
    };

    Classification { category, packet_type_name, type_id, msg_num, ref_num, i2c }
}

/// Classify an assembled packet into a timed record.
pub fn classify_packet(packet: &AssembledPacket, interface_first_id: u32) -> DecodedRecord {
    classify(&packet.bytes, interface_first_id).into_record(packet.start_time, packet.end_time)
}
