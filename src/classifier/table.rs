//! Ordered packet type table

use serde::{Deserialize, Serialize};

use crate::types::protocol::{fixed, i2c_offset};
use crate::types::{FrameCategory, I2cFields};

/// How a table entry recognizes a type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeIdMatcher {
    /// A type id that is the same on every hub
    Fixed(u16),
    /// `interface_first_id + offset`, assigned when the interface is queried
    InterfaceOffset(u32),
}

impl TypeIdMatcher {
    /// Whether `type_id` matches under the given interface base.
    pub fn matches(self, type_id: u16, interface_first_id: u32) -> bool {
        match self {
            TypeIdMatcher::Fixed(id) => id == type_id,
            TypeIdMatcher::InterfaceOffset(offset) => {
                interface_first_id.checked_add(offset) == Some(u32::from(type_id))
            }
        }
    }

    /// Concrete type id under the given interface base, if it fits in 16 bits.
    pub fn resolve(self, interface_first_id: u32) -> Option<u16> {
        match self {
            TypeIdMatcher::Fixed(id) => Some(id),
            TypeIdMatcher::InterfaceOffset(offset) => interface_first_id
                .checked_add(offset)
                .and_then(|id| u16::try_from(id).ok()),
        }
    }
}

/// Payload layout of an I2C bridge command.
///
/// Payload bytes: `[bus, addr, count, reg/data...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum I2cLayout {
    WriteSingleByte,
    WriteMultipleBytes,
    ReadSingleByte,
    ReadMultipleBytes,
    WriteReadMultipleBytes,
}

impl I2cLayout {
    /// Pull the transaction sub-fields out of `payload`.
    ///
    /// Bytes missing from a truncated payload leave their field absent.
    pub fn extract(self, payload: &[u8]) -> I2cFields {
        let bus = payload.first().copied();
        let addr = payload.get(1).copied();
        let count = payload.get(2).copied();
        let reg = payload.get(3).copied();

        match self {
            I2cLayout::WriteSingleByte => I2cFields { bus, addr, reg: None, length: Some(0) },
            // The count includes the register byte written first.
            I2cLayout::WriteMultipleBytes => {
                I2cFields { bus, addr, reg, length: count.map(|c| i32::from(c) - 1) }
            }
            I2cLayout::ReadSingleByte => I2cFields { bus, addr, reg: None, length: Some(1) },
            I2cLayout::ReadMultipleBytes => {
                I2cFields { bus, addr, reg: None, length: count.map(i32::from) }
            }
            I2cLayout::WriteReadMultipleBytes => {
                I2cFields { bus, addr, reg, length: count.map(i32::from) }
            }
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketTypeEntry {
    pub matcher: TypeIdMatcher,
    pub category: FrameCategory,
    pub name: &'static str,
    pub i2c: Option<I2cLayout>,
}

impl PacketTypeEntry {
    const fn fixed(id: u16, category: FrameCategory, name: &'static str) -> Self {
        Self { matcher: TypeIdMatcher::Fixed(id), category, name, i2c: None }
    }

    const fn interface(offset: u32, name: &'static str, i2c: Option<I2cLayout>) -> Self {
        let category = match i2c {
            Some(_) => FrameCategory::I2cCommand,
            None => FrameCategory::KnownCommand,
        };
        Self { matcher: TypeIdMatcher::InterfaceOffset(offset), category, name, i2c }
    }

    /// Sub-fields for this entry; empty unless it is an I2C command.
    pub fn extract(&self, payload: &[u8]) -> I2cFields {
        self.i2c.map_or(I2cFields::NONE, |layout| layout.extract(payload))
    }
}

/// Known packet types in priority order; the first matching entry wins.
///
/// Fixed ids come first as a block, so they win over any interface-relative
/// id that happens to collide with them.
pub static PACKET_TYPES: &[PacketTypeEntry] = &[
    PacketTypeEntry::fixed(fixed::ACK, FrameCategory::KnownResponse, "ACK"),
    PacketTypeEntry::fixed(fixed::NACK, FrameCategory::KnownResponse, "NACK"),
    PacketTypeEntry::fixed(fixed::GET_MODULE_STATUS, FrameCategory::KnownCommand, "GetModuleStatus"),
    PacketTypeEntry::fixed(fixed::KEEP_ALIVE, FrameCategory::KnownCommand, "KeepAlive"),
    PacketTypeEntry::fixed(fixed::FAIL_SAFE, FrameCategory::KnownCommand, "FailSafe"),
    PacketTypeEntry::fixed(
        fixed::SET_NEW_MODULE_ADDRESS,
        FrameCategory::KnownCommand,
        "SetNewModuleAddress",
    ),
    PacketTypeEntry::fixed(fixed::QUERY_INTERFACE, FrameCategory::KnownCommand, "QueryInterface"),
    PacketTypeEntry::fixed(
        fixed::SET_MODULE_LED_PATTERN,
        FrameCategory::KnownCommand,
        "SetModuleLEDPattern",
    ),
    PacketTypeEntry::fixed(
        fixed::GET_MODULE_LED_PATTERN,
        FrameCategory::KnownCommand,
        "GetModuleLEDPattern",
    ),
    PacketTypeEntry::fixed(fixed::DEBUG_LOG_LEVEL, FrameCategory::KnownCommand, "DebugLogLevel"),
    PacketTypeEntry::fixed(fixed::DISCOVERY, FrameCategory::KnownCommand, "Discovery"),
    PacketTypeEntry::interface(
        i2c_offset::WRITE_SINGLE_BYTE,
        "I2cWriteSingleByte",
        Some(I2cLayout::WriteSingleByte),
    ),
    PacketTypeEntry::interface(
        i2c_offset::WRITE_MULTIPLE_BYTES,
        "I2cWriteMultipleBytes",
        Some(I2cLayout::WriteMultipleBytes),
    ),
    PacketTypeEntry::interface(
        i2c_offset::READ_SINGLE_BYTE,
        "I2cReadSingleByte",
        Some(I2cLayout::ReadSingleByte),
    ),
    PacketTypeEntry::interface(
        i2c_offset::READ_MULTIPLE_BYTES,
        "I2cReadMultipleBytes",
        Some(I2cLayout::ReadMultipleBytes),
    ),
    PacketTypeEntry::interface(i2c_offset::READ_STATUS_QUERY, "I2cReadStatusQuery", None),
    PacketTypeEntry::interface(i2c_offset::WRITE_STATUS_QUERY, "I2cWriteStatusQuery", None),
    PacketTypeEntry::interface(
        i2c_offset::WRITE_READ_MULTIPLE_BYTES,
        "I2cWriteReadMultipleBytes",
        Some(I2cLayout::WriteReadMultipleBytes),
    ),
];

/// First table entry matching `type_id`, if any.
pub fn lookup(type_id: u16, interface_first_id: u32) -> Option<&'static PacketTypeEntry> {
    PACKET_TYPES.iter().find(|entry| entry.matcher.matches(type_id, interface_first_id))
}
