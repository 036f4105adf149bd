//! Decoded packet records

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use super::{FrameCategory, Timestamp};

/// Sub-fields of an embedded I2C transaction.
///
/// Every field is optional: `None` means "not applicable to this packet",
/// which is distinct from a value of zero. Addresses and registers serialize
/// as lowercase hex strings (`"0x1a"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct I2cFields {
    pub bus: Option<u8>,
    #[serde(default, with = "hex_byte")]
    pub addr: Option<u8>,
    #[serde(default, with = "hex_byte")]
    pub reg: Option<u8>,
    pub length: Option<i32>,
}

impl I2cFields {
    /// No sub-fields populated.
    pub const NONE: I2cFields = I2cFields { bus: None, addr: None, reg: None, length: None };

    /// Whether no sub-field is populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Device address as lowercase hex, e.g. `0x1a`.
    pub fn addr_hex(&self) -> Option<String> {
        self.addr.map(hex)
    }

    /// Register as lowercase hex, e.g. `0x0`.
    pub fn reg_hex(&self) -> Option<String> {
        self.reg.map(hex)
    }
}

fn hex(value: u8) -> String {
    format!("{value:#x}")
}

/// One classified RHSP packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRecord {
    pub category: FrameCategory,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub type_id: u16,
    pub packet_type_name: Cow<'static, str>,
    pub msg_num: u8,
    /// Message this packet answers; 0 when it references none
    pub ref_num: u8,
    #[serde(default)]
    pub i2c: I2cFields,
}

impl DecodedRecord {
    /// The type id as lowercase hex, e.g. `0x7f03`.
    pub fn cmd(&self) -> String {
        format!("{:#x}", self.type_id)
    }

    /// Whether this record is a response to another message.
    pub fn is_response(&self) -> bool {
        self.category.is_response()
    }

    /// Time from the start marker to the last byte.
    pub fn duration(&self) -> Duration {
        self.end_time.saturating_duration_since(self.start_time)
    }
}

impl fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            FrameCategory::GenericCommand => {
                write!(f, "RHSP cmd={} msg={}", self.cmd(), self.msg_num)
            }
            FrameCategory::KnownCommand => {
                write!(f, "RHSP {} msg={}", self.packet_type_name, self.msg_num)
            }
            FrameCategory::GenericResponse => {
                write!(f, "RHSP response ref={} (msg={})", self.ref_num, self.msg_num)
            }
            FrameCategory::KnownResponse => write!(
                f,
                "RHSP {} ref={} (msg={})",
                self.packet_type_name, self.ref_num, self.msg_num
            ),
            FrameCategory::I2cCommand => write!(
                f,
                "RHSP {} bus={} addr={} reg={} length={} msg={}",
                self.packet_type_name,
                Blank(self.i2c.bus),
                Blank(self.i2c.addr_hex()),
                Blank(self.i2c.reg_hex()),
                Blank(self.i2c.length),
                self.msg_num
            ),
        }
    }
}

/// Renders `None` as nothing.
struct Blank<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Blank<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => Ok(()),
        }
    }
}

mod hex_byte {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&super::hex(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|t| {
            let digits = t.strip_prefix("0x").unwrap_or(&t);
            u8::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
