//! Frame categories for decoded packets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a decoded packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameCategory {
    /// Command whose type id is not in the known table
    GenericCommand,
    /// Command with a known type id
    KnownCommand,
    /// Response whose type id is not in the known table
    GenericResponse,
    /// Response with a known type id (ACK/NACK)
    KnownResponse,
    /// I2C bridge command carrying transaction sub-fields
    I2cCommand,
}

impl FrameCategory {
    /// All categories, in declaration order.
    pub const ALL: [FrameCategory; 5] = [
        FrameCategory::GenericCommand,
        FrameCategory::KnownCommand,
        FrameCategory::GenericResponse,
        FrameCategory::KnownResponse,
        FrameCategory::I2cCommand,
    ];

    /// Frame-type key used by logic-analyzer result tables.
    pub const fn frame_type(self) -> &'static str {
        match self {
            FrameCategory::GenericCommand => "rhsp_generic_cmd",
            FrameCategory::KnownCommand => "rhsp_known_cmd",
            FrameCategory::GenericResponse => "rhsp_generic_resp",
            FrameCategory::KnownResponse => "rhsp_known_resp",
            FrameCategory::I2cCommand => "rhsp_i2c_cmd",
        }
    }

    /// Whether packets of this category answer another message.
    pub const fn is_response(self) -> bool {
        matches!(self, FrameCategory::GenericResponse | FrameCategory::KnownResponse)
    }
}

impl fmt::Display for FrameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.frame_type())
    }
}
