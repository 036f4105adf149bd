//! Wire constants for the REV Hub Serial Protocol
//!
//! Packet layout (all multi-byte fields little-endian):
//!
//! ```text
//! 0    1    2..=3   4    5    6        7        8..=9    10..N-1   N-1
//! 'D'  'K'  length  dst  src  msgNum   refNum   typeId   payload   trailing
//! ```

/// Start-of-packet marker bytes
pub mod marker {
    pub const FIRST: u8 = 0x44; // 'D'
    pub const SECOND: u8 = 0x4B; // 'K'
}

/// Fixed byte offsets into an assembled packet
pub mod layout {
    pub const LENGTH_OFFSET: usize = 2;
    pub const HEADER_LEN: usize = 4;
    pub const MSG_NUM_OFFSET: usize = 6;
    pub const REF_NUM_OFFSET: usize = 7;
    pub const TYPE_ID_OFFSET: usize = 8;
    pub const PAYLOAD_OFFSET: usize = 10;
}

/// Type identifiers that are the same on every hub
pub mod fixed {
    pub const ACK: u16 = 0x7F01;
    pub const NACK: u16 = 0x7F02;
    pub const GET_MODULE_STATUS: u16 = 0x7F03;
    pub const KEEP_ALIVE: u16 = 0x7F04;
    pub const FAIL_SAFE: u16 = 0x7F05;
    pub const SET_NEW_MODULE_ADDRESS: u16 = 0x7F06;
    pub const QUERY_INTERFACE: u16 = 0x7F07;
    pub const SET_MODULE_LED_PATTERN: u16 = 0x7F0C;
    pub const GET_MODULE_LED_PATTERN: u16 = 0x7F0D;
    pub const DEBUG_LOG_LEVEL: u16 = 0x7F0E;
    pub const DISCOVERY: u16 = 0x7F0F;
}

/// Offsets from the interface's first id for the I2C bridge commands
pub mod i2c_offset {
    pub const WRITE_SINGLE_BYTE: u32 = 37;
    pub const WRITE_MULTIPLE_BYTES: u32 = 38;
    pub const READ_SINGLE_BYTE: u32 = 39;
    pub const READ_MULTIPLE_BYTES: u32 = 40;
    pub const READ_STATUS_QUERY: u32 = 41;
    pub const WRITE_STATUS_QUERY: u32 = 42;
    pub const WRITE_READ_MULTIPLE_BYTES: u32 = 52;
}
