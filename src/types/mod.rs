//! Core types for RHSP packet decoding.
//!
//! ## Architecture
//!
//! - [`ByteEvent`] is one timestamped byte from the serial capture
//! - [`AssembledPacket`] is a framed packet buffer with its start/end times
//! - [`DecodedRecord`] is the classified, labeled result for one packet
//! - [`FrameCategory`] is the coarse classification of a record
//! - [`protocol`] holds the wire constants (markers, offsets, type ids)
//!
//! ## Usage Example
//!
//! ```rust
//! use rhsp::types::{AssembledPacket, Timestamp};
//!
//! let packet = AssembledPacket::new(
//!     vec![0x44, 0x4B, 0x05, 0x00, 0xAA],
//!     Timestamp::from_nanos(1_000),
//!     Timestamp::from_nanos(5_000),
//! );
//! assert_eq!(packet.declared_length(), Some(5));
//! assert_eq!(packet.len(), 5);
//! ```

mod byte_event;
mod category;
mod packet;
pub mod protocol;
mod record;
mod timestamp;

// Re-export all public types
pub use byte_event::ByteEvent;
pub use category::FrameCategory;
pub use packet::AssembledPacket;
pub use record::{DecodedRecord, I2cFields};
pub use timestamp::Timestamp;
