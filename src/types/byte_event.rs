//! Timestamped input bytes

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// One byte as delivered by the upstream serial capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteEvent {
    /// Raw byte value
    pub value: u8,
    /// When the byte started arriving
    pub start: Timestamp,
    /// When the byte finished arriving (equal to `start` when unknown)
    pub end: Timestamp,
}

impl ByteEvent {
    /// Create an event whose start and end coincide.
    pub fn new(value: u8, at: Timestamp) -> Self {
        Self { value, start: at, end: at }
    }

    /// Create an event spanning `start..end`.
    pub fn spanning(value: u8, start: Timestamp, end: Timestamp) -> Self {
        Self { value, start, end }
    }
}
