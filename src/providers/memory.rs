//! In-memory byte source

use std::collections::VecDeque;

use crate::provider::ByteSource;
use crate::types::{ByteEvent, Timestamp};
use crate::Result;

/// Yields a fixed list of byte events, then ends
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    events: VecDeque<ByteEvent>,
}

impl MemorySource {
    /// Source over prepared events
    pub fn new(events: Vec<ByteEvent>) -> Self {
        Self { events: events.into() }
    }

    /// Source over raw bytes spaced `spacing_ns` apart, starting at zero
    pub fn from_bytes(bytes: &[u8], spacing_ns: u64) -> Self {
        let events = bytes
            .iter()
            .enumerate()
            .map(|(i, &value)| ByteEvent::new(value, Timestamp::from_nanos(i as u64 * spacing_ns)))
            .collect();
        Self { events }
    }

    /// Events not yet yielded
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait::async_trait]
impl ByteSource for MemorySource {
    async fn next_byte(&mut self) -> Result<Option<ByteEvent>> {
        Ok(self.events.pop_front())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_bytes_spaces_timestamps() {
        let mut source = MemorySource::from_bytes(&[1, 2, 3], 100);
        assert_eq!(source.remaining(), 3);

        let mut starts = Vec::new();
        while let Some(event) = source.next_byte().await.unwrap() {
            starts.push(event.start.as_nanos());
        }
        assert_eq!(starts, [0, 100, 200]);
    }
}
