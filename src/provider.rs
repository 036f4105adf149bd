//! Byte source trait for the async pipeline

use crate::Result;
use crate::types::ByteEvent;

/// Trait for timestamped byte sources
///
/// Sources abstract over where bytes come from (capture exports, in-memory
/// buffers, live ports) and handle their own timing internally.
#[async_trait::async_trait]
pub trait ByteSource: Send + 'static {
    /// Get the next byte
    ///
    /// Returns:
    /// - `Ok(Some(event))` - Byte available
    /// - `Ok(None)` - Stream ended (normal termination)
    /// - `Err(e)` - Error occurred; the driver may retry
    async fn next_byte(&mut self) -> Result<Option<ByteEvent>>;

    /// Short human-readable name for logs
    fn name(&self) -> &str;
}
