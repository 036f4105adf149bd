//! Byte source backed by a capture export

use std::path::Path;
use tracing::{debug, trace};

use crate::capture::CaptureReader;
use crate::provider::ByteSource;
use crate::types::ByteEvent;
use crate::Result;

/// Replays the bytes of a capture export in order
pub struct CaptureSource {
    reader: CaptureReader,
    name: String,
}

impl CaptureSource {
    /// Open a capture export from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = CaptureReader::open(path)?;
        Ok(Self::from_reader(reader))
    }

    /// Wrap an already parsed capture
    pub fn from_reader(reader: CaptureReader) -> Self {
        let name = reader.file_path().display().to_string();
        Self { reader, name }
    }

    /// Bytes still to be replayed
    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }
}

#[async_trait::async_trait]
impl ByteSource for CaptureSource {
    async fn next_byte(&mut self) -> Result<Option<ByteEvent>> {
        match self.reader.next_event() {
            Some(event) => {
                trace!(value = event.value, at = %event.start, "capture byte");
                Ok(Some(event))
            }
            None => {
                debug!("Reached end of capture {}", self.name);
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
