//! Record stream over a running decode task

use futures::{Stream, StreamExt};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::assembler::DecodeStats;
use crate::config::DecoderConfig;
use crate::driver::Driver;
use crate::provider::ByteSource;
use crate::providers::CaptureSource;
use crate::types::DecodedRecord;
use crate::{DecodeError, Result};

/// Decoded records from a byte source, decoded on a background task.
///
/// Implements [`Stream`]; the stream ends when the source does. Dropping the
/// connection cancels the task.
pub struct DecoderConnection {
    /// Record receiver
    records: ReceiverStream<DecodedRecord>,

    /// Latest assembler counters
    stats: watch::Receiver<DecodeStats>,

    /// Configuration the task was started with
    config: DecoderConfig,

    /// Source name for logs
    source_name: String,

    /// Cancellation token for stopping the task
    cancel: CancellationToken,
}

impl DecoderConnection {
    /// Open a capture export and start decoding it.
    pub async fn open<P: AsRef<Path>>(path: P, config: DecoderConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening capture: {}", path.display());

        config.validate()?;
        let source = CaptureSource::open(path)?;
        Self::from_source(source, config)
    }

    /// Start decoding an arbitrary byte source.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_source<S: ByteSource>(source: S, config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        let source_name = source.name().to_string();

        let channels = Driver::spawn(source, config.clone());
        info!(source = %source_name, "Decoder connection opened");

        Ok(Self {
            records: ReceiverStream::new(channels.records),
            stats: channels.stats,
            config,
            source_name,
            cancel: channels.cancel,
        })
    }

    /// Next record, or `None` once the source has ended.
    pub async fn next_record(&mut self) -> Option<DecodedRecord> {
        self.records.next().await
    }

    /// Next record, failing if none arrives within `duration`.
    pub async fn next_record_timeout(&mut self, duration: Duration) -> Result<Option<DecodedRecord>> {
        tokio::time::timeout(duration, self.next_record())
            .await
            .map_err(|_| DecodeError::Timeout { duration })
    }

    /// Drain the remaining records until the source ends.
    pub async fn collect_remaining(&mut self) -> Vec<DecodedRecord> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await {
            records.push(record);
        }
        records
    }

    /// Latest assembler counters reported by the task
    pub fn stats(&self) -> DecodeStats {
        *self.stats.borrow()
    }

    /// Configuration in use
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Name of the underlying source
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Stop the decode task; already queued records can still be read.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Stream for DecoderConnection {
    type Item = DecodedRecord;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.records).poll_next(cx)
    }
}

impl Drop for DecoderConnection {
    fn drop(&mut self) {
        debug!("Dropping decoder connection for {}", self.source_name);
        self.cancel.cancel();
    }
}
