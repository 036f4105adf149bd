//! Driver spawns and manages the decoding task

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::assembler::DecodeStats;
use crate::config::DecoderConfig;
use crate::decoder::RhspDecoder;
use crate::provider::ByteSource;
use crate::types::DecodedRecord;

/// Result of spawning the driver task
pub struct DriverChannels {
    /// Receiver for decoded records, closed when the source ends
    pub records: mpsc::Receiver<DecodedRecord>,
    /// Latest assembler counters
    pub stats: watch::Receiver<DecodeStats>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns and manages the decoding task
///
/// The task owns both the [`ByteSource`] and the [`RhspDecoder`], so bytes
/// are decoded strictly in arrival order. Every record is delivered through a
/// bounded channel; a slow consumer applies backpressure to the source rather
/// than losing packets.
pub struct Driver;

impl Driver {
    /// Spawn the decode task for the given source
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S>(source: S, config: DecoderConfig) -> DriverChannels
    where
        S: ByteSource,
    {
        let (record_tx, record_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (stats_tx, stats_rx) = watch::channel(DecodeStats::default());

        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        let decoder = RhspDecoder::new(config);
        tokio::spawn(async move {
            Self::decode_task(source, decoder, record_tx, stats_tx, cancel_task).await;
        });

        DriverChannels { records: record_rx, stats: stats_rx, cancel }
    }

    /// Decode task - pulls bytes, emits records
    async fn decode_task<S>(
        mut source: S,
        mut decoder: RhspDecoder,
        record_tx: mpsc::Sender<DecodedRecord>,
        stats_tx: watch::Sender<DecodeStats>,
        cancel: CancellationToken,
    ) where
        S: ByteSource,
    {
        info!(
            source = source.name(),
            interface_first_id = decoder.config().interface_first_id,
            "Decode task started"
        );
        let max_errors = decoder.config().max_source_errors;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Decode task cancelled");
                    break;
                }
                result = source.next_byte() => result,
            };

            match result {
                Ok(Some(event)) => {
                    error_count = 0;

                    let Some(record) = decoder.feed_event(&event) else {
                        continue;
                    };

                    trace!(
                        category = %record.category,
                        msg_num = record.msg_num,
                        "Record {}",
                        decoder.stats().packets_completed
                    );
                    stats_tx.send_replace(decoder.stats());

                    let sent = tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("Decode task cancelled while delivering record");
                            break;
                        }
                        sent = record_tx.send(record) => sent,
                    };
                    if sent.is_err() {
                        debug!("Record receiver dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Byte source ended after {} bytes", decoder.stats().bytes_seen);
                    break;
                }
                Err(e) => {
                    // Source error - don't give up on transient failures
                    error_count += 1;
                    error!("Byte source error ({}/{}): {}", error_count, max_errors, e);

                    if error_count >= max_errors {
                        error!("Too many byte source errors, shutting down");
                        break;
                    }

                    // Exponential backoff: 10ms, 20ms, 40ms, ...
                    let backoff =
                        std::time::Duration::from_millis(10 * (1 << (error_count - 1).min(5)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        let stats = decoder.stats();
        stats_tx.send_replace(stats);
        if !decoder.assembler().is_idle() {
            warn!(
                pending = decoder.assembler().pending_len(),
                declared = ?decoder.assembler().declared_length(),
                "Stream stopped with a partial packet"
            );
        }
        info!(
            bytes_seen = stats.bytes_seen,
            bytes_discarded = stats.bytes_discarded,
            framing_violations = stats.framing_violations,
            packets = stats.packets_completed,
            "Decode task ended"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemorySource;
    use crate::test_utils::{build_packet, sample_stream};
    use crate::types::ByteEvent;
    use crate::{DecodeError, FrameCategory, Result};

    /// Fails a fixed number of times before yielding its bytes.
    struct FlakySource {
        failures_left: u32,
        inner: MemorySource,
    }

    #[async_trait::async_trait]
    impl ByteSource for FlakySource {
        async fn next_byte(&mut self) -> Result<Option<ByteEvent>> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(DecodeError::source_failed("simulated read error"));
            }
            self.inner.next_byte().await
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn delivers_every_record_then_closes() {
        let config = DecoderConfig::default().with_interface_first_id(0x1000);
        let source = MemorySource::from_bytes(&sample_stream(0x1000), 1_000);
        let mut channels = Driver::spawn(source, config);

        let mut categories = Vec::new();
        while let Some(record) = channels.records.recv().await {
            categories.push(record.category);
        }
        assert_eq!(
            categories,
            [FrameCategory::KnownCommand, FrameCategory::KnownResponse, FrameCategory::I2cCommand]
        );

        let stats = *channels.stats.borrow();
        assert_eq!(stats.packets_completed, 3);
        assert_eq!(stats.framing_violations, 1);
    }

    #[tokio::test]
    async fn small_channel_applies_backpressure_without_loss() {
        let config = DecoderConfig { channel_capacity: 1, ..DecoderConfig::default() };
        let mut bytes = Vec::new();
        for msg in 0..20u8 {
            bytes.extend(build_packet(msg, 0, 0x7F04, &[]));
        }
        let mut channels = Driver::spawn(MemorySource::from_bytes(&bytes, 1), config);

        let mut msgs = Vec::new();
        while let Some(record) = channels.records.recv().await {
            msgs.push(record.msg_num);
        }
        assert_eq!(msgs, (0..20u8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn retries_transient_source_errors() {
        let _ = tracing_subscriber::fmt::try_init();

        let source = FlakySource {
            failures_left: 2,
            inner: MemorySource::from_bytes(&build_packet(1, 0, 0x7F0F, &[]), 1),
        };
        let mut channels = Driver::spawn(source, DecoderConfig::default());

        let record = channels.records.recv().await.expect("record after retries");
        assert_eq!(record.packet_type_name, "Discovery");
        assert!(channels.records.recv().await.is_none());
    }

    #[tokio::test]
    async fn gives_up_after_max_errors() {
        let source = FlakySource {
            failures_left: u32::MAX,
            inner: MemorySource::default(),
        };
        let config = DecoderConfig { max_source_errors: 2, ..DecoderConfig::default() };
        let mut channels = Driver::spawn(source, config);

        let closed = tokio::time::timeout(std::time::Duration::from_secs(5), channels.records.recv())
            .await
            .expect("driver should stop after repeated errors");
        assert!(closed.is_none());
    }

    #[tokio::test]
    async fn cancellation_stops_the_task() {
        let bytes: Vec<u8> = std::iter::repeat_n(0x00, 10_000).collect();
        let mut channels = Driver::spawn(MemorySource::from_bytes(&bytes, 1), DecoderConfig::default());
        channels.cancel.cancel();

        let closed = tokio::time::timeout(std::time::Duration::from_secs(5), channels.records.recv())
            .await
            .expect("cancelled driver should close the channel");
        assert!(closed.is_none());
    }
}
