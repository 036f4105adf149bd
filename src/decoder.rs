//! Assembler and classifier combined

use tracing::trace;

use crate::assembler::{DecodeStats, PacketAssembler};
use crate::classifier::classify_packet;
use crate::config::DecoderConfig;
use crate::types::{ByteEvent, DecodedRecord, Timestamp};

/// Synchronous byte-in, record-out decoder for one serial channel.
///
/// ```rust
/// use rhsp::{DecoderConfig, FrameCategory, RhspDecoder, Timestamp};
///
/// let mut decoder = RhspDecoder::new(DecoderConfig::default());
/// let bytes = [0x44, 0x4B, 0x0B, 0x00, 0x00, 0x00, 0x01, 0x00, 0x03, 0x7F, 0x00];
///
/// let mut records = Vec::new();
/// for (i, b) in bytes.iter().enumerate() {
///     records.extend(decoder.feed(*b, Timestamp::from_nanos(i as u64)));
/// }
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].category, FrameCategory::KnownCommand);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RhspDecoder {
    assembler: PacketAssembler,
    config: DecoderConfig,
}

impl RhspDecoder {
    /// Create a decoder with an idle assembler
    pub fn new(config: DecoderConfig) -> Self {
        Self { assembler: PacketAssembler::new(), config }
    }

    /// Feed one byte; returns a record when it completes a packet.
    pub fn feed(&mut self, byte: u8, at: Timestamp) -> Option<DecodedRecord> {
        self.feed_event(&ByteEvent::new(byte, at))
    }

    /// Feed one byte event; returns a record when it completes a packet.
    pub fn feed_event(&mut self, event: &ByteEvent) -> Option<DecodedRecord> {
        let packet = self.assembler.feed_event(event)?;
        let record = classify_packet(&packet, self.config.interface_first_id);
        trace!(%record, "decoded record");
        Some(record)
    }

    /// Decode every event in order, collecting the records.
    pub fn decode_all<'a, I>(&mut self, events: I) -> Vec<DecodedRecord>
    where
        I: IntoIterator<Item = &'a ByteEvent>,
    {
        events.into_iter().filter_map(|event| self.feed_event(event)).collect()
    }

    /// Drop any partial packet
    pub fn reset(&mut self) {
        self.assembler.reset();
    }

    /// Assembler counters
    pub fn stats(&self) -> DecodeStats {
        self.assembler.stats()
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Underlying assembler, for inspecting partial state
    pub fn assembler(&self) -> &PacketAssembler {
        &self.assembler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameCategory;
    use crate::test_utils::{byte_events, sample_stream};

    #[test]
    fn end_to_end_get_module_status() {
        let bytes = [0x44, 0x4B, 0x0B, 0x00, 0x00, 0x00, 0x01, 0x00, 0x03, 0x7F, 0x00];
        let mut decoder = RhspDecoder::default();

        let records = decoder.decode_all(&byte_events(&bytes));
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.category, FrameCategory::KnownCommand);
        assert_eq!(record.packet_type_name, "GetModuleStatus");
        assert_eq!(record.msg_num, 1);
        assert_eq!(record.ref_num, 0);
        assert!(record.i2c.is_empty());
    }

    #[test]
    fn sample_stream_decodes_in_order() {
        let base = 0x1000;
        let config = DecoderConfig::default().with_interface_first_id(u32::from(base));
        let mut decoder = RhspDecoder::new(config);

        let records = decoder.decode_all(&byte_events(&sample_stream(base)));
        let names: Vec<_> = records.iter().map(|r| r.packet_type_name.as_ref()).collect();
        assert_eq!(names, ["KeepAlive", "ACK", "I2cReadMultipleBytes"]);

        let i2c = &records[2];
        assert_eq!(i2c.i2c.addr_hex().as_deref(), Some("0x1a"));
        assert_eq!(i2c.i2c.length, Some(6));
        assert!(records[0].start_time < records[1].start_time);

        let stats = decoder.stats();
        assert_eq!(stats.packets_completed, 3);
        assert_eq!(stats.framing_violations, 1);
        assert_eq!(stats.bytes_discarded, 3);
    }

    #[test]
    fn base_changes_classification() {
        let bytes = crate::test_utils::build_packet(1, 0, 137, &[0, 0x50]);

        let mut with_base = RhspDecoder::new(DecoderConfig::default().with_interface_first_id(100));
        let records = with_base.decode_all(&byte_events(&bytes));
        assert_eq!(records[0].category, FrameCategory::I2cCommand);

        let mut without = RhspDecoder::default();
        let records = without.decode_all(&byte_events(&bytes));
        assert_eq!(records[0].category, FrameCategory::GenericCommand);
    }

    #[test]
    fn reset_abandons_partial_packet() {
        let mut decoder = RhspDecoder::default();
        assert!(decoder.feed(0x44, Timestamp::ZERO).is_none());
        assert!(!decoder.assembler().is_idle());

        decoder.reset();
        assert!(decoder.assembler().is_idle());
        assert_eq!(decoder.stats().resets, 1);
    }
}
