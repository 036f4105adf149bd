//! Decoding adapter for byte event streams

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::assembler::DecodeStats;
use crate::config::DecoderConfig;
use crate::decoder::RhspDecoder;
use crate::types::{ByteEvent, DecodedRecord};

/// Extension trait to decode any stream of byte events
pub trait DecodeExt: Stream<Item = ByteEvent> {
    /// Decode the byte events into RHSP records
    ///
    /// Bytes that do not complete a packet are consumed without yielding;
    /// the stream ends when the inner stream ends. A trailing partial packet
    /// is dropped.
    fn decode_rhsp(self, config: DecoderConfig) -> Decode<Self>
    where
        Self: Sized,
    {
        Decode::new(self, config)
    }
}

impl<T: Stream<Item = ByteEvent>> DecodeExt for T {}

pin_project! {
    /// A stream combinator that turns byte events into decoded records
    pub struct Decode<S> {
        #[pin]
        stream: S,
        decoder: RhspDecoder,
    }
}

impl<S> Decode<S> {
    /// Create a new decoding stream
    pub fn new(stream: S, config: DecoderConfig) -> Self {
        Self { stream, decoder: RhspDecoder::new(config) }
    }

    /// Counters of the inner decoder
    pub fn stats(&self) -> DecodeStats {
        self.decoder.stats()
    }
}

impl<S: Stream<Item = ByteEvent>> Stream for Decode<S> {
    type Item = DecodedRecord;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(event) => {
                    if let Some(record) = this.decoder.feed_event(&event) {
                        return Poll::Ready(Some(record));
                    }
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
