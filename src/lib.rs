//! Streaming decoder for the REV Hub Serial Protocol (RHSP).
//!
//! Turns a stream of individually timestamped serial bytes into classified
//! packet records: ACK/NACK responses, module commands, I2C bridge
//! transactions and generic commands or responses.
//!
//! # Features
//!
//! - **Framing**: Byte-at-a-time `D K` packet assembler with silent recovery
//! - **Classification**: Ordered packet type table, including I2C bridge ids
//!   relative to a configurable interface base
//! - **Capture Replay**: Decode text exports of async-serial captures
//! - **Async Pipeline**: Background decode task exposed as a `Stream`
//!
//! ## Example (synchronous)
//!
//! ```rust
//! use rhsp::{DecoderConfig, RhspDecoder, Timestamp};
//!
//! let mut decoder = RhspDecoder::new(DecoderConfig::default().with_interface_first_id(4096));
//! let bytes = [0x44, 0x4B, 0x0B, 0x00, 0x02, 0x00, 0x05, 0x00, 0x04, 0x7F, 0x22];
//!
//! for (i, b) in bytes.iter().enumerate() {
//!     if let Some(record) = decoder.feed(*b, Timestamp::from_nanos(i as u64 * 21_700)) {
//!         println!("{record}"); // RHSP KeepAlive msg=5
//!     }
//! }
//! ```
//!
//! ## Example (capture replay)
//!
//! ```rust,no_run
//! use rhsp::{DecoderConfig, Rhsp};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DecoderConfig::from_file("rhsp.yaml")?;
//!     let mut records = Rhsp::open("capture.csv", config).await?;
//!
//!     while let Some(record) = records.next().await {
//!         println!("{} {}", record.start_time, record);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Decoding core
pub mod assembler;
pub mod classifier;
pub mod config;
mod decoder;

// Stream-based decoding architecture
pub mod capture;
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod stream;

// Core exports
pub use error::*;
pub use types::*;

pub use assembler::{AssemblerState, DecodeStats, PacketAssembler};
pub use classifier::{Classification, classify, classify_packet};
pub use config::DecoderConfig;
pub use decoder::RhspDecoder;

// Main API exports
pub use capture::CaptureReader;
pub use connection::DecoderConnection;
pub use provider::ByteSource;
pub use stream::DecodeExt;

/// Unified entry point for RHSP decoding.
///
/// # Examples
///
/// ```rust,no_run
/// use rhsp::{DecoderConfig, Rhsp};
///
/// #[tokio::main]
/// async fn main() -> rhsp::Result<()> {
///     let mut connection = Rhsp::open("capture.csv", DecoderConfig::default()).await?;
///     while let Some(record) = connection.next_record().await {
///         println!("{record}");
///     }
///     Ok(())
/// }
/// ```
pub struct Rhsp;

impl Rhsp {
    /// Open a capture export and decode it on a background task.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The file does not exist or is not readable
    /// - A line of the export is malformed
    pub async fn open<P: AsRef<std::path::Path>>(
        path: P,
        config: DecoderConfig,
    ) -> Result<DecoderConnection> {
        DecoderConnection::open(path, config).await
    }

    /// Create a synchronous decoder for feeding bytes by hand.
    pub fn decoder(config: DecoderConfig) -> RhspDecoder {
        RhspDecoder::new(config)
    }
}
