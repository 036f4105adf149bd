//! Decode an async-serial capture export and print every RHSP packet
//!
//! Usage:
//!
//! ```text
//! cargo run --example decode_capture -- capture.csv [rhsp.yaml]
//! RUST_LOG=rhsp=debug cargo run --example decode_capture -- capture.csv
//! ```

use anyhow::{Context, Result, bail};
use futures::StreamExt;
use rhsp::{DecoderConfig, Rhsp};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(capture) = args.next() else {
        bail!("usage: decode_capture <capture.csv> [config.yaml]");
    };

    let config = match args.next() {
        Some(path) => DecoderConfig::from_file(&path)
            .with_context(|| format!("loading decoder config from {path}"))?,
        None => DecoderConfig::default(),
    };
    info!(interface_first_id = config.interface_first_id, "decoder configured");

    let mut connection = Rhsp::open(&capture, config)
        .await
        .with_context(|| format!("opening capture {capture}"))?;

    let mut count = 0usize;
    while let Some(record) = connection.next().await {
        count += 1;
        println!(
            "{:>14}  {:>10?}  {:<18}  {}",
            record.start_time.to_string(),
            record.duration(),
            record.category.frame_type(),
            record
        );
    }

    let stats = connection.stats();
    info!(
        records = count,
        bytes = stats.bytes_seen,
        discarded = stats.bytes_discarded,
        framing_violations = stats.framing_violations,
        "capture decoded"
    );
    Ok(())
}
