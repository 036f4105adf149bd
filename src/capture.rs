//! Capture export reader
//!
//! Reads the text export of an async-serial capture, one byte per line:
//!
//! ```text
//! Time [s],Value
//! 0.000012500,0x44
//! 0.000034200,0x4B
//! ```
//!
//! A first line that does not start with a number is treated as a header.
//! Blank lines are skipped and columns after the value are ignored (exports
//! often append parity and framing-error flags). Values are `0x`-prefixed hex
//! or decimal. Each byte ends when the next one starts; the last byte ends
//! where it started.
//!
//! ## Usage Example
//!
//! ```rust
//! use rhsp::capture::CaptureReader;
//!
//! let reader: CaptureReader = "Time [s],Value\n0.5,0x44\n0.6,75\n".parse()?;
//! assert_eq!(reader.len(), 2);
//! assert_eq!(reader.events()[1].value, 0x4B);
//! # Ok::<(), rhsp::DecodeError>(())
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::types::{ByteEvent, Timestamp};
use crate::{DecodeError, Result};

/// In-memory capture with a read cursor.
#[derive(Debug, Clone)]
pub struct CaptureReader {
    events: Vec<ByteEvent>,
    position: usize,
    path: PathBuf,
}

impl CaptureReader {
    /// Read and parse a capture export from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DecodeError::file_error(path.to_path_buf(), e))?;

        let events = parse_events(&text)?;
        info!(path = %path.display(), bytes = events.len(), "opened capture export");

        Ok(Self { events, position: 0, path: path.to_path_buf() })
    }

    /// All parsed events, in capture order
    pub fn events(&self) -> &[ByteEvent] {
        &self.events
    }

    /// Number of bytes in the capture
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the capture holds no bytes
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Next unread event, advancing the cursor
    pub fn next_event(&mut self) -> Option<ByteEvent> {
        let event = self.events.get(self.position).copied()?;
        self.position += 1;
        Some(event)
    }

    /// Events not yet read
    pub fn remaining(&self) -> usize {
        self.events.len() - self.position
    }

    /// Path this capture was read from (`<memory>` for parsed strings)
    pub fn file_path(&self) -> &Path {
        &self.path
    }
}

impl FromStr for CaptureReader {
    type Err = DecodeError;

    fn from_str(text: &str) -> Result<Self> {
        let events = parse_events(text)?;
        Ok(Self { events, position: 0, path: PathBuf::from("<memory>") })
    }
}

fn parse_events(text: &str) -> Result<Vec<ByteEvent>> {
    let mut events: Vec<ByteEvent> = Vec::new();
    let mut header_checked = false;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let mut columns = line.split(',').map(str::trim);
        let time_col = columns.next().unwrap_or_default();

        if !header_checked {
            header_checked = true;
            if time_col.parse::<f64>().is_err() {
                debug!(line = line_no, header = line, "skipping capture header");
                continue;
            }
        }

        let secs: f64 = time_col.parse().map_err(|_| {
            DecodeError::capture_error(line_no, format!("invalid time '{}'", time_col))
        })?;
        if !secs.is_finite() {
            return Err(DecodeError::capture_error(line_no, format!("invalid time '{}'", time_col)));
        }

        let value_col = columns
            .next()
            .ok_or_else(|| DecodeError::capture_error(line_no, "missing value column"))?;
        let value = parse_byte(value_col).ok_or_else(|| {
            DecodeError::capture_error(line_no, format!("invalid byte value '{}'", value_col))
        })?;

        let start = Timestamp::from_secs_f64(secs);
        if let Some(previous) = events.last_mut() {
            previous.end = start.max(previous.start);
        }
        events.push(ByteEvent::new(value, start));
    }

    Ok(events)
}

fn parse_byte(text: &str) -> Option<u8> {
    let text = text.trim_matches('"');
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{BYTE_SPACING_NS, build_packet, capture_text};
    use anyhow::Result;

    #[test]
    fn parses_header_hex_and_decimal() -> Result<()> {
        let reader: CaptureReader = "Time [s],Value,Parity Error\n0.001,0x44,\n0.002,75,\n".parse()?;
        let events = reader.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].value, 0x44);
        assert_eq!(events[1].value, 0x4B);
        assert_eq!(events[0].start, Timestamp::from_nanos(1_000_000));
        assert_eq!(events[0].end, Timestamp::from_nanos(2_000_000));
        assert_eq!(events[1].end, events[1].start);
        assert_eq!(reader.file_path(), Path::new("<memory>"));
        Ok(())
    }

    #[test]
    fn headerless_and_blank_lines() -> Result<()> {
        let reader: CaptureReader = "\n0.5,0x0a\n\n0.75,\"0xFF\"\n".parse()?;
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.events()[1].value, 0xFF);
        Ok(())
    }

    #[test]
    fn cursor_walks_every_event() -> Result<()> {
        let mut reader: CaptureReader = capture_text(&build_packet(1, 0, 0x7F04, &[])).parse()?;
        let total = reader.len();
        assert_eq!(total, 11);

        let mut seen = 0;
        while let Some(event) = reader.next_event() {
            assert_eq!(event.start.as_nanos(), seen as u64 * BYTE_SPACING_NS);
            seen += 1;
        }
        assert_eq!(seen, total);
        assert_eq!(reader.remaining(), 0);
        Ok(())
    }

    #[test]
    fn malformed_lines_report_line_numbers() {
        let bad_value = "Time [s],Value\n0.1,0x44\n0.2,0x1FF\n".parse::<CaptureReader>();
        match bad_value {
            Err(DecodeError::Capture { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected capture error, got {other:?}"),
        }

        let missing = "0.1\n".parse::<CaptureReader>();
        assert!(matches!(missing, Err(DecodeError::Capture { line: 1, .. })));

        let bad_time = "0.1,1\nsoon,2\n".parse::<CaptureReader>();
        assert!(matches!(bad_time, Err(DecodeError::Capture { line: 2, .. })));
    }

    #[test]
    fn open_missing_file() {
        let result = CaptureReader::open("/nonexistent/capture.csv");
        assert!(matches!(result, Err(DecodeError::File { .. })));
    }
}
