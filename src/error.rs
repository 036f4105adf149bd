//! Error types for the RHSP decoding pipeline.
//!
//! The decoding core never fails: framing faults are recovered silently and
//! unknown packet types fall through to generic categories. Errors only come
//! from the layers around it, such as reading capture files, loading
//! configuration, or pulling bytes from an asynchronous source.
//!
//! ## Error Categories
//!
//! - **File Errors**: Capture or configuration files that cannot be read
//! - **Capture Errors**: Malformed lines in a capture export
//! - **Config Errors**: Invalid decoder configuration
//! - **Source Errors**: Failures reported by a [`ByteSource`](crate::provider::ByteSource)
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use rhsp::DecodeError;
//!
//! let error = DecodeError::source_failed("serial port disconnected");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for decoder operations.
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Main error type for decoder operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("Cannot read file: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed capture line {line}: {details}")]
    Capture { line: usize, details: String },

    #[error("Invalid decoder configuration: {reason}")]
    Config { reason: String },

    #[error("Byte source failed: {reason}")]
    Source {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl DecodeError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            DecodeError::Source { .. } => true,
            DecodeError::Timeout { .. } => true,
            DecodeError::File { .. } => false,
            DecodeError::Capture { .. } => false,
            DecodeError::Config { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DecodeError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
                "Verify the path points at a capture export, not a directory",
            ],
            DecodeError::Capture { .. } => vec![
                "Export the serial channel as `time,value` text",
                "Check byte values are decimal or 0x-prefixed hex in 0..=255",
                "Remove trailing garbage from the export",
            ],
            DecodeError::Config { .. } => vec![
                "Check YAML syntax and field names",
                "Ensure channel_capacity is greater than zero",
                "Set interface_first_id to the hub's first I2C interface id",
            ],
            DecodeError::Source { .. } => vec![
                "Check the capture device is still connected",
                "Retry reading from the source",
            ],
            DecodeError::Timeout { .. } => vec![
                "Increase timeout duration",
                "Verify the byte source is still producing data",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        DecodeError::File { path, source }
    }

    /// Helper constructor for malformed capture lines (1-based line numbers).
    pub fn capture_error(line: usize, details: impl Into<String>) -> Self {
        DecodeError::Capture { line, details: details.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(reason: impl Into<String>) -> Self {
        DecodeError::Config { reason: reason.into() }
    }

    /// Helper constructor for byte source errors.
    pub fn source_failed(reason: impl Into<String>) -> Self {
        DecodeError::Source { reason: reason.into(), source: None }
    }

    /// Helper constructor for byte source errors with an underlying cause.
    pub fn source_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        DecodeError::Source { reason: reason.into(), source: Some(source) }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_yaml_ng::Error> for DecodeError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        DecodeError::Config { reason: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn error_messages_carry_their_context(
                reason in ".*",
                line in 1usize..100_000usize,
                details in ".*",
                duration_ms in 1u64..60000u64
            ) {
                let source_msg = DecodeError::source_failed(reason.clone()).to_string();
                prop_assert!(source_msg.contains(&reason));

                let capture_msg = DecodeError::capture_error(line, details.clone()).to_string();
                prop_assert!(capture_msg.contains(&line.to_string()));
                prop_assert!(capture_msg.contains(&details));

                let config_msg = DecodeError::config_error(reason.clone()).to_string();
                prop_assert!(config_msg.contains(&reason));

                let timeout = DecodeError::Timeout { duration: Duration::from_millis(duration_ms) };
                prop_assert!(!timeout.to_string().is_empty());
            }

            #[test]
            fn io_errors_convert_to_file_errors(reason in ".*") {
                let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, reason.clone());
                match DecodeError::from(io_err) {
                    DecodeError::File { source, .. } => {
                        prop_assert_eq!(source.to_string(), reason);
                    }
                    other => prop_assert!(false, "Expected File error, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<DecodeError>();

        let error = DecodeError::source_failed("test");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn recovery_methods_work() {
        let source_error = DecodeError::source_failed("port closed");
        let capture_error = DecodeError::capture_error(3, "bad value");
        let config_error = DecodeError::config_error("bad yaml");

        assert!(source_error.is_retryable());
        assert!(!capture_error.is_retryable());
        assert!(!config_error.is_retryable());
        assert!(DecodeError::Timeout { duration: Duration::from_secs(1) }.is_retryable());

        for error in [&source_error, &capture_error, &config_error] {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }

    #[test]
    fn source_chain_is_preserved() {
        let inner = std::io::Error::other("usb reset");
        let error = DecodeError::source_failed_with_source("read failed", Box::new(inner));

        let source = std::error::Error::source(&error).expect("source should be attached");
        assert_eq!(source.to_string(), "usb reset");
    }

    #[test]
    fn yaml_errors_become_config_errors() {
        let yaml_err = serde_yaml_ng::from_str::<u32>("not: [a number").unwrap_err();
        let error: DecodeError = yaml_err.into();
        assert!(matches!(error, DecodeError::Config { .. }));
    }
}
