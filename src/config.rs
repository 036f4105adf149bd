//! Decoder configuration
//!
//! Settings load from YAML; every field is optional and falls back to its
//! default. Unknown keys are rejected so typos surface early.
//!
//! ```yaml
//! # first id reported by QueryInterface for the DEKA interface
//! interface_first_id: 4096
//! channel_capacity: 512
//! max_source_errors: 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{DecodeError, Result};

/// Default bound of the record channel between driver and connection.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default number of consecutive source errors tolerated by the driver.
pub const DEFAULT_MAX_SOURCE_ERRORS: u32 = 10;

/// Runtime configuration for decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Base offset added to 37..=52 to form the I2C bridge type ids
    pub interface_first_id: u32,

    /// Capacity of the bounded record channel
    pub channel_capacity: usize,

    /// Consecutive source errors before the driver stops
    pub max_source_errors: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            interface_first_id: 0,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_source_errors: DEFAULT_MAX_SOURCE_ERRORS,
        }
    }
}

impl DecoderConfig {
    /// Default configuration with the given interface base.
    pub fn with_interface_first_id(mut self, interface_first_id: u32) -> Self {
        self.interface_first_id = interface_first_id;
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: DecoderConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| DecodeError::file_error(path.to_path_buf(), e))?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!(path = %path.display(), ?config, "loaded decoder configuration");
        Ok(config)
    }

    /// Check settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(DecodeError::config_error("channel_capacity must be greater than zero"));
        }
        if self.max_source_errors == 0 {
            return Err(DecodeError::config_error("max_source_errors must be greater than zero"));
        }
        Ok(())
    }
}
