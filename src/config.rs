//! Decoder configuration
//!
//! Defaults match what official clients send; hosts that accept development
//! builds can load overrides from YAML:
//!
//! ```yaml
//! max_payload_size: 8128
//! string_limits: truncate
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::wire::StringLimitPolicy;
use crate::{Result, TelemetryError};

/// Largest upload official clients produce. Older builds capped at 4032.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 8128;

/// Limits applied to every decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Payloads longer than this many bytes are refused unparsed.
    pub max_payload_size: usize,
    /// Handling of strings longer than their field allows.
    pub string_limits: StringLimitPolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            string_limits: StringLimitPolicy::default(),
        }
    }
}

impl DecoderConfig {
    /// Default configuration with a different size cap.
    pub fn with_max_payload_size(max_payload_size: usize) -> Self {
        Self { max_payload_size, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_payload_size == 0 {
            return Err(TelemetryError::config("max_payload_size must be greater than zero"));
        }
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: DecoderConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TelemetryError::config(format!("YAML parsing failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TelemetryError::file_error(path.to_path_buf(), e))?;

        let config = Self::from_yaml_str(&yaml)?;
        debug!(path = %path.display(), ?config, "Loaded decoder configuration");
        Ok(config)
    }
}
