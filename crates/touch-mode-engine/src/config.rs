//! Device configuration: which controllers exist, their family and the
//! features each was built with.
//!
//! ```yaml
//! devices:
//!   - name: primary
//!     family: focaltech
//!     settle_ms: 20
//!     capabilities:
//!       edge_ctrl: true
//!       interpolation_ctrl: true
//! ```

use crate::capabilities::CapabilityFlags;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use touch_mode_protocol::ControllerFamily;

/// Upper bound on the settle delay; anything longer stalls the device lock.
pub const MAX_SETTLE_MS: u64 = 1_000;

fn default_settle_ms() -> u64 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub name: String,
    pub family: ControllerFamily,
    #[serde(default)]
    pub capabilities: CapabilityFlags,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl DeviceConfig {
    pub fn new(name: impl Into<String>, family: ControllerFamily) -> Self {
        Self {
            name: name.into(),
            family,
            capabilities: CapabilityFlags::default(),
            settle_ms: default_settle_ms(),
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: CapabilityFlags) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty name or an oversized
    /// settle delay.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("device name must not be empty"));
        }
        if self.settle_ms > MAX_SETTLE_MS {
            return Err(ConfigError::invalid(format!(
                "device {}: settle_ms {} exceeds {MAX_SETTLE_MS}",
                self.name, self.settle_ms
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    pub devices: Vec<DeviceConfig>,
}

impl FleetConfig {
    /// Load from a `.yaml`, `.yml` or `.json` file and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, has an unknown
    /// extension, fails to parse, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] on a parse or validation failure.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] on a parse or validation failure.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when there are no devices, a device
    /// is invalid, or two devices share a name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::invalid("at least one device is required"));
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            device.validate()?;
            if !seen.insert(device.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "duplicate device name: {}",
                    device.name
                )));
            }
        }
        Ok(())
    }

    pub fn device(&self, name: &str) -> Option<&DeviceConfig> {
        self.devices.iter().find(|device| device.name == name)
    }
}
