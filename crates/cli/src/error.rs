//! Error types for touchmodectl

use thiserror::Error;
use touch_mode_engine::ConfigError;
use touch_mode_protocol::RequestError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0} script step(s) failed")]
    StepsFailed(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DeviceNotFound(_) => 2,
            Self::InvalidRequest(_) | Self::Script { .. } => 3,
            Self::Config(_) | Self::YamlError(_) => 4,
            Self::StepsFailed(_) => 5,
            Self::IoError(_) => 1,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DeviceNotFound(_) => "DeviceNotFound",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::Script { .. } => "ScriptError",
            Self::Config(_) => "ConfigError",
            Self::StepsFailed(_) => "StepsFailed",
            Self::IoError(_) => "IoError",
            Self::YamlError(_) => "YamlError",
        }
    }
}
