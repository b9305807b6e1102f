//! Error types for the reconciliation engine.

use std::path::PathBuf;
use thiserror::Error;
use touch_mode_protocol::EncodingError;
use touch_transport::TransportError;

/// Errors surfaced by a reconciliation step.
///
/// None of these is fatal to the device: a later request or resume retries
/// from the recorded desired state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The value has no encoding on this controller. No I/O was attempted.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The bus rejected a step; applied state was left untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The controller was attached without this capability.
    #[error("{0} is not supported by this controller")]
    Unsupported(&'static str),

    /// A direct operation was attempted with the controller powered off.
    #[error("controller is powered off")]
    PoweredOff,
}

impl ReconcileError {
    /// Whether re-issuing the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors loading device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown config format for {0} (expected .yaml, .yml or .json)")]
    UnknownFormat(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_mode_protocol::FeatureKind;

    #[test]
    fn test_retryable_only_for_transport() {
        let err: ReconcileError = TransportError::Disconnected.into();
        assert!(err.is_retryable());

        let err: ReconcileError = EncodingError::invalid(FeatureKind::Edge, 9).into();
        assert!(!err.is_retryable());
        assert!(!ReconcileError::PoweredOff.is_retryable());
    }

    #[test]
    fn test_display_is_transparent() {
        let err: ReconcileError = TransportError::Disconnected.into();
        assert_eq!(err.to_string(), "device disconnected");
        assert_eq!(
            ReconcileError::Unsupported("pitch").to_string(),
            "pitch is not supported by this controller"
        );
    }
}
