//! Encoding and request-parsing errors.

use crate::types::FeatureKind;
use thiserror::Error;

/// A requested mode has no register encoding.
///
/// Raised before any bus traffic, so it never leaves a device half-written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The raw value is outside the closed set the feature accepts.
    #[error("invalid {feature} mode: {value}")]
    InvalidMode {
        /// Feature the value was meant for.
        feature: FeatureKind,
        /// Offending raw value.
        value: u32,
    },
}

impl EncodingError {
    /// Create an invalid mode error.
    #[must_use]
    pub fn invalid(feature: FeatureKind, value: u32) -> Self {
        Self::InvalidMode { feature, value }
    }

    /// Feature the rejected value was meant for.
    pub fn feature(&self) -> FeatureKind {
        match self {
            Self::InvalidMode { feature, .. } => *feature,
        }
    }
}

/// A textual request could not be turned into a [`FeatureValue`](crate::FeatureValue).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("malformed {feature} request: {input:?}")]
    Malformed { feature: FeatureKind, input: String },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl RequestError {
    pub(crate) fn malformed(feature: FeatureKind, input: &str) -> Self {
        Self::Malformed {
            feature,
            input: input.to_string(),
        }
    }
}
