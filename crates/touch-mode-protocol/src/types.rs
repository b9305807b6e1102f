//! Feature-mode value types shared by every controller family.
//!
//! Constructors taking raw codes validate against the closed set each
//! feature accepts and fail with [`EncodingError::InvalidMode`]. Once a value
//! exists it is always encodable.

use crate::error::{EncodingError, RequestError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Register value written for any non-zero sample request.
pub const SAMPLE_ACTIVE_VALUE: u8 = 10;

/// Highest pitch configuration index.
pub const MAX_PITCH: u8 = 4;

/// Highest stowed mode value.
pub const MAX_STOWED: u8 = 1;

/// Controller feature slot tracked by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureKind {
    #[serde(rename = "edge")]
    Edge,
    #[serde(rename = "interpolation", alias = "report_rate")]
    ReportRate,
    #[serde(rename = "sample")]
    Sample,
    #[serde(rename = "stowed")]
    Stowed,
    #[serde(rename = "pocket_mode", alias = "pocket")]
    Pocket,
    #[serde(rename = "pitch")]
    Pitch,
}

impl FeatureKind {
    /// Every feature slot, in declaration order.
    pub const ALL: [FeatureKind; 6] = [
        FeatureKind::Edge,
        FeatureKind::ReportRate,
        FeatureKind::Sample,
        FeatureKind::Stowed,
        FeatureKind::Pocket,
        FeatureKind::Pitch,
    ];

    /// Order in which desired state is written back after a resume.
    ///
    /// Stowed is absent: resume always leaves the controller out of stowed mode.
    pub const REPLAY_ORDER: [FeatureKind; 5] = [
        FeatureKind::Pocket,
        FeatureKind::Pitch,
        FeatureKind::ReportRate,
        FeatureKind::Edge,
        FeatureKind::Sample,
    ];

    /// Attribute-style name of the feature.
    pub fn name(self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::ReportRate => "interpolation",
            Self::Sample => "sample",
            Self::Stowed => "stowed",
            Self::Pocket => "pocket_mode",
            Self::Pitch => "pitch",
        }
    }

    /// Look a feature up by name, accepting the historical aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "edge" => Some(Self::Edge),
            "interpolation" | "report_rate" => Some(Self::ReportRate),
            "sample" => Some(Self::Sample),
            "stowed" => Some(Self::Stowed),
            "pocket_mode" | "pocket" => Some(Self::Pocket),
            "pitch" => Some(Self::Pitch),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureKind {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| RequestError::UnknownFeature(s.trim().to_string()))
    }
}

/// Edge suppression width.
///
/// The `Normal*` variants keep suppression active in portrait as well and are
/// never widened by rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSuppression {
    #[default]
    Default,
    Small,
    Big,
    NormalDefault,
    NormalSmall,
    NormalBig,
}

impl EdgeSuppression {
    /// Decode the request code used by the edge attribute
    /// (0 default, 1 big, 2 small, 10..=12 normal variants).
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidMode`] for any other code.
    pub fn from_request_code(code: u32) -> Result<Self, EncodingError> {
        match code {
            0 => Ok(Self::Default),
            1 => Ok(Self::Big),
            2 => Ok(Self::Small),
            10 => Ok(Self::NormalDefault),
            11 => Ok(Self::NormalSmall),
            12 => Ok(Self::NormalBig),
            other => Err(EncodingError::invalid(FeatureKind::Edge, other)),
        }
    }

    /// Suppression level index before rotation adjustment.
    pub fn level(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Small => 1,
            Self::Big => 2,
            Self::NormalDefault => 4,
            Self::NormalSmall => 5,
            Self::NormalBig => 6,
        }
    }

    /// Byte reported back to userspace and sent to command-based controllers.
    pub fn raw_byte(self) -> u8 {
        match self {
            Self::Default => 0x00,
            Self::Small => 0x40,
            Self::Big => 0x80,
            Self::NormalDefault => 0x08,
            Self::NormalSmall => 0x48,
            Self::NormalBig => 0x88,
        }
    }

    pub fn is_normal(self) -> bool {
        matches!(self, Self::NormalDefault | Self::NormalSmall | Self::NormalBig)
    }
}

/// Panel rotation as seen by the touch firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    Deg0,
    Cw90,
    Ccw90,
}

impl Rotation {
    /// Decode the display HAL rotation code (0, 1 = 90°, 3 = 270°).
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidMode`] for 180° and unknown codes.
    pub fn from_request_code(code: u32) -> Result<Self, EncodingError> {
        match code {
            0 => Ok(Self::Deg0),
            1 => Ok(Self::Cw90),
            3 => Ok(Self::Ccw90),
            other => Err(EncodingError::invalid(FeatureKind::Edge, other)),
        }
    }

    /// Rotation register value (0 portrait, 1 left, 2 right).
    pub fn register(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Ccw90 => 1,
            Self::Cw90 => 2,
        }
    }

    /// Rotation byte as reported back to userspace.
    pub fn raw_byte(self) -> u8 {
        match self {
            Self::Deg0 => 0x00,
            Self::Ccw90 => 0x40,
            Self::Cw90 => 0x80,
        }
    }

    pub fn is_landscape(self) -> bool {
        !matches!(self, Self::Deg0)
    }
}

/// Edge suppression request: width plus the rotation it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EdgeMode {
    pub suppression: EdgeSuppression,
    pub rotation: Rotation,
}

impl EdgeMode {
    pub fn new(suppression: EdgeSuppression, rotation: Rotation) -> Self {
        Self {
            suppression,
            rotation,
        }
    }

    /// Suppression level actually sent to the controller.
    ///
    /// Landscape needs a wider dead zone than portrait, so a non-normal level
    /// is raised by one step whenever the panel is rotated.
    pub fn effective_level(self) -> u8 {
        let level = self.suppression.level();
        if self.rotation.is_landscape() && level < 3 {
            level.saturating_add(1)
        } else {
            level
        }
    }
}

/// Touch report rate, selected through the interpolation attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRate {
    #[default]
    Hz120,
    Hz240,
    Hz360,
}

impl ReportRate {
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidMode`] for rates the panel cannot run.
    pub fn from_hz(hz: u32) -> Result<Self, EncodingError> {
        match hz {
            120 => Ok(Self::Hz120),
            240 => Ok(Self::Hz240),
            360 => Ok(Self::Hz360),
            other => Err(EncodingError::invalid(FeatureKind::ReportRate, other)),
        }
    }

    pub fn hz(self) -> u32 {
        match self {
            Self::Hz120 => 120,
            Self::Hz240 => 240,
            Self::Hz360 => 360,
        }
    }
}

/// Sample (active scan) mode. Every non-zero request means "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMode {
    #[default]
    Off,
    Active,
}

impl SampleMode {
    pub fn from_raw(raw: u32) -> Self {
        if raw >= 1 { Self::Active } else { Self::Off }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Active => SAMPLE_ACTIVE_VALUE,
        }
    }
}

/// Pocket (proximity) mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PocketMode {
    #[default]
    Off,
    On,
}

impl PocketMode {
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidMode`] for anything but 0 or 1.
    pub fn from_raw(raw: u32) -> Result<Self, EncodingError> {
        match raw {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(EncodingError::invalid(FeatureKind::Pocket, other)),
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub fn raw(self) -> u8 {
        u8::from(self.is_on())
    }
}

/// Touch pitch configuration index, `0..=MAX_PITCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PitchMode(u8);

impl PitchMode {
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidMode`] above [`MAX_PITCH`].
    pub fn new(raw: u32) -> Result<Self, EncodingError> {
        u8::try_from(raw)
            .ok()
            .filter(|v| *v <= MAX_PITCH)
            .map(Self)
            .ok_or_else(|| EncodingError::invalid(FeatureKind::Pitch, raw))
    }

    pub fn raw(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PitchMode {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(u32::from(value))
    }
}

impl From<PitchMode> for u8 {
    fn from(value: PitchMode) -> Self {
        value.0
    }
}

/// Stowed (face-down, screen-off) mode, `0..=MAX_STOWED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StowedMode(u8);

impl StowedMode {
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidMode`] above [`MAX_STOWED`].
    pub fn new(raw: u32) -> Result<Self, EncodingError> {
        u8::try_from(raw)
            .ok()
            .filter(|v| *v <= MAX_STOWED)
            .map(Self)
            .ok_or_else(|| EncodingError::invalid(FeatureKind::Stowed, raw))
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn is_enabled(self) -> bool {
        self.0 != 0
    }
}

impl TryFrom<u8> for StowedMode {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(u32::from(value))
    }
}

impl From<StowedMode> for u8 {
    fn from(value: StowedMode) -> Self {
        value.0
    }
}

/// A requested value for exactly one feature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "feature", content = "value", rename_all = "snake_case")]
pub enum FeatureValue {
    Edge(EdgeMode),
    #[serde(rename = "interpolation")]
    ReportRate(ReportRate),
    Sample(SampleMode),
    Stowed(StowedMode),
    #[serde(rename = "pocket_mode")]
    Pocket(PocketMode),
    Pitch(PitchMode),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            Self::Edge(_) => FeatureKind::Edge,
            Self::ReportRate(_) => FeatureKind::ReportRate,
            Self::Sample(_) => FeatureKind::Sample,
            Self::Stowed(_) => FeatureKind::Stowed,
            Self::Pocket(_) => FeatureKind::Pocket,
            Self::Pitch(_) => FeatureKind::Pitch,
        }
    }

    /// Power-on value of a feature slot.
    pub fn default_for(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::Edge => Self::Edge(EdgeMode::default()),
            FeatureKind::ReportRate => Self::ReportRate(ReportRate::default()),
            FeatureKind::Sample => Self::Sample(SampleMode::default()),
            FeatureKind::Stowed => Self::Stowed(StowedMode::default()),
            FeatureKind::Pocket => Self::Pocket(PocketMode::default()),
            FeatureKind::Pitch => Self::Pitch(PitchMode::default()),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default_for(self.kind())
    }
}
