//! Desired/applied snapshots, power state and apply outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use touch_mode_protocol::{
    EdgeMode, FeatureKind, FeatureValue, PitchMode, PocketMode, ReportRate, SampleMode, StowedMode,
};

/// One value per feature slot.
///
/// Used for both the requested configuration and the configuration last
/// confirmed on the controller. `Default` is the power-on register state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeSnapshot {
    pub edge: EdgeMode,
    #[serde(rename = "interpolation")]
    pub report_rate: ReportRate,
    pub sample: SampleMode,
    pub stowed: StowedMode,
    #[serde(rename = "pocket_mode")]
    pub pocket: PocketMode,
    pub pitch: PitchMode,
}

impl ModeSnapshot {
    pub fn get(&self, kind: FeatureKind) -> FeatureValue {
        match kind {
            FeatureKind::Edge => FeatureValue::Edge(self.edge),
            FeatureKind::ReportRate => FeatureValue::ReportRate(self.report_rate),
            FeatureKind::Sample => FeatureValue::Sample(self.sample),
            FeatureKind::Stowed => FeatureValue::Stowed(self.stowed),
            FeatureKind::Pocket => FeatureValue::Pocket(self.pocket),
            FeatureKind::Pitch => FeatureValue::Pitch(self.pitch),
        }
    }

    pub fn set(&mut self, value: FeatureValue) {
        match value {
            FeatureValue::Edge(v) => self.edge = v,
            FeatureValue::ReportRate(v) => self.report_rate = v,
            FeatureValue::Sample(v) => self.sample = v,
            FeatureValue::Stowed(v) => self.stowed = v,
            FeatureValue::Pocket(v) => self.pocket = v,
            FeatureValue::Pitch(v) => self.pitch = v,
        }
    }

    /// Features whose value differs between `self` and `other`.
    pub fn diff(&self, other: &Self) -> Vec<FeatureKind> {
        FeatureKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind) != other.get(*kind))
            .collect()
    }
}

/// Controller power state as seen by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    Active,
    Suspended,
    /// Attached but not yet powered, or regulator removed.
    #[default]
    PowerOff,
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::PowerOff => "power_off",
        })
    }
}

/// Why a request was recorded without touching the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeferReason {
    /// Controller is powered off; the next resume replays it.
    PoweredOff,
    /// Controller is asleep and only accepts stowed changes.
    Suspended,
    /// Stowed mode takes effect at the next suspend.
    AwaitingSuspend,
}

impl DeferReason {
    /// Reason a write of `kind` must wait in `power`, if any.
    pub fn for_state(power: PowerState, kind: FeatureKind) -> Option<Self> {
        match (power, kind) {
            (PowerState::PowerOff, _) => Some(Self::PoweredOff),
            (PowerState::Suspended, FeatureKind::Stowed) => None,
            (PowerState::Suspended, _) => Some(Self::Suspended),
            (PowerState::Active, FeatureKind::Stowed) => Some(Self::AwaitingSuspend),
            (PowerState::Active, _) => None,
        }
    }
}

/// Result of a successful `apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The write sequence completed and applied state was updated.
    Applied,
    /// Already in effect; no bus traffic.
    Unchanged,
    /// Recorded as desired, written later.
    Deferred(DeferReason),
}

impl ApplyOutcome {
    /// Every outcome counts as success to the requester.
    pub fn is_success(&self) -> bool {
        true
    }

    pub fn wrote(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Unchanged => f.write_str("unchanged"),
            Self::Deferred(DeferReason::PoweredOff) => f.write_str("deferred (powered off)"),
            Self::Deferred(DeferReason::Suspended) => f.write_str("deferred (suspended)"),
            Self::Deferred(DeferReason::AwaitingSuspend) => {
                f.write_str("deferred (until suspend)")
            }
        }
    }
}
