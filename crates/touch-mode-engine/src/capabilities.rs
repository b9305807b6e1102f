//! Per-device feature capability flags.

use serde::{Deserialize, Serialize};
use touch_mode_protocol::FeatureKind;

/// Features a controller was attached with. Immutable after attach.
///
/// Every flag defaults to off, so a config only lists what the panel supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapabilityFlags {
    pub edge_ctrl: bool,
    pub interpolation_ctrl: bool,
    pub sample_ctrl: bool,
    pub stowed_mode_ctrl: bool,
    pub pocket_mode_ctrl: bool,
    pub pitch_ctrl: bool,
}

impl CapabilityFlags {
    /// Every feature enabled.
    pub const fn all() -> Self {
        Self {
            edge_ctrl: true,
            interpolation_ctrl: true,
            sample_ctrl: true,
            stowed_mode_ctrl: true,
            pocket_mode_ctrl: true,
            pitch_ctrl: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            edge_ctrl: false,
            interpolation_ctrl: false,
            sample_ctrl: false,
            stowed_mode_ctrl: false,
            pocket_mode_ctrl: false,
            pitch_ctrl: false,
        }
    }

    pub fn supports(&self, kind: FeatureKind) -> bool {
        match kind {
            FeatureKind::Edge => self.edge_ctrl,
            FeatureKind::ReportRate => self.interpolation_ctrl,
            FeatureKind::Sample => self.sample_ctrl,
            FeatureKind::Stowed => self.stowed_mode_ctrl,
            FeatureKind::Pocket => self.pocket_mode_ctrl,
            FeatureKind::Pitch => self.pitch_ctrl,
        }
    }

    /// Return a copy with `kind` switched on or off.
    #[must_use]
    pub fn with(mut self, kind: FeatureKind, enabled: bool) -> Self {
        let flag = match kind {
            FeatureKind::Edge => &mut self.edge_ctrl,
            FeatureKind::ReportRate => &mut self.interpolation_ctrl,
            FeatureKind::Sample => &mut self.sample_ctrl,
            FeatureKind::Stowed => &mut self.stowed_mode_ctrl,
            FeatureKind::Pocket => &mut self.pocket_mode_ctrl,
            FeatureKind::Pitch => &mut self.pitch_ctrl,
        };
        *flag = enabled;
        self
    }

    /// Enabled features in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = FeatureKind> + '_ {
        FeatureKind::ALL.into_iter().filter(|kind| self.supports(*kind))
    }
}
