//! Power-transition hooks and the resume replayer.

use crate::bus;
use crate::error::ReconcileResult;
use crate::reconciler::TouchModeReconciler;
use crate::state::{ApplyOutcome, ModeSnapshot, PowerState};
use serde::{Serialize, Serializer};
use touch_mode_protocol::{FeatureKind, FeatureValue};
use touch_transport::Transport;
use tracing::{debug, info, warn};

/// Suspend/resume notifications delivered by the platform.
///
/// Hooks never fail: a step that cannot be written is logged and reported,
/// and stays pending in the desired snapshot.
pub trait PowerLifecycle {
    fn on_pre_suspend(&self) {}

    /// The controller has gone to sleep.
    fn on_post_suspend(&self) -> TransitionReport;

    fn on_pre_resume(&self) {}

    /// The controller has been reset and is running again.
    fn on_post_resume(&self) -> TransitionReport;
}

/// Result of one feature step during a power transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionStep {
    pub feature: FeatureKind,
    #[serde(serialize_with = "serialize_result")]
    pub result: ReconcileResult<ApplyOutcome>,
}

fn serialize_result<S: Serializer>(
    result: &ReconcileResult<ApplyOutcome>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match result {
        Ok(outcome) => outcome.serialize(serializer),
        Err(err) => serializer.collect_map([("error", err.to_string())]),
    }
}

/// Per-feature results of a suspend or resume, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionReport {
    pub steps: Vec<TransitionStep>,
}

impl TransitionReport {
    fn push(&mut self, feature: FeatureKind, result: ReconcileResult<ApplyOutcome>) {
        self.steps.push(TransitionStep { feature, result });
    }

    /// True when no step failed.
    pub fn is_clean(&self) -> bool {
        self.steps.iter().all(|step| step.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TransitionStep> {
        self.steps.iter().filter(|step| step.result.is_err())
    }

    /// Features that were written to the controller.
    pub fn written(&self) -> Vec<FeatureKind> {
        self.steps
            .iter()
            .filter(|step| matches!(step.result, Ok(ApplyOutcome::Applied)))
            .map(|step| step.feature)
            .collect()
    }

    pub fn step(&self, feature: FeatureKind) -> Option<&TransitionStep> {
        self.steps.iter().find(|step| step.feature == feature)
    }
}

impl<T: Transport> PowerLifecycle for TouchModeReconciler<T> {
    fn on_pre_suspend(&self) {
        debug!(device = %self.name(), "pre-suspend");
    }

    /// Enter suspend and, when stowed mode is requested, switch the
    /// controller's power mode directly.
    fn on_post_suspend(&self) -> TransitionReport {
        let mut report = TransitionReport::default();
        let mut inner = self.lock();

        if inner.power == PowerState::PowerOff {
            debug!(device = %self.name(), "suspend while powered off");
            return report;
        }
        inner.power = PowerState::Suspended;
        info!(device = %self.name(), "controller suspended");

        let stowed = inner.desired.stowed;
        if !self.capabilities().stowed_mode_ctrl || !stowed.is_enabled() {
            return report;
        }

        let op = self.encoder().stowed_power_op(stowed);
        match bus::run_op(&mut inner.transport, &op) {
            Ok(()) => {
                inner.applied.stowed = stowed;
                info!(device = %self.name(), stowed = stowed.raw(), "stowed mode entered");
                report.push(FeatureKind::Stowed, Ok(ApplyOutcome::Applied));
            }
            Err(err) => {
                warn!(device = %self.name(), error = %err, "failed to enter stowed mode");
                report.push(FeatureKind::Stowed, Err(err.into()));
            }
        }
        report
    }

    fn on_pre_resume(&self) {
        debug!(device = %self.name(), "pre-resume");
    }

    /// Replay every enabled feature from the desired snapshot.
    ///
    /// The controller comes back from reset at power-on defaults, so applied
    /// state is discarded first and only non-default desired values produce
    /// bus traffic. Stowed is never replayed.
    fn on_post_resume(&self) -> TransitionReport {
        let mut report = TransitionReport::default();
        let mut inner = self.lock();

        inner.power = PowerState::Active;
        inner.applied = ModeSnapshot::default();
        info!(device = %self.name(), "controller resumed, replaying modes");

        for kind in FeatureKind::REPLAY_ORDER {
            if !self.capabilities().supports(kind) {
                continue;
            }
            let value = inner.desired.get(kind);
            let result = self.apply_locked(&mut inner, value);
            if let Err(err) = &result {
                warn!(device = %self.name(), feature = %kind, error = %err, "replay step failed");
            }
            report.push(kind, result);
        }

        inner.applied.set(FeatureValue::default_for(FeatureKind::Stowed));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilityFlags;
    use crate::error::ReconcileError;
    use std::time::Duration;
    use touch_mode_protocol::registers::focaltech;
    use touch_mode_protocol::{FocaltechEncoder, StowedMode};
    use touch_transport::TransportError;
    use touch_transport::mock::SimulatedController;

    fn attach() -> (TouchModeReconciler<SimulatedController>, SimulatedController) {
        let sim = SimulatedController::new();
        let reconciler = TouchModeReconciler::new(
            "ts0",
            Box::new(FocaltechEncoder),
            CapabilityFlags::all(),
            sim.clone(),
        )
        .with_settle(Duration::ZERO);
        (reconciler, sim)
    }

    #[test]
    fn test_suspend_while_powered_off_stays_off() {
        let (reconciler, sim) = attach();
        let report = reconciler.on_post_suspend();
        assert!(report.steps.is_empty());
        assert_eq!(reconciler.power_state(), PowerState::PowerOff);
        assert!(sim.events().is_empty());
    }

    #[test]
    fn test_resume_with_defaults_writes_nothing() {
        let (reconciler, sim) = attach();
        let report = reconciler.on_post_resume();
        assert!(report.is_clean());
        assert!(report.written().is_empty());
        assert_eq!(report.steps.len(), FeatureKind::REPLAY_ORDER.len());
        assert!(sim.events().is_empty());
    }

    #[test]
    fn test_stowed_failure_is_reported() -> Result<(), ReconcileError> {
        let (reconciler, sim) = attach();
        reconciler.on_post_resume();
        reconciler.apply(FeatureValue::Stowed(StowedMode::new(1)?))?;
        sim.fail_register(focaltech::POWER_MODE);

        let report = reconciler.on_post_suspend();
        assert!(!report.is_clean());
        assert!(matches!(
            report.step(FeatureKind::Stowed).map(|s| &s.result),
            Some(Err(ReconcileError::Transport(TransportError::Write { .. })))
        ));
        assert_eq!(reconciler.applied().stowed, StowedMode::default());
        assert_eq!(reconciler.power_state(), PowerState::Suspended);
        Ok(())
    }

    #[test]
    fn test_report_serializes_errors_as_text() -> Result<(), serde_json::Error> {
        let mut report = TransitionReport::default();
        report.push(FeatureKind::Edge, Ok(ApplyOutcome::Applied));
        report.push(FeatureKind::Pitch, Err(ReconcileError::PoweredOff));
        let json = serde_json::to_string(&report)?;
        assert_eq!(
            json,
            r#"{"steps":[{"feature":"edge","result":{"outcome":"applied"}},{"feature":"pitch","result":{"error":"controller is powered off"}}]}"#
        );
        Ok(())
    }
}
