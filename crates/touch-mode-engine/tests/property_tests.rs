//! Property tests for the desired/applied invariants across arbitrary
//! request and power-transition sequences.

use proptest::prelude::*;
use std::time::Duration;
use touch_mode_engine::prelude::*;
use touch_mode_protocol::{
    EdgeMode, EdgeSuppression, MAX_PITCH, PitchMode, PocketMode, ReportRate, Rotation, SampleMode,
    StowedMode,
};
use touch_transport::mock::SimulatedController;

#[derive(Debug, Clone)]
enum Step {
    Apply(FeatureValue),
    Suspend,
    Resume,
    PowerOff,
}

fn suppression() -> impl Strategy<Value = EdgeSuppression> {
    prop_oneof![
        Just(EdgeSuppression::Default),
        Just(EdgeSuppression::Small),
        Just(EdgeSuppression::Big),
        Just(EdgeSuppression::NormalDefault),
        Just(EdgeSuppression::NormalSmall),
        Just(EdgeSuppression::NormalBig),
    ]
}

fn rotation() -> impl Strategy<Value = Rotation> {
    prop_oneof![Just(Rotation::Deg0), Just(Rotation::Cw90), Just(Rotation::Ccw90)]
}

fn feature_value() -> impl Strategy<Value = FeatureValue> {
    prop_oneof![
        (suppression(), rotation()).prop_map(|(s, r)| FeatureValue::Edge(EdgeMode::new(s, r))),
        prop_oneof![Just(ReportRate::Hz120), Just(ReportRate::Hz240), Just(ReportRate::Hz360)]
            .prop_map(FeatureValue::ReportRate),
        (0u32..20).prop_map(|raw| FeatureValue::Sample(SampleMode::from_raw(raw))),
        (0u32..=1).prop_filter_map("stowed", |raw| StowedMode::new(raw).ok().map(FeatureValue::Stowed)),
        any::<bool>().prop_map(|on| FeatureValue::Pocket(if on { PocketMode::On } else { PocketMode::Off })),
        (0u32..=u32::from(MAX_PITCH))
            .prop_filter_map("pitch", |raw| PitchMode::new(raw).ok().map(FeatureValue::Pitch)),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => feature_value().prop_map(Step::Apply),
        1 => Just(Step::Suspend),
        1 => Just(Step::Resume),
        1 => Just(Step::PowerOff),
    ]
}

fn attach(family: ControllerFamily) -> (TouchModeReconciler<SimulatedController>, SimulatedController) {
    let sim = SimulatedController::new();
    let device = TouchModeReconciler::new("ts0", family.encoder(), CapabilityFlags::all(), sim.clone())
        .with_settle(Duration::ZERO);
    (device, sim)
}

fn family() -> impl Strategy<Value = ControllerFamily> {
    prop_oneof![Just(ControllerFamily::Focaltech), Just(ControllerFamily::Goodix)]
}

proptest! {
    /// Every request is recorded as desired, and nothing reaches the bus
    /// while the controller is powered off.
    #[test]
    fn prop_desired_always_recorded(family in family(), steps in proptest::collection::vec(step(), 0..40)) {
        let (device, sim) = attach(family);
        for step in steps {
            match step {
                Step::Apply(value) => {
                    let before = sim.mutations().len();
                    let powered_off = device.power_state() == PowerState::PowerOff;
                    let outcome = device.apply(value);
                    prop_assert!(outcome.is_ok());
                    prop_assert_eq!(device.desired_value(value.kind()), value);
                    if powered_off {
                        prop_assert_eq!(sim.mutations().len(), before);
                    }
                }
                Step::Suspend => { device.on_post_suspend(); }
                Step::Resume => { device.on_post_resume(); }
                Step::PowerOff => device.power_off(),
            }
        }
    }

    /// After a clean resume, applied equals desired for every replayed
    /// feature and stowed is back at its default.
    #[test]
    fn prop_resume_converges(family in family(), steps in proptest::collection::vec(step(), 0..40)) {
        let (device, _sim) = attach(family);
        for step in steps {
            match step {
                Step::Apply(value) => { let _outcome = device.apply(value); }
                Step::Suspend => { device.on_post_suspend(); }
                Step::Resume => { device.on_post_resume(); }
                Step::PowerOff => device.power_off(),
            }
        }

        let report = device.on_post_resume();
        prop_assert!(report.is_clean());

        let mut expected = device.desired();
        expected.stowed = StowedMode::default();
        prop_assert_eq!(device.applied(), expected);
        prop_assert_eq!(device.power_state(), PowerState::Active);
    }

    /// Re-applying the current applied value never touches the bus.
    #[test]
    fn prop_reapply_is_silent(family in family(), value in feature_value()) {
        let (device, sim) = attach(family);
        device.on_post_resume();
        let _outcome = device.apply(value);
        let current = device.applied_value(value.kind());

        let before = sim.events().len();
        prop_assert_eq!(device.apply(current), Ok(ApplyOutcome::Unchanged));
        prop_assert_eq!(sim.events().len(), before);
    }
}
