use proptest::prelude::*;
use touch_mode_protocol::{
    ControllerFamily, EdgeMode, EdgeSuppression, FeatureKind, FeatureValue, FocaltechEncoder,
    ModeEncoder, RegisterOp, Rotation, SAMPLE_ACTIVE_VALUE, SampleMode, format_value,
    parse_request, registers,
};

fn suppression_strategy() -> impl Strategy<Value = EdgeSuppression> {
    prop_oneof![
        Just(EdgeSuppression::Default),
        Just(EdgeSuppression::Small),
        Just(EdgeSuppression::Big),
        Just(EdgeSuppression::NormalDefault),
        Just(EdgeSuppression::NormalSmall),
        Just(EdgeSuppression::NormalBig),
    ]
}

fn rotation_strategy() -> impl Strategy<Value = Rotation> {
    prop_oneof![Just(Rotation::Deg0), Just(Rotation::Cw90), Just(Rotation::Ccw90)]
}

// ── Sample collapse ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    /// Every non-zero sample request encodes exactly like a request of 10.
    #[test]
    fn prop_sample_collapses_to_active(raw in 1u32..) {
        let encoded = FocaltechEncoder.encode(&FeatureValue::Sample(SampleMode::from_raw(raw)));
        let reference = FocaltechEncoder.encode(&FeatureValue::Sample(SampleMode::from_raw(10)));
        prop_assert_eq!(encoded.clone(), reference);
        prop_assert_eq!(
            encoded.map(|seq| seq.ops),
            Ok(vec![RegisterOp::write(registers::focaltech::SAMPLE_SWITCH, SAMPLE_ACTIVE_VALUE)])
        );
    }

    /// The emitted edge level is never below the requested level, and only
    /// rises (by exactly one) for rotated, non-normal requests.
    #[test]
    fn prop_edge_level_derivation(
        suppression in suppression_strategy(),
        rotation in rotation_strategy(),
    ) {
        let mode = EdgeMode::new(suppression, rotation);
        let (_, level) = FocaltechEncoder::edge_registers(mode);
        let requested = suppression.level();

        if rotation != Rotation::Deg0 && requested < 3 {
            prop_assert_eq!(level, requested + 1);
        } else {
            prop_assert_eq!(level, requested);
        }
    }

    /// Both families always encode a typed value into a non-empty sequence.
    #[test]
    fn prop_typed_values_always_encode(
        suppression in suppression_strategy(),
        rotation in rotation_strategy(),
        pitch in 0u32..=4,
    ) {
        let values = [
            FeatureValue::Edge(EdgeMode::new(suppression, rotation)),
            FeatureValue::Pitch(touch_mode_protocol::PitchMode::new(pitch)
                .map_err(|e| TestCaseError::fail(e.to_string()))?),
        ];
        for family in [ControllerFamily::Focaltech, ControllerFamily::Goodix] {
            let encoder = family.encoder();
            for value in &values {
                let seq = encoder.encode(value).map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert!(!seq.ops.is_empty());
            }
        }
    }

    /// Out-of-range pitch request codes never parse.
    #[test]
    fn prop_pitch_request_range(code in 0u32..1000) {
        let parsed = parse_request(FeatureKind::Pitch, &code.to_string());
        prop_assert_eq!(parsed.is_ok(), (20..=24).contains(&code));
    }

    /// Parsing a formatted sample value yields the same mode.
    #[test]
    fn prop_sample_format_parses_back(raw in 0u32..=u32::MAX) {
        let value = FeatureValue::Sample(SampleMode::from_raw(raw));
        let shown = format_value(&value);
        let parsed = parse_request(FeatureKind::Sample, &shown);
        prop_assert_eq!(parsed, Ok(value));
    }
}
