//! Wire-format snapshots for both controller families.
//!
//! A failing snapshot here means the bytes sent to the controller changed.

use insta::assert_snapshot;
use touch_mode_protocol::{
    ControllerFamily, EncodingError, FeatureValue, ModeEncoder, PitchMode, StowedMode, parse_line,
};

fn render(family: ControllerFamily, line: &str) -> String {
    let value = match parse_line(line) {
        Ok(value) => value,
        Err(err) => return format!("request error: {err}"),
    };
    render_value(family.encoder().as_ref(), &value)
}

fn render_value(encoder: &dyn ModeEncoder, value: &FeatureValue) -> String {
    match encoder.encode(value) {
        Ok(seq) => {
            let ops: Vec<String> = seq.ops.iter().map(ToString::to_string).collect();
            let settle = if seq.settle { " (settle)" } else { "" };
            format!("{}{settle}", ops.join("; "))
        }
        Err(err) => format!("encoding error: {err}"),
    }
}

// ── FocalTech ───────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_focaltech_edge_portrait_small() {
    assert_snapshot!(
        render(ControllerFamily::Focaltech, "edge 2 0"),
        @"write 0x8c = 0x00; write 0x8d = 0x01 (settle)"
    );
}

#[test]
fn test_snapshot_focaltech_edge_landscape_default() {
    assert_snapshot!(
        render(ControllerFamily::Focaltech, "edge 0 1"),
        @"write 0x8c = 0x02; write 0x8d = 0x01 (settle)"
    );
}

#[test]
fn test_snapshot_focaltech_edge_landscape_normal_big() {
    assert_snapshot!(
        render(ControllerFamily::Focaltech, "edge 12 3"),
        @"write 0x8c = 0x01; write 0x8d = 0x06 (settle)"
    );
}

#[test]
fn test_snapshot_focaltech_report_rate_360() {
    assert_snapshot!(
        render(ControllerFamily::Focaltech, "interpolation 360"),
        @"write 0x8e = 0x24 (settle)"
    );
}

#[test]
fn test_snapshot_focaltech_pocket_enable() {
    assert_snapshot!(
        render(ControllerFamily::Focaltech, "pocket_mode 0x11"),
        @"set 0x8b & 0x80 (settle)"
    );
}

#[test]
fn test_snapshot_focaltech_stowed_exit() -> Result<(), EncodingError> {
    let value = FeatureValue::Stowed(StowedMode::new(0)?);
    assert_snapshot!(
        render_value(ControllerFamily::Focaltech.encoder().as_ref(), &value),
        @"write 0xa5 = 0x00"
    );
    Ok(())
}

// ── Goodix ──────────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_goodix_edge_landscape_big() {
    assert_snapshot!(
        render(ControllerFamily::Goodix, "edge 1 3"),
        @"cmd 0x17 0x40 0xc0 (settle)"
    );
}

#[test]
fn test_snapshot_goodix_report_rate_240() {
    assert_snapshot!(
        render(ControllerFamily::Goodix, "interpolation 0xf0"),
        @"cmd 0xc1 0x01 (settle)"
    );
}

#[test]
fn test_snapshot_goodix_pitch() -> Result<(), EncodingError> {
    let value = FeatureValue::Pitch(PitchMode::new(4)?);
    assert_snapshot!(
        render_value(ControllerFamily::Goodix.encoder().as_ref(), &value),
        @"cmd 0x29 0x04 (settle)"
    );
    Ok(())
}

#[test]
fn test_snapshot_goodix_sample() {
    assert_snapshot!(
        render(ControllerFamily::Goodix, "sample 3"),
        @"cmd 0xc2 0x0a"
    );
}

// ── Rejections ──────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_rejected_rotation() {
    assert_snapshot!(
        render(ControllerFamily::Focaltech, "edge 0 2"),
        @"request error: invalid edge mode: 2"
    );
}

#[test]
fn test_snapshot_rejected_report_rate() {
    assert_snapshot!(
        render(ControllerFamily::Goodix, "interpolation 90"),
        @"request error: invalid interpolation mode: 90"
    );
}
