//! Goodix Berlin command encoder.

use crate::encoder::{ControllerFamily, ModeEncoder, RegisterOp, WriteSequence};
use crate::error::EncodingError;
use crate::registers::goodix as cmd;
use crate::types::{EdgeMode, EdgeSuppression, FeatureValue, ReportRate, StowedMode};

/// Encoder for Goodix Berlin controllers (command-based feature modes).
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodixEncoder;

impl GoodixEncoder {
    /// Edge byte after the landscape adjustment.
    ///
    /// Non-normal widths climb the default → small → big ladder by one rung
    /// when rotated; big goes to the widest firmware setting.
    pub fn edge_byte(mode: EdgeMode) -> u8 {
        if !mode.rotation.is_landscape() || mode.suppression.is_normal() {
            return mode.suppression.raw_byte();
        }
        match mode.suppression {
            EdgeSuppression::Default => EdgeSuppression::Small.raw_byte(),
            EdgeSuppression::Small => EdgeSuppression::Big.raw_byte(),
            _ => cmd::EDGE_BIGGEST,
        }
    }

    pub fn report_rate_arg(rate: ReportRate) -> u8 {
        match rate {
            ReportRate::Hz120 => 0,
            ReportRate::Hz240 => 1,
            ReportRate::Hz360 => 2,
        }
    }
}

impl ModeEncoder for GoodixEncoder {
    fn family(&self) -> ControllerFamily {
        ControllerFamily::Goodix
    }

    fn encode(&self, value: &FeatureValue) -> Result<WriteSequence, EncodingError> {
        let seq = match *value {
            FeatureValue::Edge(mode) => WriteSequence::single(RegisterOp::command(
                cmd::EDGE_SWITCH,
                &[mode.rotation.raw_byte(), Self::edge_byte(mode)],
            ))
            .with_settle(),
            FeatureValue::ReportRate(rate) => WriteSequence::single(RegisterOp::command(
                cmd::REPORT_RATE,
                &[Self::report_rate_arg(rate)],
            ))
            .with_settle(),
            FeatureValue::Sample(sample) => {
                WriteSequence::single(RegisterOp::command(cmd::SAMPLE_SWITCH, &[sample.raw()]))
            }
            FeatureValue::Pocket(pocket) => {
                WriteSequence::single(RegisterOp::command(cmd::POCKET_MODE, &[pocket.raw()]))
                    .with_settle()
            }
            FeatureValue::Pitch(pitch) => {
                WriteSequence::single(RegisterOp::command(cmd::PITCH_SWITCH, &[pitch.raw()]))
                    .with_settle()
            }
            FeatureValue::Stowed(stowed) => WriteSequence::single(self.stowed_power_op(stowed)),
        };
        Ok(seq)
    }

    fn stowed_power_op(&self, stowed: StowedMode) -> RegisterOp {
        RegisterOp::command(cmd::STOWED_MODE, &[stowed.raw()])
    }
}
