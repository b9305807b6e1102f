//! FocalTech register encoder.

use crate::encoder::{ControllerFamily, ModeEncoder, RegisterOp, WriteSequence};
use crate::error::EncodingError;
use crate::registers::focaltech as reg;
use crate::types::{EdgeMode, FeatureValue, ReportRate, StowedMode};

/// Encoder for FocalTech controllers (register-mapped feature modes).
#[derive(Debug, Clone, Copy, Default)]
pub struct FocaltechEncoder;

impl FocaltechEncoder {
    /// Rotation and level register bytes for an edge request.
    pub fn edge_registers(mode: EdgeMode) -> (u8, u8) {
        (mode.rotation.register(), mode.effective_level())
    }

    pub fn report_rate_value(rate: ReportRate) -> u8 {
        match rate {
            ReportRate::Hz120 => reg::REPORT_RATE_120HZ,
            ReportRate::Hz240 => reg::REPORT_RATE_240HZ,
            ReportRate::Hz360 => reg::REPORT_RATE_360HZ,
        }
    }
}

impl ModeEncoder for FocaltechEncoder {
    fn family(&self) -> ControllerFamily {
        ControllerFamily::Focaltech
    }

    fn encode(&self, value: &FeatureValue) -> Result<WriteSequence, EncodingError> {
        let seq = match *value {
            FeatureValue::Edge(mode) => {
                let (rotation, level) = Self::edge_registers(mode);
                WriteSequence::new(vec![
                    RegisterOp::write(reg::EDGE_ROTATION, rotation),
                    RegisterOp::write(reg::EDGE_LEVEL, level),
                ])
                .with_settle()
            }
            FeatureValue::ReportRate(rate) => {
                WriteSequence::single(RegisterOp::write(
                    reg::REPORT_RATE,
                    Self::report_rate_value(rate),
                ))
                .with_settle()
            }
            FeatureValue::Sample(sample) => {
                WriteSequence::single(RegisterOp::write(reg::SAMPLE_SWITCH, sample.raw()))
            }
            FeatureValue::Pocket(pocket) => WriteSequence::single(RegisterOp::UpdateBits {
                addr: reg::CHARGER_POCKET,
                mask: reg::POCKET_BIT,
                set: pocket.is_on(),
            })
            .with_settle(),
            FeatureValue::Pitch(pitch) => {
                WriteSequence::single(RegisterOp::write(reg::PITCH, pitch.raw())).with_settle()
            }
            FeatureValue::Stowed(stowed) => WriteSequence::single(self.stowed_power_op(stowed)),
        };
        Ok(seq)
    }

    fn stowed_power_op(&self, stowed: StowedMode) -> RegisterOp {
        let value = if stowed.is_enabled() {
            reg::POWER_MODE_STANDBY
        } else {
            reg::POWER_MODE_ACTIVE
        };
        RegisterOp::write(reg::POWER_MODE, value)
    }

    fn charger_op(&self, enabled: bool, preserve_pocket: bool) -> Option<RegisterOp> {
        let op = if preserve_pocket {
            RegisterOp::UpdateBits {
                addr: reg::CHARGER_POCKET,
                mask: reg::CHARGER_BIT,
                set: enabled,
            }
        } else {
            RegisterOp::write(reg::CHARGER_POCKET, u8::from(enabled))
        };
        Some(op)
    }

    fn config_id_register(&self) -> Option<u16> {
        Some(reg::FW_VERSION)
    }
}
