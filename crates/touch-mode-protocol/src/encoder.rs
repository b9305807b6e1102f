//! Encoder abstraction shared across controller families.

use crate::error::EncodingError;
use crate::focaltech::FocaltechEncoder;
use crate::goodix::GoodixEncoder;
use crate::types::{FeatureValue, StowedMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One bus-level step of a mode write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegisterOp {
    /// Write a full register.
    Write { addr: u16, value: u8 },
    /// Read a register, set or clear `mask`, write it back.
    UpdateBits { addr: u16, mask: u8, set: bool },
    /// Send a firmware command with its argument bytes.
    Command { cmd: u8, args: Vec<u8> },
}

impl RegisterOp {
    pub fn write(addr: u16, value: u8) -> Self {
        Self::Write { addr, value }
    }

    pub fn command(cmd: u8, args: &[u8]) -> Self {
        Self::Command {
            cmd,
            args: args.to_vec(),
        }
    }
}

impl fmt::Display for RegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { addr, value } => write!(f, "write {addr:#04x} = {value:#04x}"),
            Self::UpdateBits { addr, mask, set } => {
                let verb = if *set { "set" } else { "clear" };
                write!(f, "{verb} {addr:#04x} & {mask:#04x}")
            }
            Self::Command { cmd, args } => {
                write!(f, "cmd {cmd:#04x}")?;
                for arg in args {
                    write!(f, " {arg:#04x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Apply an [`RegisterOp::UpdateBits`] step to a register value.
pub fn apply_bits(current: u8, mask: u8, set: bool) -> u8 {
    if set { current | mask } else { current & !mask }
}

/// Ordered register steps for one feature write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSequence {
    pub ops: Vec<RegisterOp>,
    /// The controller needs a settle interval after the last step.
    pub settle: bool,
}

impl WriteSequence {
    pub fn new(ops: Vec<RegisterOp>) -> Self {
        Self { ops, settle: false }
    }

    #[must_use]
    pub fn with_settle(mut self) -> Self {
        self.settle = true;
        self
    }

    pub fn single(op: RegisterOp) -> Self {
        Self::new(vec![op])
    }
}

/// Supported touch controller families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerFamily {
    Focaltech,
    Goodix,
}

impl ControllerFamily {
    pub fn vendor(self) -> &'static str {
        match self {
            Self::Focaltech => "focaltech",
            Self::Goodix => "goodix",
        }
    }

    /// Encoder instance for this family.
    pub fn encoder(self) -> Box<dyn ModeEncoder> {
        match self {
            Self::Focaltech => Box::new(FocaltechEncoder),
            Self::Goodix => Box::new(GoodixEncoder),
        }
    }
}

impl fmt::Display for ControllerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vendor())
    }
}

/// Per-family translation from feature values to bus steps.
pub trait ModeEncoder: Send + Sync + fmt::Debug {
    fn family(&self) -> ControllerFamily;

    fn vendor(&self) -> &'static str {
        self.family().vendor()
    }

    /// Translate a feature value into the steps that program it.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidMode`] if this family cannot express
    /// the value.
    fn encode(&self, value: &FeatureValue) -> Result<WriteSequence, EncodingError>;

    /// Direct power-mode step used to enter or leave stowed mode at suspend.
    fn stowed_power_op(&self, stowed: StowedMode) -> RegisterOp;

    /// Charger-mode step, if the family has one.
    ///
    /// `preserve_pocket` selects a read-modify-write that leaves the pocket bit alone.
    fn charger_op(&self, _enabled: bool, _preserve_pocket: bool) -> Option<RegisterOp> {
        None
    }

    /// Register holding the firmware config id, if readable.
    fn config_id_register(&self) -> Option<u16> {
        None
    }
}
