//! Command implementations for touchmodectl

pub mod config;
pub mod encode;
pub mod run;

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use touch_mode_protocol::ControllerFamily;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Device configuration file (.yaml, .yml or .json)
    #[arg(short, long, env = "TOUCHMODE_CONFIG")]
    pub config: PathBuf,

    /// Script of requests and power transitions, one per line
    pub script: PathBuf,

    /// Device to drive (defaults to the first in the config)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Override the configured settle delay
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Include every simulated bus transaction in the output
    #[arg(long)]
    pub trace_bus: bool,

    /// Exit non-zero if any step failed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Controller family to encode for
    #[arg(short, long, value_enum, default_value_t = FamilyArg::Focaltech)]
    pub family: FamilyArg,

    /// Feature name followed by its request arguments, e.g. `edge 1 0`
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub request: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Device configuration file to validate
    pub path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    Focaltech,
    Goodix,
}

impl From<FamilyArg> for ControllerFamily {
    fn from(value: FamilyArg) -> Self {
        match value {
            FamilyArg::Focaltech => ControllerFamily::Focaltech,
            FamilyArg::Goodix => ControllerFamily::Goodix,
        }
    }
}
