//! Validate and display a device configuration file

use anyhow::Result;
use touch_mode_engine::FleetConfig;

use crate::commands::ConfigArgs;
use crate::error::CliError;
use crate::output;

/// Execute config command
pub fn execute(args: &ConfigArgs, json: bool) -> Result<()> {
    let fleet = FleetConfig::load(&args.path).map_err(CliError::from)?;
    output::print_fleet(&fleet, json)?;
    Ok(())
}
