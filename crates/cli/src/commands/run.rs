//! Drive a simulated controller through a request script

use anyhow::Result;
use serde::Serialize;
use touch_mode_engine::prelude::*;
use touch_transport::mock::{BusEvent, SimulatedController};
use tracing::{debug, info};

use crate::commands::RunArgs;
use crate::error::CliError;
use crate::output;
use crate::script::{ScriptLine, Step, parse_script};

/// Result of one script step.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    Applied { outcome: ApplyOutcome },
    Value { value: String },
    Transition { report: TransitionReport },
    Done,
    Failed { error: String },
}

impl StepResult {
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Failed { .. } => true,
            Self::Transition { report } => !report.is_clean(),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub line: usize,
    pub command: String,
    #[serde(flatten)]
    pub result: StepResult,
}

/// Everything the `run` command reports.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub device: String,
    pub family: ControllerFamily,
    pub power_state: PowerState,
    pub applied: ModeSnapshot,
    pub desired: ModeSnapshot,
    pub steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus: Option<Vec<BusEvent>>,
}

impl RunSummary {
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| s.result.is_failure()).count()
    }
}

/// Execute run command
pub fn execute(args: &RunArgs, json: bool) -> Result<()> {
    let fleet = FleetConfig::load(&args.config).map_err(CliError::from)?;
    let config = select_device(&fleet, args.device.as_deref(), args.settle_ms)?;

    let source = std::fs::read_to_string(&args.script).map_err(CliError::from)?;
    let lines = parse_script(&source)?;

    let sim = SimulatedController::new();
    let device = TouchModeReconciler::from_config(&config, sim.clone());
    info!(device = %config.name, steps = lines.len(), "running script");

    let steps = lines
        .into_iter()
        .map(|line| run_line(&device, &sim, line))
        .collect();

    let summary = RunSummary {
        device: device.name().to_string(),
        family: device.family(),
        power_state: device.power_state(),
        applied: device.applied(),
        desired: device.desired(),
        steps,
        bus: args.trace_bus.then(|| sim.events()),
    };
    output::print_run_summary(&summary, json);

    let failures = summary.failures();
    if args.strict && failures > 0 {
        return Err(CliError::StepsFailed(failures).into());
    }
    Ok(())
}

/// Pick the configured device (first by default) and apply the settle
/// override, which is held to the same bound as the config file.
fn select_device(
    fleet: &FleetConfig,
    name: Option<&str>,
    settle_ms: Option<u64>,
) -> Result<DeviceConfig, CliError> {
    let mut config = match name {
        Some(name) => fleet
            .device(name)
            .ok_or_else(|| CliError::DeviceNotFound(name.to_string()))?,
        None => fleet
            .devices
            .first()
            .ok_or_else(|| CliError::DeviceNotFound("<none configured>".to_string()))?,
    }
    .clone();

    if let Some(ms) = settle_ms {
        config.settle_ms = ms;
        config.validate()?;
    }
    Ok(config)
}

fn run_line(
    device: &TouchModeReconciler<SimulatedController>,
    sim: &SimulatedController,
    line: ScriptLine,
) -> StepRecord {
    debug!(line = line.line, step = %line.text, "script step");
    let result = run_step(device, sim, &line.step);
    StepRecord {
        line: line.line,
        command: line.text,
        result,
    }
}

fn run_step(
    device: &TouchModeReconciler<SimulatedController>,
    sim: &SimulatedController,
    step: &Step,
) -> StepResult {
    match step {
        Step::Set(value) => match device.apply(*value) {
            Ok(outcome) => StepResult::Applied { outcome },
            Err(err) => failed(&err),
        },
        Step::Get(kind) => match device.show(*kind) {
            Ok(value) => StepResult::Value { value },
            Err(err) => failed(&err),
        },
        Step::Suspend => {
            device.on_pre_suspend();
            StepResult::Transition {
                report: device.on_post_suspend(),
            }
        }
        Step::Resume => {
            device.on_pre_resume();
            StepResult::Transition {
                report: device.on_post_resume(),
            }
        }
        Step::PowerOff => {
            device.power_off();
            StepResult::Done
        }
        Step::Charger(enabled) => match device.set_charger_mode(*enabled) {
            Ok(()) => StepResult::Done,
            Err(err) => failed(&err),
        },
        Step::ConfigId => match device.config_id() {
            Ok(value) => StepResult::Value { value },
            Err(err) => failed(&err),
        },
        Step::FailRegister(addr) => {
            sim.fail_register(*addr);
            StepResult::Done
        }
        Step::FailCommand(cmd) => {
            sim.fail_command(*cmd);
            StepResult::Done
        }
        Step::Heal => {
            sim.heal();
            StepResult::Done
        }
    }
}

fn failed(err: &ReconcileError) -> StepResult {
    StepResult::Failed {
        error: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use touch_mode_engine::MAX_SETTLE_MS;
    use touch_mode_protocol::{FeatureKind, PitchMode, ReportRate};

    fn attach() -> (TouchModeReconciler<SimulatedController>, SimulatedController) {
        let sim = SimulatedController::new();
        let device = TouchModeReconciler::new(
            "ts0",
            ControllerFamily::Focaltech.encoder(),
            CapabilityFlags::all(),
            sim.clone(),
        )
        .with_settle(Duration::ZERO);
        (device, sim)
    }

    #[test]
    fn failed_write_is_recorded_not_fatal() -> Result<()> {
        let (device, sim) = attach();
        assert!(!run_step(&device, &sim, &Step::Resume).is_failure());
        run_step(&device, &sim, &Step::FailRegister(0xE4));

        let result = run_step(&device, &sim, &Step::Set(FeatureValue::Pitch(PitchMode::new(1)?)));
        assert!(matches!(result, StepResult::Failed { ref error } if error.contains("0xe4")));

        let result = run_step(
            &device,
            &sim,
            &Step::Set(FeatureValue::ReportRate(ReportRate::Hz360)),
        );
        assert!(matches!(
            result,
            StepResult::Applied { outcome: ApplyOutcome::Applied }
        ));
        Ok(())
    }

    #[test]
    fn get_reports_applied_value() {
        let (device, sim) = attach();
        let result = run_step(&device, &sim, &Step::Get(FeatureKind::ReportRate));
        assert!(matches!(result, StepResult::Value { ref value } if value == "0x78"));
    }

    #[test]
    fn settle_override_is_bounded() -> Result<()> {
        let fleet = FleetConfig {
            devices: vec![DeviceConfig::new("main", ControllerFamily::Focaltech)],
        };

        let config = select_device(&fleet, None, Some(0))?;
        assert_eq!(config.settle(), Duration::ZERO);

        let config = select_device(&fleet, Some("main"), Some(MAX_SETTLE_MS))?;
        assert_eq!(config.settle_ms, MAX_SETTLE_MS);

        let Err(err) = select_device(&fleet, None, Some(MAX_SETTLE_MS + 1)) else {
            anyhow::bail!("oversized settle accepted");
        };
        assert!(matches!(err, CliError::Config(ConfigError::Invalid(_))));
        assert_eq!(err.exit_code(), 4);

        let Err(err) = select_device(&fleet, Some("ghost"), None) else {
            anyhow::bail!("unknown device accepted");
        };
        assert!(matches!(err, CliError::DeviceNotFound(_)));
        Ok(())
    }

    #[test]
    fn step_record_flattens_status() -> Result<()> {
        let record = StepRecord {
            line: 4,
            command: "get edge".to_string(),
            result: StepResult::Value {
                value: "0x00 0x00".to_string(),
            },
        };
        let json = serde_json::to_value(&record)?;
        assert_eq!(json["status"], "value");
        assert_eq!(json["value"], "0x00 0x00");
        assert_eq!(json["line"], 4);
        Ok(())
    }
}
