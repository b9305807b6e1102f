//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;
use touch_mode_engine::{ApplyOutcome, FleetConfig, ModeSnapshot, TransitionReport};
use touch_mode_protocol::{FeatureKind, format_value};

use crate::commands::encode::Encoding;
use crate::commands::run::{RunSummary, StepResult};
use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    print_json(&error_json);
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    error
        .downcast_ref::<CliError>()
        .map_or("Error", CliError::type_name)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

/// Print the result of a script run
pub fn print_run_summary(summary: &RunSummary, json: bool) {
    if json {
        let mut output = json!({ "success": true });
        if let (Some(map), Ok(serde_json::Value::Object(fields))) =
            (output.as_object_mut(), serde_json::to_value(summary))
        {
            map.extend(fields);
        }
        print_json(&output);
        return;
    }

    println!(
        "{} {} ({}, {})",
        "Device:".bold(),
        summary.device,
        summary.family,
        summary.power_state
    );

    for step in &summary.steps {
        println!(
            "  {:>3}  {:<28} {}",
            step.line.to_string().dimmed(),
            step.command,
            format_step(&step.result)
        );
    }

    println!();
    print_state_table(&summary.applied, &summary.desired);

    if let Some(bus) = &summary.bus {
        println!();
        println!("{}", "Bus trace:".bold());
        for event in bus {
            println!("  {event:?}");
        }
    }

    let failures = summary.failures();
    if failures > 0 {
        println!();
        println!("{} {failures} step(s) failed", "Warning:".yellow().bold());
    }
}

fn format_step(result: &StepResult) -> ColoredString {
    match result {
        StepResult::Applied { outcome } => match outcome {
            ApplyOutcome::Applied => outcome.to_string().green(),
            ApplyOutcome::Unchanged => outcome.to_string().dimmed(),
            ApplyOutcome::Deferred(_) => outcome.to_string().yellow(),
        },
        StepResult::Value { value } => value.as_str().cyan(),
        StepResult::Transition { report } => format_report(report),
        StepResult::Done => "ok".green(),
        StepResult::Failed { error } => error.as_str().red(),
    }
}

fn format_report(report: &TransitionReport) -> ColoredString {
    let written: Vec<&str> = report.written().iter().map(|kind| kind.name()).collect();
    let text = if written.is_empty() {
        "nothing to write".to_string()
    } else {
        format!("wrote {}", written.join(", "))
    };

    let failed: Vec<&str> = report.failures().map(|step| step.feature.name()).collect();
    if failed.is_empty() {
        text.green()
    } else {
        format!("{text}; failed {}", failed.join(", ")).red()
    }
}

fn print_state_table(applied: &ModeSnapshot, desired: &ModeSnapshot) {
    println!("  {:<14} {:<12} {}", "feature".bold(), "applied".bold(), "desired".bold());
    for kind in FeatureKind::ALL {
        let have = format_value(&applied.get(kind));
        let want = format_value(&desired.get(kind));
        let want = if have == want {
            want.normal()
        } else {
            format!("{want} (pending)").yellow()
        };
        println!("  {:<14} {:<12} {}", kind.name(), have, want);
    }
}

/// Print the encoding of a single request
pub fn print_encoding(encoding: &Encoding, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "encoding": encoding,
        }));
        return;
    }

    println!(
        "{} {} = {} ({})",
        "Request:".bold(),
        encoding.feature,
        encoding.value,
        encoding.family
    );
    for op in &encoding.ops {
        println!("  {op}");
    }
    if encoding.settle {
        println!("  {}", "settle".dimmed());
    }
}

/// Print a validated device configuration
pub fn print_fleet(fleet: &FleetConfig, json: bool) -> Result<(), CliError> {
    if json {
        print_json(&json!({
            "success": true,
            "config": fleet,
        }));
        return Ok(());
    }

    println!("{} {} device(s)", "Configuration OK:".green().bold(), fleet.devices.len());
    for device in &fleet.devices {
        let features: Vec<&str> = device.capabilities.enabled().map(FeatureKind::name).collect();
        println!(
            "  {} {} ({}, settle {} ms)",
            "●".green(),
            device.name.bold(),
            device.family,
            device.settle_ms
        );
        if features.is_empty() {
            println!("    Features: {}", "none".dimmed());
        } else {
            println!("    Features: {}", features.join(", "));
        }
    }

    println!();
    print!("{}", serde_yaml::to_string(fleet)?);
    Ok(())
}
