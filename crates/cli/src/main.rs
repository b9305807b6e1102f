//! touchmodectl - Touch Feature Mode Control CLI
//!
//! Drives the feature-mode reconciler against a simulated touch controller:
//! run request scripts across suspend and resume, inspect how single
//! requests encode for each controller family, and validate device configs.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod error;
mod output;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{ConfigArgs, EncodeArgs, RunArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "touchmodectl")]
#[command(about = "Touch Feature Mode Control CLI - Reconcile touch controller feature modes")]
#[command(version)]
#[command(long_about = "
touchmodectl drives the touch feature mode reconciler against a simulated
controller. Requests use the same text formats as the driver attributes
(edge, interpolation, sample, stowed, pocket_mode, pitch).

Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a request script against a simulated controller
    Run(RunArgs),

    /// Show the register or command steps for one request
    Encode(EncodeArgs),

    /// Validate and print a device configuration file
    Config(ConfigArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("touchmodectl={log_level},touch_mode_engine={log_level},touch_transport={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            std::process::exit(exit_code);
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.json),
        Commands::Encode(args) => commands::encode::execute(args, cli.json),
        Commands::Config(args) => commands::config::execute(args, cli.json),
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::FamilyArg;
    use clap::Parser;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_global_json_flag_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["touchmodectl", "config", "touch.yaml", "--json"])?;
        assert!(cli.json);
        Ok(())
    }

    #[test]
    fn parse_verbose_levels() -> TestResult {
        let cli = Cli::try_parse_from(["touchmodectl", "-vv", "config", "touch.yaml"])?;
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn parse_run_options() -> TestResult {
        let cli = Cli::try_parse_from([
            "touchmodectl",
            "run",
            "--config",
            "touch.yaml",
            "steps.txt",
            "--device",
            "main",
            "--settle-ms",
            "0",
            "--strict",
        ])?;
        match &cli.command {
            Commands::Run(args) => {
                assert_eq!(args.script.to_str(), Some("steps.txt"));
                assert_eq!(args.device.as_deref(), Some("main"));
                assert_eq!(args.settle_ms, Some(0));
                assert!(args.strict);
                assert!(!args.trace_bus);
            }
            _ => return Err("expected Run command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_encode_collects_request_words() -> TestResult {
        let cli = Cli::try_parse_from(["touchmodectl", "encode", "-f", "goodix", "edge", "1", "3"])?;
        match &cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.family, FamilyArg::Goodix);
                assert_eq!(args.request, vec!["edge", "1", "3"]);
            }
            _ => return Err("expected Encode command".into()),
        }
        Ok(())
    }

    #[test]
    fn encode_requires_a_request() {
        assert!(Cli::try_parse_from(["touchmodectl", "encode"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
