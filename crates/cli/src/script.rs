//! Request scripts for the `run` command.
//!
//! One step per line; `#` starts a comment.
//!
//! ```text
//! resume
//! set edge 1 0
//! set interpolation 240
//! get edge
//! charger on
//! suspend
//! fail-register 0x8d
//! heal
//! ```

use crate::error::CliError;
use touch_mode_protocol::{FeatureKind, FeatureValue, RequestError, parse_line, parse_unsigned};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Set(FeatureValue),
    Get(FeatureKind),
    Suspend,
    Resume,
    PowerOff,
    Charger(bool),
    ConfigId,
    FailRegister(u16),
    FailCommand(u8),
    Heal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub text: String,
    pub step: Step,
}

/// Parse a whole script, failing on the first bad line.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, CliError> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let step = parse_step(text).map_err(|message| CliError::script(line, message))?;
        lines.push(ScriptLine {
            line,
            text: text.to_string(),
            step,
        });
    }
    Ok(lines)
}

fn parse_step(text: &str) -> Result<Step, String> {
    let (verb, rest) = text
        .split_once(char::is_whitespace)
        .map_or((text, ""), |(verb, rest)| (verb, rest.trim()));

    match verb {
        "set" => parse_line(rest).map(Step::Set).map_err(|err| err.to_string()),
        "get" => FeatureKind::from_name(rest)
            .map(Step::Get)
            .ok_or_else(|| RequestError::UnknownFeature(rest.to_string()).to_string()),
        "suspend" => Ok(Step::Suspend),
        "resume" => Ok(Step::Resume),
        "power-off" => Ok(Step::PowerOff),
        "config-id" => Ok(Step::ConfigId),
        "heal" => Ok(Step::Heal),
        "charger" => match rest {
            "on" | "1" => Ok(Step::Charger(true)),
            "off" | "0" => Ok(Step::Charger(false)),
            other => Err(format!("charger expects on or off, got {other:?}")),
        },
        "fail-register" => parse_unsigned(rest)
            .and_then(|addr| u16::try_from(addr).ok())
            .map(Step::FailRegister)
            .ok_or_else(|| format!("bad register address {rest:?}")),
        "fail-command" => parse_unsigned(rest)
            .and_then(|cmd| u8::try_from(cmd).ok())
            .map(Step::FailCommand)
            .ok_or_else(|| format!("bad command id {rest:?}")),
        other => Err(format!("unknown step {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_mode_protocol::{EdgeMode, EdgeSuppression, ReportRate, Rotation};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_mixed_script() -> TestResult {
        let script = "# bring up\nresume\n\nset edge 1 0   # big, portrait\nset interpolation 240\nget edge\ncharger off\nfail-register 0x8D\n";
        let lines = parse_script(script)?;
        let steps: Vec<_> = lines.iter().map(|l| l.step.clone()).collect();
        assert_eq!(
            steps,
            vec![
                Step::Resume,
                Step::Set(FeatureValue::Edge(EdgeMode::new(EdgeSuppression::Big, Rotation::Deg0))),
                Step::Set(FeatureValue::ReportRate(ReportRate::Hz240)),
                Step::Get(FeatureKind::Edge),
                Step::Charger(false),
                Step::FailRegister(0x8D),
            ]
        );
        assert_eq!(lines.first().map(|l| l.line), Some(2));
        assert_eq!(lines.get(1).map(|l| l.text.as_str()), Some("set edge 1 0"));
        Ok(())
    }

    #[test]
    fn bad_line_reports_its_number() {
        let err = parse_script("resume\nset pitch 30\n").err();
        assert!(matches!(err, Some(CliError::Script { line: 2, .. })));

        let err = parse_script("wiggle\n").err();
        assert!(matches!(err, Some(CliError::Script { line: 1, ref message }) if message.contains("wiggle")));

        assert!(parse_script("get glove\n").is_err());
        assert!(parse_script("fail-command 0x1ff\n").is_err());
    }
}
