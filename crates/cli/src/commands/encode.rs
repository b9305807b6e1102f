//! Show the bus steps a single request encodes to

use anyhow::Result;
use serde::Serialize;
use touch_mode_protocol::{ControllerFamily, FeatureKind, RegisterOp, format_value, parse_line};

use crate::commands::EncodeArgs;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Encoding {
    pub family: ControllerFamily,
    pub feature: FeatureKind,
    /// Value as the attribute would show it back.
    pub value: String,
    pub ops: Vec<RegisterOp>,
    pub settle: bool,
}

/// Execute encode command
pub fn execute(args: &EncodeArgs, json: bool) -> Result<()> {
    let encoding = encode(ControllerFamily::from(args.family), &args.request.join(" "))?;
    output::print_encoding(&encoding, json);
    Ok(())
}

pub fn encode(family: ControllerFamily, request: &str) -> Result<Encoding, CliError> {
    let value = parse_line(request)?;
    let sequence = family
        .encoder()
        .encode(&value)
        .map_err(|err| CliError::InvalidRequest(err.into()))?;
    Ok(Encoding {
        family,
        feature: value.kind(),
        value: format_value(&value),
        ops: sequence.ops,
        settle: sequence.settle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_goodix_pitch() -> Result<(), CliError> {
        let encoding = encode(ControllerFamily::Goodix, "pitch 22")?;
        assert_eq!(encoding.feature, FeatureKind::Pitch);
        assert_eq!(encoding.value, "2");
        assert_eq!(encoding.ops, vec![RegisterOp::command(0x29, &[2])]);
        assert!(encoding.settle);
        Ok(())
    }

    #[test]
    fn encode_rejects_unknown_feature() {
        assert!(matches!(
            encode(ControllerFamily::Focaltech, "glove 1"),
            Err(CliError::InvalidRequest(_))
        ));
    }
}
