//! Textual request surface: the attribute formats userspace writes and reads.

use crate::error::{EncodingError, RequestError};
use crate::types::{
    EdgeMode, EdgeSuppression, FeatureKind, FeatureValue, PitchMode, PocketMode, ReportRate,
    Rotation, SampleMode, StowedMode,
};

/// First pitch request code; codes `20..=24` select pitch 0..=4.
pub const PITCH_REQUEST_BASE: u32 = 20;

/// Parse an unsigned integer with automatic base detection, as the attribute
/// handlers do: `0x` selects hex, a leading `0` selects octal, anything else
/// is decimal. Surrounding whitespace is ignored.
pub fn parse_unsigned(text: &str) -> Option<u32> {
    let t = text.trim();
    let hex = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X"));
    let (digits, radix) = if let Some(hex) = hex {
        (hex, 16)
    } else if let Some(octal) = t.strip_prefix('0').filter(|rest| !rest.is_empty()) {
        (octal, 8)
    } else {
        (t, 10)
    };
    if digits.starts_with('+') {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// Parse the text written to a feature attribute.
///
/// # Errors
///
/// Returns [`RequestError::Malformed`] when the text is not a number (or two
/// numbers for edge) and [`RequestError::Encoding`] when the numbers fall
/// outside what the feature accepts. Single-number features reject trailing
/// text; edge and pitch ignore anything after the numbers they read.
pub fn parse_request(kind: FeatureKind, text: &str) -> Result<FeatureValue, RequestError> {
    let mut args = text.split_whitespace();
    let mut next = || next_number(&mut args, kind, text);

    let value = match kind {
        FeatureKind::Edge => {
            let suppression = EdgeSuppression::from_request_code(next()?)?;
            let rotation = Rotation::from_request_code(next()?)?;
            FeatureValue::Edge(EdgeMode::new(suppression, rotation))
        }
        FeatureKind::ReportRate => {
            FeatureValue::ReportRate(ReportRate::from_hz(only_number(text, kind)?)?)
        }
        FeatureKind::Sample => FeatureValue::Sample(SampleMode::from_raw(only_number(text, kind)?)),
        FeatureKind::Stowed => FeatureValue::Stowed(StowedMode::new(only_number(text, kind)?)?),
        FeatureKind::Pocket => {
            let raw = only_number(text, kind)?;
            let pocket = match raw {
                0x10 | 0x20 => PocketMode::Off,
                0x11 | 0x21 => PocketMode::On,
                _ => return Err(EncodingError::invalid(kind, raw).into()),
            };
            FeatureValue::Pocket(pocket)
        }
        FeatureKind::Pitch => {
            let raw = next()?;
            let pitch = raw
                .checked_sub(PITCH_REQUEST_BASE)
                .and_then(|index| PitchMode::new(index).ok())
                .ok_or_else(|| EncodingError::invalid(kind, raw))?;
            FeatureValue::Pitch(pitch)
        }
    };
    Ok(value)
}

fn next_number<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    kind: FeatureKind,
    text: &str,
) -> Result<u32, RequestError> {
    args.next()
        .and_then(parse_unsigned)
        .ok_or_else(|| RequestError::malformed(kind, text))
}

/// The whole text must be exactly one number.
fn only_number(text: &str, kind: FeatureKind) -> Result<u32, RequestError> {
    let mut args = text.split_whitespace();
    let raw = next_number(&mut args, kind, text)?;
    match args.next() {
        Some(_) => Err(RequestError::malformed(kind, text)),
        None => Ok(raw),
    }
}

/// Parse a `<feature> <args...>` line.
///
/// # Errors
///
/// Returns [`RequestError::UnknownFeature`] for an unknown leading word and
/// the errors of [`parse_request`] for its arguments.
pub fn parse_line(line: &str) -> Result<FeatureValue, RequestError> {
    let line = line.trim();
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let kind: FeatureKind = name.parse()?;
    parse_request(kind, rest)
}

/// Render a value the way the attribute "show" handlers print it.
pub fn format_value(value: &FeatureValue) -> String {
    match value {
        FeatureValue::Edge(mode) => format!(
            "0x{:02x} 0x{:02x}",
            mode.suppression.raw_byte(),
            mode.rotation.raw_byte()
        ),
        FeatureValue::ReportRate(rate) => format!("0x{:02x}", rate.hz()),
        FeatureValue::Sample(sample) => format!("0x{:02x}", sample.raw()),
        FeatureValue::Stowed(stowed) => format!("0x{:02x}", stowed.raw()),
        FeatureValue::Pocket(pocket) => pocket.raw().to_string(),
        FeatureValue::Pitch(pitch) => pitch.raw().to_string(),
    }
}
