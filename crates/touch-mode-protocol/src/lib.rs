//! Touch controller feature-mode protocol: value types, register maps and encoders.
//!
//! This crate is intentionally I/O-free. It turns requested feature modes
//! (edge suppression, report rate, sample, stowed, pocket, pitch) into the
//! ordered register or command steps a controller family expects, so the
//! translation can be tested without hardware or a bus.

#![deny(static_mut_refs)]

pub mod encoder;
pub mod error;
pub mod focaltech;
pub mod goodix;
pub mod registers;
pub mod request;
pub mod types;

pub use encoder::{ControllerFamily, ModeEncoder, RegisterOp, WriteSequence, apply_bits};
pub use error::{EncodingError, RequestError};
pub use focaltech::FocaltechEncoder;
pub use goodix::GoodixEncoder;
pub use request::{format_value, parse_line, parse_request, parse_unsigned};
pub use types::{
    EdgeMode, EdgeSuppression, FeatureKind, FeatureValue, MAX_PITCH, MAX_STOWED, PitchMode,
    PocketMode, ReportRate, Rotation, SAMPLE_ACTIVE_VALUE, SampleMode, StowedMode,
};
