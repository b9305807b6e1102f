//! # touch-mode-engine
//!
//! Keeps a touch controller's feature modes (edge suppression, report rate,
//! sample, stowed, pocket, pitch) in step with what was requested, across
//! suspend, resume and power loss.
//!
//! ## Model
//!
//! Each attached controller gets one [`TouchModeReconciler`]. It records two
//! snapshots: what was *desired* and what is *applied*. A request always
//! updates desired; it reaches the bus only when the value differs from
//! applied and the power state allows it. On resume the
//! [`PowerLifecycle`] hooks replay desired state in a fixed order.
//!
//! - [`reconciler`] - per-device state machine and request path
//! - [`lifecycle`] - suspend/resume hooks and replay reports
//! - [`state`] - snapshots, power state and apply outcomes
//! - [`capabilities`] - per-device feature flags
//! - [`config`] - YAML/JSON device configuration
//!
//! ## Example
//!
//! ```rust
//! use touch_mode_engine::prelude::*;
//! use touch_mode_protocol::{FeatureValue, ReportRate};
//! use touch_transport::mock::SimulatedController;
//!
//! let sim = SimulatedController::new();
//! let device = TouchModeReconciler::new(
//!     "ts0",
//!     ControllerFamily::Focaltech.encoder(),
//!     CapabilityFlags::all(),
//!     sim.clone(),
//! );
//!
//! // Powered off at attach: the request is recorded and waits.
//! let outcome = device.apply(FeatureValue::ReportRate(ReportRate::Hz240));
//! assert_eq!(outcome, Ok(ApplyOutcome::Deferred(DeferReason::PoweredOff)));
//!
//! let report = device.on_post_resume();
//! assert_eq!(report.written(), vec![FeatureKind::ReportRate]);
//! assert_eq!(sim.register(0x8E), Some(0x18));
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_debug_implementations
)]

pub mod bus;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod reconciler;
pub mod state;

pub mod prelude;

pub use capabilities::CapabilityFlags;
pub use config::{DeviceConfig, FleetConfig, MAX_SETTLE_MS};
pub use error::{ConfigError, ReconcileError, ReconcileResult};
pub use lifecycle::{PowerLifecycle, TransitionReport, TransitionStep};
pub use reconciler::{DEFAULT_SETTLE, TouchModeReconciler};
pub use state::{ApplyOutcome, DeferReason, ModeSnapshot, PowerState};
