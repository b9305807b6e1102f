//! Commonly used types for driving a reconciler.
//!
//! ```rust
//! use touch_mode_engine::prelude::*;
//!
//! let caps = CapabilityFlags::none().with(FeatureKind::Edge, true);
//! assert!(caps.supports(FeatureKind::Edge));
//! ```

pub use crate::capabilities::CapabilityFlags;
pub use crate::config::{DeviceConfig, FleetConfig};
pub use crate::error::{ConfigError, ReconcileError, ReconcileResult};
pub use crate::lifecycle::{PowerLifecycle, TransitionReport};
pub use crate::reconciler::TouchModeReconciler;
pub use crate::state::{ApplyOutcome, DeferReason, ModeSnapshot, PowerState};
pub use touch_mode_protocol::{ControllerFamily, FeatureKind, FeatureValue};
