//! Per-device reconciliation of requested and applied feature modes.
//!
//! A [`TouchModeReconciler`] owns one lock guarding the desired snapshot,
//! the applied snapshot, the power state and the transport. Every request,
//! bus transaction and settle delay for a device runs under that lock, so
//! write sequences from concurrent callers never interleave.

use crate::bus;
use crate::capabilities::CapabilityFlags;
use crate::config::DeviceConfig;
use crate::error::{ReconcileError, ReconcileResult};
use crate::state::{ApplyOutcome, DeferReason, ModeSnapshot, PowerState};
use parking_lot::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use touch_mode_protocol::{
    ControllerFamily, FeatureKind, FeatureValue, ModeEncoder, format_value,
};
use touch_transport::Transport;
use tracing::{debug, info, warn};

/// Delay after a settling write, matching the controller's register latch time.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(20);

pub(crate) struct Inner<T> {
    pub(crate) transport: T,
    pub(crate) desired: ModeSnapshot,
    pub(crate) applied: ModeSnapshot,
    pub(crate) power: PowerState,
}

/// Feature-mode state machine for one attached controller.
pub struct TouchModeReconciler<T: Transport> {
    name: String,
    encoder: Box<dyn ModeEncoder>,
    capabilities: CapabilityFlags,
    settle: Duration,
    inner: Mutex<Inner<T>>,
}

impl<T: Transport> TouchModeReconciler<T> {
    /// Attach a controller. Both snapshots start at power-on defaults and the
    /// device starts powered off until the first resume.
    pub fn new(
        name: impl Into<String>,
        encoder: Box<dyn ModeEncoder>,
        capabilities: CapabilityFlags,
        transport: T,
    ) -> Self {
        let name = name.into();
        info!(device = %name, vendor = encoder.vendor(), "touch controller attached");
        Self {
            name,
            encoder,
            capabilities,
            settle: DEFAULT_SETTLE,
            inner: Mutex::new(Inner {
                transport,
                desired: ModeSnapshot::default(),
                applied: ModeSnapshot::default(),
                power: PowerState::PowerOff,
            }),
        }
    }

    /// Attach using a device entry from a config file.
    pub fn from_config(config: &DeviceConfig, transport: T) -> Self {
        Self::new(
            config.name.clone(),
            config.family.encoder(),
            config.capabilities,
            transport,
        )
        .with_settle(config.settle())
    }

    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ControllerFamily {
        self.encoder.family()
    }

    pub fn capabilities(&self) -> CapabilityFlags {
        self.capabilities
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Request a feature value.
    ///
    /// The value is always recorded as desired. It is written immediately
    /// when it differs from what is applied and the power state allows it,
    /// otherwise the call returns [`ApplyOutcome::Unchanged`] or
    /// [`ApplyOutcome::Deferred`] without bus traffic.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::Unsupported`] if the capability is not enabled;
    ///   nothing is recorded.
    /// - [`ReconcileError::Encoding`] if this family cannot express the value.
    /// - [`ReconcileError::Transport`] if a bus step failed; applied state is
    ///   unchanged and a later resume retries.
    pub fn apply(&self, value: FeatureValue) -> ReconcileResult<ApplyOutcome> {
        let kind = value.kind();
        if !self.capabilities.supports(kind) {
            return Err(ReconcileError::Unsupported(kind.name()));
        }
        let mut inner = self.inner.lock();
        self.apply_locked(&mut inner, value)
    }

    pub(crate) fn apply_locked(
        &self,
        inner: &mut Inner<T>,
        value: FeatureValue,
    ) -> ReconcileResult<ApplyOutcome> {
        let kind = value.kind();
        inner.desired.set(value);

        if inner.applied.get(kind) == value {
            debug!(device = %self.name, feature = %kind, "already applied, skipping write");
            return Ok(ApplyOutcome::Unchanged);
        }

        if let Some(reason) = DeferReason::for_state(inner.power, kind) {
            debug!(
                device = %self.name,
                feature = %kind,
                power = %inner.power,
                ?reason,
                "write deferred"
            );
            return Ok(ApplyOutcome::Deferred(reason));
        }

        let sequence = self.encoder.encode(&value)?;
        if let Err(err) = bus::run_sequence(&mut inner.transport, &sequence) {
            warn!(device = %self.name, feature = %kind, error = %err, "mode write failed");
            return Err(err.into());
        }

        inner.applied.set(value);
        info!(
            device = %self.name,
            feature = %kind,
            value = %format_value(&value),
            "mode applied"
        );

        if sequence.settle && !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(ApplyOutcome::Applied)
    }

    /// Snapshot of requested values.
    pub fn desired(&self) -> ModeSnapshot {
        self.inner.lock().desired
    }

    /// Snapshot of values confirmed on the controller.
    pub fn applied(&self) -> ModeSnapshot {
        self.inner.lock().applied
    }

    pub fn applied_value(&self, kind: FeatureKind) -> FeatureValue {
        self.inner.lock().applied.get(kind)
    }

    pub fn desired_value(&self, kind: FeatureKind) -> FeatureValue {
        self.inner.lock().desired.get(kind)
    }

    pub fn power_state(&self) -> PowerState {
        self.inner.lock().power
    }

    /// Applied value of `kind` in its textual attribute format.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Unsupported`] if the capability is not enabled.
    pub fn show(&self, kind: FeatureKind) -> ReconcileResult<String> {
        if !self.capabilities.supports(kind) {
            return Err(ReconcileError::Unsupported(kind.name()));
        }
        Ok(format_value(&self.applied_value(kind)))
    }

    /// Tell the controller whether a charger is attached.
    ///
    /// With pocket control enabled the charger bit shares a register with the
    /// pocket bit and is updated in place.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::Unsupported`] if the family has no charger register.
    /// - [`ReconcileError::PoweredOff`] while the controller is powered off.
    /// - [`ReconcileError::Transport`] if the bus step failed.
    pub fn set_charger_mode(&self, enabled: bool) -> ReconcileResult<()> {
        let op = self
            .encoder
            .charger_op(enabled, self.capabilities.pocket_mode_ctrl)
            .ok_or(ReconcileError::Unsupported("charger_mode"))?;

        let mut inner = self.locked_powered()?;
        bus::run_op(&mut inner.transport, &op).map_err(|err| {
            warn!(device = %self.name, error = %err, "charger mode write failed");
            ReconcileError::from(err)
        })?;
        info!(device = %self.name, enabled, "charger mode set");
        Ok(())
    }

    /// Firmware config id as two lowercase hex digits.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::Unsupported`] if the family exposes no id register.
    /// - [`ReconcileError::PoweredOff`] while the controller is powered off.
    /// - [`ReconcileError::Transport`] if the read failed.
    pub fn config_id(&self) -> ReconcileResult<String> {
        let addr = self
            .encoder
            .config_id_register()
            .ok_or(ReconcileError::Unsupported("config_id"))?;

        let mut inner = self.locked_powered()?;
        let id = inner.transport.read_register(addr)?;
        Ok(format!("{id:02x}"))
    }

    /// Record that the controller lost power. Applied state is kept until the
    /// next resume discards it.
    pub fn power_off(&self) {
        let mut inner = self.inner.lock();
        inner.power = PowerState::PowerOff;
        info!(device = %self.name, "controller powered off");
    }

    /// Run `f` against the transport under the device lock.
    pub fn with_transport<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.lock().transport)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock()
    }

    pub(crate) fn encoder(&self) -> &dyn ModeEncoder {
        self.encoder.as_ref()
    }

    fn locked_powered(&self) -> ReconcileResult<MutexGuard<'_, Inner<T>>> {
        let inner = self.inner.lock();
        if inner.power == PowerState::PowerOff {
            return Err(ReconcileError::PoweredOff);
        }
        Ok(inner)
    }
}

impl<T: Transport> std::fmt::Debug for TouchModeReconciler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TouchModeReconciler")
            .field("name", &self.name)
            .field("family", &self.encoder.family())
            .field("capabilities", &self.capabilities)
            .field("settle", &self.settle)
            .finish_non_exhaustive()
    }
}
