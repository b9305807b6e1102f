//! In-memory controller used by tests and the CLI dry-run mode.
//!
//! A [`SimulatedController`] is a register file plus a log of successful bus
//! traffic. Clones share state, so a test can keep one handle for inspection
//! while the reconciler owns another.

use crate::{Transport, TransportError, TransportResult};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// One successful bus transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BusEvent {
    Write { addr: u16, value: u8 },
    Read { addr: u16, value: u8 },
    Command { cmd: u8, args: Vec<u8> },
}

impl BusEvent {
    /// Whether the event changed controller state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Read { .. })
    }
}

#[derive(Debug, Default)]
struct SimState {
    registers: HashMap<u16, u8>,
    commands: HashMap<u8, Vec<u8>>,
    log: Vec<BusEvent>,
    failing_registers: HashSet<u16>,
    failing_commands: HashSet<u8>,
    fail_all: bool,
    disconnected: bool,
    failed_attempts: usize,
    latency: Duration,
    in_flight: usize,
    max_in_flight: usize,
}

impl SimState {
    fn check_connected(&mut self) -> TransportResult<()> {
        if self.disconnected {
            self.failed_attempts += 1;
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }
}

/// Simulated register-file touch controller.
#[derive(Debug, Clone, Default)]
pub struct SimulatedController {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a register value.
    #[must_use]
    pub fn with_register(self, addr: u16, value: u8) -> Self {
        self.state.lock().registers.insert(addr, value);
        self
    }

    /// Sleep this long inside every transaction, outside the state lock.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.lock().latency = latency;
        self
    }

    pub fn register(&self, addr: u16) -> Option<u8> {
        self.state.lock().registers.get(&addr).copied()
    }

    pub fn set_register(&self, addr: u16, value: u8) {
        self.state.lock().registers.insert(addr, value);
    }

    /// Arguments of the last successful command `cmd`.
    pub fn last_command(&self, cmd: u8) -> Option<Vec<u8>> {
        self.state.lock().commands.get(&cmd).cloned()
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.state.lock().log.clone()
    }

    /// Successful writes and commands, in order.
    pub fn mutations(&self) -> Vec<BusEvent> {
        self.state
            .lock()
            .log
            .iter()
            .filter(|e| e.is_mutation())
            .cloned()
            .collect()
    }

    /// Successful writes to `addr`.
    pub fn writes_to(&self, addr: u16) -> usize {
        self.state
            .lock()
            .log
            .iter()
            .filter(|e| matches!(e, BusEvent::Write { addr: a, .. } if *a == addr))
            .count()
    }

    pub fn failed_attempts(&self) -> usize {
        self.state.lock().failed_attempts
    }

    /// Highest number of transactions observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().max_in_flight
    }

    pub fn clear_log(&self) {
        let mut state = self.state.lock();
        state.log.clear();
        state.failed_attempts = 0;
    }

    /// Make every access to `addr` fail until [`heal`](Self::heal).
    pub fn fail_register(&self, addr: u16) {
        self.state.lock().failing_registers.insert(addr);
    }

    /// Make command `cmd` fail until [`heal`](Self::heal).
    pub fn fail_command(&self, cmd: u8) {
        self.state.lock().failing_commands.insert(cmd);
    }

    /// Make every transaction fail until [`heal`](Self::heal).
    pub fn fail_all(&self) {
        self.state.lock().fail_all = true;
    }

    /// Clear all injected failures.
    pub fn heal(&self) {
        let mut state = self.state.lock();
        state.failing_registers.clear();
        state.failing_commands.clear();
        state.fail_all = false;
    }

    pub fn disconnect(&self) {
        self.state.lock().disconnected = true;
    }

    pub fn reconnect(&self) {
        self.state.lock().disconnected = false;
    }

    /// Wipe every register, as a hardware reset would.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.registers.clear();
        state.commands.clear();
    }

    fn begin(&self) -> Duration {
        let mut state = self.state.lock();
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
        state.latency
    }

    fn end(&self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }

    fn transact<R>(&self, f: impl FnOnce(&mut SimState) -> TransportResult<R>) -> TransportResult<R> {
        let latency = self.begin();
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
        let result = {
            let mut state = self.state.lock();
            state.check_connected().and_then(|()| f(&mut state))
        };
        self.end();
        result
    }
}

impl Transport for SimulatedController {
    fn write_register(&mut self, addr: u16, value: u8) -> TransportResult<()> {
        self.transact(|state| {
            if state.fail_all || state.failing_registers.contains(&addr) {
                state.failed_attempts += 1;
                return Err(TransportError::Write {
                    addr,
                    reason: "injected failure".to_string(),
                });
            }
            trace!(addr = format_args!("{addr:#04x}"), value, "simulated write");
            state.registers.insert(addr, value);
            state.log.push(BusEvent::Write { addr, value });
            Ok(())
        })
    }

    fn read_register(&mut self, addr: u16) -> TransportResult<u8> {
        self.transact(|state| {
            if state.fail_all || state.failing_registers.contains(&addr) {
                state.failed_attempts += 1;
                return Err(TransportError::Read {
                    addr,
                    reason: "injected failure".to_string(),
                });
            }
            let value = state.registers.get(&addr).copied().unwrap_or(0);
            state.log.push(BusEvent::Read { addr, value });
            Ok(value)
        })
    }

    fn send_command(&mut self, cmd: u8, args: &[u8]) -> TransportResult<()> {
        self.transact(|state| {
            if state.fail_all || state.failing_commands.contains(&cmd) {
                state.failed_attempts += 1;
                return Err(TransportError::Command {
                    cmd,
                    reason: "injected failure".to_string(),
                });
            }
            trace!(cmd = format_args!("{cmd:#04x}"), ?args, "simulated command");
            state.commands.insert(cmd, args.to_vec());
            state.log.push(BusEvent::Command {
                cmd,
                args: args.to_vec(),
            });
            Ok(())
        })
    }
}
