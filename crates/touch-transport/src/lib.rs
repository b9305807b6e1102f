//! Transport contract between the mode reconciler and a touch controller.
//!
//! A transport moves single register bytes or firmware commands over
//! whatever bus the controller sits on. Calls are synchronous and may block
//! for a bus round trip; callers serialize access themselves.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod mock;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("write to register {addr:#04x} failed: {reason}")]
    Write { addr: u16, reason: String },

    #[error("read from register {addr:#04x} failed: {reason}")]
    Read { addr: u16, reason: String },

    #[error("command {cmd:#04x} failed: {reason}")]
    Command { cmd: u8, reason: String },

    #[error("transport does not support {0}")]
    Unsupported(&'static str),

    #[error("device disconnected")]
    Disconnected,
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Byte-level access to a touch controller.
pub trait Transport: Send {
    fn write_register(&mut self, addr: u16, value: u8) -> TransportResult<()>;

    fn read_register(&mut self, addr: u16) -> TransportResult<u8>;

    /// Send a firmware command. Register-only controllers keep the default.
    fn send_command(&mut self, _cmd: u8, _args: &[u8]) -> TransportResult<()> {
        Err(TransportError::Unsupported("firmware commands"))
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_register(&mut self, addr: u16, value: u8) -> TransportResult<()> {
        (**self).write_register(addr, value)
    }

    fn read_register(&mut self, addr: u16) -> TransportResult<u8> {
        (**self).read_register(addr)
    }

    fn send_command(&mut self, cmd: u8, args: &[u8]) -> TransportResult<()> {
        (**self).send_command(cmd, args)
    }
}
