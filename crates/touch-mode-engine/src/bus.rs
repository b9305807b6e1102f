//! Runs encoded register steps over a transport.

use touch_mode_protocol::{RegisterOp, WriteSequence, apply_bits};
use touch_transport::{Transport, TransportResult};
use tracing::trace;

/// Execute one step. `UpdateBits` is a read followed by a write.
pub fn run_op<T: Transport + ?Sized>(transport: &mut T, op: &RegisterOp) -> TransportResult<()> {
    trace!(%op, "bus step");
    match op {
        RegisterOp::Write { addr, value } => transport.write_register(*addr, *value),
        RegisterOp::UpdateBits { addr, mask, set } => {
            let current = transport.read_register(*addr)?;
            transport.write_register(*addr, apply_bits(current, *mask, *set))
        }
        RegisterOp::Command { cmd, args } => transport.send_command(*cmd, args),
    }
}

/// Execute every step in order, stopping at the first failure.
pub fn run_sequence<T: Transport + ?Sized>(
    transport: &mut T,
    sequence: &WriteSequence,
) -> TransportResult<()> {
    sequence.ops.iter().try_for_each(|op| run_op(transport, op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use touch_transport::TransportError;
    use touch_transport::mock::{BusEvent, SimulatedController};

    #[test]
    fn test_update_bits_preserves_other_bits() -> TransportResult<()> {
        let mut sim = SimulatedController::new().with_register(0x8B, 0x01);
        run_op(&mut sim, &RegisterOp::UpdateBits { addr: 0x8B, mask: 0x80, set: true })?;
        assert_eq!(sim.register(0x8B), Some(0x81));

        run_op(&mut sim, &RegisterOp::UpdateBits { addr: 0x8B, mask: 0x80, set: false })?;
        assert_eq!(sim.register(0x8B), Some(0x01));
        Ok(())
    }

    #[test]
    fn test_sequence_stops_at_first_failure() {
        let mut sim = SimulatedController::new();
        sim.fail_register(0x8D);
        let sequence = WriteSequence::new(vec![
            RegisterOp::write(0x8C, 2),
            RegisterOp::write(0x8D, 1),
            RegisterOp::write(0x8E, 0x18),
        ]);

        let result = run_sequence(&mut sim, &sequence);
        assert!(matches!(result, Err(TransportError::Write { addr: 0x8D, .. })));
        assert_eq!(sim.mutations(), vec![BusEvent::Write { addr: 0x8C, value: 2 }]);
    }
}
