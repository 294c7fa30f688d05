use crate::{Bench, BenchError, Device, SignalRef};

/// Handles onto the single-wire DALI link of the device: the bench drives
/// `dali_rx` (forward frames into the device) and observes `dali_tx`
/// (backward frames out of it).
#[derive(Debug, Clone, Copy)]
pub struct DaliLink {
    rx: SignalRef,
    tx: SignalRef,
}

impl DaliLink {
    /// Resolve the link ports on the model.
    pub fn bind<D: Device>(bench: &Bench<D>) -> Result<Self, BenchError> {
        Ok(Self {
            rx: bench.signal("dali_rx")?,
            tx: bench.signal("dali_tx")?,
        })
    }

    /// Drive the line to its idle (high) state.
    pub fn idle<D: Device>(&self, bench: &mut Bench<D>) {
        bench.set(self.rx, true);
    }

    /// Transmit one 16-bit forward frame.
    ///
    /// Start bit (one bit time low, one high), then the 16 payload bits
    /// most-significant first, each half-bit-period carrying the bit value
    /// followed by its logical complement, then four bit times of idle
    /// high to satisfy the receiver's inter-frame gap. A pure generator:
    /// it cannot itself detect a protocol error, so it has no failure
    /// path; mismatches surface on the response side.
    pub fn send_command<D: Device>(&self, bench: &mut Bench<D>, command: u16) {
        log::debug!("dali: sending frame {command:#06x}");
        // Start bit.
        bench.set(self.rx, false);
        bench.wait_bit_time();
        bench.set(self.rx, true);
        bench.wait_bit_time();
        // Payload, bi-phase encoded.
        for i in (0..16).rev() {
            let bit = (command >> i) & 1 != 0;
            bench.set(self.rx, bit);
            bench.wait_bit_time();
            bench.set(self.rx, !bit);
            bench.wait_bit_time();
        }
        // Stop condition.
        bench.set(self.rx, true);
        for _ in 0..4 {
            bench.wait_bit_time();
        }
    }

    /// Receive and verify one 8-bit backward frame.
    ///
    /// Decoding and conformance checking are the same code path: a
    /// bi-phase line code is correct exactly when every second half-bit is
    /// the complement of the first, so each sampled symbol is asserted as
    /// it is shifted in. The first mismatch aborts with a violation.
    pub fn recv_response<D: Device>(&self, bench: &mut Bench<D>) -> Result<u8, BenchError> {
        // Processing latency budget before the device must answer.
        for _ in 0..3 {
            bench.cycle_clock();
        }
        // Start bit framing.
        bench.expect(self.tx, false)?;
        bench.wait_bit_time();
        bench.expect(self.tx, true)?;
        bench.wait_bit_time();
        // Payload, most-significant bit first.
        let mut response = 0u8;
        for _ in 0..8 {
            let bit = bench.get(self.tx);
            response = (response << 1) | u8::from(bit);
            bench.wait_bit_time();
            bench.expect(self.tx, !bit)?;
            bench.wait_bit_time();
        }
        // Stop condition: the line must be held idle high.
        bench.expect(self.tx, true)?;
        for _ in 0..4 {
            bench.wait_bit_time();
        }
        log::debug!("dali: received response {response:#04x}");
        Ok(response)
    }
}
