use crate::{Bench, BenchError, Device, SignalRef};

/// FRAM read opcode the device must issue for every startup fetch.
const OPCODE_READ: u8 = 0x03;

/// Offset applied to the address to derive the stored test-pattern byte.
/// Deterministic per address so later transactions can verify it.
const PATTERN_OFFSET: u8 = 5;

/// Handles onto the four-wire serial memory bus. The device is the bus
/// controller; the bench plays the FRAM, so `fram_cs`, `fram_sck` and
/// `fram_copi` are observed outputs while `fram_cipo` is driven.
#[derive(Debug, Clone, Copy)]
pub struct MemoryLink {
    cs: SignalRef,
    sck: SignalRef,
    copi: SignalRef,
    cipo: SignalRef,
}

impl MemoryLink {
    /// Resolve the memory-bus ports on the model.
    pub fn bind<D: Device>(bench: &Bench<D>) -> Result<Self, BenchError> {
        Ok(Self {
            cs: bench.signal("fram_cs")?,
            sck: bench.signal("fram_sck")?,
            copi: bench.signal("fram_copi")?,
            cipo: bench.signal("fram_cipo")?,
        })
    }

    /// Shift one byte out of the controller, most-significant bit first.
    ///
    /// Each bit occupies two clock cycles: the serial clock must be
    /// observed low after the first and high after the second, where the
    /// data line is sampled.
    pub fn read_byte<D: Device>(&self, bench: &mut Bench<D>) -> Result<u8, BenchError> {
        let mut byte = 0u8;
        for _ in 0..8 {
            bench.cycle_clock();
            bench.expect(self.sck, false)?;
            bench.cycle_clock();
            bench.expect(self.sck, true)?;
            byte = (byte << 1) | u8::from(bench.get(self.copi));
        }
        Ok(byte)
    }

    /// Shift one byte into the controller, most-significant bit first.
    /// The data line is driven while the serial clock is low and the
    /// controller samples it on the rising edge.
    pub fn write_byte<D: Device>(&self, bench: &mut Bench<D>, byte: u8) -> Result<(), BenchError> {
        for i in (0..8).rev() {
            bench.cycle_clock();
            bench.expect(self.sck, false)?;
            bench.set(self.cipo, (byte >> i) & 1 != 0);
            bench.cycle_clock();
            bench.expect(self.sck, true)?;
        }
        Ok(())
    }

    /// Serve and verify one complete startup read transaction for `addr`.
    ///
    /// Chip select must go active within one cycle, the command framing
    /// must read back as opcode, address high byte, address low byte, and
    /// the bench then supplies the stored byte `addr + 5 (mod 256)` before
    /// chip select must drop again. Any framing byte or chip-select
    /// timing mismatch is fatal.
    pub fn write_address<D: Device>(
        &self,
        bench: &mut Bench<D>,
        addr: u16,
    ) -> Result<(), BenchError> {
        bench.cycle_clock();
        bench.expect(self.cs, true)?;
        bench.cycle_clock();
        bench.cycle_clock();
        self.expect_byte(bench, "memory opcode", OPCODE_READ)?;
        bench.cycle_clock();
        bench.cycle_clock();
        self.expect_byte(bench, "address high byte", (addr >> 8) as u8)?;
        bench.cycle_clock();
        bench.cycle_clock();
        self.expect_byte(bench, "address low byte", addr as u8)?;
        bench.cycle_clock();
        bench.cycle_clock();
        self.write_byte(bench, (addr as u8).wrapping_add(PATTERN_OFFSET))?;
        bench.cycle_clock();
        bench.expect(self.cs, false)?;
        bench.cycle_clock();
        log::debug!("spi: served startup read of address {addr:#06x}");
        Ok(())
    }

    fn expect_byte<D: Device>(
        &self,
        bench: &mut Bench<D>,
        subject: &str,
        want: u8,
    ) -> Result<(), BenchError> {
        let byte = self.read_byte(bench)?;
        if byte == want {
            Ok(())
        } else {
            Err(bench.violation(subject, u64::from(want), u64::from(byte)))
        }
    }
}
