use crate::{BenchConfig, BenchError, Device, SignalRef, VcdWriter};
use std::path::Path;

/// Simulated nanoseconds per model half-cycle.
const HALF_CYCLE_NS: u64 = 500;

/// The clocked bench context.
///
/// Owns the device model, the monotonic timestamp and the optional trace
/// sink. [`cycle_clock`](Bench::cycle_clock) is the sole place simulated
/// time advances; every higher-level wait is a bounded number of calls to
/// it, never a blocking operation, so runs are fully deterministic.
pub struct Bench<D: Device> {
    dut: D,
    clk: SignalRef,
    rst: SignalRef,
    bit_time: u32,
    time: u64,
    vcd: Option<VcdWriter>,
}

impl<D: Device> Bench<D> {
    /// Wrap a device model, resolving the `clk` and `rst` ports and
    /// validating the timing configuration.
    pub fn new(dut: D, config: &BenchConfig) -> Result<Self, BenchError> {
        let bit_time = config.bit_time()?;
        let clk = resolve(&dut, "clk")?;
        let rst = resolve(&dut, "rst")?;
        Ok(Self {
            dut,
            clk,
            rst,
            bit_time,
            time: 0,
            vcd: None,
        })
    }

    /// Attach a VCD trace sink recording every signal of the model.
    pub fn record_vcd<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BenchError> {
        self.vcd = Some(VcdWriter::new(path, self.dut.signals())?);
        Ok(())
    }

    /// Resolve a wire of the model by name.
    pub fn signal(&self, name: &str) -> Result<SignalRef, BenchError> {
        resolve(&self.dut, name)
    }

    /// Current simulated time in nanoseconds.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Clock cycles per protocol bit period.
    pub fn bit_time(&self) -> u32 {
        self.bit_time
    }

    /// Drive a single-bit input wire. Settles at the next clock step.
    pub fn set(&mut self, signal: SignalRef, value: bool) {
        self.dut.set(signal, u64::from(value));
    }

    /// Sample a single-bit wire of the model.
    pub fn get(&self, signal: SignalRef) -> bool {
        self.dut.get(signal) != 0
    }

    /// Assert that a wire currently carries `want`.
    pub fn expect(&self, signal: SignalRef, want: bool) -> Result<(), BenchError> {
        let observed = self.get(signal);
        if observed == want {
            Ok(())
        } else {
            Err(self.violation(&self.name_of(signal), u64::from(want), u64::from(observed)))
        }
    }

    /// Build a protocol-violation fault stamped with the current time.
    pub fn violation(&self, subject: &str, expected: u64, observed: u64) -> BenchError {
        BenchError::Violation {
            subject: subject.to_string(),
            expected,
            observed,
            time: self.time,
        }
    }

    /// Advance the model by one full clock period: low half-cycle, settle,
    /// trace sample, then high half-cycle, settle, trace sample. Two step
    /// passes, 1000 ns.
    pub fn cycle_clock(&mut self) {
        self.half_cycle(false);
        self.half_cycle(true);
    }

    /// Repeat [`cycle_clock`](Bench::cycle_clock) for one protocol bit
    /// period.
    pub fn wait_bit_time(&mut self) {
        for _ in 0..self.bit_time {
            self.cycle_clock();
        }
    }

    /// Hold reset active for one full clock period, then release it.
    pub fn pulse_reset(&mut self) {
        self.dut.set(self.rst, 1);
        self.dut.set(self.clk, 1);
        self.dut.step();
        self.cycle_clock();
        self.dut.set(self.rst, 0);
    }

    /// Drain buffered trace samples to disk.
    pub fn flush_trace(&mut self) -> Result<(), BenchError> {
        if let Some(vcd) = self.vcd.as_mut() {
            vcd.flush()?;
        }
        Ok(())
    }

    /// Consume the bench, flushing the trace, and hand the model back.
    pub fn finish(mut self) -> Result<D, BenchError> {
        self.flush_trace()?;
        Ok(self.dut)
    }

    fn half_cycle(&mut self, level: bool) {
        self.dut.set(self.clk, u64::from(level));
        self.dut.step();
        if let Some(vcd) = self.vcd.as_mut() {
            let dut = &self.dut;
            vcd.sample(self.time, |s| dut.get(s));
        }
        self.time += HALF_CYCLE_NS;
    }

    fn name_of(&self, signal: SignalRef) -> String {
        self.dut
            .signals()
            .get(signal.index())
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("signal #{}", signal.index()))
    }
}

fn resolve<D: Device>(dut: &D, name: &str) -> Result<SignalRef, BenchError> {
    dut.lookup(name)
        .ok_or_else(|| BenchError::UnknownSignal(name.to_string()))
}
