use dalibench::{BenchError, Device, SignalDesc, SignalRef};

/// Fault-injection wrapper: forces the observed value of one wire from a
/// chosen settle step onward, leaving the wrapped model untouched.
///
/// Used by negative tests to prove the bench fails closed: a single
/// corrupted sample anywhere in a scripted transaction must surface as a
/// protocol violation instead of a silently mis-decoded value. Steps are
/// counted per [`Device::step`] call, two per clock cycle.
pub struct Forced<D> {
    inner: D,
    signal: SignalRef,
    value: u64,
    after_steps: u64,
    steps: u64,
}

impl<D: Device> Forced<D> {
    pub fn new(
        inner: D,
        signal: &str,
        value: u64,
        after_steps: u64,
    ) -> Result<Self, BenchError> {
        let signal = inner
            .lookup(signal)
            .ok_or_else(|| BenchError::UnknownSignal(signal.to_string()))?;
        Ok(Self {
            inner,
            signal,
            value,
            after_steps,
            steps: 0,
        })
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: Device> Device for Forced<D> {
    fn signals(&self) -> &[SignalDesc] {
        self.inner.signals()
    }

    fn lookup(&self, name: &str) -> Option<SignalRef> {
        self.inner.lookup(name)
    }

    fn get(&self, signal: SignalRef) -> u64 {
        if signal == self.signal && self.steps >= self.after_steps {
            self.value
        } else {
            self.inner.get(signal)
        }
    }

    fn set(&mut self, signal: SignalRef, value: u64) {
        self.inner.set(signal, value);
    }

    fn step(&mut self) {
        self.inner.step();
        self.steps += 1;
    }
}
