/// A resolved handle to one named wire of the device model.
///
/// Handles are plain indices into the model's signal table, so they stay
/// valid for the lifetime of the model and are cheap to copy around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignalRef(pub(crate) usize);

impl SignalRef {
    /// Handle for the `index`-th entry of a model's signal table.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index of this signal in the model's signal table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Introspection record for one wire: its hierarchical name and bit width.
#[derive(Debug, Clone)]
pub struct SignalDesc {
    pub name: String,
    pub width: usize,
}

impl SignalDesc {
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// The device-under-test contract.
///
/// A model exposes named wires, readable and (for inputs) writable by the
/// bench, and a [`step`](Device::step) operation that settles combinational
/// logic to a fixed point. Registered state updates on the rising edge of
/// the `clk` input as observed across consecutive `step` calls.
///
/// Every `set` must be followed by a `step` before the new value may be
/// considered settled; sampling without an intervening step is undefined
/// per the model's settling contract.
pub trait Device {
    /// All wires of the model, in handle order. `SignalRef(i)` addresses
    /// the `i`-th entry of this slice.
    fn signals(&self) -> &[SignalDesc];

    /// Resolve a wire by name.
    fn lookup(&self, name: &str) -> Option<SignalRef>;

    /// Sample the current settled value of a wire.
    fn get(&self, signal: SignalRef) -> u64;

    /// Drive an input wire. Takes effect at the next `step`.
    fn set(&mut self, signal: SignalRef, value: u64);

    /// Propagate combinational logic for one delta.
    fn step(&mut self);
}
