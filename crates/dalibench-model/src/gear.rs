use crate::dali::DaliEngine;
use crate::nvm::NVM_SIZE;
use crate::persist::PersistEngine;
use dalibench::{Device, SignalDesc, SignalRef};
use fxhash::FxHashMap;

const CLK: usize = 0;
const RST: usize = 1;
const DALI_RX: usize = 2;
const DALI_TX: usize = 3;
const FRAM_CS: usize = 4;
const FRAM_SCK: usize = 5;
const FRAM_COPI: usize = 6;
const FRAM_CIPO: usize = 7;

/// The DALI control gear under test.
///
/// Synchronous behavioral model: inputs are sampled and registered state
/// updates on the rising edge of `clk` as observed across `step` calls,
/// matching the settling contract of a compiled register-transfer model.
/// Reset is synchronous and re-arms the startup configuration fetch.
pub struct ControlGear {
    descs: Vec<SignalDesc>,
    by_name: FxHashMap<String, usize>,
    clk: bool,
    rst: bool,
    dali_rx: bool,
    fram_cipo: bool,
    prev_clk: bool,
    dali: DaliEngine,
    persist: PersistEngine,
    nvm: [u8; NVM_SIZE],
}

impl ControlGear {
    /// Build the model. `bit_time` is the clock divider for one DALI bit
    /// period, the same quantity the bench derives from its
    /// configuration.
    pub fn new(bit_time: u32) -> Self {
        let names = [
            "clk", "rst", "dali_rx", "dali_tx", "fram_cs", "fram_sck", "fram_copi", "fram_cipo",
        ];
        let descs = names.iter().map(|n| SignalDesc::new(*n, 1)).collect();
        let by_name = names
            .iter()
            .enumerate()
            .map(|(i, n)| ((*n).to_string(), i))
            .collect();
        Self {
            descs,
            by_name,
            clk: false,
            rst: false,
            dali_rx: false,
            fram_cipo: false,
            prev_clk: false,
            dali: DaliEngine::new(bit_time),
            persist: PersistEngine::new(),
            nvm: [0; NVM_SIZE],
        }
    }

    /// The configuration image as fetched from the FRAM so far.
    pub fn nvm(&self) -> &[u8; NVM_SIZE] {
        &self.nvm
    }

    /// True once the startup configuration fetch has completed.
    pub fn provisioned(&self) -> bool {
        self.persist.done()
    }

    fn rising_edge(&mut self) {
        if self.rst {
            self.dali.reset();
            self.persist.reset();
            self.nvm = [0; NVM_SIZE];
            return;
        }
        if let Some((addr, byte)) = self.persist.tick(self.fram_cipo) {
            self.nvm[addr] = byte;
        }
        self.dali.tick(self.dali_rx, &self.nvm);
    }
}

impl Device for ControlGear {
    fn signals(&self) -> &[SignalDesc] {
        &self.descs
    }

    fn lookup(&self, name: &str) -> Option<SignalRef> {
        self.by_name.get(name).copied().map(SignalRef::new)
    }

    fn get(&self, signal: SignalRef) -> u64 {
        let value = match signal.index() {
            CLK => self.clk,
            RST => self.rst,
            DALI_RX => self.dali_rx,
            DALI_TX => self.dali.tx,
            FRAM_CS => self.persist.cs,
            FRAM_SCK => self.persist.sck,
            FRAM_COPI => self.persist.copi,
            FRAM_CIPO => self.fram_cipo,
            _ => false,
        };
        u64::from(value)
    }

    fn set(&mut self, signal: SignalRef, value: u64) {
        let value = value != 0;
        match signal.index() {
            CLK => self.clk = value,
            RST => self.rst = value,
            DALI_RX => self.dali_rx = value,
            FRAM_CIPO => self.fram_cipo = value,
            // Output wires ignore writes.
            _ => {}
        }
    }

    fn step(&mut self) {
        if self.clk && !self.prev_clk {
            self.rising_edge();
        }
        self.prev_clk = self.clk;
    }
}
