#![allow(dead_code)]

use dalibench::{Device, SignalDesc, SignalRef};

fn line_descs() -> Vec<SignalDesc> {
    ["clk", "rst", "dali_rx", "dali_tx"]
        .iter()
        .map(|n| SignalDesc::new(*n, 1))
        .collect()
}

fn line_lookup(name: &str) -> Option<SignalRef> {
    ["clk", "rst", "dali_rx", "dali_tx"]
        .iter()
        .position(|n| *n == name)
        .map(SignalRef::new)
}

/// Stub device that records the DALI line level once per clock cycle.
pub struct LineRecorder {
    descs: Vec<SignalDesc>,
    values: [bool; 4],
    prev_clk: bool,
    pub samples: Vec<bool>,
}

impl LineRecorder {
    pub fn new() -> Self {
        Self {
            descs: line_descs(),
            values: [false; 4],
            prev_clk: false,
            samples: Vec::new(),
        }
    }
}

impl Default for LineRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for LineRecorder {
    fn signals(&self) -> &[SignalDesc] {
        &self.descs
    }

    fn lookup(&self, name: &str) -> Option<SignalRef> {
        line_lookup(name)
    }

    fn get(&self, signal: SignalRef) -> u64 {
        u64::from(self.values[signal.index()])
    }

    fn set(&mut self, signal: SignalRef, value: u64) {
        self.values[signal.index()] = value != 0;
    }

    fn step(&mut self) {
        let clk = self.values[0];
        if clk && !self.prev_clk {
            self.samples.push(self.values[2]);
        }
        self.prev_clk = clk;
    }
}

/// Stub device that replays a scripted waveform on the DALI output, one
/// level per clock cycle, holding the last level forever.
pub struct ScriptedLine {
    descs: Vec<SignalDesc>,
    values: [bool; 4],
    prev_clk: bool,
    schedule: Vec<bool>,
    ticks: usize,
}

impl ScriptedLine {
    pub fn new(schedule: Vec<bool>) -> Self {
        assert!(!schedule.is_empty());
        Self {
            descs: line_descs(),
            values: [false; 4],
            prev_clk: false,
            schedule,
            ticks: 0,
        }
    }
}

impl Device for ScriptedLine {
    fn signals(&self) -> &[SignalDesc] {
        &self.descs
    }

    fn lookup(&self, name: &str) -> Option<SignalRef> {
        line_lookup(name)
    }

    fn get(&self, signal: SignalRef) -> u64 {
        u64::from(self.values[signal.index()])
    }

    fn set(&mut self, signal: SignalRef, value: u64) {
        if signal.index() != 3 {
            self.values[signal.index()] = value != 0;
        }
    }

    fn step(&mut self) {
        let clk = self.values[0];
        if clk && !self.prev_clk {
            let index = self.ticks.min(self.schedule.len() - 1);
            self.values[3] = self.schedule[index];
            self.ticks += 1;
        }
        self.prev_clk = clk;
    }
}

const BUS_PORTS: [&str; 6] = ["clk", "rst", "fram_cs", "fram_sck", "fram_copi", "fram_cipo"];

/// First cycle of each byte transfer within a read transaction.
const BYTE_STARTS: [u32; 4] = [3, 21, 39, 57];

/// Stub device that plays the memory-bus controller side of one startup
/// read transaction: chip select up on the first cycle, the three
/// scripted command bytes shifted out at one serial-clock toggle per
/// cycle, the data byte shifted in on rising edges, chip select down
/// with one trailing idle cycle.
pub struct ScriptedController {
    descs: Vec<SignalDesc>,
    values: [bool; 6],
    prev_clk: bool,
    frame: [u8; 3],
    phase: u32,
    /// The data byte shifted in from the bench.
    pub data: u8,
}

impl ScriptedController {
    /// `frame` is the opcode, address high and address low bytes to put
    /// on the wire, in that order.
    pub fn new(frame: [u8; 3]) -> Self {
        let mut values = [false; 6];
        // Serial clock idles high.
        values[3] = true;
        Self {
            descs: BUS_PORTS.iter().map(|n| SignalDesc::new(*n, 1)).collect(),
            values,
            prev_clk: false,
            frame,
            phase: 0,
            data: 0,
        }
    }

    fn rising_edge(&mut self) {
        let phase = self.phase;
        self.phase += 1;
        if phase == 0 {
            self.values[2] = true;
            return;
        }
        if phase == 73 {
            self.values[2] = false;
            return;
        }
        for (index, start) in BYTE_STARTS.iter().enumerate() {
            let Some(offset) = phase.checked_sub(*start) else {
                continue;
            };
            if offset >= 16 {
                continue;
            }
            if index < 3 {
                let byte = self.frame[index];
                if offset % 2 == 0 {
                    self.values[3] = false;
                    self.values[4] = (byte >> (7 - offset / 2)) & 1 != 0;
                } else {
                    self.values[3] = true;
                }
            } else {
                if offset == 0 {
                    self.data = 0;
                }
                if offset % 2 == 0 {
                    self.values[3] = false;
                } else {
                    self.values[3] = true;
                    self.data = (self.data << 1) | u8::from(self.values[5]);
                }
            }
            return;
        }
    }
}

impl Device for ScriptedController {
    fn signals(&self) -> &[SignalDesc] {
        &self.descs
    }

    fn lookup(&self, name: &str) -> Option<SignalRef> {
        BUS_PORTS.iter().position(|n| *n == name).map(SignalRef::new)
    }

    fn get(&self, signal: SignalRef) -> u64 {
        u64::from(self.values[signal.index()])
    }

    fn set(&mut self, signal: SignalRef, value: u64) {
        // clk, rst and the data-in wire are the only inputs.
        if matches!(signal.index(), 0 | 1 | 5) {
            self.values[signal.index()] = value != 0;
        }
    }

    fn step(&mut self) {
        let clk = self.values[0];
        if clk && !self.prev_clk {
            self.rising_edge();
        }
        self.prev_clk = clk;
    }
}
