//! Startup persistence engine: the SPI controller side of the FRAM bus.
//!
//! After reset release the engine fetches the whole configuration image,
//! one read transaction per address. A transaction occupies a fixed
//! 75-cycle schedule: chip select rises on the first cycle, two pacing
//! cycles, then opcode, address high and address low bytes shift out at
//! one serial-clock toggle per cycle (data changes while the clock is
//! low), two pacing cycles between bytes, the data byte shifts in on
//! rising edges, and chip select drops with one trailing idle cycle.

use crate::nvm::NVM_SIZE;

/// FRAM read opcode.
const OPCODE_READ: u8 = 0x03;

/// Cycles in one complete read transaction.
const TRANSACTION_CYCLES: u32 = 75;

/// First cycle of each byte transfer within the schedule.
const BYTE_STARTS: [u32; 4] = [3, 21, 39, 57];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// One launch cycle after reset release before the first transaction.
    Launch,
    Fetch { addr: u16, phase: u32 },
    Done,
}

#[derive(Debug)]
pub(crate) struct PersistEngine {
    state: State,
    shift: u8,
    pub cs: bool,
    pub sck: bool,
    pub copi: bool,
}

impl PersistEngine {
    pub fn new() -> Self {
        let mut engine = Self {
            state: State::Launch,
            shift: 0,
            cs: false,
            sck: true,
            copi: false,
        };
        engine.reset();
        engine
    }

    pub fn reset(&mut self) {
        self.state = State::Launch;
        self.shift = 0;
        self.cs = false;
        self.sck = true;
        self.copi = false;
    }

    /// Advance one clock cycle. Returns the fetched `(address, byte)`
    /// pair when a transaction completes.
    pub fn tick(&mut self, cipo: bool) -> Option<(usize, u8)> {
        match self.state {
            State::Launch => {
                self.state = State::Fetch { addr: 0, phase: 0 };
                None
            }
            State::Fetch { addr, phase } => {
                let fetched = self.run_phase(addr, phase, cipo);
                let next_phase = phase + 1;
                self.state = if next_phase < TRANSACTION_CYCLES {
                    State::Fetch {
                        addr,
                        phase: next_phase,
                    }
                } else if usize::from(addr) + 1 < NVM_SIZE {
                    State::Fetch {
                        addr: addr + 1,
                        phase: 0,
                    }
                } else {
                    State::Done
                };
                fetched
            }
            State::Done => None,
        }
    }

    pub fn done(&self) -> bool {
        self.state == State::Done
    }

    fn run_phase(&mut self, addr: u16, phase: u32, cipo: bool) -> Option<(usize, u8)> {
        if phase == 0 {
            self.cs = true;
            return None;
        }
        if phase == TRANSACTION_CYCLES - 2 {
            self.cs = false;
            return Some((usize::from(addr), self.shift));
        }
        for (index, start) in BYTE_STARTS.iter().enumerate() {
            let Some(offset) = phase.checked_sub(*start) else {
                continue;
            };
            if offset >= 16 {
                continue;
            }
            if index < 3 {
                // Command framing shifts out, MSB first.
                let byte = match index {
                    0 => OPCODE_READ,
                    1 => (addr >> 8) as u8,
                    _ => addr as u8,
                };
                if offset % 2 == 0 {
                    self.sck = false;
                    self.copi = (byte >> (7 - offset / 2)) & 1 != 0;
                } else {
                    self.sck = true;
                }
            } else {
                // Data byte shifts in on rising edges.
                if offset == 0 {
                    self.shift = 0;
                }
                if offset % 2 == 0 {
                    self.sck = false;
                } else {
                    self.sck = true;
                    self.shift = (self.shift << 1) | u8::from(cipo);
                }
            }
            return None;
        }
        // Pacing cycles between bytes hold the bus state.
        None
    }
}
