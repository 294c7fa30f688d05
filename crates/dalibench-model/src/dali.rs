//! DALI line engine: Manchester receiver, query dispatch and backward
//! frame transmitter.
//!
//! The receiver arms on the falling edge of the line, samples every
//! half-bit period at its center and keeps the bi-phase discipline for
//! itself: a frame whose second half-bits are not exact complements is
//! dropped without a response. A valid query is answered as a backward
//! frame starting exactly four bit times after the last payload half-bit.

use crate::nvm::{
    NVM_FADE_RATE, NVM_FADE_TIME, NVM_FAILURE_LEVEL, NVM_GROUPS_0_7, NVM_GROUPS_8_15,
    NVM_MAX_LEVEL, NVM_MIN_LEVEL, NVM_POWER_ON_LEVEL, NVM_SCENE_BASE, NVM_SHORT_ADDRESS, NVM_SIZE,
};

/// Half-bit samples in one forward frame: start bit plus 16 bi-phase
/// payload bits.
const FRAME_HALVES: usize = 34;

/// Half-bit periods in one backward frame: start bit plus 8 payload bits.
const RESPONSE_HALVES: u32 = 18;

/// Bit times of bus settling between a forward frame and the response.
const SETTLING_BITS: u32 = 4;

#[derive(Debug)]
enum State {
    Idle,
    Receive {
        /// Cycles since the start edge was detected.
        elapsed: u32,
        halves: [bool; FRAME_HALVES],
    },
    Respond {
        /// Cycles since the response started.
        elapsed: u32,
        byte: u8,
    },
}

#[derive(Debug)]
pub(crate) struct DaliEngine {
    bit_time: u32,
    half_bit: u32,
    state: State,
    prev_rx: bool,
    pub tx: bool,
}

impl DaliEngine {
    pub fn new(bit_time: u32) -> Self {
        Self {
            bit_time,
            half_bit: bit_time / 2,
            state: State::Idle,
            prev_rx: true,
            tx: true,
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.prev_rx = true;
        self.tx = true;
    }

    /// Advance one clock cycle.
    pub fn tick(&mut self, rx: bool, nvm: &[u8; NVM_SIZE]) {
        match &mut self.state {
            State::Idle => {
                if self.prev_rx && !rx {
                    // Start edge. This cycle is the first of the start
                    // bit's low half.
                    self.state = State::Receive {
                        elapsed: 1,
                        halves: [false; FRAME_HALVES],
                    };
                }
            }
            State::Receive { elapsed, halves } => {
                let c = *elapsed;
                if c >= self.half_bit && (c - self.half_bit) % self.bit_time == 0 {
                    let index = ((c - self.half_bit) / self.bit_time) as usize;
                    if index < FRAME_HALVES {
                        halves[index] = rx;
                    }
                }
                let frame_end = (FRAME_HALVES as u32 + SETTLING_BITS) * self.bit_time;
                if c == frame_end {
                    let halves = *halves;
                    self.dispatch(&halves, nvm);
                } else {
                    *elapsed = c + 1;
                }
            }
            State::Respond { elapsed, byte } => {
                *elapsed += 1;
                let half = *elapsed / self.bit_time;
                if half >= RESPONSE_HALVES {
                    self.tx = true;
                    self.state = State::Idle;
                } else {
                    self.tx = response_level(half, *byte);
                }
            }
        }
        self.prev_rx = rx;
    }

    /// Decode the sampled frame and, for a valid query, start the
    /// backward frame on this very cycle.
    fn dispatch(&mut self, halves: &[bool; FRAME_HALVES], nvm: &[u8; NVM_SIZE]) {
        let Some(frame) = decode_frame(halves) else {
            self.state = State::Idle;
            return;
        };
        match response_for(frame, nvm) {
            Some(byte) => {
                log::trace!("dali engine: frame {frame:#06x} -> response {byte:#04x}");
                self.tx = false;
                self.state = State::Respond { elapsed: 0, byte };
            }
            None => {
                log::trace!("dali engine: frame {frame:#06x} ignored");
                self.state = State::Idle;
            }
        }
    }
}

/// Level of the `half`-th half-bit period of a backward frame.
fn response_level(half: u32, byte: u8) -> bool {
    match half {
        0 => false,
        1 => true,
        _ => {
            let bit = (byte >> (7 - (half - 2) / 2)) & 1 != 0;
            if half % 2 == 0 { bit } else { !bit }
        }
    }
}

/// Reassemble a 16-bit frame from half-bit samples, enforcing start
/// framing and the bi-phase complement on every payload bit.
fn decode_frame(halves: &[bool; FRAME_HALVES]) -> Option<u16> {
    if halves[0] || !halves[1] {
        return None;
    }
    let mut frame = 0u16;
    for bit in 0..16 {
        let first = halves[2 + 2 * bit];
        let second = halves[3 + 2 * bit];
        if first == second {
            return None;
        }
        frame = (frame << 1) | u16::from(first);
    }
    Some(frame)
}

/// Query dispatch against the configuration image. `None` means the
/// frame warrants no backward frame.
fn response_for(frame: u16, nvm: &[u8; NVM_SIZE]) -> Option<u8> {
    let address = (frame >> 8) as u8;
    let opcode = frame as u8;
    // Special frame: Query Short Address.
    if address == 0xbb && opcode == 0x00 {
        return Some(nvm[NVM_SHORT_ADDRESS]);
    }
    // Only broadcast command frames are handled.
    if address != 0xff {
        return None;
    }
    match opcode {
        0xa1 => Some(nvm[NVM_MAX_LEVEL]),
        0xa2 => Some(nvm[NVM_MIN_LEVEL]),
        0xa3 => Some(nvm[NVM_POWER_ON_LEVEL]),
        0xa4 => Some(nvm[NVM_FAILURE_LEVEL]),
        0xa5 => Some((nvm[NVM_FADE_TIME] << 4) | (nvm[NVM_FADE_RATE] & 0x0f)),
        0xb0..=0xbf => Some(nvm[NVM_SCENE_BASE + usize::from(opcode & 0x0f)]),
        0xc0 => Some(nvm[NVM_GROUPS_0_7]),
        0xc1 => Some(nvm[NVM_GROUPS_8_15]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> [u8; NVM_SIZE] {
        let mut nvm = [0u8; NVM_SIZE];
        for (addr, byte) in nvm.iter_mut().enumerate() {
            *byte = addr as u8 + 5;
        }
        nvm
    }

    #[test]
    fn query_dispatch_reads_the_image() {
        let nvm = image();
        assert_eq!(response_for(0xffa1, &nvm), Some(5));
        assert_eq!(response_for(0xffa2, &nvm), Some(6));
        assert_eq!(response_for(0xffa3, &nvm), Some(8));
        assert_eq!(response_for(0xffa4, &nvm), Some(7));
        // Fade time 9, fade rate 10, packed as nibbles.
        assert_eq!(response_for(0xffa5, &nvm), Some(0x9a));
        for scene in 0..16u16 {
            assert_eq!(response_for(0xffb0 + scene, &nvm), Some(0x0b + scene as u8));
        }
        assert_eq!(response_for(0xffc0, &nvm), Some(0x1b));
        assert_eq!(response_for(0xffc1, &nvm), Some(0x1c));
        assert_eq!(response_for(0xbb00, &nvm), Some(0x1d));
    }

    #[test]
    fn unknown_frames_stay_silent() {
        let nvm = image();
        assert_eq!(response_for(0xff00, &nvm), None);
        assert_eq!(response_for(0x01a1, &nvm), None);
        assert_eq!(response_for(0xbb01, &nvm), None);
    }

    #[test]
    fn decode_rejects_broken_complements() {
        let mut halves = [false; FRAME_HALVES];
        halves[1] = true;
        // All-zero payload with proper complements.
        for bit in 0..16 {
            halves[3 + 2 * bit] = true;
        }
        assert_eq!(decode_frame(&halves), Some(0));
        halves[3] = false;
        assert_eq!(decode_frame(&halves), None);
    }

    #[test]
    fn decode_rejects_bad_start_framing() {
        let halves = [true; FRAME_HALVES];
        assert_eq!(decode_frame(&halves), None);
    }

    #[test]
    fn response_levels_are_bi_phase() {
        let byte = 0x5a;
        assert!(!response_level(0, byte));
        assert!(response_level(1, byte));
        for bit in 0..8u32 {
            let value = (byte >> (7 - bit)) & 1 != 0;
            assert_eq!(response_level(2 + 2 * bit, byte), value);
            assert_eq!(response_level(3 + 2 * bit, byte), !value);
        }
    }
}
