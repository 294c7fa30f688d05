//! Behavioral reference model of the DALI control gear under test.
//!
//! The model is cycle-accurate at the bench's sampling points: after
//! power-up it acts as the SPI controller fetching its 25-byte persisted
//! configuration from the FRAM, then answers DALI query frames out of
//! that configuration. It implements [`dalibench::Device`], so the same
//! conformance scenario that would run against compiled gateware runs
//! against it unchanged.

mod dali;
mod fault;
mod gear;
mod nvm;
mod persist;

pub use fault::Forced;
pub use gear::ControlGear;
pub use nvm::{
    NVM_FADE_RATE, NVM_FADE_TIME, NVM_FAILURE_LEVEL, NVM_GROUPS_0_7, NVM_GROUPS_8_15,
    NVM_MAX_LEVEL, NVM_MIN_LEVEL, NVM_POWER_ON_LEVEL, NVM_SCENE_BASE, NVM_SHORT_ADDRESS, NVM_SIZE,
};
