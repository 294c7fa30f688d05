//! Layout of the persisted configuration image the device fetches from
//! the FRAM at startup.

pub const NVM_MAX_LEVEL: usize = 0;
pub const NVM_MIN_LEVEL: usize = 1;
pub const NVM_FAILURE_LEVEL: usize = 2;
pub const NVM_POWER_ON_LEVEL: usize = 3;
pub const NVM_FADE_TIME: usize = 4;
pub const NVM_FADE_RATE: usize = 5;
/// Sixteen scene levels, one byte each.
pub const NVM_SCENE_BASE: usize = 6;
pub const NVM_GROUPS_0_7: usize = 22;
pub const NVM_GROUPS_8_15: usize = 23;
pub const NVM_SHORT_ADDRESS: usize = 24;

pub const NVM_SIZE: usize = 25;
