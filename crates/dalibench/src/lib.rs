//! Cycle-accurate conformance bench for a DALI control-gear transceiver
//! with an attached SPI FRAM.
//!
//! The bench drives signal-level stimulus into a device model implementing
//! [`Device`] and checks every observable output against the exact bit
//! sequence a conforming bus participant must produce. The first deviation
//! aborts the run with a [`BenchError::Violation`].

mod bench;
mod config;
mod dali;
mod device;
mod error;
mod scenario;
mod spi;
mod vcd;

pub(crate) use fxhash::FxHashMap as HashMap;

pub use bench::Bench;
pub use config::BenchConfig;
pub use dali::DaliLink;
pub use device::{Device, SignalDesc, SignalRef};
pub use error::BenchError;
pub use scenario::{QueryVector, STARTUP_QUERIES, SETUP_BYTES, run_startup};
pub use spi::MemoryLink;
pub use vcd::VcdWriter;
